//! Interactive session pump connecting terminal input to the command loop.
//!
//! Each accepted key becomes one world command. The pump applies it, feeds
//! the resulting events to the enemy AI and the scheduler, applies whatever
//! commands they emit, and then advances the simulation clock until no
//! scheduled command remains. Delayed actions such as the whip windup and the
//! level transition therefore resolve before the next prompt is shown.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scavenger_core::{
    ActorRef, Command, Event, GridPos, Level, SpawnRules, Step, TileKind,
    DEATH_SEQUENCE_DELAY, GAME_OVER_EXIT_DELAY, LEVEL_TRANSITION_DELAY, WELCOME_BANNER,
    WHIP_WINDUP,
};
use scavenger_system_enemy_ai::{Config as AiConfig, EnemyAi};
use scavenger_system_scheduling::Scheduler;
use scavenger_world::{apply, query, World};

/// Simulated time that elapses for each accepted input.
const TURN_TICK: Duration = Duration::from_millis(500);

/// Salt applied to the session seed before seeding the enemy AI, so board
/// layout draws and behaviour draws stay independent.
const AI_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

pub(crate) struct Session {
    world: World,
    ai: EnemyAi,
    scheduler: Scheduler,
    base_seed: u64,
    sfx_rng: ChaCha8Rng,
    levels_cleared: u32,
    relaxed_retry_spent: bool,
    finished: bool,
}

impl Session {
    /// Prepares a session over the provided world using the session seed.
    pub(crate) fn new(world: World, seed: u64) -> Self {
        Self {
            world,
            ai: EnemyAi::new(AiConfig::new(seed ^ AI_SEED_SALT)),
            scheduler: Scheduler::new(),
            base_seed: seed,
            sfx_rng: ChaCha8Rng::seed_from_u64(seed.rotate_left(17)),
            levels_cleared: 0,
            relaxed_retry_spent: false,
            finished: false,
        }
    }

    /// Runs the session until the player quits or the run ends.
    pub(crate) fn run(&mut self, script: Option<&str>) -> anyhow::Result<()> {
        println!("{WELCOME_BANNER}");
        self.dispatch(Command::NewGame {
            seed: self.base_seed,
        });
        self.render();

        match script {
            Some(script) => {
                for key in script.chars() {
                    if self.finished || key == 'q' {
                        break;
                    }
                    self.step(key);
                }
            }
            None => {
                let stdin = io::stdin();
                let mut lines = stdin.lock().lines();
                while !self.finished {
                    print!("> ");
                    io::stdout().flush().context("failed to flush prompt")?;
                    let Some(line) = lines.next() else {
                        break;
                    };
                    let line = line.context("failed to read input line")?;
                    let Some(key) = line.trim().chars().next() else {
                        continue;
                    };
                    if key == 'q' {
                        break;
                    }
                    self.step(key);
                }
            }
        }
        Ok(())
    }

    /// Resolves one input key: the player's command, the enemy sweep, and
    /// every delayed command that comes due.
    fn step(&mut self, key: char) {
        let command = match key {
            'w' => Command::MovePlayer { step: Step::UP },
            's' => Command::MovePlayer { step: Step::DOWN },
            'a' => Command::MovePlayer { step: Step::LEFT },
            'd' => Command::MovePlayer { step: Step::RIGHT },
            'f' => Command::ArmWhip,
            'c' => Command::Crouch,
            _ => {
                println!("keys: w/a/s/d move, f whip, c crouch, q quit");
                return;
            }
        };

        self.dispatch(command);
        self.dispatch(Command::Tick { dt: TURN_TICK });
        while !self.scheduler.is_idle() && !self.finished {
            self.dispatch(Command::Tick { dt: TURN_TICK });
        }
        if self.finished {
            // Linger on the death sequence before the session winds down.
            self.dispatch(Command::Tick {
                dt: DEATH_SEQUENCE_DELAY.saturating_add(GAME_OVER_EXIT_DELAY),
            });
        } else {
            self.render();
        }
    }

    /// Applies a command and pumps the systems until the cascade settles.
    fn dispatch(&mut self, command: Command) {
        let mut queue = VecDeque::from([command]);
        while let Some(command) = queue.pop_front() {
            let mut events = Vec::new();
            apply(&mut self.world, command, &mut events);
            self.narrate(&events);

            let mut commands = Vec::new();
            let player = query::player(&self.world).position;
            let enemies = query::enemies(&self.world);
            self.ai.handle(&events, player, &enemies, &mut commands);
            self.route(&events);
            self.scheduler.handle(&events, &mut commands);
            queue.extend(commands);
        }
    }

    /// Registers the delayed follow-ups implied by the event stream.
    fn route(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WhipArmed => {
                    self.scheduler.schedule_in(WHIP_WINDUP, Command::ResolveWhip);
                }
                Event::ExitReached { completed } => {
                    self.levels_cleared = completed.get();
                    let next = completed.next();
                    self.scheduler.schedule_in(
                        LEVEL_TRANSITION_DELAY,
                        Command::StartLevel {
                            level: next,
                            seed: self.level_seed(next),
                            rules: SpawnRules::Standard,
                        },
                    );
                }
                Event::GenerationFailed { level, error } => {
                    if self.relaxed_retry_spent {
                        println!("the caverns refuse to form: {error}");
                        self.finished = true;
                    } else {
                        self.relaxed_retry_spent = true;
                        self.scheduler.schedule_in(
                            Duration::ZERO,
                            Command::StartLevel {
                                level: *level,
                                seed: self.level_seed(*level),
                                rules: SpawnRules::Relaxed,
                            },
                        );
                    }
                }
                Event::LevelStarted { .. } => self.relaxed_retry_spent = false,
                Event::GameOver => self.finished = true,
                _ => {}
            }
        }
    }

    fn level_seed(&self, level: Level) -> u64 {
        self.base_seed.wrapping_add(u64::from(level.get()))
    }

    /// Prints the player-facing account of the event stream.
    fn narrate(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::LevelStarted { level, .. } => {
                    println!("-- depth {} --", level.get());
                }
                Event::PlayerBlocked { .. } => println!("a wall blocks the way"),
                Event::PlayerHealed { health, .. } => {
                    println!("you eat from your pack, health {health}");
                }
                Event::PlayerDamaged { amount, health } => {
                    println!("a ghoul claws you for {amount}, health {health}");
                }
                Event::TreasureCollected { score } => println!("treasure! score {score}"),
                Event::EnemyDied { enemy } => {
                    println!("ghoul {} crumbles to dust", enemy.get());
                }
                Event::ExitReached { .. } => println!("you slip down the shaft..."),
                Event::GameOver => {
                    println!("you collapse after {} cleared depths", self.levels_cleared);
                }
                Event::AudioCueRequested { cue } => {
                    let clips = cue.clips();
                    let clip = clips[self.sfx_rng.gen_range(0..clips.len())];
                    println!("[sfx] {clip}");
                }
                _ => {}
            }
        }
    }

    /// Draws the board with the highest row on top, then the status line.
    fn render(&self) {
        let (columns, rows) = query::dimensions(&self.world);
        for y in (-1..=rows).rev() {
            let mut line = String::with_capacity((columns + 2) as usize);
            for x in -1..=columns {
                let cell = GridPos::new(x, y);
                let glyph = match query::actor_at(&self.world, cell) {
                    Some(ActorRef::Player) => '@',
                    Some(ActorRef::Enemy(_)) => 'g',
                    None => match query::tile(&self.world, cell) {
                        TileKind::Floor => '.',
                        TileKind::OuterWall => '#',
                        TileKind::Wall => 'X',
                        TileKind::Food => 'F',
                        TileKind::Treasure => 'T',
                        TileKind::Exit => 'E',
                    },
                };
                line.push(glyph);
            }
            println!("{line}");
        }
        let player = query::player(&self.world);
        println!(
            "depth {} | health {} | score {}",
            query::level(&self.world).get(),
            player.health,
            player.score
        );
    }
}
