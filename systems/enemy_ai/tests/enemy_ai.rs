//! Enemy AI driving a live world through the command loop.

use scavenger_core::{Command, Event, GridPos, TileKind};
use scavenger_system_enemy_ai::{Config, EnemyAi};
use scavenger_world::{apply, query, scaffolding, World};

fn run_enemy_turn(world: &mut World, ai: &mut EnemyAi, events: &[Event]) -> Vec<Event> {
    let player = query::player(world).position;
    let enemies = query::enemies(world);
    let mut commands = Vec::new();
    ai.handle(events, player, &enemies, &mut commands);

    let mut out = Vec::new();
    for command in commands {
        apply(world, command, &mut out);
    }
    out
}

#[test]
fn each_enemy_takes_exactly_one_step_per_player_turn() {
    let mut world = scaffolding::scenario_world(9, 9);
    let enemy = scaffolding::spawn_enemy(&mut world, GridPos::new(4, 4));
    let mut ai = EnemyAi::new(Config::new(3));

    let events = run_enemy_turn(&mut world, &mut ai, &[Event::PlayerTurnEnded]);

    let moves: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyMoved { .. }))
        .collect();
    assert_eq!(moves.len(), 1);
    let position = query::enemies(&world)[0].position;
    assert_eq!(GridPos::new(4, 4).distance_squared(position), 1);
    assert_eq!(query::enemies(&world)[0].id, enemy);
}

#[test]
fn enemies_never_step_onto_blocking_tiles() {
    let mut world = scaffolding::scenario_world(9, 9);
    // Box the enemy in so every pursuit step is denied.
    for cell in [
        GridPos::new(3, 4),
        GridPos::new(5, 4),
        GridPos::new(4, 3),
        GridPos::new(4, 5),
    ] {
        scaffolding::set_tile(&mut world, cell, TileKind::Wall);
    }
    let _ = scaffolding::spawn_enemy(&mut world, GridPos::new(4, 4));
    let mut ai = EnemyAi::new(Config::new(3));

    for _ in 0..16 {
        let events = run_enemy_turn(&mut world, &mut ai, &[Event::PlayerTurnEnded]);
        assert!(events.is_empty(), "denied moves must be silent");
    }
    assert_eq!(query::enemies(&world)[0].position, GridPos::new(4, 4));
}

#[test]
fn adjacent_enemy_attacks_instead_of_moving() {
    let mut world = scaffolding::scenario_world(9, 9);
    scaffolding::place_player(&mut world, GridPos::new(4, 4));
    // Surround the player so any step the AI picks lands on the player.
    let ids = [
        scaffolding::spawn_enemy(&mut world, GridPos::new(3, 4)),
        scaffolding::spawn_enemy(&mut world, GridPos::new(5, 4)),
        scaffolding::spawn_enemy(&mut world, GridPos::new(4, 3)),
        scaffolding::spawn_enemy(&mut world, GridPos::new(4, 5)),
    ];
    // Wall off every retreat cell so even reversed draws hit something solid.
    for cell in [
        GridPos::new(2, 4),
        GridPos::new(6, 4),
        GridPos::new(4, 2),
        GridPos::new(4, 6),
        GridPos::new(3, 3),
        GridPos::new(3, 5),
        GridPos::new(5, 3),
        GridPos::new(5, 5),
    ] {
        scaffolding::set_tile(&mut world, cell, TileKind::Wall);
    }
    let mut ai = EnemyAi::new(Config::new(3));

    let events = run_enemy_turn(&mut world, &mut ai, &[Event::PlayerTurnEnded]);

    // Every draw either lands on the player or on a wall, so enemies never
    // relocate and the player's health drops by exactly the hits landed.
    let attacks = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyAttacked { .. }))
        .count() as i32;
    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::EnemyMoved { .. })));
    assert_eq!(query::player(&world).health, 100 - 10 * attacks);
    assert_eq!(query::enemies(&world).len(), ids.len());
}
