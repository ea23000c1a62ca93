#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Delayed command delivery driven by the simulation clock.
//!
//! Gameplay pacing in the dungeon is built from short delays: the whip
//! resolves after its windup, the next level loads shortly after the exit is
//! reached, and the game-over screen lingers before the run ends. Adapters
//! register those commands here with a delay, and the scheduler releases them
//! once enough [`Event::TimeAdvanced`] time has accumulated.

use std::collections::VecDeque;
use std::time::Duration;

use scavenger_core::{Command, Event};

#[derive(Clone, Debug)]
struct Entry {
    fire_at: Duration,
    sequence: u64,
    command: Command,
}

/// Pure system that releases commands when their deadline elapses.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_sequence: u64,
    queue: VecDeque<Entry>,
}

impl Scheduler {
    /// Creates an empty scheduler with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command for delivery once the provided delay elapses.
    ///
    /// A zero delay releases the command on the next [`Self::handle`] call.
    pub fn schedule_in(&mut self, delay: Duration, command: Command) {
        let entry = Entry {
            fire_at: self.now.saturating_add(delay),
            sequence: self.next_sequence,
            command,
        };
        self.next_sequence += 1;
        self.queue.push_back(entry);
    }

    /// Reports whether any registered command is still waiting to fire.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Advances the clock from the event stream and releases due commands.
    ///
    /// Commands fire at most once, ordered by deadline and then by
    /// registration order for identical deadlines.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.now = self.now.saturating_add(*dt);
            }
        }

        self.queue
            .make_contiguous()
            .sort_by_key(|entry| (entry.fire_at, entry.sequence));
        while self
            .queue
            .front()
            .is_some_and(|entry| entry.fire_at <= self.now)
        {
            let Some(entry) = self.queue.pop_front() else {
                break;
            };
            out.push(entry.command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(dt: Duration) -> Event {
        Event::TimeAdvanced { dt }
    }

    #[test]
    fn commands_hold_until_their_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(Duration::from_millis(300), Command::ResolveWhip);
        let mut out = Vec::new();

        scheduler.handle(&[tick(Duration::from_millis(200))], &mut out);
        assert!(out.is_empty());

        scheduler.handle(&[tick(Duration::from_millis(100))], &mut out);
        assert_eq!(out, vec![Command::ResolveWhip]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn commands_fire_at_most_once() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(Duration::from_millis(100), Command::ResolveWhip);
        let mut out = Vec::new();

        scheduler.handle(&[tick(Duration::from_secs(1))], &mut out);
        scheduler.handle(&[tick(Duration::from_secs(1))], &mut out);

        assert_eq!(out.len(), 1);
    }

    #[test]
    fn release_order_follows_deadline_then_registration() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(Duration::from_millis(500), Command::Crouch);
        scheduler.schedule_in(Duration::from_millis(200), Command::ResolveWhip);
        scheduler.schedule_in(Duration::from_millis(200), Command::ArmWhip);
        let mut out = Vec::new();

        scheduler.handle(&[tick(Duration::from_secs(1))], &mut out);

        assert_eq!(
            out,
            vec![Command::ResolveWhip, Command::ArmWhip, Command::Crouch]
        );
    }

    #[test]
    fn drain_stops_at_the_first_future_entry() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(Duration::from_millis(800), Command::Crouch);
        scheduler.schedule_in(Duration::from_millis(100), Command::ResolveWhip);
        let mut out = Vec::new();

        scheduler.handle(&[tick(Duration::from_millis(200))], &mut out);
        assert_eq!(out, vec![Command::ResolveWhip]);
        assert!(!scheduler.is_idle());

        scheduler.handle(&[tick(Duration::from_millis(600))], &mut out);
        assert_eq!(out, vec![Command::ResolveWhip, Command::Crouch]);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn zero_delay_fires_on_the_next_handle() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(Duration::ZERO, Command::Crouch);
        let mut out = Vec::new();

        scheduler.handle(&[], &mut out);

        assert_eq!(out, vec![Command::Crouch]);
    }

    #[test]
    fn deadlines_are_relative_to_the_accumulated_clock() {
        let mut scheduler = Scheduler::new();
        let mut out = Vec::new();
        scheduler.handle(&[tick(Duration::from_secs(5))], &mut out);

        scheduler.schedule_in(Duration::from_millis(100), Command::ResolveWhip);
        scheduler.handle(&[tick(Duration::from_millis(50))], &mut out);
        assert!(out.is_empty());

        scheduler.handle(&[tick(Duration::from_millis(50))], &mut out);
        assert_eq!(out, vec![Command::ResolveWhip]);
    }
}
