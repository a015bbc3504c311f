//! The scripted-event queue: delayed one-shot narrative events, fired in due-time
//! order on the same logical thread as everything else.
//!
//! There are no timer threads. Transitions enqueue events with relative delays, the
//! session pops whatever has come due, and equal due times fire in enqueue order.
//! When the run hits a terminal state, everything still pending is dropped in one
//! shot -- a chain mid-flight is cancellable at any link because cancellation
//! doesn't care where a chain thinks it is.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

#[cfg(test)]
use mock_instant::Instant;
#[cfg(not(test))]
use std::time::Instant;

use crate::event::Event;

/// One queued event. Ordered by (due, seq): earliest first, ties in enqueue order.
#[derive(Debug, Clone)]
struct Slot {
    due: Instant,
    seq: u64,
    event: Event,
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Slot {}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Single-threaded cooperative scheduler for scripted narrative events.
#[derive(Debug, Default)]
pub struct Sequencer {
    queue: BinaryHeap<Reverse<Slot>>,
    seq: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one event, `delay` from now.
    pub fn schedule(&mut self, delay: Duration, event: Event) {
        self.schedule_at(Instant::now() + delay, event);
    }

    /// Queue a chain of events. Each link's delay is relative to the previous
    /// link's firing instant, not to now; a zero delay rides along with the link
    /// before it.
    pub fn schedule_chain(&mut self, links: impl IntoIterator<Item = (Duration, Event)>) {
        let mut due = Instant::now();
        for (delay, event) in links {
            due = due + delay;
            self.schedule_at(due, event);
        }
    }

    fn schedule_at(&mut self, due: Instant, event: Event) {
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(Reverse(Slot { due, seq, event }));
    }

    /// Pop the next event that has come due, if any.
    pub fn pop_due(&mut self, now: Instant) -> Option<Event> {
        if self.queue.peek().map_or(true, |Reverse(slot)| slot.due > now) {
            return None;
        }
        self.queue.pop().map(|Reverse(slot)| slot.event)
    }

    /// When the next event comes due, if anything is pending.
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.peek().map(|Reverse(slot)| slot.due)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop everything still pending, all at once. Returns how many died.
    pub fn cancel_pending(&mut self) -> usize {
        let dropped = self.queue.len();
        if dropped > 0 {
            tracing::debug!(dropped, "cancelled pending scripted events");
            self.queue.clear();
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mock_instant::MockClock;

    use super::*;
    use crate::event::Severity;

    fn note(text: &str) -> Event {
        Event::notice(Severity::Info, text)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut seq = Sequencer::new();
        seq.schedule(ms(100), note("later"));
        assert_eq!(seq.pop_due(Instant::now()), None);
        MockClock::advance(ms(99));
        assert_eq!(seq.pop_due(Instant::now()), None);
        MockClock::advance(ms(1));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("later")));
        assert_eq!(seq.pop_due(Instant::now()), None);
    }

    #[test]
    fn events_fire_in_due_order() {
        let mut seq = Sequencer::new();
        seq.schedule(ms(200), note("second"));
        seq.schedule(ms(100), note("first"));
        MockClock::advance(ms(300));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("first")));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("second")));
    }

    #[test]
    fn equal_due_times_fire_in_enqueue_order() {
        let mut seq = Sequencer::new();
        seq.schedule(ms(100), note("a"));
        seq.schedule(ms(100), note("b"));
        seq.schedule(ms(100), note("c"));
        MockClock::advance(ms(100));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("a")));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("b")));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("c")));
    }

    #[test]
    fn chain_delays_are_relative_to_the_previous_link() {
        let mut seq = Sequencer::new();
        seq.schedule_chain([
            (ms(100), note("analyzing")),
            (ms(400), note("reveal")),
            (ms(0), note("rider")),
        ]);
        MockClock::advance(ms(100));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("analyzing")));
        assert_eq!(seq.pop_due(Instant::now()), None);
        MockClock::advance(ms(399));
        assert_eq!(seq.pop_due(Instant::now()), None);
        MockClock::advance(ms(1));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("reveal")));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("rider")));
    }

    #[test]
    fn cancel_drops_everything_pending() {
        let mut seq = Sequencer::new();
        seq.schedule_chain([(ms(100), note("one")), (ms(100), note("two"))]);
        MockClock::advance(ms(100));
        assert_eq!(seq.pop_due(Instant::now()), Some(note("one")));
        // the chain is mid-flight; cancellation still takes the rest
        assert_eq!(seq.cancel_pending(), 1);
        MockClock::advance(ms(1000));
        assert_eq!(seq.pop_due(Instant::now()), None);
        assert_eq!(seq.pending(), 0);
    }

    #[test]
    fn next_due_reports_the_earliest_slot() {
        let mut seq = Sequencer::new();
        assert_eq!(seq.next_due(), None);
        seq.schedule(ms(500), note("far"));
        seq.schedule(ms(100), note("near"));
        assert_eq!(seq.next_due(), Some(Instant::now() + ms(100)));
    }
}
