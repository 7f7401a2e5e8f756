//! Deferred actions keyed by scheduler clock tick
//!
//! Everything that outlives a single frame (pose reverts, shake reset, music
//! notes, transition dwell, ending effects) goes through this queue instead of
//! wall-clock timers, so the whole game stays deterministic.
//!
//! Each entry remembers the epoch it was scheduled in. Level starts and game
//! restarts advance the epoch, which silently invalidates everything queued
//! for the previous level.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

/// Work to run once its due tick is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Deferred {
    /// Boss returns from attack pose to idle
    BossIdle,
    /// Undo the damage screen-shake offset
    ShakeReset,
    /// Next note of the background music
    MusicNote { generation: u32 },
    /// Boss defeat fade-in finished; decide between next level and victory
    TransitionDwell,
    /// Load the next level behind the transition screen
    LoadNextLevel,
    /// Transition screen finished fading out
    HideTransition,
    /// One step of the punitive ending's jitter loop
    EndingJitter,
    /// Ask the host application to close
    CloseHost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    due: u64,
    seq: u64,
    epoch: u32,
    action: Deferred,
}

impl Ord for Scheduled {
    // Reversed so the max-heap pops the earliest entry first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A due action together with the epoch it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueAction {
    pub epoch: u32,
    pub action: Deferred,
}

/// Priority queue of deferred actions (earliest due first, FIFO on ties)
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run at clock tick `due`
    pub fn schedule(&mut self, due: u64, epoch: u32, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due,
            seq,
            epoch,
            action,
        });
    }

    /// Remove and return every action due at or before `now`, in order
    pub fn take_due(&mut self, now: u64) -> Vec<DueAction> {
        let mut due = Vec::new();
        while let Some(next) = self.queue.peek() {
            if next.due > now {
                break;
            }
            if let Some(entry) = self.queue.pop() {
                due.push(DueAction {
                    epoch: entry.epoch,
                    action: entry.action,
                });
            }
        }
        due
    }

    /// Drop every pending action
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// True if an action of this kind is waiting (any epoch)
    pub fn contains(&self, action: Deferred) -> bool {
        self.queue.iter().any(|s| s.action == action)
    }
}
