#![forbid(unsafe_code)]

//! Timeline: keyed animations advanced together, with queued completions.
//!
//! A [`Timeline`] owns any number of running animations, each identified by a
//! caller-chosen key. Ticking advances every member; members that finish are
//! removed and their keys are queued. The caller drains the queue and reacts,
//! so no closures are stored and ordering stays explicit.
//!
//! # Invariants
//!
//! 1. Every inserted animation's key is queued exactly once, when it completes
//!    (or when it is force-finished).
//! 2. Completed keys are queued in insertion order within a single tick.
//! 3. Inserting an existing key replaces the running animation without
//!    reporting the replaced one.
//! 4. `drain_completed()` clears the queue; keys are not replayed.

use std::fmt;
use std::time::Duration;

use super::{Animation, Delayed};

struct Entry<K> {
    key: K,
    animation: Box<dyn Animation>,
}

/// A set of keyed animations with a completion queue.
pub struct Timeline<K> {
    entries: Vec<Entry<K>>,
    completed: Vec<K>,
}

impl<K: fmt::Debug> fmt::Debug for Timeline<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("running", &self.entries.iter().map(|e| &e.key).collect::<Vec<_>>())
            .field("completed", &self.completed)
            .finish()
    }
}

impl<K> Default for Timeline<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            completed: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> Timeline<K> {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `animation` under `key`, replacing any animation with that key.
    pub fn insert(&mut self, key: K, animation: Box<dyn Animation>) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            existing.animation = animation;
        } else {
            self.entries.push(Entry { key, animation });
        }
    }

    /// Start `animation` under `key` after `delay`.
    pub fn insert_delayed(&mut self, key: K, delay: Duration, animation: Box<dyn Animation>) {
        if delay.is_zero() {
            self.insert(key, animation);
        } else {
            self.insert(key, Box::new(Delayed::new(delay, animation)));
        }
    }

    /// Advance every running animation by `dt` and queue the ones that finish.
    pub fn tick(&mut self, dt: Duration) {
        for entry in &mut self.entries {
            entry.animation.tick(dt);
        }
        let completed = &mut self.completed;
        self.entries.retain(|entry| {
            if entry.animation.is_complete() {
                completed.push(entry.key);
                false
            } else {
                true
            }
        });
    }

    /// Finish every running animation now, queueing all keys.
    pub fn finish_all(&mut self) {
        self.completed
            .extend(self.entries.drain(..).map(|entry| entry.key));
    }

    /// Current value of the animation under `key`, if it is running.
    #[must_use]
    pub fn value(&self, key: K) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.animation.value())
    }

    /// Unclamped position of the animation under `key`, if it is running.
    #[must_use]
    pub fn position(&self, key: K) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.animation.position())
    }

    /// Whether an animation is running under `key`.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Number of running animations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take all queued completions.
    pub fn drain_completed(&mut self) -> Vec<K> {
        std::mem::take(&mut self.completed)
    }
}
