// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Change notification between buffer models, render cores and the frame driver.
//!
//! A buffer model owns a [`ChangeNotifier`]. Render cores subscribe to it with a
//! *weak* reference, so the model never keeps a core alive and a core that
//! forgot to unsubscribe is simply skipped. Cores are still required to
//! unsubscribe when they swap models or are dropped.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, Weak};

/// Something that can be asked to schedule a re-render.
///
/// This is the parameterless upward signal of the renderer. It must be safe to
/// raise redundantly; coalescing is up to whoever consumes it.
pub trait Invalidatable: Send + Sync {
    /// Requests that the renderer be redrawn.
    fn invalidate_renderer(&self);
}

/// Identifies one subscription inside a [`ChangeNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// An explicit observer list fired whenever the owner's contents are replaced.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Mutex<Vec<(SubscriptionId, Weak<dyn Invalidatable>)>>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    /// Creates an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer and returns the id needed to remove it again.
    pub fn subscribe(&self, observer: Weak<dyn Invalidatable>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    /// Removes a previously registered observer.
    ///
    /// Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        observers.len() != before
    }

    /// Invalidates every live observer and returns how many were reached.
    ///
    /// Observers whose target has been dropped are pruned.
    pub fn notify(&self) -> usize {
        // Upgrade under the lock, call outside of it: an observer may re-enter
        // and subscribe or unsubscribe.
        let live: Vec<_> = {
            let mut observers = self
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            observers.retain(|(_, weak)| weak.strong_count() > 0);
            observers.iter().filter_map(|(_, weak)| weak.upgrade()).collect()
        };
        for observer in &live {
            observer.invalidate_renderer();
        }
        live.len()
    }

    /// Returns the number of registered observers, dead or alive.
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// The "invalidate renderer" flag owned by a frame driver.
///
/// Raising sets a pending flag; [`take`](InvalidateSignal::take) reads and
/// clears it, which is where redundant raises get coalesced.
#[derive(Debug, Default)]
pub struct InvalidateSignal {
    pending: AtomicBool,
    raised: AtomicU64,
}

impl InvalidateSignal {
    /// Creates a signal with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and clears the flag if a re-render was requested.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Returns `true` if a re-render is pending, without clearing it.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Total number of raises since creation, redundant ones included.
    pub fn raise_count(&self) -> u64 {
        self.raised.load(Ordering::Relaxed)
    }
}

impl Invalidatable for InvalidateSignal {
    fn invalidate_renderer(&self) {
        self.raised.fetch_add(1, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }
}
