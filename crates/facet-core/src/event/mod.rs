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

//! Provides foundational primitives for event-driven communication.
//!
//! Two kinds of plumbing live here:
//!
//! - [`EventBus`], a generic, thread-safe MPSC channel used to marshal work and
//!   error reports between threads.
//! - [`ChangeNotifier`] and [`Invalidatable`], the explicit observer list that
//!   buffer models use to tell their render cores that contents changed, and the
//!   [`InvalidateSignal`] the frame driver consumes to schedule a re-render.

mod bus;
mod notifier;

pub use self::bus::EventBus;
pub use self::notifier::{ChangeNotifier, Invalidatable, InvalidateSignal, SubscriptionId};
