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

//! Render cores: the attachment lifecycle and the per-frame draw protocol.
//!
//! A render core is composed from small capabilities instead of a base class:
//! [`Attachable`] for the technique lifecycle, [`Drawable`] for the draw entry
//! points and [`Invalidatable`](facet_core::Invalidatable) for the upward
//! "invalidate renderer" signal. Which draw variant is issued is decided by the
//! pure [`DrawCall::select`] table.

mod dispatch;
mod geometry_core;
mod render_type;
mod traits;

pub use self::dispatch::DrawCall;
pub use self::geometry_core::GeometryRenderCore;
pub use self::render_type::RenderType;
pub use self::traits::{AttachStatus, Attachable, Drawable};
