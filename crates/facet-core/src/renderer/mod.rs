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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module defines the "common language" between the render cores and a
//! graphics backend: the abstract [`traits`] ([`GraphicsDevice`] for resource
//! creation, [`DeviceContext`] for state setting and draw calls), the
//! descriptor types in [`api`], and the error types.
//!
//! This module defines the 'what' of rendering. The 'how' lives in a concrete
//! backend (see `facet-infra`) that implements these traits, while
//! `facet-render` drives them without knowing which backend is underneath.

pub mod api;
pub mod error;
pub mod settings;
pub mod stats;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{RenderError, ResourceError};
pub use self::settings::RenderSettings;
pub use self::stats::FrameStats;
pub use self::traits::{DeviceContext, GraphicsDevice};
