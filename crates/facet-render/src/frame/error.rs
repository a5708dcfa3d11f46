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

use super::CoreId;
use crate::context::RenderPassKind;
use crate::error::TechniqueError;
use facet_core::renderer::{RenderError, ResourceError};
use thiserror::Error;

/// An error reported on the frame driver's device-error channel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    /// A core failed to draw. The frame went on with the next core.
    #[error("{pass:?} pass of core {core} failed: {source}")]
    Draw {
        /// The core that failed.
        core: CoreId,
        /// The pass being rendered.
        pass: RenderPassKind,
        /// The device error.
        source: RenderError,
    },
    /// GPU state for a core could not be created.
    #[error("failed to attach render core: {0}")]
    Attach(#[from] ResourceError),
    /// A core referred to a technique or pass that does not exist.
    #[error(transparent)]
    Technique(#[from] TechniqueError),
}
