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

use super::DrawCall;
use crate::context::RenderContext;
use crate::resources::RenderResources;
use crate::technique::{ShaderPass, Technique};
use facet_core::renderer::{DeviceContext, RenderError, ResourceError};
use std::sync::Arc;

/// Outcome of a successful [`Attachable::attach`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachStatus {
    /// The core is now attached to the technique.
    Attached,
    /// The core was already attached; nothing changed.
    AlreadyAttached,
    /// The technique has no passes. The core stays detached.
    InvalidTechnique,
}

/// The technique attachment lifecycle: Detached -> Attached -> Detached.
pub trait Attachable {
    /// Attaches to `technique`, resolving passes and creating GPU state from `resources`.
    ///
    /// ## Errors
    /// * `ResourceError` - If GPU state creation failed. The core stays detached.
    fn attach(
        &mut self,
        technique: &Arc<Technique>,
        resources: &RenderResources,
    ) -> Result<AttachStatus, ResourceError>;

    /// Releases everything resolved by `attach`. Does nothing when detached.
    fn detach(&mut self);

    /// Returns `true` while attached.
    fn is_attached(&self) -> bool;
}

/// The per-frame draw entry points of a render core.
///
/// Callers must check [`can_render`](Drawable::can_render) before calling any
/// of the draw methods. Each draw method returns the draw call it issued, or
/// `None` if it had nothing to draw.
pub trait Drawable {
    /// Returns `true` if the core is attached and has geometry.
    fn can_render(&self, context: &RenderContext) -> bool;

    /// Renders the pass selected by `context.pass`.
    fn render(
        &self,
        context: &RenderContext,
        device: &mut dyn DeviceContext,
    ) -> Result<Option<DrawCall>, RenderError>;

    /// Renders into the current shadow map.
    fn render_shadow(
        &self,
        context: &RenderContext,
        device: &mut dyn DeviceContext,
    ) -> Result<Option<DrawCall>, RenderError>;

    /// Draws with a pass the caller has already bound.
    fn render_custom(
        &self,
        context: &RenderContext,
        device: &mut dyn DeviceContext,
        pass: &ShaderPass,
    ) -> Result<Option<DrawCall>, RenderError>;
}
