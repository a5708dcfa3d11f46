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

//! # Facet Render
//!
//! The hot path of the renderer: everything between "here is a bound
//! geometry + material + instance set" and "these are the state changes and
//! draw calls the device must see, in this order".
//!
//! - [`raster_state`]: the deduplicating, reference-counted rasterizer state cache.
//! - [`buffers`]: geometry and instance buffer models with change notification.
//! - [`technique`]: shader passes, techniques and the technique registry.
//! - [`render_core`]: the [`GeometryRenderCore`], its attachment lifecycle and the
//!   draw dispatch table.
//! - [`frame`]: the [`FrameDriver`], which owns the scene on the render thread,
//!   applies work posted from other threads and runs the shadow and color passes.

#![warn(missing_docs)]

pub mod buffers;
pub mod context;
pub mod error;
pub mod frame;
pub mod raster_state;
pub mod render_core;
pub mod resources;
pub mod technique;

pub use crate::buffers::{GeometryBufferModel, InstanceBufferModel, ObservableModel, VertexStream};
pub use crate::context::{CameraData, LightData, LightKind, RenderContext, RenderPassKind};
pub use crate::error::TechniqueError;
pub use crate::frame::{
    CoreId, FrameDriver, FrameError, MeshNode, Scene, SceneCommand, ScenePoster,
};
pub use crate::raster_state::{RasterStateHandle, RasterizerStateCache};
pub use crate::render_core::{
    AttachStatus, Attachable, DrawCall, Drawable, GeometryRenderCore, RenderType,
};
pub use crate::resources::RenderResources;
pub use crate::technique::{ShaderPass, Technique, TechniqueBuilder, TechniqueRegistry};
