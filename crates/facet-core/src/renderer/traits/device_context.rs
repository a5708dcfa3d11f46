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

use crate::renderer::api::*;
use crate::renderer::error::RenderError;

/// The immediate context of the render thread.
///
/// Every state setter and draw call the render cores issue goes through this
/// trait. It is intentionally not `Sync`: all calls happen on the thread that
/// owns the context.
///
/// Draw calls report failures through their `Result`; a failed draw must leave
/// the context usable for the next one.
pub trait DeviceContext {
    /// Sets the active rasterizer state.
    fn set_raster_state(&mut self, state: RasterizerStateId);

    /// Sets the vertex input layout used to interpret the bound streams.
    fn set_input_layout(&mut self, layout: InputLayoutId);

    /// Binds a vertex (or instance) buffer to an input slot.
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &ElementBuffer);

    /// Binds an index buffer for indexed drawing.
    fn set_index_buffer(&mut self, buffer: &ElementBuffer, format: IndexFormat);

    /// Binds the shader stages of a program.
    fn bind_shader(&mut self, program: ShaderProgramId);

    /// Binds the parts of `state` selected by `profile`.
    fn bind_states(&mut self, state: &FixedFunctionState, profile: StateBindingProfile);

    /// Records a non-indexed draw call.
    fn draw(&mut self, vertex_count: u32, start_vertex: u32) -> Result<(), RenderError>;

    /// Records an indexed draw call.
    fn draw_indexed(
        &mut self,
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
    ) -> Result<(), RenderError>;

    /// Records an instanced, non-indexed draw call.
    fn draw_instanced(
        &mut self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
        start_instance: u32,
    ) -> Result<(), RenderError>;

    /// Records an instanced, indexed draw call.
    fn draw_indexed_instanced(
        &mut self,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
        start_instance: u32,
    ) -> Result<(), RenderError>;
}
