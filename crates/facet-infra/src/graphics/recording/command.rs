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

use facet_core::renderer::{
    ElementBuffer, FixedFunctionState, IndexFormat, InputLayoutId, RasterizerStateId,
    ShaderProgramId, StateBindingProfile,
};
use std::fmt;

/// One call made on a [`RecordingContext`](super::RecordingContext).
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// `set_raster_state`
    SetRasterState(RasterizerStateId),
    /// `set_input_layout`
    SetInputLayout(InputLayoutId),
    /// `set_vertex_buffer`
    SetVertexBuffer {
        /// Input slot the buffer was bound to.
        slot: u32,
        /// The bound buffer.
        buffer: ElementBuffer,
    },
    /// `set_index_buffer`
    SetIndexBuffer {
        /// The bound buffer.
        buffer: ElementBuffer,
        /// The index format.
        format: IndexFormat,
    },
    /// `bind_shader`
    BindShader(ShaderProgramId),
    /// `bind_states`, with the state already filtered by the profile.
    BindStates {
        /// The state that was applied.
        state: FixedFunctionState,
        /// The requested profile.
        profile: StateBindingProfile,
    },
    /// `draw`
    Draw {
        /// Vertices drawn.
        vertex_count: u32,
        /// First vertex.
        start_vertex: u32,
    },
    /// `draw_indexed`
    DrawIndexed {
        /// Indices drawn.
        index_count: u32,
        /// First index.
        start_index: u32,
        /// Value added to every index.
        base_vertex: i32,
    },
    /// `draw_instanced`
    DrawInstanced {
        /// Vertices drawn per instance.
        vertex_count: u32,
        /// Instances drawn.
        instance_count: u32,
        /// First vertex.
        start_vertex: u32,
        /// First instance.
        start_instance: u32,
    },
    /// `draw_indexed_instanced`
    DrawIndexedInstanced {
        /// Indices drawn per instance.
        index_count: u32,
        /// Instances drawn.
        instance_count: u32,
        /// First index.
        start_index: u32,
        /// Value added to every index.
        base_vertex: i32,
        /// First instance.
        start_instance: u32,
    },
}

impl DeviceCommand {
    /// Returns `true` for the four draw variants.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DeviceCommand::Draw { .. }
                | DeviceCommand::DrawIndexed { .. }
                | DeviceCommand::DrawInstanced { .. }
                | DeviceCommand::DrawIndexedInstanced { .. }
        )
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCommand::SetRasterState(id) => write!(f, "raster state {}", id.0),
            DeviceCommand::SetInputLayout(id) => write!(f, "input layout {}", id.0),
            DeviceCommand::SetVertexBuffer { slot, buffer } => write!(
                f,
                "vertex buffer {} -> slot {slot} ({} x {}B @{})",
                buffer.buffer.0, buffer.element_count, buffer.stride, buffer.offset
            ),
            DeviceCommand::SetIndexBuffer { buffer, format } => write!(
                f,
                "index buffer {} ({} x {format:?} @{})",
                buffer.buffer.0, buffer.element_count, buffer.offset
            ),
            DeviceCommand::BindShader(id) => write!(f, "shader {}", id.0),
            DeviceCommand::BindStates { state, profile } => {
                write!(f, "states {state:?} [{profile:?}]")
            }
            DeviceCommand::Draw {
                vertex_count,
                start_vertex,
            } => write!(f, "draw non-indexed {vertex_count} @{start_vertex}"),
            DeviceCommand::DrawIndexed {
                index_count,
                start_index,
                ..
            } => write!(f, "draw indexed {index_count} @{start_index}"),
            DeviceCommand::DrawInstanced {
                vertex_count,
                instance_count,
                ..
            } => write!(
                f,
                "draw non-indexed instanced verts={vertex_count} instances={instance_count}"
            ),
            DeviceCommand::DrawIndexedInstanced {
                index_count,
                instance_count,
                ..
            } => write!(
                f,
                "draw indexed instanced indices={index_count} instances={instance_count}"
            ),
        }
    }
}
