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

use facet_core::renderer::{DeviceContext, ElementBuffer, RenderError};
use std::fmt;

/// One of the four draw variants, with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    /// Index buffer present, no instances.
    Indexed {
        /// Number of indices.
        index_count: u32,
        /// Offset of the index buffer.
        start_index: u32,
    },
    /// Index buffer present, instances present.
    IndexedInstanced {
        /// Number of indices per instance.
        index_count: u32,
        /// Number of instances.
        instance_count: u32,
        /// Offset of the index buffer.
        start_index: u32,
        /// Offset of the instance buffer.
        start_instance: u32,
    },
    /// No index buffer, no instances.
    NonIndexed {
        /// Number of vertices in the first stream.
        vertex_count: u32,
    },
    /// No index buffer, instances present.
    NonIndexedInstanced {
        /// Number of vertices in the first stream.
        vertex_count: u32,
        /// Number of instances.
        instance_count: u32,
        /// Offset of the instance buffer.
        start_instance: u32,
    },
}

impl DrawCall {
    /// Picks the draw variant for the given buffers.
    ///
    /// Instances only count if the buffer holds at least one element. Missing
    /// vertex data yields a zero-length non-indexed draw.
    pub fn select(
        index: Option<&ElementBuffer>,
        first_vertex: Option<&ElementBuffer>,
        instances: Option<&ElementBuffer>,
    ) -> Self {
        let instances = instances.filter(|buffer| buffer.has_elements());
        let vertex_count = first_vertex.map_or(0, |buffer| buffer.element_count);
        match (index, instances) {
            (Some(index), None) => DrawCall::Indexed {
                index_count: index.element_count,
                start_index: index.offset,
            },
            (Some(index), Some(instances)) => DrawCall::IndexedInstanced {
                index_count: index.element_count,
                instance_count: instances.element_count,
                start_index: index.offset,
                start_instance: instances.offset,
            },
            (None, None) => DrawCall::NonIndexed { vertex_count },
            (None, Some(instances)) => DrawCall::NonIndexedInstanced {
                vertex_count,
                instance_count: instances.element_count,
                start_instance: instances.offset,
            },
        }
    }

    /// Issues the draw on `device`.
    pub fn issue(&self, device: &mut dyn DeviceContext) -> Result<(), RenderError> {
        match *self {
            DrawCall::Indexed {
                index_count,
                start_index,
            } => device.draw_indexed(index_count, start_index, 0),
            DrawCall::IndexedInstanced {
                index_count,
                instance_count,
                start_index,
                start_instance,
            } => device.draw_indexed_instanced(
                index_count,
                instance_count,
                start_index,
                0,
                start_instance,
            ),
            DrawCall::NonIndexed { vertex_count } => device.draw(vertex_count, 0),
            DrawCall::NonIndexedInstanced {
                vertex_count,
                instance_count,
                start_instance,
            } => device.draw_instanced(vertex_count, instance_count, 0, start_instance),
        }
    }

    /// Returns `true` for the indexed variants.
    pub fn is_indexed(&self) -> bool {
        matches!(self, DrawCall::Indexed { .. } | DrawCall::IndexedInstanced { .. })
    }

    /// Returns `true` for the instanced variants.
    pub fn is_instanced(&self) -> bool {
        matches!(
            self,
            DrawCall::IndexedInstanced { .. } | DrawCall::NonIndexedInstanced { .. }
        )
    }
}

impl fmt::Display for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCall::Indexed {
                index_count,
                start_index,
            } => write!(f, "draw indexed {index_count} @{start_index}"),
            DrawCall::IndexedInstanced {
                index_count,
                instance_count,
                ..
            } => write!(
                f,
                "draw indexed instanced indices={index_count} instances={instance_count}"
            ),
            DrawCall::NonIndexed { vertex_count } => write!(f, "draw non-indexed {vertex_count} @0"),
            DrawCall::NonIndexedInstanced {
                vertex_count,
                instance_count,
                ..
            } => write!(
                f,
                "draw non-indexed instanced verts={vertex_count} instances={instance_count}"
            ),
        }
    }
}
