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

//! Vertex input layouts.

use std::borrow::Cow;

/// Defines how often the GPU advances to the next element in a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexStepMode {
    /// The GPU advances to the next element for each vertex.
    Vertex,
    /// The GPU advances to the next element only for each new instance being rendered.
    Instance,
}

/// Describes one input stream of a vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexStreamDescriptor {
    /// The byte distance between consecutive elements in the stream.
    pub array_stride: u32,
    /// How often the stream is advanced.
    pub step_mode: VertexStepMode,
}

/// Describes the full set of streams a vertex shader consumes, in slot order.
///
/// Per-vertex streams come first; per-instance streams follow them directly.
#[derive(Debug, Clone)]
pub struct InputLayoutDescriptor<'a> {
    /// An optional debug label for the layout.
    pub label: Option<Cow<'a, str>>,
    /// The streams, indexed by input slot.
    pub streams: Cow<'a, [VertexStreamDescriptor]>,
}

impl InputLayoutDescriptor<'_> {
    /// Number of streams advanced per vertex.
    pub fn vertex_stream_count(&self) -> usize {
        self.streams
            .iter()
            .filter(|s| s.step_mode == VertexStepMode::Vertex)
            .count()
    }
}

/// An opaque handle to a vertex input layout object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputLayoutId(pub usize);
