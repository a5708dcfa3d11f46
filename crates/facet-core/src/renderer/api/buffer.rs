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

//! Defines data structures related to GPU buffer resources.

use bitflags::bitflags;
use std::borrow::Cow;

bitflags! {
    /// A set of flags describing the allowed usages of a [`BufferId`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// The buffer can be used as the destination of a copy or write operation.
        const COPY_DST = 1 << 0;
        /// The buffer can be bound as a vertex buffer.
        const VERTEX = 1 << 1;
        /// The buffer can be bound as an index buffer.
        const INDEX = 1 << 2;
        /// The buffer can be bound as a constant (uniform) buffer.
        const UNIFORM = 1 << 3;
    }
}

/// A descriptor used to create a [`BufferId`].
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// A bitmask of [`BufferUsage`] flags describing how the buffer will be used.
    pub usage: BufferUsage,
}

/// An opaque handle to a GPU buffer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// The format of the indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Returns the size in bytes of a single index.
    pub fn size(self) -> u32 {
        match self {
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// A buffer together with the element bookkeeping the draw path needs.
///
/// `offset` is bound as the buffer offset and also used as the start location
/// of draw calls reading from this buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementBuffer {
    /// The underlying GPU buffer.
    pub buffer: BufferId,
    /// Number of elements (vertices, indices or instances) stored.
    pub element_count: u32,
    /// Size in bytes of one element.
    pub stride: u32,
    /// Offset of the first element.
    pub offset: u32,
}

impl ElementBuffer {
    /// Creates a binding record starting at offset zero.
    pub fn new(buffer: BufferId, element_count: u32, stride: u32) -> Self {
        Self {
            buffer,
            element_count,
            stride,
            offset: 0,
        }
    }

    /// Returns `true` if the buffer holds at least one element.
    pub fn has_elements(&self) -> bool {
        self.element_count > 0
    }

    /// Size in bytes of the stored elements.
    pub fn byte_len(&self) -> u64 {
        u64::from(self.element_count) * u64::from(self.stride)
    }
}
