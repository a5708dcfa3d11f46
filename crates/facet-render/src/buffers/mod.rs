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

//! Geometry and instance buffer models.
//!
//! A model owns its GPU buffers and an observer list. Render cores only hold a
//! weak reference to it and subscribe to its [`ChangeNotifier`] to learn when the
//! contents were replaced.

mod geometry;
mod instance;

pub use self::geometry::{GeometryBufferModel, VertexStream};
pub use self::instance::InstanceBufferModel;

use facet_core::renderer::{
    BufferDescriptor, BufferUsage, ElementBuffer, GraphicsDevice, ResourceError,
};
use facet_core::ChangeNotifier;
use std::borrow::Cow;

/// A buffer model that raises a change notification when its contents are replaced.
pub trait ObservableModel: Send + Sync {
    /// The observer list of this model.
    fn notifier(&self) -> &ChangeNotifier;
}

/// Uploads `bytes` into a new buffer and wraps it in an [`ElementBuffer`].
pub(crate) fn upload(
    device: &dyn GraphicsDevice,
    label: Option<&str>,
    usage: BufferUsage,
    bytes: &[u8],
    element_count: u32,
    stride: u32,
) -> Result<ElementBuffer, ResourceError> {
    let descriptor = BufferDescriptor {
        label: label.map(Cow::Borrowed),
        size: bytes.len() as u64,
        usage: usage | BufferUsage::COPY_DST,
    };
    let buffer = device.create_buffer_with_data(&descriptor, bytes)?;
    Ok(ElementBuffer::new(buffer, element_count, stride))
}

/// Destroys `buffers`, logging failures instead of returning them.
pub(crate) fn release<I>(device: &dyn GraphicsDevice, buffers: I)
where
    I: IntoIterator<Item = ElementBuffer>,
{
    for buffer in buffers {
        if let Err(e) = device.destroy_buffer(buffer.buffer) {
            log::warn!("Failed to destroy buffer {:?}: {e}", buffer.buffer);
        }
    }
}

/// Converts an element count to the 32-bit count used by draw calls.
pub(crate) fn element_count(len: usize) -> Result<u32, ResourceError> {
    u32::try_from(len).map_err(|_| ResourceError::CreationFailed {
        label: "element buffer".to_string(),
        details: format!("{len} elements exceed the 32-bit draw range"),
    })
}
