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

use super::{element_count, release, upload, ObservableModel};
use bytemuck::Pod;
use facet_core::renderer::{
    BufferUsage, DeviceContext, ElementBuffer, GraphicsDevice, IndexFormat, InputLayoutId,
    ResourceError,
};
use facet_core::ChangeNotifier;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Raw data for one per-vertex stream.
#[derive(Debug, Clone, Copy)]
pub struct VertexStream<'a> {
    /// Tightly packed vertex data.
    pub data: &'a [u8],
    /// Size in bytes of one vertex in this stream.
    pub stride: u32,
}

impl<'a> VertexStream<'a> {
    /// Views a slice of plain vertices as a stream.
    pub fn from_slice<V: Pod>(vertices: &'a [V]) -> Self {
        Self {
            data: bytemuck::cast_slice(vertices),
            stride: std::mem::size_of::<V>() as u32,
        }
    }
}

/// The buffers a geometry model had bound, read under a single lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoundGeometry {
    pub index: Option<ElementBuffer>,
    pub first_vertex: Option<ElementBuffer>,
}

#[derive(Debug, Default)]
struct GeometryBuffers {
    vertex: Vec<ElementBuffer>,
    index: Option<(ElementBuffer, IndexFormat)>,
}

impl GeometryBuffers {
    fn all(&self) -> impl Iterator<Item = ElementBuffer> + '_ {
        self.vertex
            .iter()
            .copied()
            .chain(self.index.iter().map(|(buffer, _)| *buffer))
    }
}

/// Vertex streams plus an optional index buffer for one piece of geometry.
///
/// The model is created and filled on any thread and is then referenced
/// weakly by render cores. Every replacement of its contents notifies the
/// subscribed cores.
pub struct GeometryBufferModel {
    device: Arc<dyn GraphicsDevice>,
    label: Option<String>,
    buffers: RwLock<GeometryBuffers>,
    notifier: ChangeNotifier,
}

impl GeometryBufferModel {
    /// Creates an empty model whose buffers live on `device`.
    pub fn new(device: Arc<dyn GraphicsDevice>) -> Self {
        Self {
            device,
            label: None,
            buffers: RwLock::new(GeometryBuffers::default()),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Sets the debug label given to buffers created from now on.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, GeometryBuffers> {
        self.buffers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GeometryBuffers> {
        self.buffers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the vertex data with a single stream.
    pub fn set_vertices<V: Pod>(&self, vertices: &[V]) -> Result<(), ResourceError> {
        self.set_vertex_streams(&[VertexStream::from_slice(vertices)])
    }

    /// Replaces the vertex data with one buffer per stream, in slot order.
    ///
    /// Empty streams are skipped. If any upload fails, the buffers created so
    /// far are destroyed and the previous contents stay in place.
    pub fn set_vertex_streams(&self, streams: &[VertexStream<'_>]) -> Result<(), ResourceError> {
        let mut created = Vec::with_capacity(streams.len());
        for stream in streams.iter().filter(|s| !s.data.is_empty()) {
            match self.upload_stream(stream) {
                Ok(buffer) => created.push(buffer),
                Err(e) => {
                    release(self.device.as_ref(), created);
                    return Err(e);
                }
            }
        }

        let old = std::mem::replace(&mut self.write().vertex, created);
        release(self.device.as_ref(), old);
        self.notifier.notify();
        Ok(())
    }

    fn upload_stream(&self, stream: &VertexStream<'_>) -> Result<ElementBuffer, ResourceError> {
        let label = self.label.as_deref().unwrap_or("Vertex buffer");
        if stream.stride == 0 || stream.data.len() % stream.stride as usize != 0 {
            return Err(ResourceError::CreationFailed {
                label: label.to_string(),
                details: format!(
                    "{} bytes do not divide into vertices of {} bytes",
                    stream.data.len(),
                    stream.stride
                ),
            });
        }
        let count = element_count(stream.data.len() / stream.stride as usize)?;
        upload(
            self.device.as_ref(),
            Some(label),
            BufferUsage::VERTEX,
            stream.data,
            count,
            stream.stride,
        )
    }

    /// Replaces the index buffer with 32-bit indices. An empty slice clears it.
    pub fn set_indices(&self, indices: &[u32]) -> Result<(), ResourceError> {
        self.set_index_data(bytemuck::cast_slice(indices), indices.len(), IndexFormat::Uint32)
    }

    /// Replaces the index buffer with 16-bit indices. An empty slice clears it.
    pub fn set_indices_u16(&self, indices: &[u16]) -> Result<(), ResourceError> {
        self.set_index_data(bytemuck::cast_slice(indices), indices.len(), IndexFormat::Uint16)
    }

    fn set_index_data(
        &self,
        bytes: &[u8],
        len: usize,
        format: IndexFormat,
    ) -> Result<(), ResourceError> {
        let index = if bytes.is_empty() {
            None
        } else {
            let label = self.label.as_deref().unwrap_or("Index buffer");
            let buffer = upload(
                self.device.as_ref(),
                Some(label),
                BufferUsage::INDEX,
                bytes,
                element_count(len)?,
                format.size(),
            )?;
            Some((buffer, format))
        };

        let old = std::mem::replace(&mut self.write().index, index);
        release(self.device.as_ref(), old.map(|(buffer, _)| buffer));
        self.notifier.notify();
        Ok(())
    }

    /// Removes the index buffer, turning draws into non-indexed ones.
    pub fn clear_indices(&self) {
        let old = self.write().index.take();
        if let Some((buffer, _)) = old {
            release(self.device.as_ref(), [buffer]);
            self.notifier.notify();
        }
    }

    /// The index buffer and its format, if any.
    pub fn index_buffer(&self) -> Option<(ElementBuffer, IndexFormat)> {
        self.read().index
    }

    /// The per-vertex buffers in slot order.
    pub fn vertex_buffers(&self) -> Vec<ElementBuffer> {
        self.read().vertex.clone()
    }

    /// The first vertex stream, which decides the non-indexed vertex count.
    pub fn first_vertex_stream(&self) -> Option<ElementBuffer> {
        self.read().vertex.first().copied()
    }

    /// Number of per-vertex streams.
    pub fn vertex_stream_count(&self) -> usize {
        self.read().vertex.len()
    }

    /// Binds `layout`, then every vertex stream starting at `*slot`, then the
    /// index buffer.
    ///
    /// On return `*slot` is the first free slot after the last vertex stream.
    pub(crate) fn attach_buffers(
        &self,
        context: &mut dyn DeviceContext,
        layout: InputLayoutId,
        slot: &mut u32,
    ) -> BoundGeometry {
        let buffers = self.read();
        context.set_input_layout(layout);
        for buffer in &buffers.vertex {
            context.set_vertex_buffer(*slot, buffer);
            *slot += 1;
        }
        if let Some((buffer, format)) = &buffers.index {
            context.set_index_buffer(buffer, *format);
        }
        BoundGeometry {
            index: buffers.index.map(|(buffer, _)| buffer),
            first_vertex: buffers.vertex.first().copied(),
        }
    }
}

impl ObservableModel for GeometryBufferModel {
    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}

impl Drop for GeometryBufferModel {
    fn drop(&mut self) {
        let buffers = std::mem::take(
            self.buffers
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        release(self.device.as_ref(), buffers.all().collect::<Vec<_>>());
    }
}

impl fmt::Debug for GeometryBufferModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffers = self.read();
        f.debug_struct("GeometryBufferModel")
            .field("label", &self.label)
            .field("vertex", &buffers.vertex)
            .field("index", &buffers.index)
            .field("notifier", &self.notifier)
            .finish()
    }
}
