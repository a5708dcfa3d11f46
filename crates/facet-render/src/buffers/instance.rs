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
    BufferUsage, DeviceContext, ElementBuffer, GraphicsDevice, ResourceError,
};
use facet_core::ChangeNotifier;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct InstanceStorage {
    buffer: Option<ElementBuffer>,
    capacity: u64,
}

/// Zero or one per-instance buffer, e.g. instance transforms.
///
/// Writing data that fits into the existing buffer reuses it; anything larger
/// allocates a new buffer. Every call to [`set_instances`](Self::set_instances)
/// notifies the subscribed cores.
pub struct InstanceBufferModel {
    device: Arc<dyn GraphicsDevice>,
    label: Option<String>,
    storage: Mutex<InstanceStorage>,
    notifier: ChangeNotifier,
}

impl InstanceBufferModel {
    /// Creates a model without any instance data.
    pub fn new(device: Arc<dyn GraphicsDevice>) -> Self {
        Self {
            device,
            label: None,
            storage: Mutex::new(InstanceStorage::default()),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Sets the debug label given to buffers created from now on.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn storage(&self) -> MutexGuard<'_, InstanceStorage> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the per-instance data. An empty slice leaves the model without
    /// elements, so draws fall back to their non-instanced variants.
    pub fn set_instances<T: Pod>(&self, instances: &[T]) -> Result<(), ResourceError> {
        let stride = std::mem::size_of::<T>() as u32;
        if stride == 0 {
            return Err(ResourceError::CreationFailed {
                label: self.label.as_deref().unwrap_or("Instance buffer").to_string(),
                details: "instances of a zero-sized type have no data".to_string(),
            });
        }
        let bytes: &[u8] = bytemuck::cast_slice(instances);
        {
            let mut storage = self.storage();
            if instances.is_empty() {
                if let Some(buffer) = storage.buffer.as_mut() {
                    buffer.element_count = 0;
                }
            } else {
                let count = element_count(instances.len())?;
                let current = storage.buffer;
                match current {
                    Some(mut buffer) if bytes.len() as u64 <= storage.capacity => {
                        self.device.write_buffer(buffer.buffer, 0, bytes)?;
                        buffer.element_count = count;
                        buffer.stride = stride;
                        storage.buffer = Some(buffer);
                    }
                    _ => {
                        let label = self.label.as_deref().unwrap_or("Instance buffer");
                        let buffer = upload(
                            self.device.as_ref(),
                            Some(label),
                            BufferUsage::VERTEX,
                            bytes,
                            count,
                            stride,
                        )?;
                        release(self.device.as_ref(), storage.buffer.replace(buffer));
                        storage.capacity = bytes.len() as u64;
                    }
                }
            }
        }
        self.notifier.notify();
        Ok(())
    }

    /// Returns `true` if there is at least one instance to draw.
    pub fn has_elements(&self) -> bool {
        self.storage().buffer.is_some_and(|b| b.has_elements())
    }

    /// Number of instances currently stored.
    pub fn element_count(&self) -> u32 {
        self.storage().buffer.map_or(0, |b| b.element_count)
    }

    /// The instance buffer, including its offset.
    pub fn buffer(&self) -> Option<ElementBuffer> {
        self.storage().buffer
    }

    /// Binds the instance buffer at `*slot` if it has elements and advances the slot.
    ///
    /// Returns the bound buffer, or `None` if nothing was bound.
    pub(crate) fn attach_buffer(
        &self,
        context: &mut dyn DeviceContext,
        slot: &mut u32,
    ) -> Option<ElementBuffer> {
        let buffer = self.storage().buffer.filter(ElementBuffer::has_elements)?;
        context.set_vertex_buffer(*slot, &buffer);
        *slot += 1;
        Some(buffer)
    }
}

impl ObservableModel for InstanceBufferModel {
    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}

impl Drop for InstanceBufferModel {
    fn drop(&mut self) {
        let storage = self.storage.get_mut().unwrap_or_else(PoisonError::into_inner);
        release(self.device.as_ref(), storage.buffer.take());
    }
}

impl fmt::Debug for InstanceBufferModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceBufferModel")
            .field("label", &self.label)
            .field("buffer", &self.buffer())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_infra::{DeviceCommand, RecordingContext, RecordingDevice};

    #[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Transform {
        matrix: [[f32; 4]; 4],
    }

    const IDENTITY: Transform = Transform {
        matrix: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[test]
    fn smaller_updates_reuse_the_buffer() {
        let device = RecordingDevice::new();
        let model = InstanceBufferModel::new(Arc::new(device.clone()));

        model.set_instances(&[IDENTITY; 4]).expect("upload");
        let first = model.buffer().expect("buffer").buffer;
        model.set_instances(&[IDENTITY; 2]).expect("write");

        assert_eq!(model.buffer().map(|b| b.buffer), Some(first));
        assert_eq!(model.element_count(), 2);
        assert_eq!(device.live_buffers(), 1);

        model.set_instances(&[IDENTITY; 8]).expect("grow");
        assert_ne!(model.buffer().map(|b| b.buffer), Some(first));
        assert_eq!(device.live_buffers(), 1);
    }

    #[test]
    fn zero_sized_instances_are_rejected() {
        let device = RecordingDevice::new();
        let model = InstanceBufferModel::new(Arc::new(device.clone()));

        let result = model.set_instances(&[(); 4]);
        assert!(matches!(result, Err(ResourceError::CreationFailed { .. })));
        assert!(!model.has_elements());
        assert_eq!(device.live_buffers(), 0);
    }

    #[test]
    fn empty_instances_are_not_bound() {
        let device = RecordingDevice::new();
        let model = InstanceBufferModel::new(Arc::new(device.clone()));
        model.set_instances(&[IDENTITY]).expect("upload");
        model.set_instances::<Transform>(&[]).expect("clear");
        assert!(!model.has_elements());

        let mut context = RecordingContext::for_device(&device);
        let mut slot = 1;
        assert_eq!(model.attach_buffer(&mut context, &mut slot), None);
        assert_eq!(slot, 1);
        assert!(context.commands().is_empty());
    }

    #[test]
    fn instances_bind_at_the_given_slot() {
        let device = RecordingDevice::new();
        let model = InstanceBufferModel::new(Arc::new(device.clone()));
        model.set_instances(&[IDENTITY; 3]).expect("upload");

        let mut context = RecordingContext::for_device(&device);
        let mut slot = 2;
        let bound = model.attach_buffer(&mut context, &mut slot).expect("bound");
        assert_eq!(bound.element_count, 3);
        assert_eq!(slot, 3);
        assert!(matches!(
            context.commands(),
            [DeviceCommand::SetVertexBuffer { slot: 2, .. }]
        ));
    }
}
