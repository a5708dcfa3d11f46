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
    BufferDescriptor, BufferId, GraphicsDevice, InputLayoutDescriptor, InputLayoutId,
    RasterizerStateDescriptor, RasterizerStateId, ResourceError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct RecordedBuffer {
    label: Option<String>,
    data: Vec<u8>,
}

/// The internal, non-clonable state of the [`RecordingDevice`].
#[derive(Debug, Default)]
struct RecordingDeviceInternal {
    rasterizer_states: Mutex<HashMap<RasterizerStateId, RasterizerStateDescriptor>>,
    input_layouts: Mutex<HashMap<InputLayoutId, usize>>,
    buffers: Mutex<HashMap<BufferId, RecordedBuffer>>,

    next_rasterizer_state_id: AtomicUsize,
    next_input_layout_id: AtomicUsize,
    next_buffer_id: AtomicUsize,

    rasterizer_state_creations: AtomicUsize,
    device_lost: AtomicBool,
}

/// A clonable, thread-safe headless device.
///
/// Resources live in CPU memory and can be inspected, which makes this device
/// the backend of choice for tests. Setting the device as lost makes every
/// creation call fail with [`ResourceError::DeviceLost`], and every
/// [`RecordingContext`](super::RecordingContext) created from it reject draws.
#[derive(Clone, Debug, Default)]
pub struct RecordingDevice {
    internal: Arc<RecordingDeviceInternal>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecordingDevice {
    /// Creates a device with no resources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing (or recovering) the device.
    pub fn set_device_lost(&self, lost: bool) {
        if lost {
            log::warn!("RecordingDevice: simulating device loss.");
        }
        self.internal.device_lost.store(lost, Ordering::Release);
    }

    /// Returns `true` if the device is currently marked as lost.
    pub fn is_device_lost(&self) -> bool {
        self.internal.device_lost.load(Ordering::Acquire)
    }

    /// Returns the descriptor a live rasterizer state was created with.
    pub fn rasterizer_state(&self, id: RasterizerStateId) -> Option<RasterizerStateDescriptor> {
        lock(&self.internal.rasterizer_states).get(&id).copied()
    }

    /// Number of rasterizer states currently alive.
    pub fn live_rasterizer_states(&self) -> usize {
        lock(&self.internal.rasterizer_states).len()
    }

    /// Number of successful rasterizer state creations since the device was made.
    pub fn rasterizer_state_creations(&self) -> usize {
        self.internal
            .rasterizer_state_creations
            .load(Ordering::Relaxed)
    }

    /// Number of buffers currently alive.
    pub fn live_buffers(&self) -> usize {
        lock(&self.internal.buffers).len()
    }

    /// Returns a copy of a buffer's contents.
    pub fn buffer_contents(&self, id: BufferId) -> Option<Vec<u8>> {
        lock(&self.internal.buffers)
            .get(&id)
            .map(|buffer| buffer.data.clone())
    }

    /// Returns the debug label a buffer was created with.
    pub fn buffer_label(&self, id: BufferId) -> Option<String> {
        lock(&self.internal.buffers)
            .get(&id)
            .and_then(|buffer| buffer.label.clone())
    }

    fn ensure_available(&self) -> Result<(), ResourceError> {
        if self.is_device_lost() {
            Err(ResourceError::DeviceLost)
        } else {
            Ok(())
        }
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_rasterizer_state(
        &self,
        descriptor: &RasterizerStateDescriptor,
    ) -> Result<RasterizerStateId, ResourceError> {
        self.ensure_available()?;
        let id = RasterizerStateId(
            self.internal
                .next_rasterizer_state_id
                .fetch_add(1, Ordering::Relaxed),
        );
        lock(&self.internal.rasterizer_states).insert(id, *descriptor);
        self.internal
            .rasterizer_state_creations
            .fetch_add(1, Ordering::Relaxed);
        log::trace!("RecordingDevice: created rasterizer state {id:?} ({descriptor:?}).");
        Ok(id)
    }

    fn destroy_rasterizer_state(&self, id: RasterizerStateId) -> Result<(), ResourceError> {
        match lock(&self.internal.rasterizer_states).remove(&id) {
            Some(_) => Ok(()),
            None => Err(ResourceError::InvalidHandle),
        }
    }

    fn create_input_layout(
        &self,
        descriptor: &InputLayoutDescriptor,
    ) -> Result<InputLayoutId, ResourceError> {
        self.ensure_available()?;
        let id = InputLayoutId(
            self.internal
                .next_input_layout_id
                .fetch_add(1, Ordering::Relaxed),
        );
        lock(&self.internal.input_layouts).insert(id, descriptor.streams.len());
        Ok(id)
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        self.ensure_available()?;
        if data.len() as u64 > descriptor.size {
            return Err(ResourceError::CreationFailed {
                label: descriptor
                    .label
                    .as_deref()
                    .unwrap_or("Unlabelled buffer")
                    .to_string(),
                details: format!(
                    "{} bytes of initial data exceed the buffer size of {}",
                    data.len(),
                    descriptor.size
                ),
            });
        }
        let mut contents = data.to_vec();
        contents.resize(descriptor.size as usize, 0);

        let id = BufferId(self.internal.next_buffer_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.internal.buffers).insert(
            id,
            RecordedBuffer {
                label: descriptor.label.as_deref().map(str::to_string),
                data: contents,
            },
        );
        Ok(id)
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        self.ensure_available()?;
        let mut buffers = lock(&self.internal.buffers);
        let buffer = buffers.get_mut(&id).ok_or(ResourceError::InvalidHandle)?;
        let start = offset as usize;
        let end = start + data.len();
        if end > buffer.data.len() {
            return Err(ResourceError::BackendError(format!(
                "write of {} bytes at offset {offset} overflows buffer {id:?}",
                data.len()
            )));
        }
        buffer.data[start..end].copy_from_slice(data);
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        match lock(&self.internal.buffers).remove(&id) {
            Some(_) => Ok(()),
            None => Err(ResourceError::InvalidHandle),
        }
    }

    fn is_available(&self) -> bool {
        !self.is_device_lost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::renderer::{BufferUsage, CullMode};
    use std::borrow::Cow;

    #[test]
    fn rasterizer_states_are_tracked() {
        let device = RecordingDevice::new();
        let desc = RasterizerStateDescriptor::default().with_cull_mode(CullMode::Back);

        let id = device.create_rasterizer_state(&desc).expect("device is alive");
        assert_eq!(device.rasterizer_state(id), Some(desc));
        assert_eq!(device.live_rasterizer_states(), 1);

        device.destroy_rasterizer_state(id).expect("state exists");
        assert_eq!(device.live_rasterizer_states(), 0);
        assert_eq!(device.rasterizer_state_creations(), 1);
        assert_eq!(
            device.destroy_rasterizer_state(id),
            Err(ResourceError::InvalidHandle)
        );
    }

    #[test]
    fn lost_device_refuses_creation() {
        let device = RecordingDevice::new();
        device.set_device_lost(true);

        let result = device.create_rasterizer_state(&RasterizerStateDescriptor::default());
        assert_eq!(result, Err(ResourceError::DeviceLost));
        assert!(!device.is_available());
    }

    #[test]
    fn buffer_write_and_overflow() {
        let device = RecordingDevice::new();
        let desc = BufferDescriptor {
            label: Some(Cow::Borrowed("Instances")),
            size: 8,
            usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
        };
        let id = device
            .create_buffer_with_data(&desc, &[1, 2, 3, 4])
            .expect("fits");
        assert_eq!(device.buffer_contents(id), Some(vec![1, 2, 3, 4, 0, 0, 0, 0]));
        assert_eq!(device.buffer_label(id).as_deref(), Some("Instances"));

        device.write_buffer(id, 4, &[9, 9]).expect("in bounds");
        assert_eq!(device.buffer_contents(id), Some(vec![1, 2, 3, 4, 9, 9, 0, 0]));
        assert!(device.write_buffer(id, 7, &[1, 1]).is_err());
    }
}
