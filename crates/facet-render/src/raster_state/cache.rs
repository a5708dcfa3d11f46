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
    GraphicsDevice, RasterizerStateDescriptor, RasterizerStateId, ResourceError,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct CacheEntry {
    id: RasterizerStateId,
    ref_count: usize,
}

struct CacheInternal {
    device: Arc<dyn GraphicsDevice>,
    entries: Mutex<HashMap<RasterizerStateDescriptor, CacheEntry>>,
    registrations: AtomicUsize,
}

impl CacheInternal {
    fn entries(&self) -> MutexGuard<'_, HashMap<RasterizerStateDescriptor, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn retain(&self, descriptor: &RasterizerStateDescriptor) {
        if let Some(entry) = self.entries().get_mut(descriptor) {
            entry.ref_count += 1;
        }
    }

    fn release(&self, descriptor: &RasterizerStateDescriptor) {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(descriptor) else {
            log::warn!("Released a rasterizer state that is not in the cache: {descriptor:?}");
            return;
        };
        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            return;
        }
        if let Some(entry) = entries.remove(descriptor) {
            log::trace!("Destroying rasterizer state {:?}.", entry.id);
            if let Err(e) = self.device.destroy_rasterizer_state(entry.id) {
                log::warn!("Failed to destroy rasterizer state {:?}: {e}", entry.id);
            }
        }
    }
}

/// Deduplicates rasterizer state objects by descriptor.
///
/// Cloning the cache is cheap and yields another view of the same entries.
#[derive(Clone)]
pub struct RasterizerStateCache {
    internal: Arc<CacheInternal>,
}

impl RasterizerStateCache {
    /// Creates an empty cache that allocates its objects on `device`.
    pub fn new(device: Arc<dyn GraphicsDevice>) -> Self {
        Self {
            internal: Arc::new(CacheInternal {
                device,
                entries: Mutex::new(HashMap::new()),
                registrations: AtomicUsize::new(0),
            }),
        }
    }

    /// Returns a handle to the state object for `descriptor`, creating it if needed.
    ///
    /// ## Errors
    /// * `ResourceError` - If the object had to be created and the device failed.
    ///   Nothing is inserted in that case.
    pub fn register(
        &self,
        descriptor: &RasterizerStateDescriptor,
    ) -> Result<RasterStateHandle, ResourceError> {
        self.internal.registrations.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.internal.entries();
        let id = match entries.get_mut(descriptor) {
            Some(entry) => {
                entry.ref_count += 1;
                entry.id
            }
            None => {
                let id = self
                    .internal
                    .device
                    .create_rasterizer_state(descriptor)
                    .map_err(|e| {
                        log::error!("Failed to create rasterizer state {descriptor:?}: {e}");
                        e
                    })?;
                log::debug!("Created rasterizer state {id:?} for {descriptor:?}.");
                entries.insert(*descriptor, CacheEntry { id, ref_count: 1 });
                id
            }
        };

        Ok(RasterStateHandle {
            id,
            descriptor: *descriptor,
            cache: Arc::clone(&self.internal),
        })
    }

    /// Number of distinct state objects alive.
    pub fn len(&self) -> usize {
        self.internal.entries().len()
    }

    /// Returns `true` if no state object is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of outstanding handles for `descriptor`.
    pub fn ref_count(&self, descriptor: &RasterizerStateDescriptor) -> usize {
        self.internal
            .entries()
            .get(descriptor)
            .map_or(0, |entry| entry.ref_count)
    }

    /// Total number of calls to [`register`](Self::register), hits included.
    pub fn registration_count(&self) -> usize {
        self.internal.registrations.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for RasterizerStateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterizerStateCache")
            .field("entries", &self.len())
            .field("registrations", &self.registration_count())
            .finish()
    }
}

/// A counted reference to a cached rasterizer state object.
///
/// Cloning takes another reference; dropping gives it back to the cache.
pub struct RasterStateHandle {
    id: RasterizerStateId,
    descriptor: RasterizerStateDescriptor,
    cache: Arc<CacheInternal>,
}

impl RasterStateHandle {
    /// The GPU object this handle refers to.
    pub fn id(&self) -> RasterizerStateId {
        self.id
    }

    /// The descriptor the object was registered with.
    pub fn descriptor(&self) -> &RasterizerStateDescriptor {
        &self.descriptor
    }
}

impl Clone for RasterStateHandle {
    fn clone(&self) -> Self {
        self.cache.retain(&self.descriptor);
        Self {
            id: self.id,
            descriptor: self.descriptor,
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Drop for RasterStateHandle {
    fn drop(&mut self) {
        self.cache.release(&self.descriptor);
    }
}

impl PartialEq for RasterStateHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.cache, &other.cache)
    }
}

impl Eq for RasterStateHandle {}

impl fmt::Debug for RasterStateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterStateHandle")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}
