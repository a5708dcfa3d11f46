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

//! The rendering resources passed explicitly into attach and draw calls.

use crate::raster_state::RasterizerStateCache;
use crate::technique::TechniqueRegistry;
use facet_core::renderer::GraphicsDevice;
use std::sync::Arc;

/// The device, the rasterizer state cache and the technique registry.
///
/// One instance exists per device. Render cores receive it by reference when
/// they attach instead of looking anything up globally.
#[derive(Debug)]
pub struct RenderResources {
    device: Arc<dyn GraphicsDevice>,
    states: RasterizerStateCache,
    techniques: TechniqueRegistry,
}

impl RenderResources {
    /// Creates the resources for `device` with an empty technique registry.
    pub fn new(device: Arc<dyn GraphicsDevice>) -> Self {
        Self {
            states: RasterizerStateCache::new(Arc::clone(&device)),
            device,
            techniques: TechniqueRegistry::new(),
        }
    }

    /// The graphics device.
    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    /// The shared rasterizer state cache.
    pub fn states(&self) -> &RasterizerStateCache {
        &self.states
    }

    /// The technique registry.
    pub fn techniques(&self) -> &TechniqueRegistry {
        &self.techniques
    }

    /// Mutable access to the technique registry, for registering techniques.
    pub fn techniques_mut(&mut self) -> &mut TechniqueRegistry {
        &mut self.techniques
    }
}
