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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// Creates and destroys GPU resources.
///
/// Implementations are shared between threads (buffer models may be filled on a
/// loader thread), so every method takes `&self`.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Creates a rasterizer state object.
    /// ## Arguments
    /// * `descriptor` - The fixed-function rasterizer configuration.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot create the object (e.g. device lost).
    fn create_rasterizer_state(
        &self,
        descriptor: &RasterizerStateDescriptor,
    ) -> Result<RasterizerStateId, ResourceError>;

    /// Destroys a rasterizer state object.
    fn destroy_rasterizer_state(&self, id: RasterizerStateId) -> Result<(), ResourceError>;

    /// Creates a vertex input layout.
    fn create_input_layout(
        &self,
        descriptor: &InputLayoutDescriptor,
    ) -> Result<InputLayoutId, ResourceError>;

    /// Creates a new GPU buffer and initializes it with the provided data.
    /// ## Arguments
    /// * `descriptor` - The buffer configuration.
    /// * `data` - The initial contents. Its length must not exceed `descriptor.size`.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Writes data into an existing GPU buffer.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Destroys a GPU buffer.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Returns `true` while the device is usable.
    fn is_available(&self) -> bool {
        true
    }
}
