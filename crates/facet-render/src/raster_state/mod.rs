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

//! Rasterizer state objects shared between render cores.
//!
//! Equal descriptors map to a single GPU object. Every [`RasterStateHandle`]
//! counts as one reference; the object is destroyed when the last handle for
//! its descriptor is dropped.

mod cache;

pub use self::cache::{RasterStateHandle, RasterizerStateCache};
