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

//! Frame driving on the render thread.
//!
//! The [`FrameDriver`] owns the [`Scene`]. Other threads never touch the scene
//! directly: they post [`SceneCommand`]s through a [`ScenePoster`], and the
//! driver applies them at the start of the next frame, before any core is read.

mod driver;
mod error;
mod scene;

pub use self::driver::{FrameDriver, SceneCommand, ScenePoster};
pub use self::error::FrameError;
pub use self::scene::{CoreId, MeshNode, Scene};
