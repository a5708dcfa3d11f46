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

/// The category of a render core, deciding where in the frame it is drawn.
///
/// Variants are declared in draw order; the frame driver sorts by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RenderType {
    /// Work that runs before any geometry, e.g. clearing or sky rendering.
    PreProc,
    /// Light volumes.
    Light,
    /// Opaque geometry.
    #[default]
    Opaque,
    /// Particle systems.
    Particle,
    /// Blended geometry, drawn after everything opaque.
    Transparent,
    /// Anything not covered by the other categories.
    Others,
    /// Screen-space effects drawn after the scene.
    PostProc,
}

impl RenderType {
    /// Returns `true` if cores of this type take part in the shadow pass.
    pub fn casts_shadows(self) -> bool {
        matches!(self, RenderType::Opaque | RenderType::Transparent)
    }
}
