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

//! Shader programs and the fixed-function state bound alongside them.

use super::pipeline::RasterizerStateId;
use bitflags::bitflags;

/// An opaque handle to a linked set of shader stages (vertex, pixel, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderProgramId(pub usize);

/// An opaque handle to a blend state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendStateId(pub usize);

/// An opaque handle to a depth/stencil state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilStateId(pub usize);

bitflags! {
    /// Selects which parts of a [`FixedFunctionState`] get bound.
    ///
    /// The color pass binds everything. The shadow pass only binds depth and
    /// raster state so nothing is written to color targets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateBindingProfile: u8 {
        /// Bind the blend state.
        const BLEND = 0b001;
        /// Bind the depth/stencil state.
        const DEPTH_STENCIL = 0b010;
        /// Bind the rasterizer state.
        const RASTER = 0b100;
        /// Bind every state.
        const ALL = Self::BLEND.bits() | Self::DEPTH_STENCIL.bits() | Self::RASTER.bits();
    }
}

impl StateBindingProfile {
    /// The profile used by color passes.
    pub const COLOR: Self = Self::ALL;
    /// The profile used by shadow (depth-only) passes.
    pub const SHADOW: Self = Self::DEPTH_STENCIL.union(Self::RASTER);
}

/// The fixed-function state owned by a shader pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FixedFunctionState {
    /// Blend state, if the pass sets one.
    pub blend: Option<BlendStateId>,
    /// Depth/stencil state, if the pass sets one.
    pub depth_stencil: Option<DepthStencilStateId>,
    /// Rasterizer state, if the pass sets one.
    pub raster: Option<RasterizerStateId>,
    /// Stencil reference value used with `depth_stencil`.
    pub stencil_ref: u32,
}

impl FixedFunctionState {
    /// Returns the subset of this state selected by `profile`.
    pub fn filtered(&self, profile: StateBindingProfile) -> Self {
        Self {
            blend: self.blend.filter(|_| profile.contains(StateBindingProfile::BLEND)),
            depth_stencil: self
                .depth_stencil
                .filter(|_| profile.contains(StateBindingProfile::DEPTH_STENCIL)),
            raster: self
                .raster
                .filter(|_| profile.contains(StateBindingProfile::RASTER)),
            stencil_ref: self.stencil_ref,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_profile_drops_blend() {
        let state = FixedFunctionState {
            blend: Some(BlendStateId(1)),
            depth_stencil: Some(DepthStencilStateId(2)),
            raster: Some(RasterizerStateId(3)),
            stencil_ref: 0,
        };

        let shadow = state.filtered(StateBindingProfile::SHADOW);
        assert_eq!(shadow.blend, None);
        assert_eq!(shadow.depth_stencil, Some(DepthStencilStateId(2)));
        assert_eq!(shadow.raster, Some(RasterizerStateId(3)));
        assert_eq!(state.filtered(StateBindingProfile::COLOR), state);
    }
}
