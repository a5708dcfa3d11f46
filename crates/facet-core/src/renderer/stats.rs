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

//! Per-frame statistics.

/// Counters collected while driving a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// A sequential counter for rendered frames.
    pub frame_number: u64,
    /// Draw calls issued by the color pass.
    pub draw_calls: u32,
    /// Draw calls issued by the shadow pass.
    pub shadow_draw_calls: u32,
    /// Cores skipped because they could not render this frame.
    pub skipped_cores: u32,
    /// Draw attempts the device rejected.
    pub failed_draws: u32,
}

impl FrameStats {
    /// Total number of draw calls issued, all passes included.
    pub fn total_draw_calls(&self) -> u32 {
        self.draw_calls + self.shadow_draw_calls
    }
}
