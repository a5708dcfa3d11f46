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

use super::{DeviceCommand, RecordingDevice};
use facet_core::renderer::{
    DeviceContext, ElementBuffer, FixedFunctionState, IndexFormat, InputLayoutId,
    RasterizerStateId, RenderError, ShaderProgramId, StateBindingProfile,
};

/// A [`DeviceContext`] that appends every call to an in-memory trace.
///
/// Draws fail with [`RenderError::DeviceLost`] while the owning device is lost,
/// and with [`RenderError::DrawFailed`] while injected failures remain. A failed
/// draw is not recorded.
#[derive(Debug, Default)]
pub struct RecordingContext {
    device: Option<RecordingDevice>,
    commands: Vec<DeviceCommand>,
    pending_draw_failures: u32,
}

impl RecordingContext {
    /// Creates a context that is not tied to any device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that observes the loss state of `device`.
    pub fn for_device(device: &RecordingDevice) -> Self {
        Self {
            device: Some(device.clone()),
            ..Self::default()
        }
    }

    /// Makes the next `count` draw calls fail.
    pub fn fail_next_draws(&mut self, count: u32) {
        self.pending_draw_failures = count;
    }

    /// Every recorded command, in call order.
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Only the draw commands, in call order.
    pub fn draw_commands(&self) -> Vec<&DeviceCommand> {
        self.commands.iter().filter(|c| c.is_draw()).collect()
    }

    /// Removes and returns the recorded trace.
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Forgets the recorded trace.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    fn record_draw(&mut self, command: DeviceCommand) -> Result<(), RenderError> {
        if self
            .device
            .as_ref()
            .is_some_and(RecordingDevice::is_device_lost)
        {
            return Err(RenderError::DeviceLost);
        }
        if self.pending_draw_failures > 0 {
            self.pending_draw_failures -= 1;
            return Err(RenderError::DrawFailed(format!("injected failure: {command}")));
        }
        log::trace!("RecordingContext: {command}");
        self.commands.push(command);
        Ok(())
    }
}

impl DeviceContext for RecordingContext {
    fn set_raster_state(&mut self, state: RasterizerStateId) {
        self.commands.push(DeviceCommand::SetRasterState(state));
    }

    fn set_input_layout(&mut self, layout: InputLayoutId) {
        self.commands.push(DeviceCommand::SetInputLayout(layout));
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &ElementBuffer) {
        self.commands.push(DeviceCommand::SetVertexBuffer {
            slot,
            buffer: *buffer,
        });
    }

    fn set_index_buffer(&mut self, buffer: &ElementBuffer, format: IndexFormat) {
        self.commands.push(DeviceCommand::SetIndexBuffer {
            buffer: *buffer,
            format,
        });
    }

    fn bind_shader(&mut self, program: ShaderProgramId) {
        self.commands.push(DeviceCommand::BindShader(program));
    }

    fn bind_states(&mut self, state: &FixedFunctionState, profile: StateBindingProfile) {
        self.commands.push(DeviceCommand::BindStates {
            state: state.filtered(profile),
            profile,
        });
    }

    fn draw(&mut self, vertex_count: u32, start_vertex: u32) -> Result<(), RenderError> {
        self.record_draw(DeviceCommand::Draw {
            vertex_count,
            start_vertex,
        })
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
    ) -> Result<(), RenderError> {
        self.record_draw(DeviceCommand::DrawIndexed {
            index_count,
            start_index,
            base_vertex,
        })
    }

    fn draw_instanced(
        &mut self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
        start_instance: u32,
    ) -> Result<(), RenderError> {
        self.record_draw(DeviceCommand::DrawInstanced {
            vertex_count: vertex_count_per_instance,
            instance_count,
            start_vertex,
            start_instance,
        })
    }

    fn draw_indexed_instanced(
        &mut self,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
        start_instance: u32,
    ) -> Result<(), RenderError> {
        self.record_draw(DeviceCommand::DrawIndexedInstanced {
            index_count: index_count_per_instance,
            instance_count,
            start_index,
            base_vertex,
            start_instance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut ctx = RecordingContext::new();
        ctx.bind_shader(ShaderProgramId(1));
        ctx.draw_indexed(36, 0, 0).expect("draw accepted");

        assert_eq!(ctx.commands().len(), 2);
        assert_eq!(ctx.draw_commands().len(), 1);
        assert_eq!(ctx.draw_commands()[0].to_string(), "draw indexed 36 @0");
    }

    #[test]
    fn injected_failures_are_not_recorded() {
        let mut ctx = RecordingContext::new();
        ctx.fail_next_draws(1);

        assert!(matches!(ctx.draw(3, 0), Err(RenderError::DrawFailed(_))));
        assert!(ctx.draw(3, 0).is_ok());
        assert_eq!(ctx.draw_commands().len(), 1);
    }

    #[test]
    fn lost_device_rejects_draws() {
        let device = RecordingDevice::new();
        let mut ctx = RecordingContext::for_device(&device);
        device.set_device_lost(true);

        assert_eq!(ctx.draw(3, 0), Err(RenderError::DeviceLost));
        device.set_device_lost(false);
        assert!(ctx.draw(3, 0).is_ok());
    }
}
