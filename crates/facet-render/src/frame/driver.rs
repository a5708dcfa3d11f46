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

use super::{CoreId, FrameError, Scene};
use crate::context::{CameraData, LightData, RenderContext, RenderPassKind};
use crate::render_core::{DrawCall, Drawable, RenderType};
use crate::resources::RenderResources;
use facet_core::renderer::{DeviceContext, FrameStats, RenderError, RenderSettings};
use facet_core::{EventBus, InvalidateSignal};
use std::fmt;
use std::sync::Arc;

/// Work to run against the scene on the render thread.
pub type SceneCommand = Box<dyn FnOnce(&mut Scene) + Send + 'static>;

/// Posts [`SceneCommand`]s to a [`FrameDriver`] from any thread.
#[derive(Clone)]
pub struct ScenePoster {
    sender: flume::Sender<SceneCommand>,
}

impl ScenePoster {
    /// Queues `command` for the start of the next frame.
    ///
    /// Returns `false` if the frame driver is gone.
    pub fn post<F>(&self, command: F) -> bool
    where
        F: FnOnce(&mut Scene) + Send + 'static,
    {
        match self.sender.send(Box::new(command)) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("Scene command posted after the frame driver was dropped.");
                false
            }
        }
    }
}

impl fmt::Debug for ScenePoster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenePoster")
            .field("queued", &self.sender.len())
            .finish()
    }
}

/// Drives frames on the render thread.
///
/// Each frame applies the posted scene commands, then runs the shadow pass
/// (when enabled and a light casts shadows) and the color pass. Cores are
/// visited by [`RenderType`] and then in insertion order. A core that cannot
/// render is skipped; a core whose draw fails is reported on
/// [`errors`](Self::errors) and the frame continues.
pub struct FrameDriver {
    scene: Scene,
    commands: EventBus<SceneCommand>,
    errors: EventBus<FrameError>,
    signal: Arc<InvalidateSignal>,
    frame_number: u64,
}

impl FrameDriver {
    /// Creates a driver with an empty scene.
    pub fn new(resources: RenderResources, settings: RenderSettings) -> Self {
        let signal = Arc::new(InvalidateSignal::new());
        Self {
            scene: Scene::new(resources, settings, Arc::clone(&signal)),
            commands: EventBus::new(),
            errors: EventBus::new(),
            signal,
            frame_number: 0,
        }
    }

    /// A handle for posting scene changes from other threads.
    pub fn poster(&self) -> ScenePoster {
        ScenePoster {
            sender: self.commands.sender(),
        }
    }

    /// The signal raised by cores and models when a re-render is needed.
    pub fn signal(&self) -> &Arc<InvalidateSignal> {
        &self.signal
    }

    /// Returns `true` once per burst of invalidations, or if commands are queued.
    pub fn needs_render(&self) -> bool {
        let invalidated = self.signal.take();
        invalidated || !self.commands.is_empty()
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene, for code already on the render thread.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The device-error channel. Draw failures are published here.
    pub fn errors(&self) -> &EventBus<FrameError> {
        &self.errors
    }

    /// Number of the last rendered frame.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Applies every queued scene command, in posting order.
    pub fn apply_posted(&mut self) -> usize {
        let mut applied = 0;
        for command in self.commands.drain() {
            command(&mut self.scene);
            applied += 1;
        }
        if applied > 0 {
            log::trace!("Applied {applied} posted scene command(s).");
        }
        applied
    }

    /// Renders one frame into `device`.
    pub fn render_frame(
        &mut self,
        device: &mut dyn DeviceContext,
        camera: CameraData,
        lights: &[LightData],
    ) -> FrameStats {
        self.apply_posted();
        self.frame_number += 1;

        let mut stats = FrameStats {
            frame_number: self.frame_number,
            ..Default::default()
        };

        let mut order: Vec<(RenderType, CoreId)> = self
            .scene
            .cores()
            .map(|(id, core)| (core.render_type(), id))
            .collect();
        order.sort();

        let settings = self.scene.settings();
        let mut context = RenderContext {
            pass: RenderPassKind::Shadow,
            camera,
            lights: lights.to_vec(),
            invert_cull: settings.invert_cull_mode,
            frame_number: self.frame_number,
        };

        if settings.shadows_enabled && context.has_shadow_casters() {
            for (_, id) in order.iter().filter(|(ty, _)| ty.casts_shadows()) {
                let Some(core) = self.scene.core(*id) else {
                    continue;
                };
                if !core.can_render(&context) {
                    continue;
                }
                let result = core.render_shadow(&context, device);
                if self.record(*id, RenderPassKind::Shadow, result, &mut stats) {
                    stats.shadow_draw_calls += 1;
                }
            }
        }

        context.pass = RenderPassKind::Color;
        for (_, id) in &order {
            let Some(core) = self.scene.core(*id) else {
                continue;
            };
            if !core.can_render(&context) {
                log::trace!("Core {id} cannot render this frame.");
                stats.skipped_cores += 1;
                continue;
            }
            let result = core.render(&context, device);
            if self.record(*id, RenderPassKind::Color, result, &mut stats) {
                stats.draw_calls += 1;
            }
        }

        log::trace!("Frame {} done: {stats:?}", self.frame_number);
        stats
    }

    /// Returns `true` if a draw was issued. Errors are logged, counted and published.
    fn record(
        &self,
        core: CoreId,
        pass: RenderPassKind,
        result: Result<Option<DrawCall>, RenderError>,
        stats: &mut FrameStats,
    ) -> bool {
        match result {
            Ok(Some(call)) => {
                log::trace!("Core {core} ({pass:?}): {call}");
                true
            }
            Ok(None) => false,
            Err(source) => {
                log::error!("Core {core} failed during the {pass:?} pass: {source}");
                stats.failed_draws += 1;
                self.errors.publish(FrameError::Draw { core, pass, source });
                false
            }
        }
    }
}

impl fmt::Debug for FrameDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameDriver")
            .field("scene", &self.scene)
            .field("frame_number", &self.frame_number)
            .field("queued_commands", &self.commands.len())
            .field("pending_errors", &self.errors.len())
            .finish()
    }
}
