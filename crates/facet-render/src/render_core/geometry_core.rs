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

use super::{AttachStatus, Attachable, DrawCall, Drawable, RenderType};
use crate::buffers::{GeometryBufferModel, InstanceBufferModel, ObservableModel};
use crate::context::{RenderContext, RenderPassKind};
use crate::raster_state::{RasterStateHandle, RasterizerStateCache};
use crate::resources::RenderResources;
use crate::technique::{ShaderPass, Technique};
use facet_core::renderer::settings::{DEFAULT_PASS_NAME, SHADOW_PASS_NAME};
use facet_core::renderer::{
    DeviceContext, ElementBuffer, InputLayoutId, RasterizerStateDescriptor, RenderError,
    ResourceError, StateBindingProfile,
};
use facet_core::{Invalidatable, SubscriptionId};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// The normal raster state and, unless culling is off, its inverted-cull twin.
#[derive(Debug)]
struct RasterStates {
    normal: RasterStateHandle,
    inverted: Option<RasterStateHandle>,
}

impl RasterStates {
    /// Registers both variants. On failure no handle is kept.
    fn register(
        cache: &RasterizerStateCache,
        description: &RasterizerStateDescriptor,
    ) -> Result<Self, ResourceError> {
        let normal = cache.register(description)?;
        let inverted = description
            .inverted_cull()
            .map(|inverted| cache.register(&inverted))
            .transpose()?;
        Ok(Self { normal, inverted })
    }

    fn select(&self, invert_cull: bool) -> &RasterStateHandle {
        match (&self.inverted, invert_cull) {
            (Some(inverted), true) => inverted,
            _ => &self.normal,
        }
    }
}

/// Everything a core resolves from its technique.
#[derive(Debug)]
struct AttachedState {
    technique: Arc<Technique>,
    states: RasterizerStateCache,
    layout: InputLayoutId,
    default_pass: ShaderPass,
    shadow_pass: ShaderPass,
    raster: RasterStates,
}

#[derive(Debug)]
enum Attachment {
    Detached,
    Attached(AttachedState),
}

/// A weak reference to a buffer model plus the subscription on its notifier.
struct ModelLink<M> {
    model: Weak<M>,
    subscription: SubscriptionId,
}

impl<M: ObservableModel> ModelLink<M> {
    fn connect(model: &Arc<M>, observer: Weak<dyn Invalidatable>) -> Self {
        Self {
            subscription: model.notifier().subscribe(observer),
            model: Arc::downgrade(model),
        }
    }

    fn disconnect(self) {
        if let Some(model) = self.model.upgrade() {
            model.notifier().unsubscribe(self.subscription);
        }
    }

    fn upgrade(&self) -> Option<Arc<M>> {
        self.model.upgrade()
    }

    fn points_to(&self, model: Option<&Arc<M>>) -> bool {
        model.is_some_and(|model| std::ptr::eq(self.model.as_ptr(), Arc::as_ptr(model)))
    }
}

/// Relays model notifications to whatever the core reports invalidation to.
///
/// Models hold it weakly, so notifications stop as soon as the core is gone.
#[derive(Default)]
struct InvalidationForwarder {
    target: Mutex<Option<Arc<dyn Invalidatable>>>,
}

impl Invalidatable for InvalidationForwarder {
    fn invalidate_renderer(&self) {
        let target = self
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(target) = target {
            target.invalidate_renderer();
        }
    }
}

/// Draws one geometry buffer model, optionally instanced, with a technique.
///
/// The core is created detached. Attaching resolves the default and shadow
/// passes by name and registers the rasterizer states; detaching gives them
/// back. The geometry and instance models are owned by the scene and only
/// referenced weakly, independently of the attachment state.
///
/// Every setter that changes an observable value raises "invalidate renderer"
/// on the target set with [`set_invalidation_target`](Self::set_invalidation_target).
/// Writing a value equal to the current one does nothing.
pub struct GeometryRenderCore {
    render_type: RenderType,
    attachment: Attachment,
    default_pass_name: String,
    shadow_pass_name: String,
    raster_description: RasterizerStateDescriptor,
    throws_shadow: bool,
    geometry: Option<ModelLink<GeometryBufferModel>>,
    instances: Option<ModelLink<InstanceBufferModel>>,
    forwarder: Arc<InvalidationForwarder>,
}

impl GeometryRenderCore {
    /// Creates a detached core with the default pass names and raster state.
    pub fn new(render_type: RenderType) -> Self {
        Self {
            render_type,
            attachment: Attachment::Detached,
            default_pass_name: DEFAULT_PASS_NAME.to_string(),
            shadow_pass_name: SHADOW_PASS_NAME.to_string(),
            raster_description: RasterizerStateDescriptor::default(),
            throws_shadow: false,
            geometry: None,
            instances: None,
            forwarder: Arc::new(InvalidationForwarder::default()),
        }
    }

    /// Sets where "invalidate renderer" is reported, usually the frame driver's signal.
    pub fn set_invalidation_target(&self, target: Arc<dyn Invalidatable>) {
        *self
            .forwarder
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(target);
    }

    fn observer(&self) -> Weak<dyn Invalidatable> {
        let forwarder: Arc<dyn Invalidatable> = self.forwarder.clone();
        Arc::downgrade(&forwarder)
    }

    fn attached(&self) -> Option<&AttachedState> {
        match &self.attachment {
            Attachment::Attached(state) => Some(state),
            Attachment::Detached => None,
        }
    }

    /// The category of this core.
    pub fn render_type(&self) -> RenderType {
        self.render_type
    }

    /// The technique the core is attached to.
    pub fn technique(&self) -> Option<&Arc<Technique>> {
        self.attached().map(|state| &state.technique)
    }

    /// The vertex input layout recorded from the technique.
    pub fn input_layout(&self) -> Option<InputLayoutId> {
        self.attached().map(|state| state.layout)
    }

    /// Name of the pass used by the color pass.
    pub fn default_pass_name(&self) -> &str {
        &self.default_pass_name
    }

    /// Name of the pass used by the shadow pass.
    pub fn shadow_pass_name(&self) -> &str {
        &self.shadow_pass_name
    }

    /// The resolved color pass, or the null pass while detached.
    pub fn default_pass(&self) -> ShaderPass {
        self.attached()
            .map_or(ShaderPass::NULL, |state| state.default_pass.clone())
    }

    /// The resolved shadow pass, or the null pass while detached.
    pub fn shadow_pass(&self) -> ShaderPass {
        self.attached()
            .map_or(ShaderPass::NULL, |state| state.shadow_pass.clone())
    }

    /// The current rasterizer description.
    pub fn raster_description(&self) -> &RasterizerStateDescriptor {
        &self.raster_description
    }

    /// The normal raster state, only while attached.
    pub fn raster_state(&self) -> Option<&RasterStateHandle> {
        self.attached().map(|state| &state.raster.normal)
    }

    /// The inverted-cull raster state, only while attached with culling enabled.
    pub fn inverted_raster_state(&self) -> Option<&RasterStateHandle> {
        self.attached().and_then(|state| state.raster.inverted.as_ref())
    }

    /// Returns `true` if the core draws into shadow maps.
    pub fn throws_shadow(&self) -> bool {
        self.throws_shadow
    }

    /// The geometry model, if one is set and still alive.
    pub fn geometry_buffer(&self) -> Option<Arc<GeometryBufferModel>> {
        self.geometry.as_ref().and_then(ModelLink::upgrade)
    }

    /// The instance model, if one is set and still alive.
    pub fn instance_buffer(&self) -> Option<Arc<InstanceBufferModel>> {
        self.instances.as_ref().and_then(ModelLink::upgrade)
    }

    /// Changes the rasterizer description.
    ///
    /// While attached, the new states are registered before the old ones are
    /// released; while detached, registration waits for the next attach.
    ///
    /// ## Errors
    /// * `ResourceError` - If registration failed. The previous description and
    ///   states are kept.
    pub fn set_raster_description(
        &mut self,
        description: RasterizerStateDescriptor,
    ) -> Result<(), ResourceError> {
        if description == self.raster_description {
            return Ok(());
        }
        if let Attachment::Attached(state) = &mut self.attachment {
            state.raster = RasterStates::register(&state.states, &description)?;
        }
        self.raster_description = description;
        self.invalidate_renderer();
        Ok(())
    }

    /// Changes the color pass name, re-resolving it while attached.
    pub fn set_default_pass_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name == self.default_pass_name {
            return;
        }
        self.default_pass_name = name;
        if let Attachment::Attached(state) = &mut self.attachment {
            state.default_pass = state.technique.pass_or_null(&self.default_pass_name);
        }
        self.invalidate_renderer();
    }

    /// Changes the shadow pass name, re-resolving it while attached.
    pub fn set_shadow_pass_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name == self.shadow_pass_name {
            return;
        }
        self.shadow_pass_name = name;
        if let Attachment::Attached(state) = &mut self.attachment {
            state.shadow_pass = state.technique.pass_or_null(&self.shadow_pass_name);
        }
        self.invalidate_renderer();
    }

    /// Enables or disables shadow rendering for this core.
    pub fn set_throws_shadow(&mut self, throws_shadow: bool) {
        if throws_shadow != self.throws_shadow {
            self.throws_shadow = throws_shadow;
            self.invalidate_renderer();
        }
    }

    /// Replaces the geometry model, moving the change subscription to the new one.
    pub fn set_geometry_buffer(&mut self, model: Option<&Arc<GeometryBufferModel>>) {
        if self.geometry.as_ref().is_some_and(|link| link.points_to(model))
            || (self.geometry.is_none() && model.is_none())
        {
            return;
        }
        if let Some(old) = self.geometry.take() {
            old.disconnect();
        }
        self.geometry = model.map(|model| ModelLink::connect(model, self.observer()));
        self.invalidate_renderer();
    }

    /// Replaces the instance model, moving the change subscription to the new one.
    pub fn set_instance_buffer(&mut self, model: Option<&Arc<InstanceBufferModel>>) {
        if self.instances.as_ref().is_some_and(|link| link.points_to(model))
            || (self.instances.is_none() && model.is_none())
        {
            return;
        }
        if let Some(old) = self.instances.take() {
            old.disconnect();
        }
        self.instances = model.map(|model| ModelLink::connect(model, self.observer()));
        self.invalidate_renderer();
    }

    /// Binds the input layout, the geometry streams from slot 0 and then the
    /// instance buffer at the next free slot.
    fn bind_buffers(
        &self,
        state: &AttachedState,
        geometry: &GeometryBufferModel,
        device: &mut dyn DeviceContext,
    ) -> DrawCall {
        let mut slot = 0;
        let bound = geometry.attach_buffers(device, state.layout, &mut slot);
        let instances: Option<ElementBuffer> = self
            .instance_buffer()
            .and_then(|model| model.attach_buffer(device, &mut slot));
        DrawCall::select(
            bound.index.as_ref(),
            bound.first_vertex.as_ref(),
            instances.as_ref(),
        )
    }

    fn render_color(
        &self,
        context: &RenderContext,
        device: &mut dyn DeviceContext,
    ) -> Result<Option<DrawCall>, RenderError> {
        let state = self.attached().ok_or(RenderError::NotAttached)?;
        let Some(geometry) = self.geometry_buffer() else {
            log::trace!("Color pass skipped: no geometry.");
            return Ok(None);
        };
        if state.default_pass.is_null() {
            log::trace!("Color pass skipped: '{}' is not resolved.", self.default_pass_name);
            return Ok(None);
        }

        state.default_pass.bind_shader(device);
        state
            .default_pass
            .bind_states(device, StateBindingProfile::COLOR);
        let call = self.bind_buffers(state, &geometry, device);
        device.set_raster_state(state.raster.select(context.invert_cull).id());
        call.issue(device)?;
        Ok(Some(call))
    }
}

impl Default for GeometryRenderCore {
    fn default() -> Self {
        Self::new(RenderType::Opaque)
    }
}

impl Attachable for GeometryRenderCore {
    fn attach(
        &mut self,
        technique: &Arc<Technique>,
        resources: &RenderResources,
    ) -> Result<AttachStatus, ResourceError> {
        if let Some(state) = self.attached() {
            log::warn!(
                "Render core is already attached to '{}'; ignoring attach to '{}'.",
                state.technique.name(),
                technique.name()
            );
            return Ok(AttachStatus::AlreadyAttached);
        }
        if !technique.is_valid() {
            log::warn!("Technique '{}' has no passes; not attaching.", technique.name());
            return Ok(AttachStatus::InvalidTechnique);
        }

        // Always registered anew: attach is the first point where the device is known.
        let raster = RasterStates::register(resources.states(), &self.raster_description)?;
        let state = AttachedState {
            technique: Arc::clone(technique),
            states: resources.states().clone(),
            layout: technique.layout(),
            default_pass: technique.pass_or_null(&self.default_pass_name),
            shadow_pass: technique.pass_or_null(&self.shadow_pass_name),
            raster,
        };
        log::debug!(
            "Render core attached to '{}' (default: {}, shadow: {}).",
            technique.name(),
            state.default_pass.name(),
            state.shadow_pass.name()
        );
        self.attachment = Attachment::Attached(state);
        self.invalidate_renderer();
        Ok(AttachStatus::Attached)
    }

    fn detach(&mut self) {
        if let Attachment::Attached(state) =
            std::mem::replace(&mut self.attachment, Attachment::Detached)
        {
            log::debug!("Render core detached from '{}'.", state.technique.name());
            self.invalidate_renderer();
        }
    }

    fn is_attached(&self) -> bool {
        matches!(self.attachment, Attachment::Attached(_))
    }
}

impl Drawable for GeometryRenderCore {
    fn can_render(&self, _context: &RenderContext) -> bool {
        self.is_attached() && self.geometry_buffer().is_some()
    }

    fn render(
        &self,
        context: &RenderContext,
        device: &mut dyn DeviceContext,
    ) -> Result<Option<DrawCall>, RenderError> {
        match context.pass {
            RenderPassKind::Color => self.render_color(context, device),
            RenderPassKind::Shadow => self.render_shadow(context, device),
        }
    }

    fn render_shadow(
        &self,
        _context: &RenderContext,
        device: &mut dyn DeviceContext,
    ) -> Result<Option<DrawCall>, RenderError> {
        let state = self.attached().ok_or(RenderError::NotAttached)?;
        if !self.throws_shadow || state.shadow_pass.is_null() {
            return Ok(None);
        }
        let Some(geometry) = self.geometry_buffer() else {
            log::trace!("Shadow pass skipped: no geometry.");
            return Ok(None);
        };

        state.shadow_pass.bind_shader(device);
        state
            .shadow_pass
            .bind_states(device, StateBindingProfile::SHADOW);
        let call = self.bind_buffers(state, &geometry, device);
        call.issue(device)?;
        Ok(Some(call))
    }

    fn render_custom(
        &self,
        context: &RenderContext,
        device: &mut dyn DeviceContext,
        pass: &ShaderPass,
    ) -> Result<Option<DrawCall>, RenderError> {
        let state = self.attached().ok_or(RenderError::NotAttached)?;
        if pass.is_null() {
            return Ok(None);
        }
        let Some(geometry) = self.geometry_buffer() else {
            return Ok(None);
        };

        let call = self.bind_buffers(state, &geometry, device);
        device.set_raster_state(state.raster.select(context.invert_cull).id());
        call.issue(device)?;
        Ok(Some(call))
    }
}

impl Invalidatable for GeometryRenderCore {
    fn invalidate_renderer(&self) {
        self.forwarder.invalidate_renderer();
    }
}

impl Drop for GeometryRenderCore {
    fn drop(&mut self) {
        if let Some(link) = self.geometry.take() {
            link.disconnect();
        }
        if let Some(link) = self.instances.take() {
            link.disconnect();
        }
    }
}

impl fmt::Debug for GeometryRenderCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryRenderCore")
            .field("render_type", &self.render_type)
            .field("attachment", &self.attachment)
            .field("default_pass_name", &self.default_pass_name)
            .field("shadow_pass_name", &self.shadow_pass_name)
            .field("raster_description", &self.raster_description)
            .field("throws_shadow", &self.throws_shadow)
            .field("has_geometry", &self.geometry_buffer().is_some())
            .field("has_instances", &self.instance_buffer().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::VertexStream;
    use facet_core::renderer::{
        BufferId, CullMode, FixedFunctionState, GraphicsDevice, ShaderProgramId,
    };
    use facet_core::InvalidateSignal;
    use facet_infra::{DeviceCommand, RecordingContext, RecordingDevice};

    struct Fixture {
        device: RecordingDevice,
        resources: RenderResources,
        technique: Arc<Technique>,
        signal: Arc<InvalidateSignal>,
    }

    impl Fixture {
        fn new() -> Self {
            let device = RecordingDevice::new();
            let mut resources = RenderResources::new(Arc::new(device.clone()));
            let technique = resources.techniques_mut().register(
                Technique::builder("Mesh", InputLayoutId(3))
                    .pass(DEFAULT_PASS_NAME, ShaderProgramId(1), FixedFunctionState::default())
                    .pass(SHADOW_PASS_NAME, ShaderProgramId(2), FixedFunctionState::default())
                    .build(),
            );
            Self {
                device,
                resources,
                technique,
                signal: Arc::new(InvalidateSignal::new()),
            }
        }

        fn core(&self) -> GeometryRenderCore {
            let core = GeometryRenderCore::default();
            core.set_invalidation_target(self.signal.clone());
            core
        }

        fn triangle(&self) -> Arc<GeometryBufferModel> {
            let model = GeometryBufferModel::new(Arc::new(self.device.clone()));
            model.set_vertices(&[[0.0f32; 3]; 3]).expect("upload");
            Arc::new(model)
        }
    }

    #[test]
    fn detached_core_has_only_sentinels() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        core.set_raster_description(RasterizerStateDescriptor::default().with_cull_mode(CullMode::Back))
            .expect("deferred");

        assert!(!core.is_attached());
        assert!(core.default_pass().is_null());
        assert!(core.shadow_pass().is_null());
        assert!(core.raster_state().is_none());
        assert!(fixture.resources.states().is_empty());
    }

    #[test]
    fn attach_resolves_passes_and_layout() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        let status = core.attach(&fixture.technique, &fixture.resources).expect("attach");

        assert_eq!(status, AttachStatus::Attached);
        assert_eq!(core.default_pass(), fixture.technique[DEFAULT_PASS_NAME]);
        assert_eq!(core.shadow_pass(), fixture.technique[SHADOW_PASS_NAME]);
        assert_eq!(core.input_layout(), Some(InputLayoutId(3)));
        assert!(fixture.signal.take());
    }

    #[test]
    fn repeated_attach_is_a_no_op() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        core.attach(&fixture.technique, &fixture.resources).expect("attach");
        let registrations = fixture.resources.states().registration_count();

        let status = core.attach(&fixture.technique, &fixture.resources).expect("attach");
        assert_eq!(status, AttachStatus::AlreadyAttached);
        assert_eq!(fixture.resources.states().registration_count(), registrations);
    }

    #[test]
    fn failed_attach_leaves_core_detached() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        fixture.device.set_device_lost(true);

        let result = core.attach(&fixture.technique, &fixture.resources);
        assert_eq!(result, Err(ResourceError::DeviceLost));
        assert!(!core.is_attached());
        assert!(core.default_pass().is_null());
    }

    #[test]
    fn technique_without_passes_is_rejected() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        let empty = Arc::new(Technique::builder("Empty", InputLayoutId(0)).build());
        let status = core.attach(&empty, &fixture.resources).expect("no device error");
        assert_eq!(status, AttachStatus::InvalidTechnique);
        assert!(!core.is_attached());
    }

    #[test]
    fn unknown_pass_name_resolves_to_null_while_attached() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        core.attach(&fixture.technique, &fixture.resources).expect("attach");
        core.set_shadow_pass_name("DoesNotExist");
        assert!(core.shadow_pass().is_null());
        assert!(core.is_attached());

        core.set_shadow_pass_name(SHADOW_PASS_NAME);
        assert_eq!(core.shadow_pass(), fixture.technique[SHADOW_PASS_NAME]);
    }

    #[test]
    fn equal_writes_do_not_invalidate() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        let model = fixture.triangle();
        core.set_geometry_buffer(Some(&model));
        core.set_throws_shadow(true);
        assert!(fixture.signal.take());

        core.set_geometry_buffer(Some(&model));
        core.set_throws_shadow(true);
        core.set_default_pass_name(DEFAULT_PASS_NAME);
        core.set_raster_description(RasterizerStateDescriptor::default())
            .expect("unchanged");
        assert!(!fixture.signal.is_pending());
    }

    #[test]
    fn color_pass_binds_in_protocol_order() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        let model = fixture.triangle();
        model.set_indices(&[0, 1, 2]).expect("upload");
        core.set_geometry_buffer(Some(&model));
        core.attach(&fixture.technique, &fixture.resources).expect("attach");

        let mut context = RecordingContext::for_device(&fixture.device);
        let call = core
            .render(&RenderContext::default(), &mut context)
            .expect("draw");
        assert_eq!(call.map(|c| c.to_string()), Some("draw indexed 3 @0".to_string()));

        let commands = context.commands();
        assert_eq!(commands[0], DeviceCommand::BindShader(ShaderProgramId(1)));
        assert!(matches!(commands[1], DeviceCommand::BindStates { profile, .. } if profile == StateBindingProfile::COLOR));
        assert_eq!(commands[2], DeviceCommand::SetInputLayout(InputLayoutId(3)));
        assert!(matches!(commands[3], DeviceCommand::SetVertexBuffer { slot: 0, .. }));
        assert!(matches!(commands[4], DeviceCommand::SetIndexBuffer { .. }));
        assert_eq!(
            commands[5],
            DeviceCommand::SetRasterState(core.raster_state().expect("attached").id())
        );
        assert!(commands[6].is_draw());
        assert_eq!(commands.len(), 7);
    }

    #[test]
    fn instances_bind_after_the_last_vertex_stream() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        let device: Arc<dyn GraphicsDevice> = Arc::new(fixture.device.clone());

        let geometry = Arc::new(GeometryBufferModel::new(device.clone()));
        let positions = [[0.0f32; 3]; 4];
        let normals = [[0.0f32; 3]; 4];
        geometry
            .set_vertex_streams(&[
                VertexStream::from_slice(&positions),
                VertexStream::from_slice(&normals),
            ])
            .expect("upload");
        geometry.set_indices(&[0, 1, 2, 2, 3, 0]).expect("upload");
        let instances = Arc::new(InstanceBufferModel::new(device));
        instances.set_instances(&[[1.0f32; 4]; 5]).expect("upload");

        core.set_geometry_buffer(Some(&geometry));
        core.set_instance_buffer(Some(&instances));
        core.attach(&fixture.technique, &fixture.resources).expect("attach");

        let mut context = RecordingContext::for_device(&fixture.device);
        core.render(&RenderContext::default(), &mut context)
            .expect("draw")
            .expect("not skipped");

        let slots: Vec<(u32, BufferId)> = context
            .commands()
            .iter()
            .filter_map(|command| match command {
                DeviceCommand::SetVertexBuffer { slot, buffer } => Some((*slot, buffer.buffer)),
                _ => None,
            })
            .collect();
        let streams = geometry.vertex_buffers();
        let instance_buffer = instances.buffer().expect("instances");
        assert_eq!(
            slots,
            vec![
                (0, streams[0].buffer),
                (1, streams[1].buffer),
                (2, instance_buffer.buffer),
            ]
        );

        let (index_buffer, _) = geometry.index_buffer().expect("indices");
        assert_eq!(
            context.draw_commands(),
            vec![&DeviceCommand::DrawIndexedInstanced {
                index_count: 6,
                instance_count: 5,
                start_index: index_buffer.offset,
                base_vertex: 0,
                start_instance: instance_buffer.offset,
            }]
        );
    }

    #[test]
    fn inverted_cull_is_bound_when_requested() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        core.set_raster_description(
            RasterizerStateDescriptor::default().with_cull_mode(CullMode::Back),
        )
        .expect("deferred");
        let model = fixture.triangle();
        core.set_geometry_buffer(Some(&model));
        core.attach(&fixture.technique, &fixture.resources).expect("attach");

        let mut context = RecordingContext::for_device(&fixture.device);
        let render_context = RenderContext {
            invert_cull: true,
            ..Default::default()
        };
        core.render(&render_context, &mut context).expect("draw");

        let inverted = core.inverted_raster_state().expect("culling is on").id();
        assert!(context
            .commands()
            .contains(&DeviceCommand::SetRasterState(inverted)));
    }

    #[test]
    fn shadow_pass_requires_throws_shadow() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        let model = fixture.triangle();
        core.set_geometry_buffer(Some(&model));
        core.attach(&fixture.technique, &fixture.resources).expect("attach");

        let mut context = RecordingContext::for_device(&fixture.device);
        let shadow = RenderContext {
            pass: RenderPassKind::Shadow,
            ..Default::default()
        };
        assert_eq!(core.render(&shadow, &mut context), Ok(None));
        assert!(context.commands().is_empty());

        core.set_throws_shadow(true);
        let call = core.render(&shadow, &mut context).expect("draw");
        assert_eq!(call, Some(DrawCall::NonIndexed { vertex_count: 3 }));
        assert_eq!(context.commands()[0], DeviceCommand::BindShader(ShaderProgramId(2)));
        assert!(!context
            .commands()
            .iter()
            .any(|c| matches!(c, DeviceCommand::SetRasterState(_))));
    }

    #[test]
    fn render_custom_draws_with_the_given_pass() {
        let fixture = Fixture::new();
        let mut core = fixture.core();
        let model = fixture.triangle();
        core.set_geometry_buffer(Some(&model));
        core.attach(&fixture.technique, &fixture.resources).expect("attach");

        let mut context = RecordingContext::for_device(&fixture.device);
        let pass = fixture.technique.pass_or_null(SHADOW_PASS_NAME);
        let call = core
            .render_custom(&RenderContext::default(), &mut context, &pass)
            .expect("draw");
        assert!(call.is_some());
        assert!(!context
            .commands()
            .iter()
            .any(|c| matches!(c, DeviceCommand::BindShader(_))));

        let none = core
            .render_custom(&RenderContext::default(), &mut context, &ShaderPass::NULL)
            .expect("no draw");
        assert_eq!(none, None);
    }

    #[test]
    fn detached_render_is_reported() {
        let fixture = Fixture::new();
        let core = fixture.core();
        let mut context = RecordingContext::new();
        assert_eq!(
            core.render(&RenderContext::default(), &mut context),
            Err(RenderError::NotAttached)
        );
    }

    #[test]
    fn dropping_the_core_unsubscribes() {
        let fixture = Fixture::new();
        let model = fixture.triangle();
        let mut core = fixture.core();
        core.set_geometry_buffer(Some(&model));
        assert_eq!(model.notifier().observer_count(), 1);
        drop(core);
        assert_eq!(model.notifier().observer_count(), 0);
    }
}
