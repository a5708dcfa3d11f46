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

use super::FrameError;
use crate::buffers::{GeometryBufferModel, InstanceBufferModel};
use crate::render_core::{AttachStatus, Attachable, GeometryRenderCore, RenderType};
use crate::resources::RenderResources;
use facet_core::renderer::{RasterizerStateDescriptor, RenderSettings};
use facet_core::{Invalidatable, InvalidateSignal};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Identifies a render core inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoreId(u64);

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mesh to add to the scene: the models it owns and how to draw them.
#[derive(Debug, Clone)]
pub struct MeshNode {
    /// Name of the technique to attach to.
    pub technique: String,
    /// The geometry. The scene keeps it alive for as long as the node exists.
    pub geometry: Arc<GeometryBufferModel>,
    /// Optional per-instance data.
    pub instances: Option<Arc<InstanceBufferModel>>,
    /// Where in the frame the mesh is drawn.
    pub render_type: RenderType,
    /// If `true`, the mesh is drawn into shadow maps.
    pub throws_shadow: bool,
    /// Raster state override. `None` uses the settings default.
    pub raster: Option<RasterizerStateDescriptor>,
}

impl MeshNode {
    /// An opaque, shadow-less mesh drawn with `technique`.
    pub fn new(technique: impl Into<String>, geometry: Arc<GeometryBufferModel>) -> Self {
        Self {
            technique: technique.into(),
            geometry,
            instances: None,
            render_type: RenderType::Opaque,
            throws_shadow: false,
            raster: None,
        }
    }

    /// Draws the mesh once per instance in `instances`.
    pub fn with_instances(mut self, instances: Arc<InstanceBufferModel>) -> Self {
        self.instances = Some(instances);
        self
    }

    /// Sets the render type.
    pub fn with_render_type(mut self, render_type: RenderType) -> Self {
        self.render_type = render_type;
        self
    }

    /// Makes the mesh throw shadows.
    pub fn throwing_shadow(mut self) -> Self {
        self.throws_shadow = true;
        self
    }

    /// Overrides the raster state.
    pub fn with_raster(mut self, raster: RasterizerStateDescriptor) -> Self {
        self.raster = Some(raster);
        self
    }
}

struct SceneEntry {
    technique: String,
    core: GeometryRenderCore,
    geometry: Arc<GeometryBufferModel>,
    instances: Option<Arc<InstanceBufferModel>>,
}

/// The render cores of a frame and the models they draw.
///
/// Only the render thread owns a `Scene`; see [`ScenePoster`](super::ScenePoster)
/// for changing it from elsewhere.
pub struct Scene {
    resources: RenderResources,
    settings: RenderSettings,
    signal: Arc<InvalidateSignal>,
    entries: BTreeMap<CoreId, SceneEntry>,
    next_id: u64,
}

impl Scene {
    pub(crate) fn new(
        resources: RenderResources,
        settings: RenderSettings,
        signal: Arc<InvalidateSignal>,
    ) -> Self {
        Self {
            resources,
            settings,
            signal,
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// The device, state cache and technique registry.
    pub fn resources(&self) -> &RenderResources {
        &self.resources
    }

    /// Mutable access to the resources, e.g. to register techniques.
    pub fn resources_mut(&mut self) -> &mut RenderResources {
        &mut self.resources
    }

    /// The settings the scene was created with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Creates a core for `mesh`, attaches it and adds it to the scene.
    ///
    /// A technique without passes is only logged: the core is added but never
    /// draws.
    ///
    /// ## Errors
    /// * `FrameError::Technique` - If the technique is not registered.
    /// * `FrameError::Attach` - If GPU state could not be created.
    pub fn add_mesh(&mut self, mesh: MeshNode) -> Result<CoreId, FrameError> {
        let technique = self.resources.techniques().get(&mesh.technique)?;

        let mut core = GeometryRenderCore::new(mesh.render_type);
        core.set_default_pass_name(self.settings.default_pass_name.as_str());
        core.set_shadow_pass_name(self.settings.shadow_pass_name.as_str());
        core.set_raster_description(mesh.raster.unwrap_or(self.settings.default_raster))?;
        core.set_throws_shadow(mesh.throws_shadow);
        core.set_geometry_buffer(Some(&mesh.geometry));
        core.set_instance_buffer(mesh.instances.as_ref());
        core.set_invalidation_target(self.signal.clone());

        if core.attach(&technique, &self.resources)? == AttachStatus::InvalidTechnique {
            log::warn!("Mesh added with unusable technique '{}'.", mesh.technique);
        }

        let id = CoreId(self.next_id);
        self.next_id += 1;
        log::debug!("Added render core {id} ({:?}, '{}').", mesh.render_type, mesh.technique);
        self.entries.insert(
            id,
            SceneEntry {
                technique: mesh.technique,
                core,
                geometry: mesh.geometry,
                instances: mesh.instances,
            },
        );
        self.signal.invalidate_renderer();
        Ok(id)
    }

    /// Detaches and removes a core, dropping the scene's hold on its models.
    ///
    /// Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: CoreId) -> bool {
        let Some(mut entry) = self.entries.remove(&id) else {
            return false;
        };
        entry.core.detach();
        log::debug!("Removed render core {id}.");
        self.signal.invalidate_renderer();
        true
    }

    /// Detaches every core and attaches it again, recreating all GPU state.
    ///
    /// Used after the device has been recovered. All cores are detached before
    /// any is attached, so shared raster states drop to zero references and are
    /// created anew instead of being reused from before the loss.
    ///
    /// ## Errors
    /// * `FrameError` - The first failure. Cores after it stay detached.
    pub fn reattach_all(&mut self) -> Result<(), FrameError> {
        for entry in self.entries.values_mut() {
            entry.core.detach();
        }
        for (id, entry) in &mut self.entries {
            let technique = self.resources.techniques().get(&entry.technique)?;
            entry.core.attach(&technique, &self.resources)?;
            log::trace!("Re-attached render core {id}.");
        }
        Ok(())
    }

    /// The core with the given id.
    pub fn core(&self, id: CoreId) -> Option<&GeometryRenderCore> {
        self.entries.get(&id).map(|entry| &entry.core)
    }

    /// Mutable access to the core with the given id.
    pub fn core_mut(&mut self, id: CoreId) -> Option<&mut GeometryRenderCore> {
        self.entries.get_mut(&id).map(|entry| &mut entry.core)
    }

    /// The geometry model owned by the node `id`.
    pub fn geometry(&self, id: CoreId) -> Option<&Arc<GeometryBufferModel>> {
        self.entries.get(&id).map(|entry| &entry.geometry)
    }

    /// The instance model owned by the node `id`.
    pub fn instances(&self, id: CoreId) -> Option<&Arc<InstanceBufferModel>> {
        self.entries.get(&id).and_then(|entry| entry.instances.as_ref())
    }

    /// All cores in insertion order.
    pub fn cores(&self) -> impl Iterator<Item = (CoreId, &GeometryRenderCore)> {
        self.entries.iter().map(|(id, entry)| (*id, &entry.core))
    }

    /// Number of cores.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the scene has no cores.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("cores", &self.entries.len())
            .field("settings", &self.settings)
            .finish()
    }
}
