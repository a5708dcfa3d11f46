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

use anyhow::Result;
use facet_core::renderer::settings::{DEFAULT_PASS_NAME, SHADOW_PASS_NAME};
use facet_core::renderer::{
    FixedFunctionState, InputLayoutId, RenderError, RenderSettings, ShaderProgramId,
};
use facet_infra::{DeviceCommand, RecordingContext, RecordingDevice};
use facet_render::{
    Attachable, CameraData, FrameDriver, FrameError, GeometryBufferModel, InstanceBufferModel,
    LightData, LightKind, MeshNode, RenderPassKind, RenderResources, RenderType, TechniqueError,
    Technique,
};
use std::sync::Arc;
use std::thread;

fn driver_with(device: &RecordingDevice, settings: RenderSettings) -> FrameDriver {
    let mut resources = RenderResources::new(Arc::new(device.clone()));
    resources.techniques_mut().register(
        Technique::builder("Mesh", InputLayoutId(0))
            .pass(DEFAULT_PASS_NAME, ShaderProgramId(1), FixedFunctionState::default())
            .pass(SHADOW_PASS_NAME, ShaderProgramId(2), FixedFunctionState::default())
            .build(),
    );
    FrameDriver::new(resources, settings)
}

fn geometry(device: &RecordingDevice, vertex_count: usize) -> Result<Arc<GeometryBufferModel>> {
    let model = GeometryBufferModel::new(Arc::new(device.clone()));
    model.set_vertices(&vec![[0.0f32; 3]; vertex_count])?;
    Ok(Arc::new(model))
}

fn sun() -> LightData {
    LightData {
        kind: LightKind::Directional {
            direction: [0.0, -1.0, 0.0],
        },
        color: [1.0, 1.0, 1.0, 1.0],
        casts_shadow: true,
    }
}

fn draw_trace(context: &RecordingContext) -> Vec<String> {
    context
        .draw_commands()
        .into_iter()
        .map(|command| command.to_string())
        .collect()
}

#[test]
fn test_opaque_cores_render_before_transparent() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    let scene = driver.scene_mut();
    scene.add_mesh(
        MeshNode::new("Mesh", geometry(&device, 6)?).with_render_type(RenderType::Transparent),
    )?;
    scene.add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?))?;

    let mut context = RecordingContext::for_device(&device);
    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);

    assert_eq!(stats.draw_calls, 2);
    assert_eq!(
        draw_trace(&context),
        vec!["draw non-indexed 3 @0", "draw non-indexed 6 @0"]
    );
    Ok(())
}

#[test]
fn test_failed_draw_does_not_abort_the_frame() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    let first = driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?))?;
    driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 4)?))?;

    let mut context = RecordingContext::for_device(&device);
    context.fail_next_draws(1);
    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);

    assert_eq!(stats.failed_draws, 1);
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(draw_trace(&context), vec!["draw non-indexed 4 @0"]);

    let errors = driver.errors().drain();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        FrameError::Draw {
            core,
            pass: RenderPassKind::Color,
            source: RenderError::DrawFailed(_),
        } if *core == first
    ));

    // No retry within the frame; the next frame draws both.
    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.failed_draws, 0);
    Ok(())
}

#[test]
fn test_scene_built_on_another_thread_is_applied_before_rendering() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    let poster = driver.poster();

    let loader_device = device.clone();
    let loader = thread::spawn(move || -> Result<()> {
        let geometry = geometry(&loader_device, 3)?;
        let instances = InstanceBufferModel::new(Arc::new(loader_device.clone()));
        instances.set_instances(&[[0.0f32; 16]; 5])?;
        let mesh = MeshNode::new("Mesh", geometry).with_instances(Arc::new(instances));
        let posted = poster.post(move |scene| {
            if let Err(e) = scene.add_mesh(mesh) {
                log::error!("failed to add mesh: {e}");
            }
        });
        assert!(posted);
        Ok(())
    });
    loader
        .join()
        .map_err(|_| anyhow::anyhow!("loader thread panicked"))??;

    assert!(driver.scene().is_empty(), "nothing applied before the frame");
    assert!(driver.needs_render());

    let mut context = RecordingContext::for_device(&device);
    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);

    assert_eq!(driver.scene().len(), 1);
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(
        draw_trace(&context),
        vec!["draw non-indexed instanced verts=3 instances=5"]
    );
    assert!(context
        .commands()
        .iter()
        .any(|c| matches!(c, DeviceCommand::SetVertexBuffer { slot: 1, .. })));
    Ok(())
}

#[test]
fn test_shadow_pass_runs_only_for_shadow_casters() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?).throwing_shadow())?;
    driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?))?;

    let mut context = RecordingContext::for_device(&device);
    let stats = driver.render_frame(&mut context, CameraData::default(), &[sun()]);
    assert_eq!(stats.shadow_draw_calls, 1);
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.total_draw_calls(), 3);
    assert_eq!(
        context.commands()[0],
        DeviceCommand::BindShader(ShaderProgramId(2))
    );

    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);
    assert_eq!(stats.shadow_draw_calls, 0, "no light casts shadows");
    Ok(())
}

#[test]
fn test_disabled_shadows_skip_the_shadow_pass() -> Result<()> {
    let device = RecordingDevice::new();
    let settings = RenderSettings::from_json_str(r#"{ "shadows_enabled": false }"#)?;
    let mut driver = driver_with(&device, settings);
    driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?).throwing_shadow())?;

    let mut context = RecordingContext::for_device(&device);
    let stats = driver.render_frame(&mut context, CameraData::default(), &[sun()]);
    assert_eq!(stats.shadow_draw_calls, 0);
    assert_eq!(stats.draw_calls, 1);
    Ok(())
}

#[test]
fn test_cores_that_cannot_render_issue_no_device_calls() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    let detached = driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?))?;
    let without_geometry = driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?))?;

    if let Some(core) = driver.scene_mut().core_mut(detached) {
        core.detach();
    }
    if let Some(core) = driver.scene_mut().core_mut(without_geometry) {
        core.set_geometry_buffer(None);
    }

    let mut context = RecordingContext::for_device(&device);
    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);
    assert_eq!(stats.skipped_cores, 2);
    assert_eq!(stats.draw_calls, 0);
    assert!(context.commands().is_empty());
    Ok(())
}

#[test]
fn test_invalidations_are_coalesced() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    let id = driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?))?;
    assert!(driver.needs_render());
    assert!(!driver.needs_render());

    let model = driver.scene().geometry(id).cloned().expect("node owns geometry");
    model.set_vertices(&[[1.0f32; 3]; 3])?;
    model.set_vertices(&[[2.0f32; 3]; 3])?;
    assert!(driver.needs_render());
    assert!(!driver.needs_render());
    Ok(())
}

#[test]
fn test_unknown_technique_is_rejected() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    let result = driver
        .scene_mut()
        .add_mesh(MeshNode::new("Points", geometry(&device, 3)?));
    assert_eq!(
        result,
        Err(FrameError::Technique(TechniqueError::UnknownTechnique(
            "Points".to_string()
        )))
    );
    assert!(driver.scene().is_empty());
    Ok(())
}

#[test]
fn test_device_loss_and_reattach() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?))?;

    device.set_device_lost(true);
    let mut context = RecordingContext::for_device(&device);
    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);
    assert_eq!(stats.failed_draws, 1);
    assert!(matches!(
        driver.errors().drain().as_slice(),
        [FrameError::Draw {
            source: RenderError::DeviceLost,
            ..
        }]
    ));

    device.set_device_lost(false);
    driver.scene_mut().reattach_all()?;
    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);
    assert_eq!(stats.draw_calls, 1);
    Ok(())
}

#[test]
fn test_reattach_recreates_shared_raster_state() -> Result<()> {
    let device = RecordingDevice::new();
    let mut driver = driver_with(&device, RenderSettings::default());
    let first = driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 3)?))?;
    let second = driver
        .scene_mut()
        .add_mesh(MeshNode::new("Mesh", geometry(&device, 6)?))?;

    let raster_id = |driver: &FrameDriver, id| {
        driver
            .scene()
            .core(id)
            .and_then(|core| core.raster_state())
            .map(|handle| handle.id())
    };
    let before = raster_id(&driver, first);
    assert!(before.is_some());
    assert_eq!(before, raster_id(&driver, second));
    let creations = device.rasterizer_state_creations();

    device.set_device_lost(true);
    device.set_device_lost(false);
    driver.scene_mut().reattach_all()?;

    assert!(device.rasterizer_state_creations() > creations);
    let after = raster_id(&driver, first);
    assert!(after.is_some());
    assert_ne!(after, before);
    assert_eq!(after, raster_id(&driver, second));

    let mut context = RecordingContext::for_device(&device);
    let stats = driver.render_frame(&mut context, CameraData::default(), &[]);
    assert_eq!(stats.draw_calls, 2);
    Ok(())
}
