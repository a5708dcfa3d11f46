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

// Facet Sandbox
// Loads a scene on a background thread and prints the device trace of a few frames.

use std::borrow::Cow;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Result};
use facet_core::renderer::{
    BlendStateId, CullMode, DepthStencilStateId, FixedFunctionState, GraphicsDevice,
    InputLayoutDescriptor, RasterizerStateDescriptor, RenderSettings, ShaderProgramId,
    VertexStepMode, VertexStreamDescriptor,
};
use facet_infra::{RecordingContext, RecordingDevice};
use facet_render::{
    CameraData, FrameDriver, GeometryBufferModel, InstanceBufferModel, LightData, LightKind,
    MeshNode, RenderResources, RenderType, ScenePoster, Technique,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Instance {
    offset: [f32; 4],
}

const TRIANGLE: &[Vertex] = &[
    Vertex {
        position: [0.0, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
];

const QUAD_INDICES: &[u16] = &[0, 1, 2, 2, 3, 0];

fn quad() -> Vec<Vertex> {
    [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]]
        .into_iter()
        .map(|[x, z]| Vertex {
            position: [x, 0.0, z],
            color: [0.6, 0.6, 0.6],
        })
        .collect()
}

fn register_techniques(device: &RecordingDevice, resources: &mut RenderResources) -> Result<()> {
    let streams = [
        VertexStreamDescriptor {
            array_stride: std::mem::size_of::<Vertex>() as u32,
            step_mode: VertexStepMode::Vertex,
        },
        VertexStreamDescriptor {
            array_stride: std::mem::size_of::<Instance>() as u32,
            step_mode: VertexStepMode::Instance,
        },
    ];
    let layout = device.create_input_layout(&InputLayoutDescriptor {
        label: Some(Cow::Borrowed("Mesh Layout")),
        streams: Cow::Borrowed(&streams),
    })?;

    let opaque = FixedFunctionState {
        depth_stencil: Some(DepthStencilStateId(0)),
        ..Default::default()
    };
    let blended = FixedFunctionState {
        blend: Some(BlendStateId(0)),
        ..opaque
    };

    let techniques = resources.techniques_mut();
    techniques.register(
        Technique::builder("Mesh", layout)
            .pass("Default", ShaderProgramId(0), opaque)
            .pass("RenderShadow", ShaderProgramId(1), opaque)
            .build(),
    );
    techniques.register(
        Technique::builder("Glass", layout)
            .pass("Default", ShaderProgramId(2), blended)
            .build(),
    );
    Ok(())
}

/// Builds the scene models on the calling thread and posts them to the render thread.
fn load_scene(device: RecordingDevice, poster: ScenePoster) -> Result<()> {
    let device: Arc<dyn GraphicsDevice> = Arc::new(device);

    let floor = GeometryBufferModel::new(Arc::clone(&device)).with_label("Floor");
    floor.set_vertices(&quad())?;
    floor.set_indices_u16(QUAD_INDICES)?;

    let triangle = GeometryBufferModel::new(Arc::clone(&device)).with_label("Triangle");
    triangle.set_vertices(TRIANGLE)?;

    let offsets = InstanceBufferModel::new(Arc::clone(&device)).with_label("Triangle Offsets");
    let instances: Vec<Instance> = (0..5)
        .map(|i| Instance {
            offset: [i as f32 - 2.0, 0.5, 0.0, 0.0],
        })
        .collect();
    offsets.set_instances(&instances)?;

    let window = GeometryBufferModel::new(device).with_label("Window");
    window.set_vertices(&quad())?;
    window.set_indices_u16(QUAD_INDICES)?;

    let meshes = vec![
        MeshNode::new("Glass", Arc::new(window)).with_render_type(RenderType::Transparent),
        MeshNode::new("Mesh", Arc::new(floor))
            .with_raster(RasterizerStateDescriptor::default().with_cull_mode(CullMode::Back)),
        MeshNode::new("Mesh", Arc::new(triangle))
            .with_instances(Arc::new(offsets))
            .throwing_shadow(),
    ];

    let posted = poster.post(move |scene| {
        for mesh in meshes {
            match scene.add_mesh(mesh) {
                Ok(id) => log::info!("Mesh {id} added to the scene."),
                Err(e) => log::error!("Failed to add mesh: {e}"),
            }
        }
    });
    if !posted {
        return Err(anyhow!("render thread is gone"));
    }
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => RenderSettings::from_json_str(&std::fs::read_to_string(&path)?)?,
        None => RenderSettings::default(),
    };
    log::info!("Render settings: {settings:?}");

    let device = RecordingDevice::new();
    let mut resources = RenderResources::new(Arc::new(device.clone()));
    register_techniques(&device, &mut resources)?;
    let mut driver = FrameDriver::new(resources, settings);

    let loader = {
        let device = device.clone();
        let poster = driver.poster();
        thread::spawn(move || load_scene(device, poster))
    };
    loader
        .join()
        .map_err(|_| anyhow!("scene loader panicked"))??;

    let lights = [LightData {
        kind: LightKind::Directional {
            direction: [-0.3, -1.0, -0.2],
        },
        color: [1.0, 0.95, 0.9, 1.0],
        casts_shadow: true,
    }];
    let camera = CameraData::default();
    let mut context = RecordingContext::for_device(&device);

    for frame in 0..3 {
        if !driver.needs_render() {
            log::info!("Frame {frame}: nothing changed, skipped.");
            continue;
        }
        let stats = driver.render_frame(&mut context, camera, &lights);
        log::info!("Frame {}: {stats:?}", stats.frame_number);
        for command in context.take_commands() {
            log::info!("  {command}");
        }
        for error in driver.errors().drain() {
            log::error!("  {error}");
        }
    }

    log::info!(
        "{} rasterizer states, {} buffers alive.",
        device.live_rasterizer_states(),
        device.live_buffers()
    );
    Ok(())
}
