use criterion::{criterion_group, criterion_main, Criterion};
use facet_core::renderer::settings::{DEFAULT_PASS_NAME, SHADOW_PASS_NAME};
use facet_core::renderer::{
    BufferId, CullMode, ElementBuffer, FixedFunctionState, InputLayoutId,
    RasterizerStateDescriptor, RenderSettings, ShaderProgramId,
};
use facet_infra::{RecordingContext, RecordingDevice};
use facet_render::{
    CameraData, DrawCall, FrameDriver, GeometryBufferModel, InstanceBufferModel, MeshNode,
    RenderResources, Technique,
};
use std::hint::black_box;
use std::sync::Arc;

fn build_driver(device: &RecordingDevice, cores: usize) -> FrameDriver {
    let mut resources = RenderResources::new(Arc::new(device.clone()));
    resources.techniques_mut().register(
        Technique::builder("Mesh", InputLayoutId(0))
            .pass(DEFAULT_PASS_NAME, ShaderProgramId(1), FixedFunctionState::default())
            .pass(SHADOW_PASS_NAME, ShaderProgramId(2), FixedFunctionState::default())
            .build(),
    );
    let mut driver = FrameDriver::new(resources, RenderSettings::default());

    let culled = RasterizerStateDescriptor::default().with_cull_mode(CullMode::Back);
    for i in 0..cores {
        let geometry = GeometryBufferModel::new(Arc::new(device.clone()));
        geometry.set_vertices(&[[0.0f32; 3]; 24]).expect("upload");
        if i % 2 == 0 {
            geometry.set_indices(&[0u32; 36]).expect("upload");
        }
        let mut mesh = MeshNode::new("Mesh", Arc::new(geometry)).with_raster(culled);
        if i % 4 == 0 {
            let instances = InstanceBufferModel::new(Arc::new(device.clone()));
            instances.set_instances(&[[0.0f32; 16]; 8]).expect("upload");
            mesh = mesh.with_instances(Arc::new(instances));
        }
        driver.scene_mut().add_mesh(mesh).expect("add mesh");
    }
    driver
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Draw Dispatch");

    group.bench_function("Select (4 cases)", |b| {
        let index = ElementBuffer::new(BufferId(0), 36, 4);
        let instances = ElementBuffer::new(BufferId(1), 8, 64);
        b.iter(|| {
            black_box(DrawCall::select(Some(&index), None, None));
            black_box(DrawCall::select(Some(&index), None, Some(&instances)));
            black_box(DrawCall::select(None, Some(&index), None));
            black_box(DrawCall::select(None, Some(&index), Some(&instances)));
        });
    });

    let device = RecordingDevice::new();
    let mut driver = build_driver(&device, 1_000);
    group.bench_function("Frame (1000 cores)", |b| {
        let mut context = RecordingContext::for_device(&device);
        b.iter(|| {
            let stats = driver.render_frame(&mut context, CameraData::default(), &[]);
            context.clear();
            black_box(stats);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
