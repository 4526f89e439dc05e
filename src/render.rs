use crate::constants::{FILL_LIGHT, KEY_LIGHT};
use crate::dom;
use ambient_core::mesh::MeshKind;
use ambient_core::scene::{SceneFrame, SceneSurface, Shading};
use ambient_core::{EffectError, Viewport};
use web_sys as web;

mod helpers;
use helpers::MeshPipelineDesc;

// Upper bound on meshes drawn per frame
const MAX_DRAWS: usize = 16;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    key_light: [f32; 4],
    fill_light: [f32; 4],
    time: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pass {
    Glass,
    UnlitFront,
    UnlitBack,
}

impl Pass {
    fn of(shading: &Shading) -> Self {
        match shading {
            Shading::Glass { .. } => Pass::Glass,
            Shading::Unlit { back_side: false } => Pass::UnlitFront,
            Shading::Unlit { back_side: true } => Pass::UnlitBack,
        }
    }
}

/// WebGPU/WebGL2 renderer for the parallax scene.
pub struct GpuScene {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_staging: Vec<u8>,
    glass_pipeline: wgpu::RenderPipeline,
    unlit_front_pipeline: wgpu::RenderPipeline,
    unlit_back_pipeline: wgpu::RenderPipeline,
    meshes: Vec<GpuMesh>,
    visible: bool,
}

impl GpuScene {
    pub async fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // WebGL2 adapters cannot satisfy the default limits
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("scene_device"),
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface has no formats"))?;
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = helpers::create_depth_view(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(ambient_core::SCENE_WGSL.into()),
        });

        let globals_size = std::mem::size_of::<Globals>() as u64;
        let draw_size = std::mem::size_of::<DrawUniforms>() as u64;
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let draw_stride = draw_size.div_ceil(align) * align;

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[helpers::uniform_layout_entry(false, globals_size)],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_layout"),
            entries: &[helpers::uniform_layout_entry(true, draw_size)],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: globals_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draws"),
            size: draw_stride * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bg"),
            layout: &draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(draw_size),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout],
            push_constant_ranges: &[],
        });
        let pipeline = |label, frag_entry, cull, depth_write| {
            helpers::make_mesh_pipeline(
                &device,
                &pipeline_layout,
                &shader,
                format,
                MeshPipelineDesc {
                    label,
                    frag_entry,
                    cull,
                    depth_write,
                },
            )
        };
        let glass_pipeline = pipeline("glass", "fs_glass", Some(wgpu::Face::Back), true);
        let unlit_front_pipeline = pipeline("unlit_front", "fs_unlit", Some(wgpu::Face::Back), false);
        let unlit_back_pipeline = pipeline("unlit_back", "fs_unlit", Some(wgpu::Face::Front), false);

        let meshes = MeshKind::ALL
            .iter()
            .map(|kind| {
                let mesh = kind.build();
                GpuMesh {
                    vertices: helpers::upload_buffer(
                        &device,
                        &queue,
                        "mesh_vertices",
                        bytemuck::cast_slice(&mesh.vertices),
                        wgpu::BufferUsages::VERTEX,
                    ),
                    indices: helpers::upload_buffer(
                        &device,
                        &queue,
                        "mesh_indices",
                        bytemuck::cast_slice(&mesh.indices),
                        wgpu::BufferUsages::INDEX,
                    ),
                    index_count: mesh.indices.len() as u32,
                }
            })
            .collect();

        log::info!(
            "[scene] gpu ready format={:?} alpha={:?} backend={:?}",
            format,
            alpha_mode,
            adapter.get_info().backend
        );

        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            depth_view,
            globals_buffer,
            globals_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_staging: vec![0; (draw_stride as usize) * MAX_DRAWS],
            glass_pipeline,
            unlit_front_pipeline,
            unlit_back_pipeline,
            meshes,
            visible: true,
        })
    }

    fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = helpers::create_depth_view(&self.device, width, height);
        }
    }

    fn pipeline(&self, pass: Pass) -> &wgpu::RenderPipeline {
        match pass {
            Pass::Glass => &self.glass_pipeline,
            Pass::UnlitFront => &self.unlit_front_pipeline,
            Pass::UnlitBack => &self.unlit_back_pipeline,
        }
    }
}

impl SceneSurface for GpuScene {
    fn resize(&mut self, viewport: &Viewport, dpr: f32) {
        dom::sync_canvas_backing_size(&self.canvas, viewport, dpr);
        self.resize_if_needed(self.canvas.width(), self.canvas.height());
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        _ = self
            .canvas
            .style()
            .set_property("display", if visible { "block" } else { "none" });
    }

    fn render(&mut self, frame: &SceneFrame) -> Result<(), EffectError> {
        if !self.visible {
            return Ok(());
        }
        let camera = &frame.camera;
        let globals = Globals {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            key_light: KEY_LIGHT,
            fill_light: FILL_LIGHT,
            time: [frame.elapsed, 0.0, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let draws = &frame.instances[..frame.instances.len().min(MAX_DRAWS)];
        let stride = self.draw_stride as usize;
        for (i, inst) in draws.iter().enumerate() {
            let (env, unlit) = match inst.shading {
                Shading::Glass { env_intensity } => (env_intensity, 0.0),
                Shading::Unlit { .. } => (0.0, 1.0),
            };
            let uniforms = DrawUniforms {
                model: inst.model.to_cols_array_2d(),
                color: inst.color,
                params: [env, unlit, 0.0, 0.0],
            };
            let bytes = bytemuck::bytes_of(&uniforms);
            self.draw_staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !draws.is_empty() {
            self.queue.write_buffer(
                &self.draw_buffer,
                0,
                &self.draw_staging[..draws.len() * stride],
            );
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(EffectError::Render("surface lost, reconfigured".into()));
            }
            Err(e) => return Err(EffectError::Render(format!("{:?}", e))),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            // Glass first so the flat overlays blend over it
            for pass in [Pass::Glass, Pass::UnlitBack, Pass::UnlitFront] {
                rpass.set_pipeline(self.pipeline(pass));
                for (i, inst) in draws.iter().enumerate() {
                    if Pass::of(&inst.shading) != pass {
                        continue;
                    }
                    let mesh = &self.meshes[inst.mesh.index()];
                    let offset = (i * stride) as u32;
                    rpass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                    rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
                    rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
