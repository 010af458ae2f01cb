//! wgpu implementation of the GPU seam
//!
//! Presents with `PresentMode::Fifo`, so every present waits for the
//! display's vertical blank.

use crate::backend::{GpuBackend, SurfaceSize};
use crate::error::RenderError;
use crate::shader::QUAD_VERTICES;
use crate::uniforms::MetaballUniforms;
use std::sync::Arc;
use std::time::Duration;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Surface, device and queue for one window.
struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

/// Linked pipeline plus the buffers it reads.
struct MetaballProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    quad: wgpu::Buffer,
}

#[derive(Default)]
pub struct WgpuBackend {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    program: Option<MetaballProgram>,
}

impl WgpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&self) -> Result<&GpuContext, RenderError> {
        self.gpu
            .as_ref()
            .ok_or_else(|| RenderError::Context("no current context".into()))
    }
}

impl GpuBackend for WgpuBackend {
    type Target = Arc<Window>;

    fn acquire(&mut self, window: Arc<Window>, size: SurfaceSize) -> Result<(), RenderError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Surface with Arc<Window> for 'static lifetime
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|err| RenderError::Surface(err.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoDisplay)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Metaball Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|err| RenderError::Context(err.to_string()))?;

        // 8-bit RGBA, sRGB when offered.
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .filter(|format| {
                matches!(
                    format.remove_srgb_suffix(),
                    wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Bgra8Unorm
                )
            })
            .max_by_key(|format| format.is_srgb())
            .ok_or_else(|| {
                RenderError::NoMatchingConfig(format!("8-bit RGBA among {:?}", caps.formats))
            })?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .ok_or_else(|| RenderError::NoMatchingConfig("no alpha mode".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            adapter = %adapter.get_info().name,
            backend = ?adapter.get_info().backend,
            ?format,
            width = config.width,
            height = config.height,
            "GPU surface acquired"
        );

        self.window = Some(window);
        self.gpu = Some(GpuContext {
            surface,
            device,
            queue,
            config,
        });
        Ok(())
    }

    fn build_program(&mut self, wgsl: &str) -> Result<(), RenderError> {
        let gpu = self.context()?;
        let device = &gpu.device;

        // Compile and link errors surface through the validation scope.
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Metaball Shader"),
            source: wgpu::ShaderSource::Wgsl(wgsl.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Metaball Uniforms"),
            size: std::mem::size_of::<MetaballUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Metaball Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Metaball Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Metaball Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Metaball Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fullscreen Quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Program(err.to_string()));
        }

        self.program = Some(MetaballProgram {
            pipeline,
            uniform_buffer,
            bind_group,
            quad,
        });
        Ok(())
    }

    fn draw(
        &mut self,
        size: SurfaceSize,
        clear_color: [f32; 4],
        uniforms: &MetaballUniforms,
    ) -> Result<(), RenderError> {
        let (Some(gpu), Some(program)) = (self.gpu.as_mut(), self.program.as_ref()) else {
            return Err(RenderError::Frame("no program bound".into()));
        };
        if size.is_empty() {
            return Ok(());
        }

        // Surface-changed only caches the size; the swapchain follows here.
        if gpu.config.width != size.width || gpu.config.height != size.height {
            gpu.config.width = size.width;
            gpu.config.height = size.height;
            gpu.surface.configure(&gpu.device, &gpu.config);
        }

        gpu.queue
            .write_buffer(&program.uniform_buffer, 0, uniforms.as_bytes());

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Err(RenderError::Frame("surface lost, reconfigured".into()));
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(err) => return Err(RenderError::Frame(err.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Metaball Encoder"),
            });

        {
            let [r, g, b, a] = clear_color.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Metaball Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&program.pipeline);
            render_pass.set_bind_group(0, &program.bind_group, &[]);
            render_pass.set_vertex_buffer(0, program.quad.slice(..));
            render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        // Flush + finish: wait for the GPU before presenting.
        gpu.device.poll(wgpu::Maintain::Wait);
        output.present();

        Ok(())
    }

    fn release(&mut self) {
        // Program before context, context before the window it draws into.
        self.program = None;
        self.gpu = None;
        self.window = None;
    }

    fn is_acquired(&self) -> bool {
        self.gpu.is_some()
    }

    fn refresh_interval(&self) -> Option<Duration> {
        let millihertz = self
            .window
            .as_ref()?
            .current_monitor()?
            .refresh_rate_millihertz()?;
        if millihertz == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(1000.0 / f64::from(millihertz)))
    }
}
