use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::{bytes_of, Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::scene::{GlobeScene, MeshNode, Shading, Side, Surface, TextureKind};
use crate::sphere::VERTEX_STRIDE;

/// GPU renderer backed by wgpu that draws the globe scene.
///
/// All three shells share one shader; the transparent overlay gets a
/// blending pipeline, and the backdrop gets its own so its interior faces
/// are the ones that survive culling.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    pipeline: wgpu::RenderPipeline,
    blend_pipeline: wgpu::RenderPipeline,
    background_pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    nodes: Vec<NodeBuffers>,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window and uploads the
    /// scene's mesh buffers. Textured shells start on placeholder pixels
    /// until their image loads arrive.
    pub async fn new(window: Arc<Window>, scene: &GlobeScene) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = unsafe { instance.create_surface(window.as_ref()) }
            .context("failed to create rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("globe-device"),
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("globe-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("global-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<GlobalUniform>() as u64)
                            .unwrap(),
                    ),
                },
                count: None,
            }],
        });

        // Per-shell uniform layout
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<ObjectConstants>() as u64)
                            .unwrap(),
                    ),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let pipeline = build_pipeline(
            &device,
            &shader,
            &pipeline_layout,
            surface_format,
            "globe-pipeline",
            None,
            false,
        );
        // Only shells flagged transparent blend; opaque shells ignore any
        // alpha their texture carries.
        let blend_pipeline = build_pipeline(
            &device,
            &shader,
            &pipeline_layout,
            surface_format,
            "overlay-pipeline",
            None,
            true,
        );
        // Interior faces only, so the backdrop is visible from within.
        let background_pipeline = build_pipeline(
            &device,
            &shader,
            &pipeline_layout,
            surface_format,
            "backdrop-pipeline",
            Some(wgpu::Face::Front),
            false,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("surface-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mut nodes = Vec::new();
        for node in scene.draw_order() {
            nodes.push(NodeBuffers::from_node(
                &device,
                &queue,
                &object_layout,
                &texture_layout,
                &sampler,
                node,
            ));
        }

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            pipeline,
            blend_pipeline,
            background_pipeline,
            global_buffer,
            global_bind_group,
            texture_layout,
            sampler,
            nodes,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Exposes the inner window for event handling.
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Reconfigures the swap chain after a lost surface. The camera aspect
    /// is deliberately left alone; only the debounced rebuild recomputes it.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Updates the camera and lighting uniforms before rendering.
    pub fn update_globals(&self, camera: &CameraParams, light: &LightParams) {
        let uniform = GlobalUniform {
            view_proj: camera.view_proj.to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).into(),
            light_direction: light.direction.normalize_or_zero().extend(0.0).into(),
            light_color: light.color.extend(light.intensity).into(),
            ambient: light.ambient.extend(1.0).into(),
        };
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&uniform));
    }

    /// Swaps a shell's placeholder for its freshly decoded image.
    pub fn install_texture(&mut self, kind: TextureKind, image: RgbaImage) {
        let view = upload_texture(&self.device, &self.queue, &image, texture_label(kind));
        for node in self.nodes.iter_mut().filter(|node| node.kind == Some(kind)) {
            node.texture_bind_group =
                texture_bind_group(&self.device, &self.texture_layout, &view, &self.sampler);
        }
    }

    /// Draws the scene's shells in their fixed draw order.
    pub fn render(&mut self, scene: &GlobeScene) -> Result<(), wgpu::SurfaceError> {
        for (buffers, node) in self.nodes.iter().zip(scene.draw_order()) {
            let constants = object_constants(node);
            self.queue
                .write_buffer(&buffers.object_buffer, 0, bytes_of(&constants));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("globe-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.03,
                            g: 0.03,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            pass.set_bind_group(0, &self.global_bind_group, &[]);
            for buffers in &self.nodes {
                if buffers.inside {
                    pass.set_pipeline(&self.background_pipeline);
                } else if buffers.transparent {
                    pass.set_pipeline(&self.blend_pipeline);
                } else {
                    pass.set_pipeline(&self.pipeline);
                }
                pass.set_vertex_buffer(0, buffers.vertex.slice(..));
                pass.set_index_buffer(buffers.index.slice(..), wgpu::IndexFormat::Uint32);
                pass.set_bind_group(1, &buffers.object_bind_group, &[]);
                pass.set_bind_group(2, &buffers.texture_bind_group, &[]);
                pass.draw_indexed(0..buffers.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    label: &str,
    cull_mode: Option<wgpu::Face>,
    blend: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: (VERTEX_STRIDE * std::mem::size_of::<f32>()) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: (3 * std::mem::size_of::<f32>()) as u64,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: (6 * std::mem::size_of::<f32>()) as u64,
                        shader_location: 2,
                    },
                ],
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: blend.then_some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
    })
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &RgbaImage,
    label: &str,
) -> wgpu::TextureView {
    let (width, height) = image.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("texture-bind-group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn texture_label(kind: TextureKind) -> &'static str {
    match kind {
        TextureKind::Land => "land-texture",
        TextureKind::Background => "backdrop-texture",
    }
}

/// Placeholder pixel a shell shows until its image load completes. The land
/// overlay stays invisible rather than covering the globe in white.
fn placeholder_pixel(node: &MeshNode) -> [u8; 4] {
    match node.texture_kind() {
        Some(TextureKind::Land) => [0, 0, 0, 0],
        Some(TextureKind::Background) => [8, 8, 13, 255],
        None => [255, 255, 255, 255],
    }
}

fn object_constants(node: &MeshNode) -> ObjectConstants {
    let model = node.model_matrix();
    let normal = Mat3::from_mat4(model).inverse().transpose();
    let color = match node.surface {
        Surface::Flat { color } => color.extend(1.0),
        Surface::Textured { .. } => Vec3::ONE.extend(1.0),
    };
    ObjectConstants {
        model: model.to_cols_array_2d(),
        normal: mat3_to_3x4(normal),
        color: color.into(),
        params: [
            if node.texture_kind().is_some() { 1.0 } else { 0.0 },
            if node.shading == Shading::Lit { 1.0 } else { 0.0 },
            0.0,
            0.0,
        ],
    }
}

fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

/// Camera parameters consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct CameraParams {
    pub view_proj: Mat4,
    pub position: Vec3,
}

/// Lighting state consumed by the renderer's uniform buffer.
#[derive(Clone, Debug)]
pub struct LightParams {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub ambient: Vec3,
}

struct NodeBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    kind: Option<TextureKind>,
    inside: bool,
    transparent: bool,
}

impl NodeBuffers {
    fn from_node(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        object_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        node: &MeshNode,
    ) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}-vertices", node.name)),
            contents: bytemuck::cast_slice(&node.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}-indices", node.name)),
            contents: bytemuck::cast_slice(&node.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}-uniform", node.name)),
            contents: bytes_of(&object_constants(node)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{}-bind-group", node.name)),
            layout: object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });

        let placeholder = RgbaImage::from_pixel(1, 1, image::Rgba(placeholder_pixel(node)));
        let view = upload_texture(
            device,
            queue,
            &placeholder,
            &format!("{}-placeholder", node.name),
        );
        let texture_bind_group = texture_bind_group(device, texture_layout, &view, sampler);

        Self {
            vertex,
            index,
            index_count: node.mesh.indices.len() as u32,
            object_buffer,
            object_bind_group,
            texture_bind_group,
            kind: node.texture_kind(),
            inside: node.side == Side::Inside,
            transparent: node.is_transparent(),
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    light_direction: [f32; 4],
    light_color: [f32; 4],
    ambient: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectConstants {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    color: [f32; 4],
    params: [f32; 4],
}

const SHADER: &str = r#"
struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_direction: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

@group(2) @binding(0)
var t_surface: texture_2d<f32>;

@group(2) @binding(1)
var s_surface: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    let world_pos = object.model * vec4<f32>(input.position, 1.0);
    output.position = globals.view_proj * world_pos;

    let world_normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;
    output.normal = normalize(world_normal);
    output.uv = input.uv;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_surface, s_surface, input.uv);
    // params.x: sample the texture; params.y: apply lighting
    let albedo = mix(object.color, object.color * texel, object.params.x);
    let normal = normalize(input.normal);
    let light_dir = normalize(globals.light_direction.xyz);
    let diffuse = max(dot(normal, light_dir), 0.0);
    let shade = globals.ambient.rgb + diffuse * globals.light_color.w * globals.light_color.rgb;
    let lit = mix(albedo.rgb, albedo.rgb * shade, object.params.y);
    return vec4<f32>(lit, albedo.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobeConfig;

    fn scene() -> GlobeScene {
        GlobeScene::build(&GlobeConfig::default()).unwrap()
    }

    #[test]
    fn flat_shells_skip_the_texture_and_keep_their_color() {
        let scene = scene();
        let constants = object_constants(&scene.sphere);
        assert_eq!(constants.params[0], 0.0);
        assert_eq!(constants.params[1], 1.0);
        let expected = GlobeConfig::default().color;
        assert!((constants.color[0] - expected.x).abs() < 1e-6);
        assert!((constants.color[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn the_backdrop_is_textured_and_unlit() {
        let scene = scene();
        let constants = object_constants(&scene.background);
        assert_eq!(constants.params[0], 1.0);
        assert_eq!(constants.params[1], 0.0);
        assert_eq!(constants.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn the_normal_matrix_of_a_rotation_is_the_rotation() {
        let mut scene = scene();
        scene.land.rotation.yaw = 0.7;
        scene.land.rotation.pitch = -0.2;
        let constants = object_constants(&scene.land);
        let model = Mat3::from_mat4(scene.land.model_matrix());
        let expected = mat3_to_3x4(model);
        for (row, expected_row) in constants.normal.iter().zip(expected.iter()) {
            for (value, expected_value) in row.iter().zip(expected_row.iter()) {
                assert!((value - expected_value).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn placeholders_keep_the_overlay_invisible() {
        let scene = scene();
        assert_eq!(placeholder_pixel(&scene.land)[3], 0);
        assert_eq!(placeholder_pixel(&scene.sphere), [255, 255, 255, 255]);
        assert_eq!(placeholder_pixel(&scene.background)[3], 255);
    }
}
