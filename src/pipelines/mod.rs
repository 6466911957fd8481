//! Render pipeline definitions.
//!
//! - `basic` renders opaque textured artifact meshes with lighting
//! - `transparent` renders the alpha-blended glass parts
//! - `gui` renders screen-space quads (shape buttons, thumbnail strip)
//! - `pick_gui` renders GUI quads into the offscreen ID buffer for picking
//! - `light` holds the light uniform resources shared by the 3D pipelines

pub mod basic;
pub mod gui;
pub mod light;
pub mod pick_gui;
pub mod transparent;

/// All pipelines, created once at context setup and reused every frame.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
    pub gui: wgpu::RenderPipeline,
    pub flat_pick: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(
                device,
                config,
                light_bind_group_layout,
                camera_bind_group_layout,
            ),
            transparent: transparent::mk_transparent_pipeline(
                device,
                config,
                light_bind_group_layout,
                camera_bind_group_layout,
            ),
            gui: gui::mk_gui_pipeline(device, config),
            flat_pick: pick_gui::mk_gui_pick_pipeline(device),
        }
    }
}
