//! The scene composer flow: owns the three uploaded artifacts and shows the
//! selected one.
//!
//! All presets are uploaded once at startup. Per frame the composer reads the
//! shared selection, re-points the active artifact's textured meshes if the
//! catalog choice changed, and emits only the active artifact. Switching
//! shapes therefore swaps which model appears in the frame's batches, nothing
//! is rebuilt.

use instant::Duration;
use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    artifact::Artifact,
    catalog::TextureRef,
    context::{Context, InitContext},
    data_structures::texture::Texture,
    flow::{FlowConstructor, Out, ViewerFlow},
    preset::{ACCENT_RGBA, GLASS_RGBA, ShapeKind},
    render::Render,
    resources,
    selection::ViewerState,
};

pub struct SceneComposer {
    artifacts: Vec<Artifact>,
    active: ShapeKind,
}

impl SceneComposer {
    async fn new(init: InitContext) -> anyhow::Result<Self> {
        let mut catalog = Vec::with_capacity(TextureRef::ALL.len());
        for tex_ref in TextureRef::ALL {
            let texture = resources::texture::load_texture(
                tex_ref.file_name(),
                &init.device,
                &init.queue,
            )
            .await?;
            catalog.push(texture);
        }
        let accent = Texture::create_solid(ACCENT_RGBA, "accent", &init.device, &init.queue);
        let glass = Texture::create_solid(GLASS_RGBA, "glass", &init.device, &init.queue);

        let artifacts = ShapeKind::ALL
            .iter()
            .map(|&kind| Artifact::new(kind, &catalog, &accent, &glass, &init.device))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            artifacts,
            active: ShapeKind::Card,
        })
    }

    /// Flow constructor for [`crate::flow::run`].
    pub fn constructor() -> FlowConstructor<ViewerState> {
        Box::new(|init| {
            Box::pin(async move {
                match SceneComposer::new(init).await {
                    Ok(flow) => Box::new(flow) as Box<dyn ViewerFlow<ViewerState>>,
                    Err(e) => panic!("Failed to build the scene composer: {}", e),
                }
            })
        })
    }
}

impl ViewerFlow<ViewerState> for SceneComposer {
    fn on_init(&mut self, _ctx: &mut Context, state: &mut ViewerState) -> Out {
        self.active = state.selection.shape;
        // Warm beige backdrop, converted to linear before it reaches the
        // surface.
        Out::Configure(Box::new(|ctx| {
            ctx.clear_colour = wgpu::Color {
                r: 0.913,
                g: 0.863,
                b: 0.791,
                a: 1.0,
            };
        }))
    }

    fn on_click(&mut self, _ctx: &Context, _state: &mut ViewerState, _id: u32) -> Out {
        Out::Empty
    }

    fn on_update(&mut self, _ctx: &Context, state: &mut ViewerState, _dt: Duration) -> Out {
        self.active = state.selection.shape;
        for artifact in &mut self.artifacts {
            if artifact.texture() != Some(state.selection.texture) {
                artifact.set_texture(state.selection.texture);
            }
        }
        Out::Empty
    }

    fn on_device_events(
        &mut self,
        _ctx: &Context,
        _state: &mut ViewerState,
        _event: &DeviceEvent,
    ) -> Out {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _ctx: &Context,
        _state: &mut ViewerState,
        _event: &WindowEvent,
    ) -> Out {
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.kind == self.active)
            .map(Artifact::render)
            .unwrap_or(Render::None)
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _ctx: &Context,
        _state: &mut ViewerState,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<crate::flow::ImageTestResult, anyhow::Error> {
        use crate::flow::ImageTestResult;

        // The backdrop must reach the surface in sRGB. Sample the top-left
        // corner, which no geometry covers.
        let pixel = texture.get_pixel(4, 4);
        let expected = [0xf5u8, 0xef, 0xe6];
        let close = pixel.0[..3]
            .iter()
            .zip(expected)
            .all(|(got, want)| got.abs_diff(want) <= 4);
        if close {
            Ok(ImageTestResult::Passed)
        } else {
            log::error!("Backdrop mismatch, got {:?} expected {:?}", pixel, expected);
            Ok(ImageTestResult::Failed)
        }
    }
}
