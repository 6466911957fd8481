#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_show_the_card_in_front_of_the_backdrop() {
    use vitrine::{
        artifact::Artifact,
        catalog::TextureRef,
        context::{Context, InitContext},
        data_structures::texture::Texture,
        flow::{ImageTestResult, Out, ViewerFlow},
        preset::{ACCENT_RGBA, GLASS_RGBA, ShapeKind},
        render::Render,
        resources,
    };

    use crate::common::test_utils::FrameCounter;

    struct CardOnScreen {
        artifact: Artifact,
    }

    impl CardOnScreen {
        async fn new(init: InitContext) -> Self {
            let mut catalog = Vec::new();
            for tex_ref in TextureRef::ALL {
                let texture = resources::texture::load_texture(
                    tex_ref.file_name(),
                    &init.device,
                    &init.queue,
                )
                .await
                .expect("catalog asset missing");
                catalog.push(texture);
            }
            let accent = Texture::create_solid(ACCENT_RGBA, "accent", &init.device, &init.queue);
            let glass = Texture::create_solid(GLASS_RGBA, "glass", &init.device, &init.queue);
            let artifact = Artifact::new(ShapeKind::Card, &catalog, &accent, &glass, &init.device)
                .expect("card preset upload failed");
            Self { artifact }
        }
    }

    impl ViewerFlow<FrameCounter> for CardOnScreen {
        fn on_init(&mut self, _: &mut Context, _: &mut FrameCounter) -> Out {
            Out::Empty
        }

        fn on_click(&mut self, _: &Context, _: &mut FrameCounter, _: u32) -> Out {
            Out::Empty
        }

        fn on_update(
            &mut self,
            _: &Context,
            state: &mut FrameCounter,
            _: std::time::Duration,
        ) -> Out {
            state.progress();
            Out::Empty
        }

        fn on_device_events(
            &mut self,
            _: &Context,
            _: &mut FrameCounter,
            _: &vitrine::DeviceEvent,
        ) -> Out {
            Out::Empty
        }

        fn on_window_events(
            &mut self,
            _: &Context,
            _: &mut FrameCounter,
            _: &vitrine::WindowEvent,
        ) -> Out {
            Out::Empty
        }

        fn on_render(&self) -> Render<'_> {
            self.artifact.render()
        }

        fn render_to_texture(
            &self,
            ctx: &Context,
            state: &mut FrameCounter,
            texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error> {
            if state.frame() == 0 {
                return Ok(ImageTestResult::Waiting);
            }
            let backdrop = [0xf5u8, 0xef, 0xe6];
            let is_backdrop = |pixel: &image::Rgba<u8>| {
                pixel.0[..3]
                    .iter()
                    .zip(backdrop)
                    .all(|(got, want)| got.abs_diff(want) <= 4)
            };

            // The card is 9 units tall 25 units from the camera, it covers the
            // centre of the frame in any orientation.
            let centre = texture.get_pixel(ctx.config.width / 2, ctx.config.height / 2);
            assert!(
                !is_backdrop(centre),
                "centre pixel {:?} still shows the backdrop",
                centre
            );

            // The corner stays uncovered.
            let corner = texture.get_pixel(4, 4);
            assert!(
                is_backdrop(corner),
                "corner pixel {:?} should show the backdrop",
                corner
            );
            Ok(ImageTestResult::Passed)
        }
    }

    golden_image_test!(async move |init: InitContext| CardOnScreen::new(init).await);
}
