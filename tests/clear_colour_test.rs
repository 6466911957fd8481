#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_the_backdrop_colour() {
    use vitrine::{
        context::{Context, InitContext},
        flow::{ImageTestResult, Out, ViewerFlow},
        render::Render,
    };

    use crate::common::test_utils::FrameCounter;

    struct Backdrop;

    impl ViewerFlow<FrameCounter> for Backdrop {
        fn on_init(&mut self, ctx: &mut Context, _: &mut FrameCounter) -> Out {
            ctx.clear_colour = wgpu::Color {
                r: 0.913,
                g: 0.863,
                b: 0.791,
                a: 1.0,
            };
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
            Render::None
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
            // The clear colour is linear, the surface is sRGB.
            let expected = [0xf5u8, 0xef, 0xe6];
            // Only sample inside the configured surface area, the readback
            // image is padded out to a 256 pixel multiple.
            for x in [0, ctx.config.width / 2, ctx.config.width - 1] {
                for y in [0, ctx.config.height / 2, ctx.config.height - 1] {
                    let pixel = texture.get_pixel(x, y);
                    for (got, want) in pixel.0[..3].iter().zip(expected) {
                        assert!(
                            got.abs_diff(want) <= 4,
                            "pixel at ({}, {}) is {:?}, expected ~{:?}",
                            x,
                            y,
                            pixel,
                            expected
                        );
                    }
                }
            }
            Ok(ImageTestResult::Passed)
        }
    }

    golden_image_test!(async move |_: InitContext| Backdrop);
}
