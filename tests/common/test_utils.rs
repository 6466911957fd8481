/// Counts rendered frames so validations can wait for the first real frame.
pub(crate) struct FrameCounter(pub(crate) u32);
impl Default for FrameCounter {
    fn default() -> Self {
        Self(0)
    }
}
impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

/// Boxes a flow expression into a constructor and runs the event loop with
/// it. The flow exits the loop itself by returning `ImageTestResult::Passed`
/// from `render_to_texture`.
#[macro_export]
macro_rules! golden_image_test {
    ($flow:expr) => {{
        use crate::common::test_utils::FrameCounter;
        use vitrine::flow::{FlowConstructor, ViewerFlow};
        let constructor: FlowConstructor<FrameCounter> = Box::new(|init| {
            Box::pin(async move {
                let mk_flow = $flow;
                let flow: Box<dyn ViewerFlow<FrameCounter>> = Box::new(mk_flow(init).await);
                flow
            })
        });

        vitrine::flow::run(vec![constructor]).expect("Failed to run flow for integration test.");
    }};
}
