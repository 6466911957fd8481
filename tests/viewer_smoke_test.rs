#[test]
#[cfg(feature = "integration-tests")]
fn should_start_both_flows_and_render_a_frame() {
    use vitrine::{
        flow,
        scene::SceneComposer,
        selection::ViewerState,
        selector::Selector,
    };

    // The composer's render validation exits the loop once the backdrop
    // reaches the surface.
    flow::run::<ViewerState>(vec![SceneComposer::constructor(), Selector::constructor()])
        .expect("Failed to run the viewer for the smoke test.");
}
