//! vitrine
//!
//! A small cross-platform 3D artifact viewer for native and WASM targets.
//! A fixed set of shape presets (card, prism, cube) is displayed one at a
//! time with a selectable catalog texture mapped onto its faces, inside an
//! orbit-controlled, auto-rotating camera view. Presets and catalog entries
//! are uploaded once; selection changes only swap indices and batches.
//!
//! High-level modules
//! - `artifact`: geometry presets uploaded to the GPU with their materials
//! - `camera`: orbit camera, controller and uniforms for view/projection
//! - `catalog`: the fixed, ordered set of selectable images
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: data models (meshes, instances, textures)
//! - `flow`: high level flow control (viewer layers / update loop)
//! - `geometry`: procedural primitive meshes
//! - `pick`: widget picking utilities and shaders
//! - `pipelines`: definitions for the render pipelines (basic, transparent, gui)
//! - `preset`: the hand-authored shape descriptions
//! - `resources`: helpers to load bundled assets and create GPU resources
//! - `render`: render composition for efficient pipeline reuse
//! - `scene`: the composer flow showing the selected artifact
//! - `selection`: the shared shape/texture selection state
//! - `selector`: the widget strip flow
//!

pub mod artifact;
pub mod camera;
pub mod catalog;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod geometry;
pub mod pick;
pub mod pipelines;
pub mod preset;
pub mod render;
pub mod resources;
pub mod scene;
pub mod selection;
pub mod selector;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point shared by the native binary and the WASM bundle.
pub fn start() -> anyhow::Result<()> {
    flow::run::<selection::ViewerState>(vec![
        scene::SceneComposer::constructor(),
        selector::Selector::constructor(),
    ])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start_wasm() -> Result<(), JsValue> {
    start().map_err(|e| JsValue::from_str(&e.to_string()))
}
