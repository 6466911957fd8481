//! The selector flow: the clickable widget strip along the bottom edge.
//!
//! Shape buttons sit in the bottom-left corner, one per preset; texture
//! thumbnails sit in the bottom-right, one per catalog entry. Widgets are
//! textured quads in normalized device coordinates with a unique pick ID
//! each; clicks resolve through the pick pass and update the shared
//! selection.

use instant::Duration;
use wgpu::util::DeviceExt;
use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    catalog::TextureRef,
    context::{Context, InitContext},
    flow::{FlowConstructor, Out, ViewerFlow},
    pipelines::gui,
    preset::ShapeKind,
    render::{Flat, Render},
    resources,
    selection::ViewerState,
};

/// Pick IDs. Zero is reserved: the pick buffer clears to it.
const SHAPE_ID_BASE: u32 = 10;
const TEXTURE_ID_BASE: u32 = 20;

const WIDGET_SIZE: f32 = 0.16;
const WIDGET_GAP: f32 = 0.04;
const MARGIN: f32 = 0.06;

/// What clicking a widget selects.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Action {
    Shape(ShapeKind),
    Texture(TextureRef),
}

/// The selection a pick ID stands for. IDs below the widget bases (including
/// the reserved clear value 0) resolve to nothing.
fn action_for(id: u32) -> Option<Action> {
    if id >= TEXTURE_ID_BASE {
        TextureRef::ALL
            .get((id - TEXTURE_ID_BASE) as usize)
            .map(|&tex_ref| Action::Texture(tex_ref))
    } else if id >= SHAPE_ID_BASE {
        ShapeKind::ALL
            .get((id - SHAPE_ID_BASE) as usize)
            .map(|&kind| Action::Shape(kind))
    } else {
        None
    }
}

/// Left edge of shape button `i`: growing right from the left edge.
fn shape_slot_x(i: usize) -> f32 {
    -1.0 + MARGIN + i as f32 * (WIDGET_SIZE + WIDGET_GAP)
}

/// Left edge of thumbnail `i`: the row is anchored at the right edge but laid
/// out left-to-right, so the strip shows the catalog in order.
fn texture_slot_x(i: usize) -> f32 {
    let remaining = (TextureRef::ALL.len() - i) as f32;
    1.0 - MARGIN - remaining * (WIDGET_SIZE + WIDGET_GAP) + WIDGET_GAP
}

struct Widget {
    id: u32,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: usize,
    bind_group: wgpu::BindGroup,
}

pub struct Selector {
    widgets: Vec<Widget>,
}

impl Selector {
    async fn new(init: InitContext) -> anyhow::Result<Self> {
        let layout = gui::mk_bind_group_layout(&init.device);
        let mut widgets = Vec::new();

        // Shape buttons, growing right from the left edge.
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            let icon = resources::texture::load_texture(
                kind.icon_file_name(),
                &init.device,
                &init.queue,
            )
            .await?;
            widgets.push(mk_widget(
                &init.device,
                kind.label(),
                SHAPE_ID_BASE + i as u32,
                shape_slot_x(i),
                -1.0 + MARGIN,
                gui::mk_bind_group(&init.device, &icon, &layout)?,
            ));
        }

        // Texture thumbnails, anchored bottom-right in catalog order.
        for (i, tex_ref) in TextureRef::ALL.iter().enumerate() {
            let thumb = resources::texture::load_texture(
                tex_ref.file_name(),
                &init.device,
                &init.queue,
            )
            .await?;
            widgets.push(mk_widget(
                &init.device,
                tex_ref.file_name(),
                TEXTURE_ID_BASE + i as u32,
                texture_slot_x(i),
                -1.0 + MARGIN,
                gui::mk_bind_group(&init.device, &thumb, &layout)?,
            ));
        }

        Ok(Self { widgets })
    }

    /// Flow constructor for [`crate::flow::run`].
    pub fn constructor() -> FlowConstructor<ViewerState> {
        Box::new(|init| {
            Box::pin(async move {
                match Selector::new(init).await {
                    Ok(flow) => Box::new(flow) as Box<dyn ViewerFlow<ViewerState>>,
                    Err(e) => panic!("Failed to build the selector: {}", e),
                }
            })
        })
    }
}

fn mk_widget(
    device: &wgpu::Device,
    name: &str,
    id: u32,
    x0: f32,
    y0: f32,
    bind_group: wgpu::BindGroup,
) -> Widget {
    let (x1, y1) = (x0 + WIDGET_SIZE, y0 + WIDGET_SIZE);
    // Counter-clockwise from the bottom left, v flipped so the image is
    // upright.
    let vertices = [
        gui::Vertex {
            position: [x0, y0, 0.0],
            tex_coords: [0.0, 1.0],
        },
        gui::Vertex {
            position: [x1, y0, 0.0],
            tex_coords: [1.0, 1.0],
        },
        gui::Vertex {
            position: [x1, y1, 0.0],
            tex_coords: [1.0, 0.0],
        },
        gui::Vertex {
            position: [x0, y1, 0.0],
            tex_coords: [0.0, 0.0],
        },
    ];
    let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Widget Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Widget Index Buffer", name)),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    Widget {
        id,
        vertex_buffer,
        index_buffer,
        num_indices: indices.len(),
        bind_group,
    }
}

impl ViewerFlow<ViewerState> for Selector {
    fn on_init(&mut self, _ctx: &mut Context, _state: &mut ViewerState) -> Out {
        Out::Empty
    }

    fn on_click(&mut self, _ctx: &Context, state: &mut ViewerState, id: u32) -> Out {
        match action_for(id) {
            Some(Action::Shape(kind)) => {
                if state.selection.select_shape(kind) {
                    log::info!("Shape changed to {}", kind.label());
                }
            }
            Some(Action::Texture(tex_ref)) => {
                if state.selection.select_texture(tex_ref) {
                    log::info!("Texture changed to {}", tex_ref.file_name());
                }
            }
            None => (),
        }
        Out::Empty
    }

    fn on_update(&mut self, _ctx: &Context, _state: &mut ViewerState, _dt: Duration) -> Out {
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
        Render::Composed(
            self.widgets
                .iter()
                .map(|widget| {
                    Render::GUI(Flat {
                        vertex: &widget.vertex_buffer,
                        index: &widget.index_buffer,
                        group: &widget.bind_group,
                        amount: widget.num_indices,
                        id: widget.id,
                    })
                })
                .collect(),
        )
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _ctx: &Context,
        _state: &mut ViewerState,
        _texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<crate::flow::ImageTestResult, anyhow::Error> {
        Ok(crate::flow::ImageTestResult::Passed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::selection::Selection;

    #[test]
    fn pick_ids_are_unique_across_widgets_and_artifacts() {
        let mut ids = HashSet::new();
        // 0 is the pick buffer clear value.
        ids.insert(0u32);
        for kind in ShapeKind::ALL {
            ids.insert(kind as u32 + 1);
        }
        let mut count = ids.len();
        for i in 0..ShapeKind::ALL.len() {
            ids.insert(SHAPE_ID_BASE + i as u32);
        }
        for i in 0..TextureRef::ALL.len() {
            ids.insert(TEXTURE_ID_BASE + i as u32);
        }
        count += ShapeKind::ALL.len() + TextureRef::ALL.len();
        assert_eq!(ids.len(), count, "pick id collision");
    }

    #[test]
    fn widget_ids_resolve_to_their_actions() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(
                action_for(SHAPE_ID_BASE + i as u32),
                Some(Action::Shape(*kind))
            );
        }
        for (i, tex_ref) in TextureRef::ALL.iter().enumerate() {
            assert_eq!(
                action_for(TEXTURE_ID_BASE + i as u32),
                Some(Action::Texture(*tex_ref))
            );
        }
        // The clear value, artifact ids, and out-of-range widget ids select
        // nothing.
        assert_eq!(action_for(0), None);
        for kind in ShapeKind::ALL {
            assert_eq!(action_for(kind as u32 + 1), None);
        }
        assert_eq!(action_for(SHAPE_ID_BASE + ShapeKind::ALL.len() as u32), None);
        assert_eq!(
            action_for(TEXTURE_ID_BASE + TextureRef::ALL.len() as u32),
            None
        );
    }

    #[test]
    fn selecting_prism_then_the_third_thumbnail_updates_both_fields() {
        let mut selection = Selection::default();
        let apply = |selection: &mut Selection, id: u32| match action_for(id) {
            Some(Action::Shape(kind)) => selection.select_shape(kind),
            Some(Action::Texture(tex_ref)) => selection.select_texture(tex_ref),
            None => false,
        };
        assert!(apply(&mut selection, SHAPE_ID_BASE + 1));
        assert!(apply(&mut selection, TEXTURE_ID_BASE + 2));
        assert_eq!(selection.shape, ShapeKind::Prism);
        assert_eq!(selection.texture, TextureRef::ALL[2]);
    }

    #[test]
    fn thumbnail_strip_shows_the_catalog_in_order() {
        let n = TextureRef::ALL.len();
        for i in 1..n {
            assert!(
                texture_slot_x(i) > texture_slot_x(i - 1),
                "catalog entry {} is drawn left of entry {}",
                i,
                i - 1
            );
        }
        // The row stays anchored inside the right margin.
        let rightmost = texture_slot_x(n - 1) + WIDGET_SIZE;
        assert!((rightmost - (1.0 - MARGIN)).abs() < 1e-6);

        for i in 1..ShapeKind::ALL.len() {
            assert!(shape_slot_x(i) > shape_slot_x(i - 1));
        }
        assert!((shape_slot_x(0) - (-1.0 + MARGIN)).abs() < 1e-6);
    }
}
