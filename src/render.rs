//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn each frame with the [`Render`] enum.
//! The event loop sorts these into batches per pipeline (basic, transparent,
//! GUI) so state changes stay minimal. The composer emits only the active
//! artifact; unselected ones simply never appear in a batch.

use std::collections::{HashMap, HashSet};

use wgpu::RenderPass;

use crate::{context::Context, data_structures::model::Model};

/// Data for instanced object rendering: a model, instance buffer, and pick ID.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
    pub id: u32,
}

/// Data for flat (2D / GUI) object rendering: vertex and index buffers with a bind group.
///
/// The bind group holds the icon texture and sampler for the quad.
#[derive(Clone)]
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub group: &'a wgpu::BindGroup,
    pub amount: usize,
    pub id: u32,
}

/// Specifies how a flow's output should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single opaque instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of opaque instanced objects
/// - `Transparent(Instanced)` renders a single alpha-blended instanced object
/// - `Transparents(Vec<Instanced>)` renders a batch of alpha-blended objects
/// - `GUI(Flat)` renders a 2D element (flat geometry)
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
#[derive(Clone)]
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Transparent(Instanced<'a>),
    Transparents(Vec<Instanced<'a>>),
    GUI(Flat<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Map object IDs to flow IDs for picking and selection.
    ///
    /// Walks the render tree and populates a map of object ID to set of flow
    /// IDs so that a pick result only invokes the flows that own the ID.
    pub(crate) fn map_ids(&self, flow_id: usize, map: &mut HashMap<u32, HashSet<usize>>) {
        match self {
            Render::Default(instanced) | Render::Transparent(instanced) => {
                map.entry(instanced.id)
                    .and_modify(|flows| _ = flows.insert(flow_id))
                    .or_insert([flow_id].into());
            }
            Render::Defaults(vec) | Render::Transparents(vec) => vec.iter().for_each(|instanced| {
                map.entry(instanced.id)
                    .and_modify(|flows| {
                        flows.insert(flow_id);
                    })
                    .or_insert([flow_id].into());
            }),
            Render::GUI(flat) => {
                map.entry(flat.id)
                    .and_modify(|flows| _ = flows.insert(flow_id))
                    .or_insert([flow_id].into());
            }
            Render::Composed(renders) => renders
                .iter()
                .for_each(|render| render.map_ids(flow_id, map)),
            Render::None => (),
        }
    }

    pub(crate) fn set_pipelines(
        self,
        basics: &mut Vec<Instanced<'a>>,
        trans: &mut Vec<Instanced<'a>>,
        guis: &mut Vec<Flat<'a>>,
    ) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Transparent(instanced) => trans.push(instanced),
            Render::Transparents(mut vec) => trans.append(&mut vec),
            Render::GUI(flat) => guis.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(basics, trans, guis)),
            Render::None => (),
        }
    }

    /// Only flat (GUI) objects take part in picking. The 3D artifact is not
    /// clickable, so instanced batches are skipped here.
    pub(crate) fn set_pick_pipelines(self, flats: &mut Vec<Flat<'a>>) {
        match self {
            Render::GUI(flat) => flats.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pick_pipelines(flats)),
            Render::None
            | Render::Default(_)
            | Render::Defaults(_)
            | Render::Transparent(_)
            | Render::Transparents(_) => (),
        }
    }
}

/// Draw the sorted batches with the matching pipelines.
pub(crate) fn draw_batches<'a>(
    ctx: &'a Context,
    render_pass: &mut RenderPass<'a>,
    basics: Vec<Instanced<'a>>,
    trans: Vec<Instanced<'a>>,
    guis: Vec<Flat<'a>>,
) {
    use crate::data_structures::model::DrawModel;

    render_pass.set_pipeline(&ctx.pipelines.basic);
    for instanced in &basics {
        render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
        match u32::try_from(instanced.amount) {
            Err(e) => log::error!(
                "Failed to render object with id {}. Maximum amount of supported instances is {}. Error: {}",
                instanced.id,
                u32::MAX,
                e
            ),
            Ok(amount) => render_pass.draw_model_instanced(
                instanced.model,
                0..amount,
                &ctx.camera.bind_group,
                &ctx.light.bind_group,
            ),
        }
    }

    render_pass.set_pipeline(&ctx.pipelines.transparent);
    for instanced in &trans {
        render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
        match u32::try_from(instanced.amount) {
            Err(e) => log::error!(
                "Failed to render object with id {}. Maximum amount of supported instances is {}. Error: {}",
                instanced.id,
                u32::MAX,
                e
            ),
            Ok(amount) => render_pass.draw_model_instanced(
                instanced.model,
                0..amount,
                &ctx.camera.bind_group,
                &ctx.light.bind_group,
            ),
        }
    }

    render_pass.set_pipeline(&ctx.pipelines.gui);
    for flat in &guis {
        render_pass.set_bind_group(0, flat.group, &[]);
        render_pass.set_vertex_buffer(0, flat.vertex.slice(..));
        render_pass.set_index_buffer(flat.index.slice(..), wgpu::IndexFormat::Uint16);
        match u32::try_from(flat.amount) {
            Err(e) => log::error!(
                "Failed to render flat object with id {}. Maximum amount of supported indices is {}. Error: {}",
                flat.id,
                u32::MAX,
                e
            ),
            Ok(amount) => render_pass.draw_indexed(0..amount, 0, 0..1),
        }
    }
}
