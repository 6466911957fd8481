//! Widget picking.
//!
//! Clicks on the selector are resolved with GPU-based picking: every GUI quad
//! is drawn to an offscreen texture with its unique ID as the fragment output,
//! then the pixel under the mouse cursor is read back to determine which
//! widget was clicked.
//!
//! The picking pass works as follows:
//! 1. Render all GUI quads to an offscreen R32Uint texture, each writing its ID
//! 2. Read the pixel at the mouse cursor position (scaled according to platform limitations on texture sizes)
//! 3. Map the pick ID back to the flow that owns the widget (determined by the render tree)
//! 4. Return the picked ID and owning flows
//!
//! Especially step 4 makes sure that only those flows are invoked that were responsible for the picked widget.

use std::{
    collections::{HashMap, HashSet},
    iter,
};

use crate::{
    context::{Context, MouseState},
    flow::ViewerFlow,
    render::Flat,
    resources::pick::mk_pick_bind_group,
};

#[cfg(target_arch = "wasm32")]
use crate::flow::FlowEvent;

/// Render all flows to the pick texture and determine which widget was clicked.
///
/// # Arguments
///
/// * `async_runtime` using the tokio runtime for the buffer readback if not on WASM
/// * `flows` represent all active viewer flows with their renderable objects
/// * `ctx` is the rendering context
/// * `mouse_state` is required for getting the mouse coordinates at the time of picking
/// * `proxy` WASM futures can only resolve using the winit event loop proxy by sending events
///
/// # Returns
///
/// `Some((pick_id, flow_ids))` if a widget was picked, or `None` when picking resolves via the event loop.
pub fn draw_to_pick_buffer<State>(
    #[cfg(not(target_arch = "wasm32"))] async_runtime: &tokio::runtime::Runtime,
    flows: &mut Vec<Box<dyn ViewerFlow<State>>>,
    ctx: &Context,
    mouse_state: &MouseState,
    #[cfg(target_arch = "wasm32")] proxy: winit::event_loop::EventLoopProxy<
        crate::flow::FlowEvent<State>,
    >,
) -> Option<(u32, HashSet<usize>)> {
    let u32_size = std::mem::size_of::<u32>() as u32;
    // Readback rows must be 256-byte aligned...
    let width = ctx.config.width;
    let height = ctx.config.height;
    let width_offset = 256 - (width % 256);
    let height_offset = 256 - (height % 256);
    let width_factor = (f64::from(width) + f64::from(width_offset)) / f64::from(width);
    let height_factor = (f64::from(height) + f64::from(height_offset)) / f64::from(height);
    let width = width + width_offset;
    let height = height + height_offset;

    let extent3d = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let pick_texture = &ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Pick texture"),
        size: extent3d,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R32Uint,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let pick_depth_texture = &ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Pick depth texture"),
        size: extent3d,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth24Plus,
        usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Pick Encoder"),
        });
    let mut translation: HashMap<u32, HashSet<usize>> = HashMap::new();

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Pick Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &pick_texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("Render texture"),
                    format: Some(wgpu::TextureFormat::R32Uint),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    usage: None,
                    aspect: wgpu::TextureAspect::All,
                    base_mip_level: 0,
                    mip_level_count: None,
                    base_array_layer: 0,
                    array_layer_count: None,
                }),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &pick_depth_texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("Stencil texture"),
                    format: Some(wgpu::TextureFormat::Depth24Plus),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    usage: None,
                    aspect: wgpu::TextureAspect::All,
                    base_mip_level: 0,
                    mip_level_count: None,
                    base_array_layer: 0,
                    array_layer_count: None,
                }),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let mut flats: Vec<Flat> = Vec::new();
        /*
           Flows handle pick IDs internally. We store the correspondance of the
           flow index and the widget picked so that each flow only gets invoked
           if one of the IDs it manages was picked.
        */
        flows.iter().enumerate().for_each(|(idx, flow)| {
            let render = flow.on_render();
            render.map_ids(idx, &mut translation);
            render.set_pick_pipelines(&mut flats);
        });

        render_pass.set_pipeline(&ctx.pipelines.flat_pick);
        for flat in flats {
            let pick_group = mk_pick_bind_group(&ctx.device, flat.id);
            render_pass.set_bind_group(0, &pick_group, &[]);
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

    let output_buffer_size = (u32_size * width * height) as wgpu::BufferAddress;
    let output_buffer_desc = wgpu::BufferDescriptor {
        size: output_buffer_size,
        usage: wgpu::BufferUsages::COPY_DST
                    // this tells wpgu that we want to read this buffer from the cpu
                    | wgpu::BufferUsages::MAP_READ,
        label: None,
        mapped_at_creation: false,
    };
    let output_buffer = ctx.device.create_buffer(&output_buffer_desc);

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: pick_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(u32_size * width),
                rows_per_image: Some(height),
            },
        },
        extent3d,
    );

    ctx.queue.submit(iter::once(encoder.finish()));
    let binding = ctx.device.clone();
    let mouse_coords = mouse_state.coords.clone();
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(async move {
        let buffer_slice = output_buffer.slice(..);
        let future_id =
            read_texture_buffer(buffer_slice, &binding, width_factor, height_factor, width, mouse_coords);
        let id = future_id.await;
        if let Some(id) = id {
            if let Some(flow_ids) = translation.get(&id) {
                if proxy
                    .send_event(FlowEvent::Id((id, flow_ids.clone())))
                    .is_err()
                {
                    log::error!("Event loop closed before pick result could be delivered");
                }
                output_buffer.unmap();
            }
        }
    });
    #[cfg(target_arch = "wasm32")]
    return None;
    #[cfg(not(target_arch = "wasm32"))]
    {
        let buffer_slice = output_buffer.slice(..);
        let future_id =
            read_texture_buffer(buffer_slice, &binding, width_factor, height_factor, width, mouse_coords);
        // Depending on the average timing this should not block for long
        let id = async_runtime.block_on(future_id)?;
        translation.get(&id).map(|flow_ids| (id, flow_ids.clone()))
    }
}

async fn read_texture_buffer(
    buffer_slice: wgpu::BufferSlice<'_>,
    device: &wgpu::Device,
    width_factor: f64,
    height_factor: f64,
    width: u32,
    mouse_coords: winit::dpi::PhysicalPosition<f64>,
) -> Option<u32> {
    // NOTE: We have to create the mapping THEN device.poll() before awaiting
    // the future. Otherwise the application will freeze.
    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        if tx.send(result).is_err() {
            log::error!("Pick readback receiver dropped");
        }
    });
    #[cfg(target_arch = "wasm32")]
    let poll = device.poll(wgpu::PollType::Poll);
    #[cfg(not(target_arch = "wasm32"))]
    let poll = device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: None,
    });
    if let Err(e) = poll {
        log::error!("Device poll failed during pick readback: {:?}", e);
        return None;
    }
    match rx.receive().await {
        Some(Ok(())) => (),
        _ => {
            log::error!("Mapping the pick buffer failed");
            return None;
        }
    }

    let data = buffer_slice.get_mapped_range();
    let x = mouse_coords.x * width_factor;
    let y = mouse_coords.y * height_factor;
    let bytes_per_pixel = 4;
    let pick_index = (y as usize * width as usize + x as usize) * bytes_per_pixel;
    if pick_index + 4 > data.len() {
        log::warn!("Pick coordinates outside the readback buffer");
        return None;
    }
    let id = u32::from_le_bytes([
        data[pick_index],
        data[pick_index + 1],
        data[pick_index + 2],
        data[pick_index + 3],
    ]);

    log::info!("Picked widget with id {}", id);
    Some(id)
}
