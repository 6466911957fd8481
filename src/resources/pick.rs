use wgpu::util::DeviceExt;

use crate::pipelines::pick_gui;

/**
 * Each clickable widget gets a uniform holding its ID. The pick pipeline
 * writes that ID into an offscreen R32Uint buffer so a click can be resolved
 * to a widget by reading back a single pixel.
 */
pub fn mk_pick_bind_group(device: &wgpu::Device, id: u32) -> wgpu::BindGroup {
    // Current browsers don't support downscaling Uniform Buffers so I have to provide the full 16B
    let mut buf = [0u8; 16];
    buf[..4].copy_from_slice(&id.to_le_bytes());
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Pick id buffer"),
        contents: bytemuck::cast_slice(&buf),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let layout = pick_gui::mk_bind_group_layout(device);
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("pick_bind_group"),
    })
}
