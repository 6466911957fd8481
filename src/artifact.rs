//! GPU-side artifacts: geometry presets uploaded and bound to materials.
//!
//! Every preset is uploaded once at startup. An [`Artifact`] keeps the full
//! catalog of materials resident; switching the displayed texture only
//! re-points the material index of the textured meshes, no buffers or bind
//! groups are touched.

use wgpu::util::DeviceExt;

use crate::{
    catalog::TextureRef,
    data_structures::{
        instance::Instance,
        model::{Material, Mesh, Model},
        texture::Texture,
    },
    preset::{GeometryPreset, MaterialSlot, ShapeKind},
    render::{Instanced, Render},
    resources,
};

/// A model paired with the instance buffer it is drawn with.
#[derive(Debug)]
struct Part {
    model: Model,
    instance_buffer: wgpu::Buffer,
    amount: usize,
}

/// One uploadable, renderable artifact shape.
#[derive(Debug)]
pub struct Artifact {
    pub kind: ShapeKind,
    id: u32,
    opaque: Part,
    glass: Option<Part>,
    /// Mesh indices of `opaque` that follow the catalog selection.
    textured: Vec<usize>,
}

impl Artifact {
    /// Upload `kind`'s preset. `catalog` carries one texture per
    /// [`TextureRef`] in catalog order; `accent` and `glass` are the flat
    /// fills. Texture handles are internally reference counted, sharing them
    /// across artifacts only clones the handle.
    pub fn new(
        kind: ShapeKind,
        catalog: &[Texture],
        accent: &Texture,
        glass: &Texture,
        device: &wgpu::Device,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            catalog.len() == TextureRef::ALL.len(),
            "expected {} catalog textures, got {}",
            TextureRef::ALL.len(),
            catalog.len()
        );

        let layout = resources::texture::diffuse_layout(device);
        let mut materials: Vec<Material> = TextureRef::ALL
            .iter()
            .zip(catalog)
            .map(|(tex_ref, texture)| {
                Material::new(device, tex_ref.file_name(), texture.clone(), &layout)
            })
            .collect();
        let accent_index = materials.len();
        materials.push(Material::new(device, "accent", accent.clone(), &layout));

        let preset = GeometryPreset::of(kind);
        let default_texture = TextureRef::first().index();

        let mut opaque_meshes = Vec::new();
        let mut opaque_instances: Option<Vec<Instance>> = None;
        let mut textured = Vec::new();
        let mut glass_part: Option<Part> = None;

        for part in preset.parts {
            match part.slot {
                MaterialSlot::Texture | MaterialSlot::Accent => {
                    let material = if part.slot == MaterialSlot::Texture {
                        textured.push(opaque_meshes.len());
                        default_texture
                    } else {
                        accent_index
                    };
                    opaque_meshes.push(upload_mesh(device, part.name, &part.mesh, material));
                    if let Some(existing) = &opaque_instances {
                        anyhow::ensure!(
                            existing.len() == part.instances.len(),
                            "opaque parts of `{}` must share one instance set",
                            part.name
                        );
                    } else {
                        opaque_instances = Some(part.instances);
                    }
                }
                MaterialSlot::Glass => {
                    let model = Model {
                        meshes: vec![upload_mesh(device, part.name, &part.mesh, 0)],
                        materials: vec![Material::new(device, "glass", glass.clone(), &layout)],
                    };
                    let amount = part.instances.len();
                    let instance_buffer = upload_instances(device, part.name, &part.instances);
                    glass_part = Some(Part {
                        model,
                        instance_buffer,
                        amount,
                    });
                }
            }
        }

        let opaque_instances = opaque_instances.unwrap_or_else(|| vec![Instance::new()]);
        let opaque = Part {
            amount: opaque_instances.len(),
            instance_buffer: upload_instances(device, "opaque", &opaque_instances),
            model: Model {
                meshes: opaque_meshes,
                materials,
            },
        };

        Ok(Self {
            kind,
            id: kind as u32 + 1,
            opaque,
            glass: glass_part,
            textured,
        })
    }

    /// Re-point the textured meshes at another catalog entry. The unselected
    /// materials stay resident so this is just an index update.
    pub fn set_texture(&mut self, texture: TextureRef) {
        let index = texture.index();
        for &mesh in &self.textured {
            self.opaque.model.meshes[mesh].material = index;
        }
    }

    /// The catalog entry the textured meshes currently point at.
    pub fn texture(&self) -> Option<TextureRef> {
        self.textured
            .first()
            .map(|&mesh| TextureRef::ALL[self.opaque.model.meshes[mesh].material])
    }

    pub fn render(&self) -> Render<'_> {
        let mut renders = vec![Render::Default(Instanced {
            instance: &self.opaque.instance_buffer,
            model: &self.opaque.model,
            amount: self.opaque.amount,
            id: self.id,
        })];
        if let Some(glass) = &self.glass {
            renders.push(Render::Transparent(Instanced {
                instance: &glass.instance_buffer,
                model: &glass.model,
                amount: glass.amount,
                id: self.id,
            }));
        }
        Render::Composed(renders)
    }
}

fn upload_mesh(
    device: &wgpu::Device,
    name: &str,
    mesh: &crate::geometry::MeshData,
    material: usize,
) -> Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", name)),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: mesh.indices.len() as u32,
        material,
    }
}

fn upload_instances(device: &wgpu::Device, name: &str, instances: &[Instance]) -> wgpu::Buffer {
    let raw = instances
        .iter()
        .map(Instance::to_raw)
        .collect::<Vec<_>>();
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Instance Buffer", name)),
        contents: bytemuck::cast_slice(&raw),
        usage: wgpu::BufferUsages::VERTEX,
    })
}
