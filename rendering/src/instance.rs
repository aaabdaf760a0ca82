use std::ops::Range;

use glam::{Vec2, Vec4};
use num_enum::IntoPrimitive;

use crate::color::Color;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u32)]
pub enum InstanceFlag {
    #[default]
    None = 0,
    Hover = 1,
}

/// Parameters of the outfit colorization pass. The channel texture holds the
/// head/torso/legs/detail mask for the template sprite it is drawn over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutfitMaterial {
    pub head: Color,
    pub torso: Color,
    pub legs: Color,
    pub detail: Color,
    pub channels: TextureId,
    /// Pixel offset of the mask sprite relative to the template sprite.
    pub channels_offset: Vec2,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Material {
    #[default]
    Sprite,
    Outfit(OutfitMaterial),
    Marks,
}

impl Material {
    fn kind(&self) -> u32 {
        match self {
            Material::Sprite => 0,
            Material::Outfit(_) => 1,
            Material::Marks => 2,
        }
    }
}

/// One textured quad. `tex_min`/`tex_max` are normalized texture coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub position: Vec2,
    pub size: Vec2,
    pub texture: TextureId,
    pub tex_min: Vec2,
    pub tex_max: Vec2,
    pub color: Color,
    pub flags: InstanceFlag,
    pub highlight_opacity: f32,
    pub material: Material,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            texture: TextureId::default(),
            tex_min: Vec2::ZERO,
            tex_max: Vec2::ONE,
            color: Color::WHITE,
            flags: InstanceFlag::None,
            highlight_opacity: 0.,
            material: Material::Sprite,
        }
    }
}

impl Instance {
    pub fn with_texture_region(
        position: Vec2,
        size: Vec2,
        texture: TextureId,
        tex_min: Vec2,
        tex_max: Vec2,
    ) -> Self {
        Self {
            position,
            size,
            texture,
            tex_min,
            tex_max,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_highlight(mut self, highlight: Option<f32>) -> Self {
        match highlight {
            Some(opacity) => {
                self.flags = InstanceFlag::Hover;
                self.highlight_opacity = opacity;
            }
            None => {
                self.flags = InstanceFlag::None;
                self.highlight_opacity = 0.;
            }
        }
        self
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let (channels, channels_offset): ([[f32; 4]; 4], [f32; 2]) = match &self.material {
            Material::Outfit(outfit) => (
                [
                    outfit.head.to_vec4().into(),
                    outfit.torso.to_vec4().into(),
                    outfit.legs.to_vec4().into(),
                    outfit.detail.to_vec4().into(),
                ],
                outfit.channels_offset.into(),
            ),
            _ => ([Vec4::ONE.into(); 4], [0.0; 2]),
        };

        InstanceRaw {
            position: self.position.into(),
            size: self.size.into(),
            tex_min: self.tex_min.into(),
            tex_max: self.tex_max.into(),
            color: self.color.to_vec4().into(),
            flags: self.flags.into(),
            highlight_opacity: self.highlight_opacity,
            material: self.material.kind(),
            channels,
            channels_offset,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub tex_min: [f32; 2],
    pub tex_max: [f32; 2],
    pub color: [f32; 4],
    pub flags: u32,
    pub highlight_opacity: f32,
    pub material: u32,
    pub channels: [[f32; 4]; 4],
    pub channels_offset: [f32; 2],
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Instance::default().to_raw()
    }
}

/// Receives the quads produced by a draw pass.
pub trait RenderBackend {
    fn draw(&mut self, instance: Instance);
}

/// Records instances in submission order so they can be uploaded in one go.
#[derive(Debug, Default)]
pub struct InstanceBatch {
    instances: Vec<Instance>,
}

impl InstanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn get_instance(&self, index: usize) -> Option<&Instance> {
        self.instances.get(index)
    }

    pub fn to_raw(&self) -> Vec<InstanceRaw> {
        self.instances.iter().map(Instance::to_raw).collect()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_raw()).to_vec()
    }

    /// Consecutive runs sharing a texture. Each run is one bind + draw call.
    pub fn texture_runs(&self) -> Vec<(TextureId, Range<usize>)> {
        let mut runs: Vec<(TextureId, Range<usize>)> = Vec::new();
        for (index, instance) in self.instances.iter().enumerate() {
            match runs.last_mut() {
                Some((texture, range)) if *texture == instance.texture => range.end = index + 1,
                _ => runs.push((instance.texture, index..index + 1)),
            }
        }
        runs
    }
}

impl RenderBackend for InstanceBatch {
    fn draw(&mut self, instance: Instance) {
        self.instances.push(instance);
    }
}
