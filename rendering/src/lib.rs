pub mod color;
pub mod instance;
pub mod scene;

pub use color::Color;
pub use instance::{
    Instance, InstanceBatch, InstanceFlag, InstanceRaw, Material, OutfitMaterial, RenderBackend,
    TextureId,
};
