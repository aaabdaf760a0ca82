pub mod appearances;
pub mod constants;
pub mod marks;
pub mod texture_atlas;

pub use appearances::{
    Appearance, AppearanceBase, AppearanceCategory, AppearanceStorage, AppearanceType,
    DrawContext, OutfitInstance, Pattern,
};
pub use constants::*;
pub use marks::{Marks, MarksError, MarksErrorKind, MarksTexture, MarksView};
pub use texture_atlas::{CachedSprite, SpriteAtlas, SpriteCache};
