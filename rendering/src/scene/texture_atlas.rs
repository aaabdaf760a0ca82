use etagere::Allocation;
use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{error, trace};

use crate::instance::TextureId;

/// A sprite resolved to its place in a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedSprite {
    pub texture: TextureId,
    /// Top-left corner inside the texture, in pixels.
    pub position: Vec2,
    pub size: Vec2,
    pub texture_size: Vec2,
}

impl CachedSprite {
    pub fn tex_min(&self) -> Vec2 {
        self.position / self.texture_size
    }

    pub fn tex_max(&self) -> Vec2 {
        (self.position + self.size) / self.texture_size
    }
}

/// Point lookups of sprite pixel data.
///
/// `None` means the sprite is not available yet. Asking is what gets a sprite
/// loaded, so implementations remember every miss for the loader.
pub trait SpriteCache {
    fn lookup(&mut self, sprite_id: u32) -> Option<CachedSprite>;
}

struct LoadedSprite {
    allocation: Allocation,
    width: u32,
    height: u32,
}

pub struct SpriteAtlas {
    atlas: etagere::AtlasAllocator,
    texture: TextureId,
    size: Vec2,
    loaded: FxHashMap<u32, LoadedSprite>,
    pending: FxHashSet<u32>,
    requests: Vec<u32>,
}

impl SpriteAtlas {
    pub fn new(texture: TextureId, width: u32, height: u32) -> Self {
        Self {
            atlas: etagere::AtlasAllocator::new(etagere::size2(width as i32, height as i32)),
            texture,
            size: Vec2::new(width as f32, height as f32),
            loaded: FxHashMap::default(),
            pending: FxHashSet::default(),
            requests: Vec::new(),
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn is_loaded(&self, sprite_id: u32) -> bool {
        self.loaded.contains_key(&sprite_id)
    }

    pub fn is_pending(&self, sprite_id: u32) -> bool {
        self.pending.contains(&sprite_id)
    }

    /// Hands the queued misses to the loader. Ids stay pending until they are
    /// inserted or dropped, so they are not queued twice.
    pub fn take_requests(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.requests)
    }

    /// Gives up on a request so the next lookup queues it again.
    pub fn drop_request(&mut self, sprite_id: u32) {
        self.pending.remove(&sprite_id);
    }

    pub fn insert(&mut self, sprite_id: u32, width: u32, height: u32) -> Option<CachedSprite> {
        self.pending.remove(&sprite_id);
        self.requests.retain(|id| *id != sprite_id);

        if let Some(sprite) = self.get(sprite_id) {
            return Some(sprite);
        }

        let Some(allocation) = self
            .atlas
            .allocate(etagere::size2(width as i32, height as i32))
        else {
            error!(
                "Sprite atlas full - cannot allocate sprite {} ({}x{})",
                sprite_id, width, height
            );
            return None;
        };

        self.loaded.insert(
            sprite_id,
            LoadedSprite {
                allocation,
                width,
                height,
            },
        );
        self.get(sprite_id)
    }

    pub fn unload(&mut self, sprite_id: u32) {
        if let Some(sprite) = self.loaded.remove(&sprite_id) {
            self.atlas.deallocate(sprite.allocation.id);
        }
    }

    fn get(&self, sprite_id: u32) -> Option<CachedSprite> {
        self.loaded.get(&sprite_id).map(|sprite| CachedSprite {
            texture: self.texture,
            position: Vec2::new(
                sprite.allocation.rectangle.min.x as f32,
                sprite.allocation.rectangle.min.y as f32,
            ),
            size: Vec2::new(sprite.width as f32, sprite.height as f32),
            texture_size: self.size,
        })
    }
}

impl SpriteCache for SpriteAtlas {
    fn lookup(&mut self, sprite_id: u32) -> Option<CachedSprite> {
        let sprite = self.get(sprite_id);
        if sprite.is_none() && self.pending.insert(sprite_id) {
            trace!("Queued sprite {} for loading", sprite_id);
            self.requests.push(sprite_id);
        }
        sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_queues_request_once() {
        let mut atlas = SpriteAtlas::new(TextureId(1), 256, 256);

        assert!(atlas.lookup(7).is_none());
        assert!(atlas.lookup(7).is_none());
        assert!(atlas.is_pending(7));
        assert_eq!(atlas.take_requests(), vec![7]);
        assert!(atlas.take_requests().is_empty());

        // Still in flight, asking again does not queue a duplicate.
        assert!(atlas.lookup(7).is_none());
        assert!(atlas.take_requests().is_empty());
    }

    #[test]
    fn test_insert_then_lookup() {
        let mut atlas = SpriteAtlas::new(TextureId(3), 256, 256);
        atlas.lookup(1);
        let inserted = atlas.insert(1, 32, 64).expect("room in atlas");

        assert!(!atlas.is_pending(1));
        let found = atlas.lookup(1).expect("sprite loaded");
        assert_eq!(found, inserted);
        assert_eq!(found.texture, TextureId(3));
        assert_eq!(found.size, Vec2::new(32., 64.));
        assert!(found.tex_max().x <= 1.0 && found.tex_max().y <= 1.0);
        assert!(atlas.take_requests().is_empty());
    }

    #[test]
    fn test_allocations_do_not_overlap() {
        let mut atlas = SpriteAtlas::new(TextureId(1), 128, 128);
        let a = atlas.insert(1, 64, 64).expect("a");
        let b = atlas.insert(2, 64, 64).expect("b");

        let overlap_x = a.position.x < b.position.x + b.size.x && b.position.x < a.position.x + a.size.x;
        let overlap_y = a.position.y < b.position.y + b.size.y && b.position.y < a.position.y + a.size.y;
        assert!(!(overlap_x && overlap_y));
    }

    #[test]
    fn test_full_atlas_and_unload() {
        let mut atlas = SpriteAtlas::new(TextureId(1), 64, 64);
        assert!(atlas.insert(1, 64, 64).is_some());
        assert!(atlas.insert(2, 64, 64).is_none());

        atlas.unload(1);
        assert!(!atlas.is_loaded(1));
        assert!(atlas.insert(2, 64, 64).is_some());
    }

    #[test]
    fn test_dropped_request_is_queued_again() {
        let mut atlas = SpriteAtlas::new(TextureId(1), 64, 64);
        atlas.lookup(5);
        atlas.take_requests();
        atlas.drop_request(5);

        atlas.lookup(5);
        assert_eq!(atlas.take_requests(), vec![5]);
    }
}
