mod animator;
mod outfit;
mod sprite_index;
mod storage;
pub mod types;

pub use animator::Animator;
pub use outfit::*;
pub use sprite_index::{effective_phase, sprite_index};
pub use storage::AppearanceStorage;
pub use types::*;

use std::sync::Arc;

use game_types::FeatureFlags;
use glam::Vec2;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::instance::{Instance, Material, RenderBackend};
use crate::scene::constants::FIELD_SIZE;
use crate::scene::texture_atlas::{CachedSprite, SpriteCache};

/// Collaborators of a draw pass.
pub struct DrawContext<'a> {
    pub sprites: &'a mut dyn SpriteCache,
    pub backend: &'a mut dyn RenderBackend,
}

/// Pattern coordinates of a draw. Negative values select the first pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pattern {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Pattern {
    pub const UNSET: Pattern = Pattern::new(-1, -1, -1);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// State every appearance instance shares: its catalog entry, the active frame
/// group and one animator per frame group that has been animated so far.
#[derive(Debug, Clone)]
pub struct AppearanceBase {
    id: u32,
    kind: Arc<AppearanceType>,
    active_frame_group: usize,
    phase: u32,
    animators: FxHashMap<usize, Animator>,
}

impl AppearanceBase {
    pub fn new(id: u32, kind: Arc<AppearanceType>) -> Self {
        Self {
            id,
            kind,
            active_frame_group: 0,
            phase: 0,
            animators: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn appearance_type(&self) -> &AppearanceType {
        &self.kind
    }

    pub fn frame_group_count(&self) -> usize {
        self.kind.frame_groups.len()
    }

    pub fn active_frame_group_index(&self) -> usize {
        self.active_frame_group
    }

    pub fn active_frame_group(&self) -> &FrameGroup {
        &self.kind.frame_groups[self.active_frame_group]
    }

    pub fn sprite_info(&self) -> &SpriteInfo {
        &self.active_frame_group().sprite_info
    }

    /// Phase cached from the active group's animator at the last update.
    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn animator(&self, frame_group: usize) -> Option<&Animator> {
        self.animators.get(&frame_group)
    }

    pub(crate) fn animator_mut(&mut self, frame_group: usize) -> Option<&mut Animator> {
        self.animators.get_mut(&frame_group)
    }

    pub(crate) fn set_active_frame_group(&mut self, frame_group: usize) {
        debug!(
            "Appearance {} switching frame group {} -> {}",
            self.id, self.active_frame_group, frame_group
        );
        self.active_frame_group = frame_group;
        self.refresh_phase();
    }

    pub(crate) fn refresh_phase(&mut self) {
        self.phase = self
            .animators
            .get(&self.active_frame_group)
            .map(Animator::phase)
            .unwrap_or(0);
    }

    /// Advances the active group's animator, creating it on first use.
    /// Returns whether the animation is still running.
    pub fn animate(&mut self, ticks: u64, delay: u64) -> bool {
        let index = self.active_frame_group;
        let kind = &self.kind;
        let animator = match self.animators.entry(index) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let Some(descriptor) = kind
                    .frame_groups
                    .get(index)
                    .and_then(|group| group.sprite_info.animation.as_ref())
                    .filter(|descriptor| descriptor.phases.len() > 1)
                else {
                    return false;
                };
                entry.insert(Animator::new(descriptor, ticks))
            }
        };

        animator.animate(ticks, delay);
        self.phase = animator.phase();
        !animator.finished()
    }

    /// Switches to another frame group, restarting its animation right away.
    pub fn switch_frame_group(&mut self, frame_group: usize) {
        let frame_group = frame_group.min(self.frame_group_count().saturating_sub(1));
        if frame_group == self.active_frame_group {
            return;
        }

        if let Some(animator) = self.animators.get_mut(&frame_group) {
            animator.reset();
        }
        self.set_active_frame_group(frame_group);
    }

    /// Draws every layer of one pattern with the cached phase.
    pub fn draw_layers(
        &self,
        ctx: &mut DrawContext,
        screen: Vec2,
        zoom: Vec2,
        pattern: Pattern,
        highlight: Option<f32>,
    ) {
        let info = self.sprite_info();
        let index = sprite_index(info, self.phase, pattern.x, pattern.y, pattern.z);
        for layer in 0..info.layers as usize {
            let Some(&sprite_id) = info.sprite_ids.get(index + layer) else {
                continue;
            };
            if let Some(sprite) = ctx.sprites.lookup(sprite_id) {
                self.draw_to(ctx.backend, screen, zoom, &sprite, highlight, Material::Sprite);
            }
        }
    }

    /// Places a sprite so its bottom-right corner lines up with the field at `screen`.
    pub(crate) fn draw_to(
        &self,
        backend: &mut dyn RenderBackend,
        screen: Vec2,
        zoom: Vec2,
        sprite: &CachedSprite,
        highlight: Option<f32>,
        material: Material,
    ) {
        let displacement = Vec2::new(
            self.kind.displacement[0] as f32,
            self.kind.displacement[1] as f32,
        );
        let position = (screen - sprite.size + Vec2::splat(FIELD_SIZE as f32) - displacement) * zoom;

        backend.draw(
            Instance::with_texture_region(
                position,
                sprite.size * zoom,
                sprite.texture,
                sprite.tex_min(),
                sprite.tex_max(),
            )
            .with_highlight(highlight)
            .with_material(material),
        );
    }
}

/// Items, ground and other static things.
#[derive(Debug, Clone)]
pub struct ObjectInstance {
    base: AppearanceBase,
}

impl ObjectInstance {
    pub fn new(id: u32, kind: Arc<AppearanceType>) -> Self {
        Self {
            base: AppearanceBase::new(id, kind),
        }
    }

    pub fn base(&self) -> &AppearanceBase {
        &self.base
    }
}

/// One-shot animations such as spell hits. Nothing is drawn once finished.
#[derive(Debug, Clone)]
pub struct EffectInstance {
    base: AppearanceBase,
    finished: bool,
}

impl EffectInstance {
    pub fn new(id: u32, kind: Arc<AppearanceType>) -> Self {
        Self {
            base: AppearanceBase::new(id, kind),
            finished: false,
        }
    }

    pub fn base(&self) -> &AppearanceBase {
        &self.base
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn animate(&mut self, ticks: u64, delay: u64) -> bool {
        if self.finished {
            return false;
        }
        let running = self.base.animate(ticks, delay);
        self.finished = !running;
        running
    }
}

#[derive(Debug, Clone)]
pub enum Appearance {
    Object(ObjectInstance),
    Outfit(OutfitInstance),
    Effect(EffectInstance),
}

impl Appearance {
    pub fn base(&self) -> &AppearanceBase {
        match self {
            Appearance::Object(object) => &object.base,
            Appearance::Outfit(outfit) => outfit.base(),
            Appearance::Effect(effect) => &effect.base,
        }
    }

    pub fn id(&self) -> u32 {
        self.base().id()
    }

    pub fn as_outfit(&self) -> Option<&OutfitInstance> {
        match self {
            Appearance::Outfit(outfit) => Some(outfit),
            _ => None,
        }
    }

    pub fn as_outfit_mut(&mut self) -> Option<&mut OutfitInstance> {
        match self {
            Appearance::Outfit(outfit) => Some(outfit),
            _ => None,
        }
    }

    pub fn animate(&mut self, ticks: u64, delay: u64) -> bool {
        match self {
            Appearance::Object(object) => object.base.animate(ticks, delay),
            Appearance::Outfit(outfit) => outfit.animate(ticks, delay),
            Appearance::Effect(effect) => effect.animate(ticks, delay),
        }
    }

    pub fn switch_frame_group(
        &mut self,
        ticks: u64,
        frame_group: usize,
        features: &dyn FeatureFlags,
    ) {
        match self {
            Appearance::Object(object) => object.base.switch_frame_group(frame_group),
            Appearance::Outfit(outfit) => outfit.switch_frame_group(ticks, frame_group, features),
            Appearance::Effect(effect) => effect.base.switch_frame_group(frame_group),
        }
    }

    pub fn draw(
        &self,
        ctx: &mut DrawContext,
        screen: Vec2,
        zoom: Vec2,
        pattern: Pattern,
        highlight: Option<f32>,
    ) {
        match self {
            Appearance::Object(object) => {
                object.base.draw_layers(ctx, screen, zoom, pattern, highlight)
            }
            Appearance::Outfit(outfit) => outfit.draw(ctx, screen, zoom, pattern, highlight),
            Appearance::Effect(effect) => {
                if !effect.finished {
                    effect.base.draw_layers(ctx, screen, zoom, pattern, highlight)
                }
            }
        }
    }
}
