use anyhow::Context;
use game_types::{FeatureSet, MarkType};
use glam::Vec2;
use rendering::instance::{InstanceBatch, TextureId};
use rendering::scene::appearances::{
    AppearanceStorage, DrawContext, OutfitInstance, Pattern, WALKING_GROUP,
};
use rendering::scene::constants::{FIELD_SIZE, FRAME_SIZES_COUNT, MARK_THICKNESS_BOLD};
use rendering::scene::marks::{Marks, MarksTexture, MarksView};
use rendering::scene::texture_atlas::SpriteAtlas;
use tracing::{debug, warn};

use crate::settings_types::Settings;

const ATLAS_TEXTURE: TextureId = TextureId(1);
const MARKS_TEXTURE: TextureId = TextureId(2);

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub ticks: u64,
    pub phase: u32,
    pub instances: usize,
    pub draw_calls: usize,
    pub marks: usize,
    pub loaded: usize,
}

/// A single outfit standing on one field with a marks overlay, rendered into
/// an instance batch. Sprites missed during a frame are loaded after it.
pub struct PreviewScene {
    atlas: SpriteAtlas,
    batch: InstanceBatch,
    outfit: OutfitInstance,
    marks_view: MarksView,
    marks_texture: MarksTexture,
    marks: Marks,
    features: FeatureSet,
    direction: i32,
    zoom: Vec2,
    tick_ms: u64,
    ticks: u64,
}

impl PreviewScene {
    pub fn new(settings: &Settings, storage: &AppearanceStorage) -> anyhow::Result<Self> {
        let preview = &settings.preview;
        let outfit = storage
            .create_outfit(
                preview.outfit,
                preview.head,
                preview.torso,
                preview.legs,
                preview.detail,
                preview.addons,
            )
            .with_context(|| format!("outfit {} is not in the catalog", preview.outfit))?;
        let marks_view = MarksView::from_settings(&settings.view.marks)
            .context("invalid marks configuration")?;

        Ok(Self {
            atlas: SpriteAtlas::new(ATLAS_TEXTURE, preview.atlas_size, preview.atlas_size),
            batch: InstanceBatch::new(),
            outfit,
            marks_view,
            marks_texture: MarksTexture {
                texture: MARKS_TEXTURE,
                width: FIELD_SIZE * FRAME_SIZES_COUNT,
                height: FIELD_SIZE * MARK_THICKNESS_BOLD,
            },
            marks: Marks::new(),
            features: settings.view.features.clone(),
            direction: 2,
            zoom: Vec2::splat(settings.view.zoom),
            tick_ms: settings.view.tick_ms,
            ticks: 0,
        })
    }

    pub fn outfit(&self) -> &OutfitInstance {
        &self.outfit
    }

    pub fn outfit_mut(&mut self) -> &mut OutfitInstance {
        &mut self.outfit
    }

    pub fn batch(&self) -> &InstanceBatch {
        &self.batch
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn set_direction(&mut self, direction: i32) {
        self.direction = direction;
    }

    pub fn set_mark(&mut self, mark_type: MarkType, color: u8) {
        self.marks.set_mark(mark_type, color);
    }

    pub fn set_walking(&mut self, walking: bool) {
        let frame_group = if walking { WALKING_GROUP } else { 0 };
        self.outfit
            .switch_frame_group(self.ticks, frame_group, &self.features);
    }

    /// Advances the clock by one tick step, redraws the batch and loads the
    /// sprites that were missing.
    pub fn frame(&mut self) -> FrameStats {
        self.ticks += self.tick_ms;
        self.outfit.animate(self.ticks, 0);

        self.batch.clear();
        let screen = Vec2::splat(FIELD_SIZE as f32);
        self.outfit.draw(
            &mut DrawContext {
                sprites: &mut self.atlas,
                backend: &mut self.batch,
            },
            screen,
            self.zoom,
            Pattern::new(self.direction, 0, 0),
            None,
        );
        let marks = self.marks_view.draw_marks(
            &mut self.batch,
            &self.marks_texture,
            &self.marks,
            screen,
            self.zoom,
        );

        let loaded = self.load_requested();
        let stats = FrameStats {
            ticks: self.ticks,
            phase: self.outfit.phase(),
            instances: self.batch.len(),
            draw_calls: self.batch.texture_runs().len(),
            marks,
            loaded,
        };
        debug!("Frame {:?}", stats);
        stats
    }

    fn load_requested(&mut self) -> usize {
        let mut loaded = 0;
        for sprite_id in self.atlas.take_requests() {
            if self.atlas.insert(sprite_id, FIELD_SIZE, FIELD_SIZE).is_some() {
                loaded += 1;
            } else {
                warn!("Sprite {} not loaded, retrying next frame", sprite_id);
            }
        }
        loaded
    }
}
