use std::sync::Arc;

use game_types::{FeatureFlags, GameFeature};
use glam::Vec2;
use tracing::{debug, trace};

use super::{AppearanceBase, AppearanceType, DrawContext, Pattern, WALKING_GROUP};
use super::sprite_index::{effective_phase, sprite_index};
use crate::color::Color;
use crate::instance::{Material, OutfitMaterial};
use crate::scene::constants::ANIMATION_DELAY_BEFORE_RESET;

/// Outfit id the server sends for creatures that should not be drawn.
pub const OUTFIT_INVISIBLE_ID: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tint {
    hsi: u32,
    color: Color,
}

impl Tint {
    fn new(hsi: u32) -> Self {
        Self {
            hsi,
            color: Color::from_hsi(hsi),
        }
    }

    /// Returns true when the derived color had to be recomputed.
    fn update(&mut self, hsi: u32) -> bool {
        if self.hsi == hsi {
            return false;
        }
        *self = Tint::new(hsi);
        true
    }
}

/// A creature outfit: an appearance whose second sprite layer is a color mask
/// tinted with four customizable colors, plus add-on pattern rows.
#[derive(Debug, Clone)]
pub struct OutfitInstance {
    base: AppearanceBase,
    head: Tint,
    torso: Tint,
    legs: Tint,
    detail: Tint,
    addons: u32,
    walking: bool,
    color_updates: usize,
}

impl OutfitInstance {
    pub fn new(
        id: u32,
        kind: Arc<AppearanceType>,
        head: u32,
        torso: u32,
        legs: u32,
        detail: u32,
        addons: u32,
    ) -> Self {
        Self {
            base: AppearanceBase::new(id, kind),
            head: Tint::new(head),
            torso: Tint::new(torso),
            legs: Tint::new(legs),
            detail: Tint::new(detail),
            addons,
            walking: false,
            color_updates: 0,
        }
    }

    pub fn base(&self) -> &AppearanceBase {
        &self.base
    }

    pub fn head(&self) -> u32 {
        self.head.hsi
    }

    pub fn torso(&self) -> u32 {
        self.torso.hsi
    }

    pub fn legs(&self) -> u32 {
        self.legs.hsi
    }

    pub fn detail(&self) -> u32 {
        self.detail.hsi
    }

    pub fn addons(&self) -> u32 {
        self.addons
    }

    pub fn head_color(&self) -> Color {
        self.head.color
    }

    pub fn torso_color(&self) -> Color {
        self.torso.color
    }

    pub fn legs_color(&self) -> Color {
        self.legs.color
    }

    pub fn detail_color(&self) -> Color {
        self.detail.color
    }

    pub fn phase(&self) -> u32 {
        self.base.phase()
    }

    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// How many tint colors have been recomputed by `update_properties`.
    pub fn color_updates(&self) -> usize {
        self.color_updates
    }

    pub fn update_properties(&mut self, head: u32, torso: u32, legs: u32, detail: u32, addons: u32) {
        let updated = [
            self.head.update(head),
            self.torso.update(torso),
            self.legs.update(legs),
            self.detail.update(detail),
        ];
        self.color_updates += updated.iter().filter(|changed| **changed).count();
        self.addons = addons;
    }

    pub fn get_sprite_index(
        &self,
        phase: Option<u32>,
        pattern_x: i32,
        pattern_y: i32,
        pattern_z: i32,
    ) -> usize {
        sprite_index(
            self.base.sprite_info(),
            effective_phase(phase, self.base.phase()),
            pattern_x,
            pattern_y,
            pattern_z,
        )
    }

    pub fn switch_frame_group(
        &mut self,
        ticks: u64,
        frame_group: usize,
        features: &dyn FeatureFlags,
    ) {
        let was_walking = self.walking;
        self.walking = frame_group == WALKING_GROUP;

        let mut update_animator = false;
        let mut force_update = false;
        if features.is_enabled(GameFeature::GameSeparateAnimationGroups) {
            let frame_group = frame_group.min(self.base.frame_group_count().saturating_sub(1));
            if frame_group != self.base.active_frame_group_index() {
                self.base.set_active_frame_group(frame_group);
                update_animator = true;
                // Walking restarts on its own timing so a step is not cut short.
                force_update = !self.walking;
            }
        } else if self.walking != was_walking {
            update_animator = true;
            force_update = true;
        }

        if update_animator {
            let id = self.base.id();
            let active = self.base.active_frame_group_index();
            if let Some(animator) = self.base.animator_mut(active) {
                if force_update
                    || animator.last_animation_tick() + ANIMATION_DELAY_BEFORE_RESET < ticks
                {
                    debug!("Resetting outfit {} animator for group {}", id, active);
                    animator.reset();
                }
            }
            self.base.refresh_phase();
        }
    }

    pub fn animate(&mut self, ticks: u64, delay: u64) -> bool {
        self.base.animate(ticks, delay)
    }

    pub fn draw(
        &self,
        ctx: &mut DrawContext,
        screen: Vec2,
        zoom: Vec2,
        pattern: Pattern,
        highlight: Option<f32>,
    ) {
        let info = self.base.sprite_info();

        // Only a template plus color mask pair is colorized.
        if info.layers != 2 {
            let index = self.get_sprite_index(None, pattern.x, pattern.y, pattern.z);
            let sprite = info
                .sprite_ids
                .get(index)
                .and_then(|sprite_id| ctx.sprites.lookup(*sprite_id));
            if let Some(sprite) = sprite {
                self.base
                    .draw_to(ctx.backend, screen, zoom, &sprite, highlight, Material::Sprite);
            }
            return;
        }

        for pattern_y in 0..info.pattern_height as i32 {
            if pattern_y > 0 && !self.has_addon(pattern_y as u32 - 1) {
                continue;
            }

            let index = self.get_sprite_index(None, pattern.x, pattern_y, pattern.z);
            let (Some(&base_id), Some(&channels_id)) =
                (info.sprite_ids.get(index), info.sprite_ids.get(index + 1))
            else {
                continue;
            };

            // Both are asked for even if the first misses, so both get loaded.
            let base_sprite = ctx.sprites.lookup(base_id);
            let channels_sprite = ctx.sprites.lookup(channels_id);
            let (Some(base_sprite), Some(channels_sprite)) = (base_sprite, channels_sprite) else {
                trace!(
                    "Outfit {} row {} waiting for sprites {}/{}",
                    self.base.id(),
                    pattern_y,
                    base_id,
                    channels_id
                );
                continue;
            };

            let material = OutfitMaterial {
                head: self.head.color,
                torso: self.torso.color,
                legs: self.legs.color,
                detail: self.detail.color,
                channels: channels_sprite.texture,
                channels_offset: channels_sprite.position - base_sprite.position,
            };

            self.base.draw_to(
                ctx.backend,
                screen,
                zoom,
                &base_sprite,
                highlight,
                Material::Sprite,
            );
            self.base.draw_to(
                ctx.backend,
                screen,
                zoom,
                &base_sprite,
                highlight,
                Material::Outfit(material),
            );
        }
    }

    fn has_addon(&self, bit: u32) -> bool {
        self.addons.checked_shr(bit).unwrap_or(0) & 1 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{AppearanceCategory, FrameGroupType};
    use super::*;
    use crate::instance::{InstanceBatch, TextureId};
    use game_types::FeatureSet;

    fn colorized_outfit(addons: u32) -> OutfitInstance {
        // 4 directions, base row + 3 add-on rows, template + mask layers
        let kind = appearance(
            AppearanceCategory::Outfit,
            vec![
                group(FrameGroupType::Idle, 1, 4, 4, 2, 100),
                group(FrameGroupType::Walking, 4, 4, 4, 2, 1000),
            ],
        );
        OutfitInstance::new(1, kind, 0, 0, 0, 0, addons)
    }

    fn draw(outfit: &OutfitInstance, cache: &mut FakeCache, pattern: Pattern) -> InstanceBatch {
        let mut batch = InstanceBatch::new();
        outfit.draw(
            &mut DrawContext {
                sprites: cache,
                backend: &mut batch,
            },
            Vec2::new(32., 32.),
            Vec2::ONE,
            pattern,
            None,
        );
        batch
    }

    #[test]
    fn test_update_properties_only_recomputes_changes() {
        let mut outfit = colorized_outfit(0);

        outfit.update_properties(10, 20, 30, 40, 1);
        assert_eq!(outfit.color_updates(), 4);
        let colors = [
            outfit.head_color(),
            outfit.torso_color(),
            outfit.legs_color(),
            outfit.detail_color(),
        ];

        outfit.update_properties(10, 20, 30, 40, 1);
        assert_eq!(outfit.color_updates(), 4);
        assert_eq!(
            colors,
            [
                outfit.head_color(),
                outfit.torso_color(),
                outfit.legs_color(),
                outfit.detail_color(),
            ]
        );

        outfit.update_properties(10, 21, 30, 40, 3);
        assert_eq!(outfit.color_updates(), 5);
        assert_eq!(outfit.torso(), 21);
        assert_eq!(outfit.torso_color(), Color::from_hsi(21));
        assert_eq!(outfit.addons(), 3);
    }

    #[test]
    fn test_derived_colors_match_initial_values() {
        let kind = appearance(
            AppearanceCategory::Outfit,
            vec![group(FrameGroupType::Idle, 1, 4, 1, 2, 100)],
        );
        let outfit = OutfitInstance::new(1, kind, 78, 69, 58, 76, 0);

        assert_eq!(outfit.head_color(), Color::from_hsi(78));
        assert_eq!(outfit.torso_color(), Color::from_hsi(69));
        assert_eq!(outfit.legs_color(), Color::from_hsi(58));
        assert_eq!(outfit.detail_color(), Color::from_hsi(76));
        assert_eq!(outfit.color_updates(), 0);
    }

    #[test]
    fn test_addon_mask_selects_rows() {
        let outfit = colorized_outfit(0b101);
        let mut cache = FakeCache::default();
        let batch = draw(&outfit, &mut cache, Pattern::new(2, 0, 0));

        // Rows 0, 1 and 3; each row asks for template and mask.
        let expected_rows: Vec<u32> = [0, 1, 3]
            .iter()
            .flat_map(|row| {
                let base = 100 + ((row * 4 + 2) * 2) as u32;
                [base, base + 1]
            })
            .collect();
        assert_eq!(cache.asked, expected_rows);
        assert_eq!(batch.len(), 6);
    }

    #[test]
    fn test_each_row_draws_template_then_colorized() {
        let mut outfit = colorized_outfit(0);
        outfit.update_properties(0, 0, 0, 114, 0);
        let mut cache = FakeCache::default();
        let batch = draw(&outfit, &mut cache, Pattern::new(0, 0, 0));

        assert_eq!(batch.len(), 2);
        let plain = &batch.instances()[0];
        let colorized = &batch.instances()[1];
        assert_eq!(plain.material, Material::Sprite);
        assert_eq!(plain.texture, TextureId(1));
        assert_eq!(colorized.position, plain.position);
        assert_eq!(colorized.tex_min, plain.tex_min);

        let Material::Outfit(material) = colorized.material else {
            panic!("expected outfit material, got {:?}", colorized.material);
        };
        assert_eq!(material.head, Color::WHITE);
        assert_eq!(material.detail, Color::from_hsi(114));
        assert_eq!(material.channels, TextureId(1));
        // Sprite 101 sits one 32px slot right of sprite 100.
        assert_eq!(material.channels_offset, Vec2::new(32., 0.));
    }

    #[test]
    fn test_pending_row_is_skipped_but_later_rows_draw() {
        let outfit = colorized_outfit(0b111);
        let mut cache = FakeCache::default();
        // Mask of row 1
        cache.pending.insert(100 + (4 * 2) + 1);
        let batch = draw(&outfit, &mut cache, Pattern::new(0, 0, 0));

        // Every row was asked for, including both sprites of the pending row.
        assert_eq!(cache.asked.len(), 8);
        assert!(cache.asked.contains(&(100 + 8)));
        assert!(cache.asked.contains(&(100 + 9)));
        // Rows 0, 2 and 3 drew.
        assert_eq!(batch.len(), 6);
    }

    #[test]
    fn test_pending_template_still_asks_for_mask() {
        let outfit = colorized_outfit(0);
        let mut cache = FakeCache::default();
        cache.pending.insert(100);
        let batch = draw(&outfit, &mut cache, Pattern::new(0, 0, 0));

        assert_eq!(cache.asked, vec![100, 101]);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_single_layer_outfit() {
        let kind = appearance(
            AppearanceCategory::Outfit,
            vec![group(FrameGroupType::Idle, 1, 4, 1, 1, 100)],
        );
        let outfit = OutfitInstance::new(1, kind, 0, 0, 0, 0, 0);
        let mut cache = FakeCache::default();
        let batch = draw(&outfit, &mut cache, Pattern::new(3, 0, 0));
        assert_eq!(cache.asked, vec![103]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.instances()[0].material, Material::Sprite);

        cache.pending.insert(103);
        let batch = draw(&outfit, &mut cache, Pattern::new(3, 0, 0));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_three_layer_outfit_is_not_colorized() {
        let kind = appearance(
            AppearanceCategory::Outfit,
            vec![group(FrameGroupType::Idle, 1, 4, 1, 3, 100)],
        );
        let outfit = OutfitInstance::new(1, kind, 0, 0, 0, 0, 0);
        let mut cache = FakeCache::default();
        let batch = draw(&outfit, &mut cache, Pattern::new(0, 0, 0));

        assert_eq!(cache.asked, vec![100]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.instances()[0].material, Material::Sprite);
    }

    #[test]
    fn test_walking_toggle_resets_animator() {
        let kind = appearance(
            AppearanceCategory::Outfit,
            vec![
                group(FrameGroupType::Idle, 1, 4, 1, 2, 100),
                group(FrameGroupType::Walking, 3, 4, 1, 2, 1000),
            ],
        );
        let mut outfit = OutfitInstance::new(42, kind, 0, 0, 0, 0, 0);
        let features = FeatureSet::default();

        outfit.switch_frame_group(0, WALKING_GROUP, &features);
        outfit.animate(0, 0);
        outfit.switch_frame_group(10, 0, &features);
        assert_eq!(outfit.base().id(), 42);
        assert!(!outfit.is_walking());
        assert_eq!(outfit.phase(), 0);
    }

    #[test]
    fn test_sprite_index_uses_cached_phase() {
        let mut outfit = colorized_outfit(0);
        let features = FeatureSet::with([GameFeature::GameSeparateAnimationGroups]);
        outfit.switch_frame_group(0, WALKING_GROUP, &features);
        outfit.animate(0, 0);
        outfit.animate(100, 0);
        outfit.animate(200, 0);
        assert_eq!(outfit.phase(), 2);

        assert_eq!(
            outfit.get_sprite_index(None, 0, 0, 0),
            outfit.get_sprite_index(Some(2), 0, 0, 0)
        );
        assert_eq!(outfit.get_sprite_index(Some(0), 1, 0, 0), 2);
        assert_eq!(outfit.get_sprite_index(Some(1), 0, 0, 0), 4 * 4 * 2);
    }

    #[test]
    fn test_separate_groups_switch_and_clamp() {
        let mut outfit = colorized_outfit(0);
        let features = FeatureSet::with([GameFeature::GameSeparateAnimationGroups]);

        outfit.switch_frame_group(0, WALKING_GROUP, &features);
        assert!(outfit.is_walking());
        assert_eq!(outfit.base().active_frame_group_index(), 1);

        // Only two groups, larger indices clamp to the last one.
        outfit.switch_frame_group(0, 7, &features);
        assert!(!outfit.is_walking());
        assert_eq!(outfit.base().active_frame_group_index(), 1);

        outfit.switch_frame_group(0, 0, &features);
        assert_eq!(outfit.base().active_frame_group_index(), 0);
    }

    #[test]
    fn test_walking_resets_only_after_grace_window() {
        let mut outfit = colorized_outfit(0);
        let features = FeatureSet::with([GameFeature::GameSeparateAnimationGroups]);

        outfit.switch_frame_group(0, WALKING_GROUP, &features);
        outfit.animate(0, 0);
        outfit.animate(100, 0);
        assert_eq!(outfit.phase(), 1);

        // Back to idle and straight into walking again within the window.
        outfit.switch_frame_group(150, 0, &features);
        outfit.switch_frame_group(200, WALKING_GROUP, &features);
        assert_eq!(outfit.phase(), 1);

        // Long after the walking animator last advanced.
        outfit.switch_frame_group(300, 0, &features);
        outfit.switch_frame_group(100 + ANIMATION_DELAY_BEFORE_RESET + 1, WALKING_GROUP, &features);
        assert_eq!(outfit.phase(), 0);
    }

    #[test]
    fn test_idle_switch_is_forced() {
        let kind = appearance(
            AppearanceCategory::Outfit,
            vec![
                group(FrameGroupType::Idle, 3, 4, 1, 2, 100),
                group(FrameGroupType::Walking, 4, 4, 1, 2, 1000),
            ],
        );
        let mut outfit = OutfitInstance::new(1, kind, 0, 0, 0, 0, 0);
        let features = FeatureSet::with([GameFeature::GameSeparateAnimationGroups]);

        outfit.animate(0, 0);
        outfit.animate(100, 0);
        assert_eq!(outfit.phase(), 1);

        outfit.switch_frame_group(110, WALKING_GROUP, &features);
        outfit.switch_frame_group(120, 0, &features);
        assert_eq!(outfit.phase(), 0);
        assert_eq!(outfit.base().animator(0).map(|a| a.phase()), Some(0));
    }

    #[test]
    fn test_without_separate_groups_walking_change_always_resets() {
        let kind = appearance(
            AppearanceCategory::Outfit,
            vec![group(FrameGroupType::Idle, 4, 4, 1, 2, 100)],
        );
        let mut outfit = OutfitInstance::new(1, kind, 0, 0, 0, 0, 0);
        let features = FeatureSet::default();

        outfit.switch_frame_group(0, WALKING_GROUP, &features);
        assert!(outfit.is_walking());
        assert_eq!(outfit.base().active_frame_group_index(), 0);
        outfit.animate(0, 0);
        outfit.animate(100, 0);
        outfit.animate(200, 0);
        assert_eq!(outfit.phase(), 2);

        // Walking -> idle well inside the grace window.
        outfit.switch_frame_group(210, 0, &features);
        assert!(!outfit.is_walking());
        assert_eq!(outfit.phase(), 0);
        assert_eq!(outfit.base().animator(0).map(|a| a.phase()), Some(0));
    }

    #[test]
    fn test_without_separate_groups_same_state_keeps_phase() {
        let kind = appearance(
            AppearanceCategory::Outfit,
            vec![group(FrameGroupType::Idle, 4, 4, 1, 2, 100)],
        );
        let mut outfit = OutfitInstance::new(1, kind, 0, 0, 0, 0, 0);
        let features = FeatureSet::default();

        outfit.animate(0, 0);
        outfit.animate(100, 0);
        outfit.switch_frame_group(5000, 0, &features);
        assert_eq!(outfit.phase(), 1);
    }

    #[test]
    fn test_animate_without_animation_returns_false() {
        let mut outfit = colorized_outfit(0);
        assert!(!outfit.animate(100, 0));
        assert_eq!(outfit.phase(), 0);
    }
}
