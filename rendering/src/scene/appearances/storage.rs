use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::warn;

use super::{
    Appearance, AppearanceCategory, AppearanceType, EffectInstance, ObjectInstance,
    OutfitInstance,
};

/// Catalog of appearance types, keyed by category and id.
#[derive(Debug, Default)]
pub struct AppearanceStorage {
    objects: FxHashMap<u32, Arc<AppearanceType>>,
    outfits: FxHashMap<u32, Arc<AppearanceType>>,
    effects: FxHashMap<u32, Arc<AppearanceType>>,
}

impl AppearanceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn category(&self, category: AppearanceCategory) -> &FxHashMap<u32, Arc<AppearanceType>> {
        match category {
            AppearanceCategory::Object => &self.objects,
            AppearanceCategory::Outfit => &self.outfits,
            AppearanceCategory::Effect => &self.effects,
        }
    }

    /// Adds a type, replacing any previous type with the same category and id.
    pub fn insert(&mut self, appearance: AppearanceType) {
        if appearance.frame_groups.is_empty() {
            warn!(
                "Ignoring {:?} appearance {} without frame groups",
                appearance.category, appearance.id
            );
            return;
        }

        let map = match appearance.category {
            AppearanceCategory::Object => &mut self.objects,
            AppearanceCategory::Outfit => &mut self.outfits,
            AppearanceCategory::Effect => &mut self.effects,
        };
        map.insert(appearance.id, Arc::new(appearance));
    }

    pub fn get(&self, category: AppearanceCategory, id: u32) -> Option<Arc<AppearanceType>> {
        self.category(category).get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.len() + self.outfits.len() + self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn create_outfit(
        &self,
        id: u32,
        head: u32,
        torso: u32,
        legs: u32,
        detail: u32,
        addons: u32,
    ) -> Option<OutfitInstance> {
        let kind = self.get(AppearanceCategory::Outfit, id)?;
        Some(OutfitInstance::new(id, kind, head, torso, legs, detail, addons))
    }

    /// Builds the instance variant matching the category, with default tints
    /// for outfits.
    pub fn create_instance(&self, category: AppearanceCategory, id: u32) -> Option<Appearance> {
        let kind = self.get(category, id)?;
        Some(match category {
            AppearanceCategory::Object => Appearance::Object(ObjectInstance::new(id, kind)),
            AppearanceCategory::Outfit => {
                Appearance::Outfit(OutfitInstance::new(id, kind, 0, 0, 0, 0, 0))
            }
            AppearanceCategory::Effect => Appearance::Effect(EffectInstance::new(id, kind)),
        })
    }
}
