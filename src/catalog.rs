use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use rendering::scene::appearances::{AppearanceStorage, AppearanceType};
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    appearance: Vec<AppearanceType>,
}

pub fn load_catalog(path: &Path) -> anyhow::Result<AppearanceStorage> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading catalog {:?}", path))?;
    let storage = parse_catalog(&content).with_context(|| format!("loading catalog {:?}", path))?;
    info!("Loaded {} appearances from {:?}", storage.len(), path);
    Ok(storage)
}

/// Parses a TOML catalog of `[[appearance]]` entries. Sprite tables are
/// checked against their dimensions here so drawing can index them freely.
pub fn parse_catalog(content: &str) -> anyhow::Result<AppearanceStorage> {
    let file: CatalogFile = toml::from_str(content)?;

    let mut storage = AppearanceStorage::new();
    for appearance in file.appearance {
        validate(&appearance)
            .with_context(|| format!("{:?} appearance {}", appearance.category, appearance.id))?;
        storage.insert(appearance);
    }
    Ok(storage)
}

fn validate(appearance: &AppearanceType) -> anyhow::Result<()> {
    if appearance.frame_groups.is_empty() {
        bail!("no frame groups");
    }

    for (index, group) in appearance.frame_groups.iter().enumerate() {
        let info = &group.sprite_info;
        if info.phases == 0
            || info.pattern_width == 0
            || info.pattern_height == 0
            || info.pattern_depth == 0
            || info.layers == 0
        {
            bail!("frame group {} has an empty dimension", index);
        }
        if info.sprite_ids.len() != info.sprite_count() {
            bail!(
                "frame group {} lists {} sprites, its dimensions need {}",
                index,
                info.sprite_ids.len(),
                info.sprite_count()
            );
        }
        if let Some(animation) = &info.animation {
            if animation.phases.len() != info.phases as usize {
                bail!(
                    "frame group {} animates {} phases but has {}",
                    index,
                    animation.phases.len(),
                    info.phases
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendering::scene::appearances::{AppearanceCategory, FrameGroupType, LoopType};

    const OUTFIT: &str = r#"
        [[appearance]]
        id = 5
        category = "outfit"
        displacement = [8, 8]

        [[appearance.frame_groups]]
        group_type = "idle"
        [appearance.frame_groups.sprite_info]
        phases = 1
        pattern_width = 2
        pattern_height = 1
        pattern_depth = 1
        layers = 2
        sprite_ids = [1, 2, 3, 4]

        [[appearance.frame_groups]]
        group_type = "walking"
        [appearance.frame_groups.sprite_info]
        phases = 2
        pattern_width = 1
        pattern_height = 1
        pattern_depth = 1
        layers = 1
        sprite_ids = [10, 11]
        [appearance.frame_groups.sprite_info.animation]
        loop_type = "ping_pong"
        phases = [
            { min_duration = 100, max_duration = 100 },
            { min_duration = 50, max_duration = 150 },
        ]
    "#;

    #[test]
    fn test_parse_outfit() {
        let storage = parse_catalog(OUTFIT).unwrap();
        let outfit = storage.get(AppearanceCategory::Outfit, 5).unwrap();

        assert_eq!(outfit.displacement, [8, 8]);
        assert_eq!(outfit.frame_groups.len(), 2);
        assert_eq!(outfit.frame_groups[1].group_type, FrameGroupType::Walking);
        let animation = outfit.frame_groups[1].sprite_info.animation.as_ref().unwrap();
        assert_eq!(animation.loop_type, LoopType::PingPong);
        assert_eq!(animation.phases[1].max_duration, 150);
        assert!(!animation.synchronized);
    }

    #[test]
    fn test_sprite_table_must_match_dimensions() {
        let broken = OUTFIT.replace("sprite_ids = [1, 2, 3, 4]", "sprite_ids = [1, 2, 3]");
        let error = parse_catalog(&broken).unwrap_err();
        assert_eq!(
            format!("{:#}", error),
            "Outfit appearance 5: frame group 0 lists 3 sprites, its dimensions need 4"
        );
    }

    #[test]
    fn test_empty_catalog() {
        assert!(parse_catalog("").unwrap().is_empty());
    }
}
