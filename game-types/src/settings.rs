use crate::MarkType;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

pub const MARK_THICKNESS_THIN: u32 = 1;
pub const MARK_THICKNESS_BOLD: u32 = 2;

/// Protocol features that change how appearances are animated or drawn.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum GameFeature {
    GameSeparateAnimationGroups = 0,
}

pub trait FeatureFlags {
    fn is_enabled(&self, feature: GameFeature) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(FxHashSet<GameFeature>);

impl FeatureSet {
    pub fn with(features: impl IntoIterator<Item = GameFeature>) -> Self {
        Self(features.into_iter().collect())
    }

    pub fn enable(&mut self, feature: GameFeature) {
        self.0.insert(feature);
    }

    pub fn disable(&mut self, feature: GameFeature) {
        self.0.remove(&feature);
    }
}

impl FeatureFlags for FeatureSet {
    fn is_enabled(&self, feature: GameFeature) -> bool {
        self.0.contains(&feature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkBand {
    pub mark_type: MarkType,
    pub thickness: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarksSettings {
    pub start_size: u32,
    pub bands: Vec<MarkBand>,
}

impl Default for MarksSettings {
    fn default() -> Self {
        // Battle list selection sits inside the map window highlight.
        Self {
            start_size: 0,
            bands: vec![
                MarkBand {
                    mark_type: MarkType::ClientBattleList,
                    thickness: MARK_THICKNESS_THIN,
                },
                MarkBand {
                    mark_type: MarkType::ClientMapWindow,
                    thickness: MARK_THICKNESS_BOLD,
                },
                MarkBand {
                    mark_type: MarkType::OneSecondTemp,
                    thickness: MARK_THICKNESS_THIN,
                },
                MarkBand {
                    mark_type: MarkType::Permanent,
                    thickness: MARK_THICKNESS_THIN,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub features: FeatureSet,
    pub marks: MarksSettings,
    pub tick_ms: u64,
    pub zoom: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            features: FeatureSet::with([GameFeature::GameSeparateAnimationGroups]),
            marks: MarksSettings::default(),
            tick_ms: 50,
            zoom: 1.0,
        }
    }
}
