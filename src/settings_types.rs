pub use game_types::{FeatureSet, GameFeature, MarkBand, MarkType, MarksSettings, ViewSettings};

/// The outfit shown by the preview and the atlas it is loaded into.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PreviewSettings {
    pub outfit: u32,
    pub head: u32,
    pub torso: u32,
    pub legs: u32,
    pub detail: u32,
    pub addons: u32,
    pub atlas_size: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            outfit: 128,
            head: 78,
            torso: 69,
            legs: 58,
            detail: 76,
            addons: 0,
            atlas_size: 2048,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub view: ViewSettings,
    pub preview: PreviewSettings,
}
