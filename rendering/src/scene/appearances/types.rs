use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Deserialize;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, IntoPrimitive, TryFromPrimitive,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FrameGroupType {
    Idle = 0,
    Walking = 1,
}

pub const WALKING_GROUP: usize = FrameGroupType::Walking as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearanceCategory {
    Object,
    Outfit,
    Effect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpritePhase {
    pub min_duration: u32,
    pub max_duration: u32,
}

impl SpritePhase {
    pub fn fixed(duration: u32) -> Self {
        Self {
            min_duration: duration,
            max_duration: duration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopType {
    PingPong,
    #[default]
    Infinite,
    /// Plays the phases this many times, then reports finished.
    Counted(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnimationDescriptor {
    pub phases: Vec<SpritePhase>,
    #[serde(default)]
    pub loop_type: LoopType,
    #[serde(default)]
    pub start_phase: u32,
    #[serde(default)]
    pub random_start_phase: bool,
    /// Phase follows the global clock so every instance shows the same frame.
    #[serde(default)]
    pub synchronized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpriteInfo {
    pub phases: u32,
    pub pattern_width: u32,
    pub pattern_height: u32,
    pub pattern_depth: u32,
    pub layers: u32,
    /// Flattened `[phase][z][y][x][layer]` table.
    pub sprite_ids: Vec<u32>,
    #[serde(default)]
    pub animation: Option<AnimationDescriptor>,
}

impl SpriteInfo {
    pub fn sprite_count(&self) -> usize {
        (self.phases
            * self.pattern_depth
            * self.pattern_height
            * self.pattern_width
            * self.layers) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrameGroup {
    pub group_type: FrameGroupType,
    pub sprite_info: SpriteInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppearanceType {
    pub id: u32,
    pub category: AppearanceCategory,
    /// Pixel shift applied up and left when drawing, for sprites taller than a field.
    #[serde(default)]
    pub displacement: [i32; 2],
    pub frame_groups: Vec<FrameGroup>,
}
