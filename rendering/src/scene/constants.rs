// Constants shared by the appearance and marks renderers

// Edge length of one map field in pixels
pub const FIELD_SIZE: u32 = 32;

// An animator that advanced within this many ticks keeps playing instead of
// restarting on a frame group change
pub const ANIMATION_DELAY_BEFORE_RESET: u64 = 1000;

// Number of discrete frame sizes packed side by side in the marks texture
pub const FRAME_SIZES_COUNT: u32 = 15;

pub use game_types::{MARK_THICKNESS_BOLD, MARK_THICKNESS_THIN};
