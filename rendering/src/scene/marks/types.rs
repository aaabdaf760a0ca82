use std::sync::LazyLock;

use game_types::MarkType;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::color::{Color, EIGHT_BIT_PALETTE_SIZE};
use crate::instance::TextureId;

/// Color codes below this address the 8-bit palette.
pub const MARK_NUM_COLORS: u8 = EIGHT_BIT_PALETTE_SIZE as u8;
pub const MARK_AIM: u8 = MARK_NUM_COLORS;
pub const MARK_AIM_ATTACK: u8 = MARK_NUM_COLORS + 1;
pub const MARK_AIM_FOLLOW: u8 = MARK_NUM_COLORS + 2;
pub const MARK_ATTACK: u8 = MARK_NUM_COLORS + 3;
pub const MARK_FOLLOW: u8 = MARK_NUM_COLORS + 4;
/// First color code past the named colors. Codes from here on are not drawn.
pub const MARKS_NUM_TOTAL: u8 = MARK_NUM_COLORS + 5;
/// Passed to `Marks::set_mark` to remove a mark.
pub const MARK_UNMARKED: u8 = 255;

static FRAME_COLORS: LazyLock<[Color; MARKS_NUM_TOTAL as usize]> = LazyLock::new(|| {
    std::array::from_fn(|code| match code as u8 {
        MARK_AIM => Color::from_rgb(0xFFFFFF),
        MARK_AIM_ATTACK => Color::from_rgb(0xFF8888),
        MARK_AIM_FOLLOW => Color::from_rgb(0x88FF88),
        MARK_ATTACK => Color::from_rgb(0xFF0000),
        MARK_FOLLOW => Color::from_rgb(0x00FF00),
        code => Color::from_8bit(code),
    })
});

/// Tint of a mark color code, `None` for codes past the named colors.
pub fn frame_color(code: u8) -> Option<Color> {
    FRAME_COLORS.get(code as usize).copied()
}

/// The marks currently set on one creature or tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marks {
    colors: FxHashMap<MarkType, u8>,
}

impl Marks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mark(&mut self, mark_type: MarkType, color: u8) {
        if color == MARK_UNMARKED {
            self.clear_mark(mark_type);
        } else {
            self.colors.insert(mark_type, color);
        }
    }

    pub fn clear_mark(&mut self, mark_type: MarkType) {
        self.colors.remove(&mark_type);
    }

    pub fn is_mark_set(&self, mark_type: MarkType) -> bool {
        self.colors.contains_key(&mark_type)
    }

    pub fn mark_color(&self, mark_type: MarkType) -> Option<u8> {
        self.colors.get(&mark_type).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarksErrorKind {
    InvalidArgument,
    OutOfBudget,
}

/// Rejected marks view configuration. The view is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarksError {
    #[error("invalid mark thickness {0}, expected thin or bold")]
    InvalidThickness(u32),
    #[error("marks start size {0} leaves no room in the frame")]
    InvalidStartSize(u32),
    #[error("mark band of thickness {thickness} at offset {offset} exceeds frame budget {budget}")]
    OutOfBudget {
        offset: u32,
        thickness: u32,
        budget: u32,
    },
}

impl MarksError {
    pub fn kind(&self) -> MarksErrorKind {
        match self {
            MarksError::InvalidThickness(_) | MarksError::InvalidStartSize(_) => {
                MarksErrorKind::InvalidArgument
            }
            MarksError::OutOfBudget { .. } => MarksErrorKind::OutOfBudget,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarksViewInformation {
    pub mark_type: MarkType,
    pub mark_thickness: u32,
}

/// Texture holding every frame size for both thicknesses: one column per
/// frame size, bold frames on the first row and thin ones below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarksTexture {
    pub texture: TextureId,
    pub width: u32,
    pub height: u32,
}
