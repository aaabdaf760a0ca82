use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Which part of the client asked for a mark. Each kind is drawn as its own
/// band when registered with a marks view.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[repr(u8)]
pub enum MarkType {
    #[default]
    None = 0,
    ClientMapWindow = 1,
    ClientBattleList = 2,
    OneSecondTemp = 3,
    Permanent = 4,
}

impl MarkType {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ClientMapWindow => "Map window",
            Self::ClientBattleList => "Battle list",
            Self::OneSecondTemp => "Temporary",
            Self::Permanent => "Permanent",
        }
    }
}
