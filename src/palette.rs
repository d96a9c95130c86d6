use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Items that can be dragged from the toolbox onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteItem {
    #[serde(rename = "noxBlock")]
    Block,
    #[serde(rename = "noxRouter")]
    Router,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("drop payload is empty")]
    Empty,

    #[error("unknown palette item `{0}`")]
    Unknown(String),
}

impl PaletteItem {
    pub const ALL: [PaletteItem; 2] = [Self::Block, Self::Router];

    /// Drag payload carried by the item.
    pub fn key(self) -> &'static str {
        match self {
            Self::Block => "noxBlock",
            Self::Router => "noxRouter",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Block => "Nox Block",
            Self::Router => "Router",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Block => "Nested Entity",
            Self::Router => "Relation Junction",
        }
    }
}

impl FromStr for PaletteItem {
    type Err = PaletteError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        match payload.trim() {
            "" => Err(PaletteError::Empty),
            key => Self::ALL
                .into_iter()
                .find(|item| item.key() == key)
                .ok_or_else(|| PaletteError::Unknown(key.to_string())),
        }
    }
}
