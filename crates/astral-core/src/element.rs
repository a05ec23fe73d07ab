//! Magical elements chosen at character creation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the five elements a mage can align with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Nature,
    Water,
    Light,
    Dark,
}

/// Display metadata for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub bonus: &'static str,
    pub ultimate: &'static str,
}

impl Element {
    /// All elements in selection order
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Nature,
        Element::Water,
        Element::Light,
        Element::Dark,
    ];

    /// Lowercase tag used in content files and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Nature => "nature",
            Element::Water => "water",
            Element::Light => "light",
            Element::Dark => "dark",
        }
    }

    /// Flavour text shown on the creation screen
    pub fn profile(&self) -> ElementProfile {
        match self {
            Element::Fire => ElementProfile {
                name: "Fire",
                description: "Masters of destruction and raw power",
                bonus: "+25% Attack Damage",
                ultimate: "Inferno Storm - Devastating area damage",
            },
            Element::Nature => ElementProfile {
                name: "Nature",
                description: "Guardians of life and regeneration",
                bonus: "+25% Mana Regeneration",
                ultimate: "World Tree - Massive healing and buffs",
            },
            Element::Water => ElementProfile {
                name: "Water",
                description: "Wielders of flow and adaptation",
                bonus: "+25% Spell Efficiency",
                ultimate: "Tsunami Wave - Overwhelming force",
            },
            Element::Light => ElementProfile {
                name: "Light",
                description: "Champions of purity and protection",
                bonus: "+25% Defense Rating",
                ultimate: "Divine Judgment - Holy devastation",
            },
            Element::Dark => ElementProfile {
                name: "Dark",
                description: "Masters of shadow and forbidden arts",
                bonus: "+25% Critical Chance",
                ultimate: "Void Collapse - Reality-bending power",
            },
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown element tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element: {0}")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}
