//! Catalog entry definitions

use crate::element::Element;
use crate::identity::{BuildingId, EnemyId, GuildId, SpellId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a building produces, per level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionEffect {
    GoldPerTurn(u64),
    ResearchSpeedPercent(u32),
    MaxMana(u64),
    BattleInfoPercent(u32),
}

impl fmt::Display for ProductionEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionEffect::GoldPerTurn(n) => write!(f, "+{} Gold/Turn", n),
            ProductionEffect::ResearchSpeedPercent(n) => write!(f, "+{}% Research Speed", n),
            ProductionEffect::MaxMana(n) => write!(f, "+{} Max Mana", n),
            ProductionEffect::BattleInfoPercent(n) => write!(f, "+{}% Battle Info", n),
        }
    }
}

/// A building type a character can construct and upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingDef {
    pub id: BuildingId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Gold cost of level 1
    pub base_gold_cost: u64,
    /// Turn cost of level 1
    pub base_turn_cost: u64,
    pub production: ProductionEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellCategory {
    Attack,
    Aura,
    Speed,
    Counter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellTier {
    Basic,
    Advanced,
    Expert,
    Ultimate,
}

/// Inclusive damage range advertised for an attack spell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: u64,
    pub max: u64,
}

impl DamageRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Base damage fed into the combat formula: the midpoint of the range
    pub fn base(&self) -> u64 {
        self.min + self.max.saturating_sub(self.min) / 2
    }
}

/// A researchable spell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDef {
    pub id: SpellId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: SpellCategory,
    pub tier: SpellTier,
    pub gold_cost: u64,
    pub turn_cost: u64,
    /// Mana spent per cast in battle
    pub mana_cost: u64,
    /// Present exactly for attack spells
    #[serde(default)]
    pub damage: Option<DamageRange>,
    #[serde(default)]
    pub element_restriction: Option<Element>,
    #[serde(default)]
    pub prerequisite: Option<SpellId>,
}

impl SpellDef {
    /// Base damage if this spell can be cast as an attack
    pub fn base_damage(&self) -> Option<u64> {
        match self.category {
            SpellCategory::Attack => self.damage.map(|d| d.base()),
            _ => None,
        }
    }
}

/// An enemy template; battles fight a copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: EnemyId,
    pub name: String,
    pub element: Element,
    pub level: u32,
    pub max_hp: u64,
    pub max_mana: u64,
    pub attack: u64,
    pub defense: u64,
}

/// A guild a character may join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildDef {
    pub id: GuildId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub member_count: u32,
    pub max_members: u32,
    pub level: u32,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    pub leader_name: String,
}

fn default_public() -> bool {
    true
}

impl GuildDef {
    pub fn is_full(&self) -> bool {
        self.member_count >= self.max_members
    }
}
