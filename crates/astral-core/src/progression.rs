//! Building and spell-research decisions
//!
//! Everything here is a pure function of a ledger snapshot, the catalog and
//! the character's unlocks. A decision either carries a [`Denial`] or the
//! [`ResourceDelta`] the caller persists together with the unlock record.

use crate::catalog::{BuildingDef, CatalogIndex, CatalogKind, SpellDef};
use crate::element::Element;
use crate::error::{Denial, Error, Result};
use crate::identity::{BuildingId, CharacterId, SpellId};
use crate::ledger::{ResourceDelta, ResourceKind, ResourceLedger};
use crate::ownership::{OwnershipRecord, OwnershipSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `floor(base * 1.5^(target_level - 1))`, saturating at `u64::MAX`
///
/// Exact integer arithmetic (`base * 3^n >> n`) while `3^n` fits next to a
/// u64 base in a u128. Beyond level 41 the float formula is used directly.
pub fn scaled_cost(base: u64, target_level: u32) -> u64 {
    let n = target_level.saturating_sub(1);
    if n <= 40 {
        let scaled = (u128::from(base) * 3u128.pow(n)) >> n;
        return u64::try_from(scaled).unwrap_or(u64::MAX);
    }
    let exponent = i32::try_from(n).unwrap_or(i32::MAX);
    (base as f64 * 1.5f64.powi(exponent)).floor() as u64
}

/// Gold and turns for one building step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingCost {
    pub gold: u64,
    pub turns: u64,
}

impl BuildingCost {
    pub fn for_level(def: &BuildingDef, target_level: u32) -> Self {
        Self {
            gold: scaled_cost(def.base_gold_cost, target_level),
            turns: scaled_cost(def.base_turn_cost, target_level),
        }
    }
}

/// Outcome of evaluating a build (level 0 → 1) or upgrade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingQuote {
    pub building: BuildingId,
    pub current_level: u32,
    pub target_level: u32,
    pub cost: BuildingCost,
    pub denial: Option<Denial>,
}

impl BuildingQuote {
    pub fn allowed(&self) -> bool {
        self.denial.is_none()
    }

    /// First construction rather than an upgrade
    pub fn is_new(&self) -> bool {
        self.current_level == 0
    }

    pub fn delta(&self) -> ResourceDelta {
        ResourceDelta::spend(self.cost.gold, self.cost.turns)
    }

    /// The record left by this build or upgrade
    pub fn record(&self, character_id: CharacterId, at: DateTime<Utc>) -> OwnershipRecord {
        OwnershipRecord::building(character_id, self.building.clone(), self.target_level, at)
    }
}

/// Quote the next level of `def` against `ledger`
pub fn quote_building(def: &BuildingDef, ledger: &ResourceLedger, current_level: u32) -> BuildingQuote {
    let target_level = current_level.saturating_add(1);
    let cost = BuildingCost::for_level(def, target_level);
    let denial = shortfall(ledger, ResourceKind::Gold, cost.gold)
        .or_else(|| shortfall(ledger, ResourceKind::Turns, cost.turns));
    BuildingQuote {
        building: def.id.clone(),
        current_level,
        target_level,
        cost,
        denial,
    }
}

/// Outcome of evaluating a spell research
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchDecision {
    pub spell: SpellId,
    pub delta: ResourceDelta,
    pub denial: Option<Denial>,
}

impl ResearchDecision {
    pub fn allowed(&self) -> bool {
        self.denial.is_none()
    }

    pub fn record(&self, character_id: CharacterId, at: DateTime<Utc>) -> OwnershipRecord {
        OwnershipRecord::spell(character_id, self.spell.clone(), at)
    }
}

/// Decide whether `spell` can be researched
///
/// Checks run in a fixed order and the first failure wins: already owned,
/// gold, turns, element, prerequisite.
pub fn evaluate_research(
    spell: &SpellDef,
    ledger: &ResourceLedger,
    owned: &OwnershipSet,
    element: Element,
) -> ResearchDecision {
    let denial = if owned.owns_spell(&spell.id) {
        Some(Denial::AlreadyOwned)
    } else if let Some(d) = shortfall(ledger, ResourceKind::Gold, spell.gold_cost)
        .or_else(|| shortfall(ledger, ResourceKind::Turns, spell.turn_cost))
    {
        Some(d)
    } else if let Some(required) = spell.element_restriction.filter(|r| *r != element) {
        Some(Denial::ElementLocked {
            required,
            actual: element,
        })
    } else {
        spell
            .prerequisite
            .as_ref()
            .filter(|p| !owned.owns_spell(p))
            .map(|p| Denial::PrerequisiteMissing(p.clone()))
    };
    ResearchDecision {
        spell: spell.id.clone(),
        delta: ResourceDelta::spend(spell.gold_cost, spell.turn_cost),
        denial,
    }
}

fn shortfall(ledger: &ResourceLedger, kind: ResourceKind, required: u64) -> Option<Denial> {
    if ledger.can_afford(kind, required) {
        None
    } else {
        Some(Denial::InsufficientResource {
            kind,
            available: ledger.get(kind),
            required,
        })
    }
}

/// Catalog-aware front end for the decision functions
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    catalog: Arc<CatalogIndex>,
}

impl ProgressionEngine {
    pub fn new(catalog: Arc<CatalogIndex>) -> Self {
        Self { catalog }
    }

    pub fn evaluate_building_action(
        &self,
        ledger: &ResourceLedger,
        building: &BuildingId,
        current_level: u32,
    ) -> Result<BuildingQuote> {
        let def = self
            .catalog
            .building(building)
            .ok_or_else(|| Error::not_found(CatalogKind::Building, building))?;
        Ok(quote_building(def, ledger, current_level))
    }

    pub fn evaluate_spell_research(
        &self,
        ledger: &ResourceLedger,
        spell: &SpellId,
        owned: &OwnershipSet,
        element: Element,
    ) -> Result<ResearchDecision> {
        let def = self
            .catalog
            .spell(spell)
            .ok_or_else(|| Error::not_found(CatalogKind::Spell, spell))?;
        Ok(evaluate_research(def, ledger, owned, element))
    }
}
