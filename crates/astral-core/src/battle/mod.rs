//! Turn-based battle state machine
//!
//! ```text
//! (no session) --start--> PlayerTurn --cast--> EnemyTurn --resolve--> PlayerTurn
//!                              |                    |
//!                              +--> Victory         +--> Defeat
//! ```
//!
//! The engine never schedules anything: the caller drives
//! [`BattleEngine::cast_spell`] and [`BattleEngine::resolve_enemy_turn`]
//! alternately, passing its own [`RandomSource`]. Victory and Defeat absorb
//! every further action.

mod log;

pub use log::BattleLog;

use crate::character::Character;
use crate::catalog::{EnemyDef, SpellDef};
use crate::config::BattleConfig;
use crate::element::Element;
use crate::error::BattleError;
use crate::identity::EnemyId;
use crate::ledger::ResourceDelta;
use crate::rng::{roll_variance, RandomSource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who acts next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnOwner {
    Player,
    Enemy,
}

impl fmt::Display for TurnOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnOwner::Player => f.write_str("player"),
            TurnOwner::Enemy => f.write_str("enemy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl BattlePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat)
    }
}

/// Coarse battle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStatus {
    Active,
    Victory,
    Defeat,
}

/// The session's private copy of an enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyState {
    pub template: EnemyId,
    pub name: String,
    pub element: Element,
    pub level: u32,
    pub hp: u64,
    pub max_hp: u64,
    pub mana: u64,
    pub max_mana: u64,
    pub attack: u64,
    pub defense: u64,
}

impl From<&EnemyDef> for EnemyState {
    fn from(def: &EnemyDef) -> Self {
        Self {
            template: def.id.clone(),
            name: def.name.clone(),
            element: def.element,
            level: def.level,
            hp: def.max_hp,
            max_hp: def.max_hp,
            mana: def.max_mana,
            max_mana: def.max_mana,
            attack: def.attack,
            defense: def.defense,
        }
    }
}

/// An in-progress or finished battle; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSession {
    player_hp: u64,
    player_max_hp: u64,
    player_mana: u64,
    enemy: EnemyState,
    phase: BattlePhase,
    log: BattleLog,
    rounds: u32,
    reward: Option<ResourceDelta>,
}

impl BattleSession {
    pub fn player_hp(&self) -> u64 {
        self.player_hp
    }

    pub fn player_max_hp(&self) -> u64 {
        self.player_max_hp
    }

    pub fn player_mana(&self) -> u64 {
        self.player_mana
    }

    pub fn enemy(&self) -> &EnemyState {
        &self.enemy
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn status(&self) -> BattleStatus {
        match self.phase {
            BattlePhase::PlayerTurn | BattlePhase::EnemyTurn => BattleStatus::Active,
            BattlePhase::Victory => BattleStatus::Victory,
            BattlePhase::Defeat => BattleStatus::Defeat,
        }
    }

    /// Whose turn it is; frozen at the final actor once the battle is over
    pub fn turn_owner(&self) -> TurnOwner {
        match self.phase {
            BattlePhase::PlayerTurn | BattlePhase::Victory => TurnOwner::Player,
            BattlePhase::EnemyTurn | BattlePhase::Defeat => TurnOwner::Enemy,
        }
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    /// Enemy turns resolved so far
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Resources the caller should credit, set on victory
    pub fn reward(&self) -> Option<&ResourceDelta> {
        self.reward.as_ref()
    }

    fn expect_turn(&self, expected: TurnOwner) -> Result<(), BattleError> {
        if self.phase.is_terminal() {
            return Err(BattleError::BattleAlreadyResolved);
        }
        let actual = self.turn_owner();
        if actual != expected {
            return Err(BattleError::WrongTurnOwner { expected, actual });
        }
        Ok(())
    }
}

/// How an action left the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Continue,
    Victory { reward: ResourceDelta },
    Defeat,
}

/// Result of one cast or enemy turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionReport {
    pub damage: u64,
    pub outcome: RoundOutcome,
}

/// `max(1, power - defense)`
pub fn damage_after_defense(power: u64, defense: u64) -> u64 {
    power.saturating_sub(defense).max(1)
}

/// Resolves battle actions under a [`BattleConfig`]
#[derive(Debug, Clone, Default)]
pub struct BattleEngine {
    config: BattleConfig,
}

impl BattleEngine {
    pub fn new(config: BattleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Open a battle against a fresh copy of `enemy`
    pub fn start_battle(&self, character: &Character, enemy: &EnemyDef) -> BattleSession {
        let mut log = BattleLog::new(self.config.log_capacity);
        log.push(format!("Battle begins against {}!", enemy.name));
        BattleSession {
            player_hp: self.config.player_max_hp,
            player_max_hp: self.config.player_max_hp,
            player_mana: character.ledger().mana,
            enemy: EnemyState::from(enemy),
            phase: BattlePhase::PlayerTurn,
            log,
            rounds: 0,
            reward: None,
        }
    }

    /// The player casts `spell` at the enemy
    ///
    /// On any error the session is left exactly as it was.
    pub fn cast_spell<R>(
        &self,
        session: &mut BattleSession,
        spell: &SpellDef,
        rng: &mut R,
    ) -> Result<ActionReport, BattleError>
    where
        R: RandomSource + ?Sized,
    {
        session.expect_turn(TurnOwner::Player)?;
        let base = spell
            .base_damage()
            .ok_or_else(|| BattleError::SpellNotCastable(spell.id.clone()))?;
        if session.player_mana < spell.mana_cost {
            return Err(BattleError::InsufficientMana {
                available: session.player_mana,
                required: spell.mana_cost,
            });
        }

        let raw = damage_after_defense(base, session.enemy.defense);
        let damage = roll_variance(raw, self.config.damage_variance, rng);
        session.enemy.hp = session.enemy.hp.saturating_sub(damage);
        session.player_mana -= spell.mana_cost;
        session
            .log
            .push(format!("You cast {} for {} damage!", spell.name, damage));

        let outcome = if session.enemy.hp == 0 {
            let reward = self.victory_reward(&session.enemy);
            session.phase = BattlePhase::Victory;
            session.reward = Some(reward);
            session.log.push("Victory! You defeated the enemy!");
            RoundOutcome::Victory { reward }
        } else {
            session.phase = BattlePhase::EnemyTurn;
            RoundOutcome::Continue
        };
        Ok(ActionReport { damage, outcome })
    }

    /// The enemy attacks the player
    pub fn resolve_enemy_turn<R>(
        &self,
        session: &mut BattleSession,
        rng: &mut R,
    ) -> Result<ActionReport, BattleError>
    where
        R: RandomSource + ?Sized,
    {
        session.expect_turn(TurnOwner::Enemy)?;

        let raw = damage_after_defense(session.enemy.attack, self.config.player_defense);
        let damage = roll_variance(raw, self.config.damage_variance, rng);
        session.player_hp = session.player_hp.saturating_sub(damage);
        session.rounds = session.rounds.saturating_add(1);
        session
            .log
            .push(format!("{} attacks for {} damage!", session.enemy.name, damage));

        let capped = self.config.max_rounds > 0 && session.rounds >= self.config.max_rounds;
        let outcome = if session.player_hp == 0 {
            session.phase = BattlePhase::Defeat;
            session.log.push("Defeat! You have been vanquished!");
            RoundOutcome::Defeat
        } else if capped {
            session.phase = BattlePhase::Defeat;
            session.log.push("The battle drags on. You retreat exhausted.");
            RoundOutcome::Defeat
        } else {
            session.phase = BattlePhase::PlayerTurn;
            RoundOutcome::Continue
        };
        Ok(ActionReport { damage, outcome })
    }

    fn victory_reward(&self, enemy: &EnemyState) -> ResourceDelta {
        let gold = u64::from(enemy.level).saturating_mul(self.config.gold_per_enemy_level);
        let mana = self.config.victory_mana_restore;
        ResourceDelta::zero()
            .with_gold(i64::try_from(gold).unwrap_or(i64::MAX))
            .with_mana(i64::try_from(mana).unwrap_or(i64::MAX))
    }
}
