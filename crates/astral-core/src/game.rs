//! Game service façade
//!
//! [`Game`] wires the pure engines to a [`GameStore`]. Every operation reads
//! a snapshot from the store, evaluates it, persists the outcome and only
//! then touches in-memory state, so a failed write never leaves a battle or
//! character half-updated.

use crate::battle::{ActionReport, BattleEngine, BattleSession, RoundOutcome};
use crate::catalog::{CatalogIndex, CatalogKind};
use crate::character::Character;
use crate::config::EngineConfig;
use crate::element::Element;
use crate::error::{BattleError, Denial, Error, Result};
use crate::guild::{evaluate_guild_join, GuildMembership};
use crate::identity::{BuildingId, CharacterId, EnemyId, GuildId, SpellId};
use crate::ownership::{OwnershipKind, OwnershipSet};
use crate::progression::{BuildingQuote, ProgressionEngine, ResearchDecision};
use crate::rng::RandomSource;
use crate::store::GameStore;
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The game service
pub struct Game<S: GameStore> {
    catalog: Arc<CatalogIndex>,
    config: EngineConfig,
    store: S,
    progression: ProgressionEngine,
    battles: BattleEngine,
    sessions: HashMap<CharacterId, BattleSession>,
}

impl<S: GameStore> Game<S> {
    pub fn new(catalog: Arc<CatalogIndex>, config: EngineConfig, store: S) -> Self {
        Self {
            progression: ProgressionEngine::new(catalog.clone()),
            battles: BattleEngine::new(config.battle.clone()),
            catalog,
            config,
            store,
            sessions: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a character with the configured starting resources
    pub fn create_character(&self, username: &str, element: Element) -> Result<Character> {
        let id = self.store.allocate_character_id().map_err(Error::persistence)?;
        let character = Character::create(id, username, element, &self.config)?;
        self.store
            .insert_character(&character)
            .map_err(Error::persistence)?;
        info!(character = %id, username = %character.username, element = %element, "Character created");
        Ok(character)
    }

    pub fn character(&self, id: CharacterId) -> Result<Character> {
        self.store
            .get_character(id)
            .map_err(Error::persistence)?
            .ok_or(Error::CharacterNotFound(id))
    }

    /// Spells and buildings the character has unlocked
    pub fn ownership(&self, id: CharacterId) -> Result<OwnershipSet> {
        let mut records = self
            .store
            .list_ownership(id, OwnershipKind::Building)
            .map_err(Error::persistence)?;
        records.extend(
            self.store
                .list_ownership(id, OwnershipKind::Spell)
                .map_err(Error::persistence)?,
        );
        Ok(OwnershipSet::from_records(&records))
    }

    fn owned(&self, id: CharacterId, kind: OwnershipKind) -> Result<OwnershipSet> {
        let records = self
            .store
            .list_ownership(id, kind)
            .map_err(Error::persistence)?;
        Ok(OwnershipSet::from_records(&records))
    }

    /// Build a building, or raise it one level if already built
    pub fn build_or_upgrade(&self, id: CharacterId, building: &BuildingId) -> Result<BuildingQuote> {
        let character = self.character(id)?;
        let current = self.owned(id, OwnershipKind::Building)?.building_level(building);
        let quote = self
            .progression
            .evaluate_building_action(&character.ledger(), building, current)?;
        if let Some(denial) = quote.denial.clone() {
            debug!(character = %id, building = %building, reason = %denial, "Building denied");
            return Err(denial.into());
        }

        self.store
            .persist_unlock(&quote.delta(), &quote.record(id, Utc::now()))
            .map_err(Error::persistence)?;
        info!(
            character = %id,
            building = %building,
            level = quote.target_level,
            gold = quote.cost.gold,
            turns = quote.cost.turns,
            "Building raised"
        );
        Ok(quote)
    }

    /// Research a spell
    pub fn research_spell(&self, id: CharacterId, spell: &SpellId) -> Result<ResearchDecision> {
        let character = self.character(id)?;
        let owned = self.owned(id, OwnershipKind::Spell)?;
        let decision = self.progression.evaluate_spell_research(
            &character.ledger(),
            spell,
            &owned,
            character.element(),
        )?;
        if let Some(denial) = decision.denial.clone() {
            debug!(character = %id, spell = %spell, reason = %denial, "Research denied");
            return Err(denial.into());
        }

        self.store
            .persist_unlock(&decision.delta, &decision.record(id, Utc::now()))
            .map_err(Error::persistence)?;
        info!(character = %id, spell = %spell, "Spell researched");
        Ok(decision)
    }

    /// Open a battle, replacing any previous session for this character
    pub fn start_battle(&mut self, id: CharacterId, enemy: &EnemyId) -> Result<&BattleSession> {
        let character = self.character(id)?;
        let def = self
            .catalog
            .enemy(enemy)
            .ok_or_else(|| Error::not_found(CatalogKind::Enemy, enemy))?;
        let session = self.battles.start_battle(&character, def);
        info!(character = %id, enemy = %enemy, "Battle started");
        let slot = match self.sessions.entry(id) {
            Entry::Occupied(mut entry) => {
                debug!(character = %id, "Replacing previous battle");
                entry.insert(session);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(session),
        };
        Ok(slot)
    }

    /// Cast an owned attack spell in the character's battle
    ///
    /// A winning cast credits the victory reward before the session is
    /// updated.
    pub fn cast_spell<R>(&mut self, id: CharacterId, spell: &SpellId, rng: &mut R) -> Result<ActionReport>
    where
        R: RandomSource + ?Sized,
    {
        let mut session = self
            .sessions
            .get(&id)
            .cloned()
            .ok_or(BattleError::NoActiveBattle)?;
        let def = self
            .catalog
            .spell(spell)
            .ok_or_else(|| Error::not_found(CatalogKind::Spell, spell))?;
        if !self.owned(id, OwnershipKind::Spell)?.owns_spell(spell) {
            return Err(Denial::SpellNotOwned(spell.clone()).into());
        }

        let report = self.battles.cast_spell(&mut session, def, rng)?;
        if let RoundOutcome::Victory { reward } = report.outcome {
            let ledger = self
                .store
                .persist_resource_delta(id, &reward)
                .map_err(Error::persistence)?;
            info!(
                character = %id,
                enemy = %session.enemy().template,
                gold = ledger.gold,
                mana = ledger.mana,
                "Battle won"
            );
        }
        debug!(character = %id, spell = %spell, damage = report.damage, "Spell cast");
        self.sessions.insert(id, session);
        Ok(report)
    }

    /// Let the enemy act
    pub fn resolve_enemy_turn<R>(&mut self, id: CharacterId, rng: &mut R) -> Result<ActionReport>
    where
        R: RandomSource + ?Sized,
    {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(BattleError::NoActiveBattle)?;
        let report = self.battles.resolve_enemy_turn(session, rng)?;
        debug!(character = %id, damage = report.damage, "Enemy attacked");
        if report.outcome == RoundOutcome::Defeat {
            warn!(character = %id, rounds = session.rounds(), "Battle lost");
        }
        Ok(report)
    }

    /// Discard the character's battle, returning it if there was one
    pub fn reset_battle(&mut self, id: CharacterId) -> Option<BattleSession> {
        self.sessions.remove(&id)
    }

    pub fn battle(&self, id: CharacterId) -> Option<&BattleSession> {
        self.sessions.get(&id)
    }

    pub fn join_guild(&self, id: CharacterId, guild: &GuildId) -> Result<GuildMembership> {
        self.character(id)?;
        let def = self
            .catalog
            .guild(guild)
            .ok_or_else(|| Error::not_found(CatalogKind::Guild, guild))?;
        let current = self
            .store
            .guild_membership(id)
            .map_err(Error::persistence)?;
        if let Some(denial) = evaluate_guild_join(def, current.as_ref()) {
            return Err(denial.into());
        }
        let membership = GuildMembership::member(id, guild.clone(), Utc::now());
        self.store
            .create_membership(&membership)
            .map_err(Error::persistence)?;
        info!(character = %id, guild = %guild, "Joined guild");
        Ok(membership)
    }

    pub fn leave_guild(&self, id: CharacterId) -> Result<GuildMembership> {
        self.character(id)?;
        let membership = self
            .store
            .remove_membership(id)
            .map_err(Error::persistence)?
            .ok_or(Denial::NotInGuild)?;
        info!(character = %id, guild = %membership.guild_id, "Left guild");
        Ok(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattleStatus;
    use crate::catalog::fixtures;
    use crate::ledger::{ResourceDelta, ResourceKind, ResourceLedger};
    use crate::ownership::OwnershipRecord;
    use crate::store::{MemoryStore, MemoryStoreError};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn game() -> Game<MemoryStore> {
        Game::new(
            Arc::new(fixtures::catalog()),
            EngineConfig::default(),
            MemoryStore::new(),
        )
    }

    fn id<T: std::str::FromStr>(raw: &str) -> T
    where
        T::Err: std::fmt::Debug,
    {
        raw.parse().unwrap()
    }

    #[test]
    fn test_create_character() {
        let game = game();
        let c = game.create_character(" Morgana ", Element::Dark).unwrap();
        assert_eq!(c.username, "Morgana");
        assert_eq!(game.character(c.id).unwrap(), c);
        assert!(matches!(
            game.create_character("   ", Element::Dark),
            Err(Error::InvalidCharacter(_))
        ));
        assert!(matches!(
            game.character(CharacterId::new(99)),
            Err(Error::CharacterNotFound(_))
        ));
    }

    #[test]
    fn test_build_then_upgrade() {
        let game = game();
        let c = game.create_character("Builder", Element::Nature).unwrap();
        let vault: BuildingId = id("ethereal_vault");

        let quote = game.build_or_upgrade(c.id, &vault).unwrap();
        assert_eq!(quote.target_level, 1);
        let after = game.character(c.id).unwrap().ledger();
        assert_eq!((after.gold, after.turns), (5000, 45));
        assert_eq!(game.ownership(c.id).unwrap().building_level(&vault), 1);

        let err = game.build_or_upgrade(c.id, &vault).unwrap_err();
        assert!(matches!(
            err.denial(),
            Some(Denial::InsufficientResource { kind: ResourceKind::Gold, .. })
        ));

        game.store()
            .persist_resource_delta(c.id, &ResourceDelta::zero().with_gold(10_000))
            .unwrap();
        let quote = game.build_or_upgrade(c.id, &vault).unwrap();
        assert_eq!((quote.cost.gold, quote.cost.turns), (7500, 7));
        assert_eq!(game.ownership(c.id).unwrap().building_level(&vault), 2);
    }

    #[test]
    fn test_research_flow() {
        let game = game();
        let c = game.create_character("Scholar", Element::Fire).unwrap();
        game.research_spell(c.id, &id("fireball")).unwrap();

        let ledger = game.character(c.id).unwrap().ledger();
        assert_eq!(
            (ledger.gold, ledger.mana, ledger.turns, ledger.diamonds),
            (0, 100, 45, 100)
        );
        assert!(game.ownership(c.id).unwrap().owns_spell(&id("fireball")));

        let err = game.research_spell(c.id, &id("fireball")).unwrap_err();
        assert_eq!(err.denial(), Some(&Denial::AlreadyOwned));
        assert!(matches!(
            game.research_spell(c.id, &id("unknown_spell")),
            Err(Error::NotFound { kind: CatalogKind::Spell, .. })
        ));
    }

    fn armed_mage(game: &Game<MemoryStore>) -> CharacterId {
        let c = game.create_character("Duelist", Element::Fire).unwrap();
        game.research_spell(c.id, &id("fireball")).unwrap();
        c.id
    }

    #[test]
    fn test_cast_requires_battle_and_owned_spell() {
        let mut game = game();
        let who = armed_mage(&game);
        assert!(matches!(
            game.cast_spell(who, &id("fireball"), &mut || 0.5),
            Err(Error::Battle(BattleError::NoActiveBattle))
        ));

        game.start_battle(who, &id("shadow_apprentice")).unwrap();
        let err = game
            .cast_spell(who, &id("ice_shard"), &mut || 0.5)
            .unwrap_err();
        assert_eq!(err.denial(), Some(&Denial::SpellNotOwned(id("ice_shard"))));
        assert_eq!(game.battle(who).unwrap().enemy().hp, 80);
    }

    #[test]
    fn test_victory_persists_reward() {
        let mut game = game();
        let who = armed_mage(&game);
        game.start_battle(who, &id("shadow_apprentice")).unwrap();

        let mut max_roll = || 1.0;
        game.cast_spell(who, &id("fireball"), &mut max_roll).unwrap();
        game.resolve_enemy_turn(who, &mut max_roll).unwrap();
        let report = game.cast_spell(who, &id("fireball"), &mut max_roll).unwrap();
        assert!(matches!(report.outcome, RoundOutcome::Victory { .. }));
        assert_eq!(game.battle(who).unwrap().status(), BattleStatus::Victory);

        let ledger = game.character(who).unwrap().ledger();
        assert_eq!(ledger.gold, 1000);
        assert_eq!(ledger.mana, 100);

        assert!(matches!(
            game.resolve_enemy_turn(who, &mut max_roll),
            Err(Error::Battle(BattleError::BattleAlreadyResolved))
        ));
        assert!(game.reset_battle(who).is_some());
        assert!(game.battle(who).is_none());
    }

    #[test]
    fn test_guild_join_and_leave() {
        let game = game();
        let c = game.create_character("Joiner", Element::Fire).unwrap();
        let legion: GuildId = id("fire_legion");

        let m = game.join_guild(c.id, &legion).unwrap();
        assert_eq!(m.guild_id, legion);
        assert_eq!(
            game.join_guild(c.id, &id("crowded_hall")).unwrap_err().denial(),
            Some(&Denial::AlreadyInGuild(legion.clone()))
        );

        assert_eq!(game.leave_guild(c.id).unwrap().guild_id, legion);
        assert_eq!(
            game.leave_guild(c.id).unwrap_err().denial(),
            Some(&Denial::NotInGuild)
        );
        assert_eq!(
            game.join_guild(c.id, &id("crowded_hall")).unwrap_err().denial(),
            Some(&Denial::GuildFull)
        );
    }

    /// Wraps a MemoryStore and fails writes on demand
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
        fail_unlocks: AtomicBool,
    }

    #[derive(Debug, thiserror::Error)]
    enum FlakyError {
        #[error("write refused")]
        Refused,
        #[error(transparent)]
        Inner(#[from] MemoryStoreError),
    }

    impl GameStore for FlakyStore {
        type Error = FlakyError;

        fn allocate_character_id(&self) -> std::result::Result<CharacterId, FlakyError> {
            Ok(self.inner.allocate_character_id()?)
        }

        fn get_character(&self, id: CharacterId) -> std::result::Result<Option<Character>, FlakyError> {
            Ok(self.inner.get_character(id)?)
        }

        fn insert_character(&self, character: &Character) -> std::result::Result<(), FlakyError> {
            Ok(self.inner.insert_character(character)?)
        }

        fn persist_resource_delta(
            &self,
            id: CharacterId,
            delta: &ResourceDelta,
        ) -> std::result::Result<ResourceLedger, FlakyError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(FlakyError::Refused);
            }
            Ok(self.inner.persist_resource_delta(id, delta)?)
        }

        fn list_ownership(
            &self,
            id: CharacterId,
            kind: OwnershipKind,
        ) -> std::result::Result<Vec<OwnershipRecord>, FlakyError> {
            Ok(self.inner.list_ownership(id, kind)?)
        }

        fn create_ownership(&self, record: &OwnershipRecord) -> std::result::Result<bool, FlakyError> {
            Ok(self.inner.create_ownership(record)?)
        }

        fn update_building_level(
            &self,
            id: CharacterId,
            building: &BuildingId,
            level: u32,
        ) -> std::result::Result<(), FlakyError> {
            Ok(self.inner.update_building_level(id, building, level)?)
        }

        fn persist_unlock(
            &self,
            delta: &ResourceDelta,
            unlock: &OwnershipRecord,
        ) -> std::result::Result<ResourceLedger, FlakyError> {
            if self.fail_writes.load(Ordering::SeqCst) || self.fail_unlocks.load(Ordering::SeqCst) {
                return Err(FlakyError::Refused);
            }
            Ok(self.inner.persist_unlock(delta, unlock)?)
        }

        fn guild_membership(
            &self,
            id: CharacterId,
        ) -> std::result::Result<Option<GuildMembership>, FlakyError> {
            Ok(self.inner.guild_membership(id)?)
        }

        fn create_membership(&self, membership: &GuildMembership) -> std::result::Result<(), FlakyError> {
            Ok(self.inner.create_membership(membership)?)
        }

        fn remove_membership(
            &self,
            id: CharacterId,
        ) -> std::result::Result<Option<GuildMembership>, FlakyError> {
            Ok(self.inner.remove_membership(id)?)
        }
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let mut game = Game::new(
            Arc::new(fixtures::catalog()),
            EngineConfig::default(),
            FlakyStore::default(),
        );
        let c = game.create_character("Unlucky", Element::Fire).unwrap();
        game.research_spell(c.id, &id("fireball")).unwrap();
        game.start_battle(c.id, &id("shadow_apprentice")).unwrap();
        let mut max_roll = || 1.0;
        game.cast_spell(c.id, &id("fireball"), &mut max_roll).unwrap();
        game.resolve_enemy_turn(c.id, &mut max_roll).unwrap();

        game.store().fail_writes.store(true, Ordering::SeqCst);
        let before = game.battle(c.id).cloned();
        let err = game
            .cast_spell(c.id, &id("fireball"), &mut max_roll)
            .unwrap_err();
        match &err {
            Error::Persistence(source) => assert_eq!(source.to_string(), "write refused"),
            other => panic!("expected persistence failure, got {other:?}"),
        }
        assert_eq!(game.battle(c.id).cloned(), before);
        assert!(game.build_or_upgrade(c.id, &id("ethereal_vault")).is_err());
        assert_eq!(game.ownership(c.id).unwrap().building_level(&id("ethereal_vault")), 0);
    }

    #[test]
    fn test_failed_unlock_charges_nothing() {
        let game = Game::new(
            Arc::new(fixtures::catalog()),
            EngineConfig::default(),
            FlakyStore::default(),
        );
        let c = game.create_character("Cautious", Element::Fire).unwrap();
        game.store().fail_unlocks.store(true, Ordering::SeqCst);

        let err = game.research_spell(c.id, &id("fireball")).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(game.build_or_upgrade(c.id, &id("ethereal_vault")).is_err());

        let ledger = game.character(c.id).unwrap().ledger();
        assert_eq!((ledger.gold, ledger.turns), (10_000, 50));
        let owned = game.ownership(c.id).unwrap();
        assert!(!owned.owns_spell(&id("fireball")));
        assert_eq!(owned.building_level(&id("ethereal_vault")), 0);

        game.store().fail_unlocks.store(false, Ordering::SeqCst);
        game.research_spell(c.id, &id("fireball")).unwrap();
        assert_eq!(game.character(c.id).unwrap().ledger().gold, 0);
    }
}
