//! DbStore behaviour on an in-memory native_db

use astral_core::{
    BuildingId, Character, CharacterId, Element, EngineConfig, Error as CoreError, Game,
    GameStore, GuildMembership, OwnedEntry, OwnershipKind, OwnershipRecord, ResourceDelta,
    ResourceKind, RoundOutcome,
};
use astral_db::{DbStore, Error};
use chrono::Utc;
use std::sync::Arc;

fn store_with(username: &str, element: Element) -> (DbStore, CharacterId) {
    let store = DbStore::in_memory().unwrap();
    let id = store.allocate_character_id().unwrap();
    let character = Character::create(id, username, element, &EngineConfig::default()).unwrap();
    store.insert_character(&character).unwrap();
    (store, id)
}

#[test]
fn character_round_trip() {
    let (store, id) = store_with("Aurelia", Element::Light);
    let loaded = store.get_character(id).unwrap().unwrap();
    assert_eq!(loaded.username, "Aurelia");
    assert_eq!(loaded.element(), Element::Light);
    assert_eq!(loaded.ledger().gold, 10_000);
    assert!(store.get_character(CharacterId::new(42)).unwrap().is_none());
    assert_eq!(store.all_characters().unwrap().len(), 1);
}

#[test]
fn ids_increase() {
    let store = DbStore::in_memory().unwrap();
    let a = store.allocate_character_id().unwrap();
    let b = store.allocate_character_id().unwrap();
    assert!(b > a);
}

#[test]
fn duplicate_character_rejected() {
    let (store, id) = store_with("Twin", Element::Water);
    let again = store.get_character(id).unwrap().unwrap();
    assert!(matches!(
        store.insert_character(&again),
        Err(Error::DuplicateKey(_))
    ));
}

#[test]
fn overdraw_leaves_ledger_untouched() {
    let (store, id) = store_with("Spender", Element::Dark);
    let err = store
        .persist_resource_delta(id, &ResourceDelta::zero().with_diamonds(-101))
        .unwrap_err();
    assert!(matches!(err, Error::Ledger(e) if e.kind == ResourceKind::Diamonds));
    assert_eq!(store.get_character(id).unwrap().unwrap().ledger().diamonds, 100);

    let ledger = store
        .persist_resource_delta(id, &ResourceDelta::spend(2500, 10).with_mana(50))
        .unwrap();
    assert_eq!((ledger.gold, ledger.turns, ledger.mana), (7500, 40, 100));
    assert_eq!(store.get_character(id).unwrap().unwrap().ledger(), ledger);
}

#[test]
fn ownership_by_kind() {
    let (store, id) = store_with("Owner", Element::Nature);
    let stranger = CharacterId::new(id.raw() + 1);
    let now = Utc::now();
    let vault: BuildingId = "ethereal_vault".parse().unwrap();

    let spell = OwnershipRecord::spell(id, "haste".parse().unwrap(), now);
    assert!(store.create_ownership(&spell).unwrap());
    assert!(!store.create_ownership(&spell).unwrap());
    assert!(store
        .create_ownership(&OwnershipRecord::building(id, vault.clone(), 1, now))
        .unwrap());
    assert!(matches!(
        store.create_ownership(&OwnershipRecord::spell(stranger, "haste".parse().unwrap(), now)),
        Err(Error::NotFound(_))
    ));

    let spells = store.list_ownership(id, OwnershipKind::Spell).unwrap();
    assert_eq!(spells.len(), 1);
    assert_eq!(spells[0].entry_id(), "haste");

    store.update_building_level(id, &vault, 3).unwrap();
    let buildings = store.list_ownership(id, OwnershipKind::Building).unwrap();
    assert_eq!(buildings[0].entry, OwnedEntry::Building { id: vault, level: 3 });

    assert!(matches!(
        store.update_building_level(id, &"arcane_library".parse().unwrap(), 2),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn unlock_is_one_transaction() {
    let (store, id) = store_with("Scholar", Element::Fire);
    let now = Utc::now();
    let fireball = OwnershipRecord::spell(id, "fireball".parse().unwrap(), now);

    let ledger = store
        .persist_unlock(&ResourceDelta::spend(10_000, 5), &fireball)
        .unwrap();
    assert_eq!((ledger.gold, ledger.turns), (0, 45));
    assert_eq!(store.list_ownership(id, OwnershipKind::Spell).unwrap().len(), 1);

    assert!(matches!(
        store.persist_unlock(&ResourceDelta::spend(0, 5), &fireball),
        Err(Error::DuplicateKey(_))
    ));
    assert_eq!(store.get_character(id).unwrap().unwrap().ledger().turns, 45);

    let vault: BuildingId = "ethereal_vault".parse().unwrap();
    let build = OwnershipRecord::building(id, vault.clone(), 1, now);
    assert!(matches!(
        store.persist_unlock(&ResourceDelta::spend(5000, 5), &build),
        Err(Error::Ledger(_))
    ));
    assert!(store
        .list_ownership(id, OwnershipKind::Building)
        .unwrap()
        .is_empty());

    store
        .persist_resource_delta(id, &ResourceDelta::zero().with_gold(12_500))
        .unwrap();
    store
        .persist_unlock(&ResourceDelta::spend(5000, 5), &build)
        .unwrap();
    let upgrade = OwnershipRecord::building(id, vault.clone(), 2, now);
    let ledger = store
        .persist_unlock(&ResourceDelta::spend(7500, 7), &upgrade)
        .unwrap();
    assert_eq!((ledger.gold, ledger.turns), (0, 33));
    let buildings = store.list_ownership(id, OwnershipKind::Building).unwrap();
    assert_eq!(buildings.len(), 1);
    assert_eq!(buildings[0].entry, OwnedEntry::Building { id: vault, level: 2 });
}

#[test]
fn membership_lifecycle() {
    let (store, id) = store_with("Member", Element::Fire);
    let membership = GuildMembership::member(id, "fire_legion".parse().unwrap(), Utc::now());

    store.create_membership(&membership).unwrap();
    assert!(matches!(
        store.create_membership(&membership),
        Err(Error::DuplicateKey(_))
    ));
    assert_eq!(store.guild_membership(id).unwrap().unwrap().guild_id, membership.guild_id);
    assert_eq!(store.guild_members("fire_legion").unwrap().len(), 1);
    assert!(store.guild_members("fire").unwrap().is_empty());

    assert!(store.remove_membership(id).unwrap().is_some());
    assert!(store.remove_membership(id).unwrap().is_none());
    assert!(store.guild_membership(id).unwrap().is_none());
}

#[test]
fn game_over_db_store() {
    let catalog = Arc::new(astral_content::standard_catalog().unwrap());
    let mut game = Game::new(catalog, EngineConfig::default(), DbStore::in_memory().unwrap());

    let mage = game.create_character("Stormcaller", Element::Water).unwrap();
    game.research_spell(mage.id, &"fireball".parse().unwrap()).unwrap();
    game.start_battle(mage.id, &"shadow_apprentice".parse().unwrap())
        .unwrap();

    let fireball = "fireball".parse().unwrap();
    let mut max_roll = || 1.0;
    game.cast_spell(mage.id, &fireball, &mut max_roll).unwrap();
    game.resolve_enemy_turn(mage.id, &mut max_roll).unwrap();
    let report = game.cast_spell(mage.id, &fireball, &mut max_roll).unwrap();
    assert!(matches!(report.outcome, RoundOutcome::Victory { .. }));
    assert_eq!(game.character(mage.id).unwrap().ledger().gold, 1000);

    let err = game.research_spell(mage.id, &fireball).unwrap_err();
    assert!(matches!(err, CoreError::Denied(_)));
}
