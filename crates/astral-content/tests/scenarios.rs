//! Gameplay scenarios against the standard content

use astral_content::standard_catalog;
use astral_core::{
    evaluate_research, BattleError, BattleStatus, BuildingCost, CatalogKind, Denial, Element,
    EngineConfig, Error, Game, GameRng, MemoryStore, OwnershipSet, ResourceKind, RoundOutcome,
    SpellCategory, StartingResources,
};
use std::sync::Arc;

fn game() -> Game<MemoryStore> {
    let catalog = Arc::new(standard_catalog().unwrap());
    Game::new(catalog, EngineConfig::default(), MemoryStore::new())
}

fn id<T: std::str::FromStr>(raw: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    raw.parse().unwrap()
}

#[test]
fn standard_catalog_contents() {
    let catalog = standard_catalog().unwrap();
    assert_eq!(catalog.len(CatalogKind::Building), 4);
    assert_eq!(catalog.len(CatalogKind::Spell), 8);
    assert_eq!(catalog.len(CatalogKind::Enemy), 5);
    assert_eq!(catalog.len(CatalogKind::Guild), 6);

    let enemies: Vec<_> = catalog.enemies().map(|e| e.id.as_str()).collect();
    assert_eq!(
        enemies,
        [
            "shadow_apprentice",
            "fire_elemental",
            "water_guardian",
            "nature_spirit",
            "light_seraph",
        ]
    );

    let damage: Vec<_> = catalog
        .spells_in(SpellCategory::Attack)
        .map(|s| (s.id.as_str(), s.base_damage()))
        .collect();
    assert_eq!(
        damage,
        [
            ("fireball", Some(65)),
            ("ice_shard", Some(60)),
            ("lightning_bolt", Some(125)),
            ("inferno_storm", Some(400)),
        ]
    );
    assert!(catalog
        .spells()
        .filter(|s| s.category != SpellCategory::Attack)
        .all(|s| s.base_damage().is_none()));
}

#[test]
fn upgrade_costs_strictly_increase() {
    let catalog = standard_catalog().unwrap();
    for def in catalog.buildings() {
        let mut previous = BuildingCost::for_level(def, 1);
        for level in 2..=30 {
            let cost = BuildingCost::for_level(def, level);
            assert!(cost.gold > previous.gold, "{} gold at level {}", def.id, level);
            assert!(cost.turns > previous.turns, "{} turns at level {}", def.id, level);
            previous = cost;
        }
    }
}

#[test]
fn research_fireball_from_start() {
    let game = game();
    let mage = game.create_character("Pyra", Element::Fire).unwrap();
    game.research_spell(mage.id, &id("fireball")).unwrap();

    let l = game.character(mage.id).unwrap().ledger();
    assert_eq!((l.gold, l.mana, l.turns, l.diamonds), (0, 100, 45, 100));
    assert!(game.ownership(mage.id).unwrap().owns_spell(&id("fireball")));
}

#[test]
fn build_and_upgrade_vault() {
    let game = game();
    let mage = game.create_character("Mason", Element::Nature).unwrap();

    let built = game.build_or_upgrade(mage.id, &id("ethereal_vault")).unwrap();
    assert_eq!((built.cost.gold, built.cost.turns), (5000, 5));
    assert!(built.is_new());

    let err = game
        .build_or_upgrade(mage.id, &id("ethereal_vault"))
        .unwrap_err();
    assert_eq!(
        err.denial(),
        Some(&Denial::InsufficientResource {
            kind: ResourceKind::Gold,
            available: 5000,
            required: 7500,
        })
    );
}

#[test]
fn lightning_bolt_needs_fireball_regardless_of_wealth() {
    let catalog = standard_catalog().unwrap();
    let mut ledger = StartingResources::default().ledger();
    ledger.gold = 10_000_000;
    ledger.turns = 1000;

    let bolt = catalog.spell(&id("lightning_bolt")).unwrap();
    let decision = evaluate_research(bolt, &ledger, &OwnershipSet::new(), Element::Water);
    assert_eq!(decision.denial, Some(Denial::PrerequisiteMissing(id("fireball"))));
}

#[test]
fn inferno_storm_is_fire_only() {
    let catalog = standard_catalog().unwrap();
    let mut ledger = StartingResources::default().ledger();
    ledger.gold = 1_000_000;
    ledger.turns = 500;

    let storm = catalog.spell(&id("inferno_storm")).unwrap();
    let decision = evaluate_research(storm, &ledger, &OwnershipSet::new(), Element::Water);
    assert_eq!(
        decision.denial,
        Some(Denial::ElementLocked {
            required: Element::Fire,
            actual: Element::Water,
        })
    );
}

#[test]
fn fireball_against_shadow_apprentice() {
    let mut game = game();
    let mage = game.create_character("Cinder", Element::Fire).unwrap();
    game.research_spell(mage.id, &id("fireball")).unwrap();

    for seed in 1..=50 {
        let mut rng = GameRng::new(seed);
        game.start_battle(mage.id, &id("shadow_apprentice")).unwrap();
        let report = game.cast_spell(mage.id, &id("fireball"), &mut rng).unwrap();
        assert!((50..=65).contains(&report.damage), "seed {} dealt {}", seed, report.damage);
        assert_eq!(report.outcome, RoundOutcome::Continue);

        let session = game.battle(mage.id).unwrap();
        assert_eq!(session.enemy().hp, 80 - report.damage);
        assert_eq!(session.player_mana(), 85);
        assert!(matches!(
            game.cast_spell(mage.id, &id("fireball"), &mut rng),
            Err(Error::Battle(BattleError::WrongTurnOwner { .. }))
        ));
    }
}

#[test]
fn seeded_battle_runs_to_completion() {
    let mut game = game();
    let mage = game.create_character("Rime", Element::Water).unwrap();
    game.research_spell(mage.id, &id("fireball")).unwrap();
    let mut rng = GameRng::new(7);

    game.start_battle(mage.id, &id("fire_elemental")).unwrap();
    let mut outcome = RoundOutcome::Continue;
    let mut actions = 0;
    while outcome == RoundOutcome::Continue {
        outcome = match game.cast_spell(mage.id, &id("fireball"), &mut rng) {
            Ok(report) => report.outcome,
            Err(Error::Battle(BattleError::InsufficientMana { .. })) => break,
            Err(other) => panic!("unexpected error: {}", other),
        };
        if outcome == RoundOutcome::Continue {
            outcome = game.resolve_enemy_turn(mage.id, &mut rng).unwrap().outcome;
        }
        actions += 1;
        assert!(actions < 100);
    }

    let session = game.battle(mage.id).unwrap();
    assert!(session.log().len() <= 5);
    if session.status() == BattleStatus::Victory {
        assert_eq!(game.character(mage.id).unwrap().ledger().gold, 2000);
        assert!(matches!(
            game.cast_spell(mage.id, &id("fireball"), &mut rng),
            Err(Error::Battle(BattleError::BattleAlreadyResolved))
        ));
    }
}

#[test]
fn join_arcane_academy() {
    let game = game();
    let mage = game.create_character("Sage", Element::Light).unwrap();
    let membership = game.join_guild(mage.id, &id("arcane_academy")).unwrap();
    assert_eq!(membership.guild_id.as_str(), "arcane_academy");
    assert!(matches!(
        game.join_guild(mage.id, &id("no_such_guild")),
        Err(Error::NotFound { kind: CatalogKind::Guild, .. })
    ));
}
