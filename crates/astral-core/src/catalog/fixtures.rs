//! Small catalog used by unit tests

use super::*;
use crate::element::Element;

fn id<T: std::str::FromStr>(raw: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    raw.parse().unwrap()
}

fn attack(
    raw: &str,
    name: &str,
    tier: SpellTier,
    cost: (u64, u64, u64),
    damage: (u64, u64),
) -> SpellDef {
    SpellDef {
        id: id(raw),
        name: name.to_string(),
        description: String::new(),
        category: SpellCategory::Attack,
        tier,
        gold_cost: cost.0,
        turn_cost: cost.1,
        mana_cost: cost.2,
        damage: Some(DamageRange::new(damage.0, damage.1)),
        element_restriction: None,
        prerequisite: None,
    }
}

pub fn fireball() -> SpellDef {
    attack("fireball", "Fireball", SpellTier::Basic, (10_000, 5, 15), (50, 80))
}

pub fn ice_shard() -> SpellDef {
    attack("ice_shard", "Ice Shard", SpellTier::Basic, (12_000, 6, 18), (45, 75))
}

pub fn lightning_bolt() -> SpellDef {
    let mut spell = attack(
        "lightning_bolt",
        "Lightning Bolt",
        SpellTier::Advanced,
        (50_000, 20, 30),
        (100, 150),
    );
    spell.prerequisite = Some(id("fireball"));
    spell
}

pub fn inferno_storm() -> SpellDef {
    let mut spell = attack(
        "inferno_storm",
        "Inferno Storm",
        SpellTier::Ultimate,
        (500_000, 100, 80),
        (300, 500),
    );
    spell.element_restriction = Some(Element::Fire);
    spell.prerequisite = Some(id("lightning_bolt"));
    spell
}

pub fn magic_shield() -> SpellDef {
    SpellDef {
        id: id("magic_shield"),
        name: "Magic Shield".to_string(),
        description: String::new(),
        category: SpellCategory::Aura,
        tier: SpellTier::Basic,
        gold_cost: 15_000,
        turn_cost: 8,
        mana_cost: 20,
        damage: None,
        element_restriction: None,
        prerequisite: None,
    }
}

pub fn ethereal_vault() -> BuildingDef {
    BuildingDef {
        id: id("ethereal_vault"),
        name: "Ethereal Vault".to_string(),
        description: String::new(),
        base_gold_cost: 5000,
        base_turn_cost: 5,
        production: ProductionEffect::GoldPerTurn(500),
    }
}

pub fn crystal_observatory() -> BuildingDef {
    BuildingDef {
        id: id("crystal_observatory"),
        name: "Crystal Observatory".to_string(),
        description: String::new(),
        base_gold_cost: 12_000,
        base_turn_cost: 12,
        production: ProductionEffect::BattleInfoPercent(15),
    }
}

pub fn shadow_apprentice() -> EnemyDef {
    EnemyDef {
        id: id("shadow_apprentice"),
        name: "Shadow Apprentice".to_string(),
        element: Element::Dark,
        level: 1,
        max_hp: 80,
        max_mana: 40,
        attack: 25,
        defense: 15,
    }
}

pub fn light_seraph() -> EnemyDef {
    EnemyDef {
        id: id("light_seraph"),
        name: "Light Seraph".to_string(),
        element: Element::Light,
        level: 4,
        max_hp: 200,
        max_mana: 100,
        attack: 40,
        defense: 30,
    }
}

pub fn fire_legion() -> GuildDef {
    GuildDef {
        id: id("fire_legion"),
        name: "Fire Legion".to_string(),
        description: String::new(),
        member_count: 24,
        max_members: 50,
        level: 15,
        element: Some(Element::Fire),
        is_public: true,
        leader_name: "Pyroblast".to_string(),
    }
}

pub fn full_guild() -> GuildDef {
    GuildDef {
        id: id("crowded_hall"),
        name: "Crowded Hall".to_string(),
        description: String::new(),
        member_count: 30,
        max_members: 30,
        level: 3,
        element: None,
        is_public: true,
        leader_name: "Doorkeeper".to_string(),
    }
}

pub fn catalog() -> CatalogIndex {
    let mut builder = CatalogBuilder::new();
    for spell in [
        fireball(),
        ice_shard(),
        lightning_bolt(),
        inferno_storm(),
        magic_shield(),
    ] {
        builder.add_spell(spell).unwrap();
    }
    builder.add_building(ethereal_vault()).unwrap();
    builder.add_building(crystal_observatory()).unwrap();
    builder.add_enemy(shadow_apprentice()).unwrap();
    builder.add_enemy(light_seraph()).unwrap();
    builder.add_guild(fire_legion()).unwrap();
    builder.add_guild(full_guild()).unwrap();
    builder.build().unwrap()
}
