//! Skirmish Example
//!
//! Creates a fire mage, raises a vault, researches Fireball and fights the
//! Shadow Apprentice until the battle resolves.
//!
//! ```text
//! cargo run -p skirmish                 # in-memory store
//! cargo run -p skirmish -- game.db 42   # native_db file, rng seed 42
//! ```

use astral_core::{
    BuildingId, Character, EnemyId, Element, Game, GameRng, GameStore, GuildId, MemoryStore,
    ResourceDelta, RoundOutcome, SpellId,
};
use astral_db::DbStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skirmish=info,astral_core=info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let db_path = args.next();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    let result = match db_path {
        Some(path) => DbStore::open(&path)
            .map_err(BoxError::from)
            .and_then(|store| run(store, seed)),
        None => run(MemoryStore::new(), seed),
    };

    if let Err(e) = result {
        tracing::error!("Skirmish failed: {}", e);
        std::process::exit(1);
    }
}

fn run<S: GameStore>(store: S, seed: u64) -> Result<(), BoxError> {
    println!("=== Astral Skirmish ===\n");

    let catalog = Arc::new(astral_content::standard_catalog()?);
    let config = astral_content::default_config()?;
    let mut game = Game::new(catalog, config, store);
    let mut rng = GameRng::new(seed);

    let mage = game.create_character("Ignatius", Element::Fire)?;
    let profile = mage.element().profile();
    println!("{} the {} mage ({})", mage.username, profile.name, profile.bonus);
    print_ledger(&game, &mage)?;

    let vault: BuildingId = "ethereal_vault".parse()?;
    let quote = game.build_or_upgrade(mage.id, &vault)?;
    println!(
        "\nBuilt {} (level {}) for {} gold, {} turns",
        vault, quote.target_level, quote.cost.gold, quote.cost.turns
    );
    match game.build_or_upgrade(mage.id, &vault) {
        Ok(_) => println!("Upgraded {}", vault),
        Err(e) => println!("Upgrade refused: {}", e),
    }

    let fireball: SpellId = "fireball".parse()?;
    match game.research_spell(mage.id, &fireball) {
        Ok(_) => println!("Researched {}", fireball),
        Err(e) => println!("Research refused: {}", e),
    }
    game.store()
        .persist_resource_delta(mage.id, &ResourceDelta::zero().with_gold(10_000))?;
    game.research_spell(mage.id, &fireball)?;
    println!("Researched {} after a gold grant", fireball);
    print_ledger(&game, &mage)?;

    println!("\n--- Battle ---");
    let enemy: EnemyId = "shadow_apprentice".parse()?;
    game.start_battle(mage.id, &enemy)?;
    loop {
        let report = game.cast_spell(mage.id, &fireball, &mut rng)?;
        if report.outcome != RoundOutcome::Continue {
            break;
        }
        let report = game.resolve_enemy_turn(mage.id, &mut rng)?;
        if report.outcome != RoundOutcome::Continue {
            break;
        }
    }

    if let Some(session) = game.battle(mage.id) {
        for line in session.log().iter() {
            println!("  {}", line);
        }
        println!(
            "Result: {:?} after {} enemy turns (hp {}/{})",
            session.status(),
            session.rounds(),
            session.player_hp(),
            session.player_max_hp()
        );
    }
    game.reset_battle(mage.id);

    let guild: GuildId = "fire_legion".parse()?;
    let membership = game.join_guild(mage.id, &guild)?;
    println!("\nJoined {} as {}", membership.guild_id, membership.role);

    print_ledger(&game, &mage)?;
    println!("\n=== Done ===");
    Ok(())
}

fn print_ledger<S: GameStore>(game: &Game<S>, mage: &Character) -> Result<(), BoxError> {
    let l = game.character(mage.id)?.ledger();
    println!(
        "  gold {} | mana {}/{} | turns {} | diamonds {}",
        l.gold, l.mana, l.max_mana, l.turns, l.diamonds
    );
    Ok(())
}
