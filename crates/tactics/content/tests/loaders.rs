//! Loads the bundled data directory and fights a short battle with it.

use std::path::PathBuf;

use tactics_content::{CatalogLoader, ContentFactory, MapLoader};
use tactics_core::state::{ItemId, TemplateId};
use tactics_core::{
    AttackOutcome, Capabilities, CatalogOracle, FactionId, GridWorld, TileIndex, UnitCategory,
    WorldOracle,
};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn tile(world: &GridWorld, x: u32, y: u32) -> TileIndex {
    world.index(x, y)
}

#[test]
fn bundled_catalog_parses() {
    let catalog = ContentFactory::new(data_dir()).load_catalog().unwrap();

    let archer = catalog.template(&TemplateId::new("archer")).unwrap();
    assert_eq!(
        archer.capabilities,
        Capabilities::ATTACK_AIR | Capabilities::MELEE_FALLBACK
    );
    assert_eq!(archer.max_ammo, 10);

    let galley = catalog.template(&TemplateId::new("galley")).unwrap();
    assert_eq!(galley.category, UnitCategory::Ship);
    assert_eq!(galley.transport_capacity, 2);

    let bow = catalog.item(&ItemId::new("bow")).unwrap();
    assert!(bow.is_ranged());
}

#[test]
fn bundled_config_overrides_defaults() {
    let config = ContentFactory::new(data_dir()).load_config().unwrap();
    assert_eq!(config.experience_per_level, 5.0);
    assert_eq!(config.morale_recovery_per_turn, 10.0);
}

#[test]
fn river_map_has_a_single_ford() {
    let world = ContentFactory::new(data_dir())
        .load_map("river_crossing")
        .unwrap();
    assert_eq!((world.width(), world.height()), (6, 4));

    let land_in_river: Vec<u32> = (0..world.height())
        .filter(|&y| {
            world
                .tile(tile(&world, 2, y))
                .is_some_and(|tile| tile.is_land)
        })
        .collect();
    assert_eq!(land_in_river, vec![1]);

    let hill = world.tile(tile(&world, 4, 0)).unwrap();
    assert!(hill.is_hill);
    assert!(!world.tile(tile(&world, 5, 3)).unwrap().is_passable);
}

#[test]
fn battle_from_bundled_content() {
    let factory = ContentFactory::new(data_dir());
    let world = factory.load_map("river_crossing").unwrap();
    let mut field = factory.battle("river_crossing").unwrap().build();
    assert!(field.is_battle());

    let swordsman = field
        .spawn_unit("swordsman", FactionId(1), tile(&world, 1, 1))
        .unwrap();
    let spearman = field
        .spawn_unit("spearman", FactionId(2), tile(&world, 2, 1))
        .unwrap();
    assert_eq!(field.stats(swordsman).unwrap().attack, 10);

    let outcome = field.attack(swordsman, spearman).unwrap();
    let AttackOutcome::Melee { strike, counter, .. } = outcome else {
        panic!("expected melee, got {outcome:?}");
    };
    assert_eq!(strike.damage(), 6);
    assert_eq!(counter.map(|c| c.damage()), Some(3));
    assert_eq!(field.unit(spearman).unwrap().health, 4);
    assert_eq!(field.unit(spearman).unwrap().morale, 44.0);
    assert_eq!(field.unit(swordsman).unwrap().health, 7);

    // wading into the river is not allowed
    assert!(!field.can_move_to(swordsman, tile(&world, 2, 0)));

    assert!(field.research(FactionId(1), "bronze_working"));
    assert_eq!(field.stats(swordsman).unwrap().attack, 11);
}

#[test]
fn broken_files_report_their_format() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("catalog.ron");
    std::fs::write(&catalog, "(templates: [ (id: ").unwrap();
    let err = CatalogLoader::load(&catalog).unwrap_err();
    assert!(err.to_string().contains("catalog RON"));

    let map = dir.path().join("map.ron");
    std::fs::write(&map, "(tiles: [])").unwrap();
    let err = MapLoader::load(&map).unwrap_err();
    assert!(err.to_string().contains("map RON"));
}
