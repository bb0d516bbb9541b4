/// Integration tests for game logic
///
/// These tests drive whole battles and the app state machine through the
/// public API: waves, targeting, placement, rewards and scene changes.
use drones::input::InputAction;
use drones::scene::{PLAY_BUTTON, shop_slot};
use drones::sketch::Point;
use drones::{
    App, Battle, BattleSettings, Config, DroneKind, Outcome, PlacementError, Scene, Side, validate_catalog,
};

fn settings(seed: u64) -> BattleSettings {
    BattleSettings {
        starting_money: 1000,
        wave_interval: 30,
        seed: Some(seed),
    }
}

#[test]
fn test_catalog_validates() {
    assert!(validate_catalog().is_ok());
}

#[test]
fn test_all_waves_spawn_in_order() {
    let mut battle = Battle::new(settings(1));
    let total = battle.total_waves();
    assert!(total > 0);

    let mut spawned = 0;
    for _ in 0..(total as u64 + 1) * 31 {
        battle.tick();
        spawned = spawned.max(battle.waves_spawned());
        if battle.outcome() != Outcome::Ongoing {
            break;
        }
    }
    assert!(spawned >= 1);
    assert!(battle.waves_spawned() <= total);
}

#[test]
fn test_undefended_base_is_lost() {
    let mut battle = Battle::new(settings(2));
    let mut outcome = Outcome::Ongoing;
    for _ in 0..20_000 {
        battle.tick();
        outcome = battle.outcome();
        if outcome != Outcome::Ongoing {
            break;
        }
    }
    assert_eq!(outcome, Outcome::Lost);
    assert!(battle.enemy.iter().any(|unit| unit.y > 700.0));
}

#[test]
fn test_defenders_destroy_weak_enemy() {
    let mut battle = Battle::new(settings(3));
    battle.place(DroneKind::GunnerDrone, 15, 12).unwrap();
    battle.place(DroneKind::FighterDrone, 14, 11).unwrap();
    battle.push_character(Side::Enemy, DroneKind::WeakDrone, 300.0, 250.0, Some((0.0, 0.0)));

    let money = battle.money;
    for _ in 0..2_000 {
        battle.tick();
        if battle.kills > 0 {
            break;
        }
    }

    assert!(battle.kills >= 1);
    assert!(battle.money >= money + DroneKind::WeakDrone.spec().price / 2);
}

#[test]
fn test_targeting_follows_closest_enemy() {
    let mut battle = Battle::new(settings(4));
    battle.push_character(Side::Player, DroneKind::Drone, 300.0, 500.0, Some((0.0, 0.0)));
    battle.push_character(Side::Enemy, DroneKind::Drone, 100.0, 100.0, Some((0.0, 0.0)));
    battle.push_character(Side::Enemy, DroneKind::Drone, 320.0, 420.0, Some((0.0, 0.0)));

    let (index, _) = battle.nearest_enemy(Side::Player, 0).unwrap();
    assert_eq!(index, 1);

    // Enemy side looks the other way
    let (index, distance) = battle.nearest_enemy(Side::Enemy, 1).unwrap();
    assert_eq!(index, 0);
    assert!((distance - (20.0f64.powi(2) + 80.0f64.powi(2)).sqrt()).abs() < 1e-9);
}

#[test]
fn test_placement_budget() {
    let mut battle = Battle::new(BattleSettings {
        starting_money: 30,
        ..settings(5)
    });

    battle.place(DroneKind::Drone, 15, 12).unwrap();
    assert_eq!(battle.money, 5);
    assert_eq!(
        battle.place(DroneKind::WeakDrone, 16, 12),
        Err(PlacementError::InsufficientFunds { price: 10, money: 5 })
    );
    battle.place(DroneKind::DumbDrone, 16, 12).unwrap();
    assert_eq!(battle.money, 0);
}

#[test]
fn test_seeded_battles_are_reproducible() {
    let run = |seed| {
        let mut battle = Battle::new(settings(seed));
        battle.place(DroneKind::Plane, 15, 12).unwrap();
        for _ in 0..400 {
            battle.tick();
        }
        battle
            .enemy
            .iter()
            .map(|unit| (unit.x, unit.y, unit.health))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(9), run(9));
}

#[test]
fn test_app_play_flow() {
    let mut app = App::new(Config {
        seed: Some(11),
        ..Config::default()
    });

    let play = Point::new(PLAY_BUTTON.x, PLAY_BUTTON.y);
    app.process_actions(&[InputAction::PointerMoved(play), InputAction::Click(play)]);
    assert_eq!(app.scene(), Scene::Game);

    while app.transition().is_active() {
        app.update();
    }

    let slot = shop_slot(4);
    let slot_point = Point::new(slot.x, slot.y);
    app.process_actions(&[InputAction::Click(slot_point)]);
    assert_eq!(app.selected_slot(), Some(4));

    let tile = Point::new(300.0, 450.0);
    app.process_actions(&[InputAction::PointerMoved(tile), InputAction::Click(tile)]);
    assert_eq!(app.battle().player.len(), 1);
    assert_eq!(app.battle().player[0].kind, DroneKind::FighterDrone);
}

#[test]
fn test_app_result_screen_returns_home() {
    let mut app = App::new(Config {
        seed: Some(12),
        wave_interval: 1,
        ..Config::default()
    });

    let play = Point::new(PLAY_BUTTON.x, PLAY_BUTTON.y);
    app.process_actions(&[InputAction::Click(play)]);

    for _ in 0..50_000 {
        app.update();
        if matches!(app.scene(), Scene::Win | Scene::Lose) {
            break;
        }
    }
    assert_eq!(app.scene(), Scene::Lose);

    while app.transition().is_active() {
        app.update();
    }
    let anywhere = Point::new(10.0, 10.0);
    app.process_actions(&[InputAction::Click(anywhere)]);
    assert_eq!(app.scene(), Scene::Home);
}
