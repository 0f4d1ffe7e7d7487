//! End-to-end scenario tests for the simulation core.
//!
//! These drive full games through the public interface only: construction,
//! staged spawns, `interact_with_tile`, and the observable accessors.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use tilebound::{
    BoostTemplate, CreatureTemplate, EntityKind, GameConfig, GameState, ItemTemplate, Position,
    StatTemplate, check_invariants,
};

fn flat(base: i32) -> StatTemplate {
    StatTemplate { base, scale: 0.0 }
}

fn creature(sprite: &str, health: i32, attack: i32, speed: i32) -> CreatureTemplate {
    CreatureTemplate {
        sprite: sprite.to_string(),
        health: flat(health),
        attack: flat(attack),
        speed: flat(speed),
    }
}

fn apple() -> ItemTemplate {
    ItemTemplate {
        sprite: "apple.png".to_string(),
        max_health: BoostTemplate { boost: 0, decay: 0 },
        speed: BoostTemplate { boost: 0, decay: 0 },
        attack: BoostTemplate { boost: 0, decay: 0 },
        score_boost: 5,
        curr_health_boost: 2,
        decay_duration: 1,
    }
}

fn config_with(
    player: CreatureTemplate,
    enemies: &[(&str, CreatureTemplate)],
) -> GameConfig {
    let mut enemy_map = BTreeMap::new();
    for (name, template) in enemies {
        enemy_map.insert((*name).to_string(), template.clone());
    }
    let mut items = BTreeMap::new();
    items.insert("apple".to_string(), apple());
    GameConfig {
        width: 5,
        height: 5,
        player,
        enemies: enemy_map,
        items,
    }
}

/// Faster creatures reach the turn-meter threshold first: an enemy with
/// twice the player's speed takes its turn before the player's first turn
/// comes up.
#[test]
fn test_faster_enemy_acts_before_slower_player() {
    let config = config_with(
        creature("player.png", 10, 2, 2),
        &[("stalker", creature("stalker.png", 6, 1, 4))],
    );
    let mut game = GameState::new(config, 42).unwrap();
    assert!(game.spawn_enemy(Position::new(4, 4), "stalker").unwrap());

    game.advance_time();

    // Control came back on the player's turn, and the stalker already spent
    // a turn stepping diagonally toward the player.
    assert!(game.is_player_turn());
    assert_eq!(game.current_actor(), Some(Position::new(0, 0)));
    assert!(game.grid().is_empty(Position::new(4, 4)));
    assert_eq!(
        game.grid().entity_at(Position::new(3, 3)).map(|e| e.kind()),
        Some(EntityKind::Enemy)
    );
}

/// Consuming an adjacent item heals (capped at max), raises the score, and
/// empties the tile.
#[test]
fn test_item_consumption_updates_observables() {
    let config = config_with(creature("player.png", 10, 2, 10), &[]);
    let mut game = GameState::new(config, 9).unwrap();
    assert!(game.spawn_item(Position::new(0, 1), "apple").unwrap());
    game.advance_time();

    let max_health = game.player().creature.max_health;
    assert!(game.interact_with_tile(Position::new(0, 1)));

    // Already at full health: the heal is capped, the rest lands.
    assert_eq!(game.player().creature.curr_health, max_health);
    assert_eq!(game.score(), 5);
    assert!(game.grid().is_empty(Position::new(0, 1)));
}

/// An enemy grinding the player down to zero health ends the game, and the
/// latch can never be unset afterwards.
#[test]
fn test_player_death_latches_game_over() {
    let config = config_with(
        creature("player.png", 10, 2, 2),
        &[("bruiser", creature("bruiser.png", 50, 4, 4))],
    );
    let mut game = GameState::new(config, 17).unwrap();
    assert!(game.spawn_enemy(Position::new(1, 1), "bruiser").unwrap());
    game.advance_time();

    let mut guard = 0;
    while !game.is_game_over() {
        assert!(game.is_player_turn());
        assert!(game.interact_with_tile(Position::new(1, 1)));
        guard += 1;
        assert!(guard < 20, "game should have ended by now");
    }

    assert!(!game.player().is_alive());
    assert!(game.is_game_over());
    // No action can revive the session.
    assert!(!game.interact_with_tile(Position::new(0, 1)));
    assert!(!game.interact_with_tile(Position::new(1, 1)));
    assert!(game.is_game_over());
}

/// Rejected interactions mutate nothing.
#[test]
fn test_rejected_interactions_leave_state_unchanged() {
    let config = config_with(
        creature("player.png", 10, 2, 10),
        &[("grunt", creature("grunt.png", 4, 1, 8))],
    );
    let mut game = GameState::new(config, 23).unwrap();
    assert!(game.spawn_enemy(Position::new(4, 4), "grunt").unwrap());
    game.advance_time();

    let health = game.player().creature.curr_health;
    let score = game.score();
    let position = game.player().creature.position;

    // Out of bounds, non-adjacent empty, non-adjacent enemy, own tile.
    assert!(!game.interact_with_tile(Position::new(-1, 0)));
    assert!(!game.interact_with_tile(Position::new(9, 9)));
    assert!(!game.interact_with_tile(Position::new(3, 0)));
    assert!(!game.interact_with_tile(Position::new(4, 4)));
    assert!(!game.interact_with_tile(Position::new(0, 0)));

    assert_eq!(game.player().creature.curr_health, health);
    assert_eq!(game.score(), score);
    assert_eq!(game.player().creature.position, position);
    assert!(game.is_player_turn());
}

fn observable_snapshot(game: &GameState) -> (Vec<(Position, EntityKind)>, i32, i32, u32, bool) {
    let tiles = game
        .grid()
        .iter()
        .map(|(position, entity)| (position, entity.kind()))
        .collect();
    (
        tiles,
        game.player().creature.curr_health,
        game.player().creature.max_health,
        game.score(),
        game.is_game_over(),
    )
}

fn scripted_game(seed: u64) -> GameState {
    let config = config_with(
        creature("player.png", 12, 3, 8),
        &[
            ("grunt", creature("grunt.png", 4, 1, 8)),
            ("stalker", creature("stalker.png", 6, 2, 12)),
        ],
    );
    let mut game = GameState::new_game(config, seed).unwrap();

    let mut script = SmallRng::seed_from_u64(0xD1CE);
    for _ in 0..60 {
        if game.is_game_over() {
            break;
        }
        let target = Position::new(script.gen_range(0..5), script.gen_range(0..5));
        game.interact_with_tile(target);
    }
    game
}

/// Same seed, same configuration, same interaction script: identical
/// observable state at the end.
#[test]
fn test_identical_seeds_replay_identically() {
    let a = scripted_game(1234);
    let b = scripted_game(1234);
    assert_eq!(observable_snapshot(&a), observable_snapshot(&b));
}

/// Different seeds diverge somewhere (spawn layout, timers, or templates).
#[test]
fn test_different_seeds_diverge() {
    let a = scripted_game(1);
    let b = scripted_game(2);
    // Extremely unlikely to match tile-for-tile; the point is that the seed
    // is the only source of variation.
    assert_ne!(observable_snapshot(&a), observable_snapshot(&b));
}

/// Invariants hold after every interaction of a long random game, and
/// control is always back on the player's turn while the game is live.
#[test]
fn test_invariants_hold_through_random_play() {
    for seed in 0..8 {
        let config = config_with(
            creature("player.png", 20, 3, 10),
            &[
                ("grunt", creature("grunt.png", 4, 1, 8)),
                ("stalker", creature("stalker.png", 6, 2, 12)),
            ],
        );
        let mut game = GameState::new_game(config, seed).unwrap();
        let mut script = SmallRng::seed_from_u64(seed.wrapping_mul(31));

        for step in 0..120 {
            if game.is_game_over() {
                break;
            }
            assert!(game.is_player_turn(), "seed {seed} step {step}");
            let target = Position::new(script.gen_range(0..5), script.gen_range(0..5));
            game.interact_with_tile(target);

            let violations = check_invariants(&game);
            assert!(
                violations.is_empty(),
                "seed {seed} step {step}: {violations:?}"
            );
        }
    }
}

/// The score only ever goes up.
#[test]
fn test_score_is_monotone() {
    let config = config_with(
        creature("player.png", 20, 3, 10),
        &[("grunt", creature("grunt.png", 4, 1, 8))],
    );
    let mut game = GameState::new_game(config, 77).unwrap();
    let mut script = SmallRng::seed_from_u64(77);

    let mut last = game.score();
    for _ in 0..80 {
        if game.is_game_over() {
            break;
        }
        let target = Position::new(script.gen_range(0..5), script.gen_range(0..5));
        game.interact_with_tile(target);
        assert!(game.score() >= last);
        last = game.score();
    }
}
