#![no_main]

//! Full session fuzzer.
//!
//! Drives a complete game through arbitrary interaction streams and checks
//! the engine's invariants after every step:
//! 1. Build a session from a fuzzer-chosen seed and grid size
//! 2. Feed it arbitrary tile interactions (mostly rejected, some valid)
//! 3. Assert the invariant sweep stays clean throughout
//!
//! This catches integration bugs (scheduler, sweeps, spawning) that the
//! per-module unit tests miss.

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tilebound::game::{
    BoostTemplate, CreatureTemplate, GameConfig, GameState, ItemTemplate, Position, StatTemplate,
    check_invariants,
};

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    /// RNG seed for the engine.
    seed: u64,
    /// Grid width (capped to keep runtime bounded).
    width: u8,
    /// Grid height (capped likewise).
    height: u8,
    /// Interaction stream as raw coordinates.
    interactions: Vec<(i8, i8)>,
}

fn flat(base: i32) -> StatTemplate {
    StatTemplate { base, scale: 0.0 }
}

fn fuzz_config(width: i32, height: i32) -> GameConfig {
    let mut enemies = BTreeMap::new();
    enemies.insert(
        "grunt".to_string(),
        CreatureTemplate {
            sprite: "grunt.png".to_string(),
            health: flat(4),
            attack: flat(1),
            speed: flat(8),
        },
    );
    enemies.insert(
        "stalker".to_string(),
        CreatureTemplate {
            sprite: "stalker.png".to_string(),
            health: StatTemplate {
                base: 6,
                scale: 0.5,
            },
            attack: StatTemplate {
                base: 2,
                scale: 0.25,
            },
            speed: flat(12),
        },
    );

    let mut items = BTreeMap::new();
    items.insert(
        "apple".to_string(),
        ItemTemplate {
            sprite: "apple.png".to_string(),
            max_health: BoostTemplate { boost: 0, decay: 0 },
            speed: BoostTemplate { boost: 0, decay: 0 },
            attack: BoostTemplate { boost: 0, decay: 0 },
            score_boost: 5,
            curr_health_boost: 2,
            decay_duration: 1,
        },
    );
    items.insert(
        "sword".to_string(),
        ItemTemplate {
            sprite: "sword.png".to_string(),
            max_health: BoostTemplate { boost: 0, decay: 0 },
            speed: BoostTemplate { boost: 0, decay: 1 },
            attack: BoostTemplate { boost: 5, decay: 1 },
            score_boost: 15,
            curr_health_boost: 0,
            decay_duration: 3,
        },
    );

    GameConfig {
        width,
        height,
        player: CreatureTemplate {
            sprite: "player.png".to_string(),
            health: flat(30),
            attack: flat(3),
            speed: flat(10),
        },
        enemies,
        items,
    }
}

fuzz_target!(|input: SessionInput| {
    // Cap dimensions and stream length to keep a single case fast.
    let width = i32::from(input.width % 12) + 1;
    let height = i32::from(input.height % 12) + 1;
    let interactions: Vec<_> = input.interactions.into_iter().take(200).collect();

    let mut game = match GameState::new_game(fuzz_config(width, height), input.seed) {
        Ok(game) => game,
        Err(_) => return,
    };

    let violations = check_invariants(&game);
    assert!(
        violations.is_empty(),
        "Invariants violated at start: {violations:?}"
    );

    let mut last_score = game.score();
    for (x, y) in interactions {
        if game.is_game_over() {
            break;
        }

        game.interact_with_tile(Position::new(i32::from(x), i32::from(y)));

        let violations = check_invariants(&game);
        assert!(
            violations.is_empty(),
            "Invariants violated mid-game: {violations:?}"
        );
        assert!(game.score() >= last_score, "Score went backwards");
        last_score = game.score();

        // Control is either back with the player or the game has ended.
        assert!(
            game.is_player_turn() || game.is_game_over() || game.current_actor().is_none(),
            "Scheduler returned mid-enemy-turn"
        );
    }
});
