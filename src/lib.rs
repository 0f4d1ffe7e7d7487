// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Tilebound: a deterministic turn-based grid-game engine.
//!
//! This crate is the simulation core of a small grid game: a player creature
//! moves on a fixed rectangular grid, fights enemies, consumes items, and
//! accumulates score while a turn-meter scheduler interleaves player and
//! enemy turns. It is designed to be consumed by any front end: the only
//! inbound mutator is [`GameState::interact_with_tile`], and the front end
//! polls the observable state after each call. There is no rendering, input
//! handling, audio, persistence, or networking here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   GameState (scheduler, spawning)   │
//! ├─────────────────────────────────────┤
//! │  Grid · Player · Enemy AI · Combat  │
//! ├─────────────────────────────────────┤
//! │   EntityFactory (stat templates)    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Determinism
//!
//! All randomness (spawn positions, template choices, timer reseeds) flows
//! from a single seeded RNG. The same configuration, seed, and interaction
//! sequence always produce the same game.

pub mod error;
pub mod game;

pub use error::{Error, GameResult};

// Re-export key game types at crate root for convenience
pub use game::{
    BoostTemplate, Creature, CreatureTemplate, Entity, EntityFactory, EntityKind, GameConfig,
    GameState, Grid, InvariantViolation, Item, ItemTemplate, Player, Position, StatTemplate,
    TURN_METER_COST, TURN_METER_THRESHOLD, Tile, check_invariants,
};
