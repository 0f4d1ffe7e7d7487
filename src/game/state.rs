//! Game state: the aggregate root that owns the grid, the player, and the
//! turn flow.
//!
//! The engine is single-threaded and synchronous. A player action triggers
//! the scheduler, which may resolve any number of enemy turns before control
//! returns to the caller; the whole chain happens on one call stack, and no
//! two actors ever mutate state concurrently.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, GameResult};
use crate::game::combat::{can_attack, is_adjacent, step_toward};
use crate::game::entity::{Entity, EntityKind};
use crate::game::factory::{EntityFactory, GameConfig};
use crate::game::grid::{Grid, Position};
use crate::game::player::Player;

/// Turn-meter value a creature must reach to be granted a turn.
pub const TURN_METER_THRESHOLD: i32 = 100;

/// Amount debited from the actor's turn meter when its turn ends.
///
/// Debited, not reset: overflow above the threshold is preserved.
pub const TURN_METER_COST: i32 = 100;

/// Inclusive range the spawn timers are reseeded from.
const SPAWN_TIMER_RANGE: std::ops::RangeInclusive<i32> = 5..=20;

/// The complete state of one game session.
///
/// Created once per session and discarded on "play again". The only
/// player-driven mutator is [`GameState::interact_with_tile`]; everything
/// else the front end needs is read through the observable accessors after
/// each call.
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    player: Player,
    factory: EntityFactory,
    rng: SmallRng,
    current_actor: Option<Position>,
    score: u32,
    enemy_spawn_timer: i32,
    item_spawn_timer: i32,
    game_over: bool,
}

impl GameState {
    /// Create a bare session: the player at (0, 0) on an otherwise empty
    /// grid, spawn timers seeded, scheduler not yet run.
    ///
    /// Use this when the front end stages its own layout with
    /// [`GameState::spawn_enemy`] / [`GameState::spawn_item`], then starts
    /// the clock with [`GameState::advance_time`]. For the standard opening
    /// see [`GameState::new_game`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a degenerate grid and
    /// [`Error::InvalidTemplate`] if the player template cannot act (zero or
    /// negative speed).
    pub fn new(config: GameConfig, seed: u64) -> GameResult<Self> {
        if config.player.speed.base < 1 {
            return Err(Error::InvalidTemplate {
                name: "player".to_string(),
                reason: "speed base must be at least 1".to_string(),
            });
        }

        let grid = Grid::new(config.width, config.height)?;
        let factory = EntityFactory::new(config.player, config.enemies, config.items);
        let mut rng = SmallRng::seed_from_u64(seed);

        let player = factory.create_player(Position::new(0, 0));
        let enemy_spawn_timer = rng.gen_range(SPAWN_TIMER_RANGE);
        let item_spawn_timer = rng.gen_range(SPAWN_TIMER_RANGE);

        let mut state = Self {
            grid,
            player,
            factory,
            rng,
            current_actor: None,
            score: 0,
            enemy_spawn_timer,
            item_spawn_timer,
            game_over: false,
        };
        state.grid.place(state.player.creature.position, Entity::Player);
        Ok(state)
    }

    /// Create a full session: one random item and one random enemy placed at
    /// distinct random tiles away from the player, and the scheduler run
    /// once so the game opens on somebody's turn.
    ///
    /// # Errors
    ///
    /// Everything [`GameState::new`] returns, plus
    /// [`Error::EmptyTemplateSet`] when the enemy or item template set is
    /// empty.
    pub fn new_game(config: GameConfig, seed: u64) -> GameResult<Self> {
        let mut state = Self::new(config, seed)?;

        if let Some(position) = state.grid.random_empty_position(&mut state.rng) {
            let item = state.factory.create_random_item(&mut state.rng)?;
            state.grid.place(position, Entity::Item(item));
        }
        if let Some(position) = state.grid.random_empty_position(&mut state.rng) {
            let mut enemy = state.factory.create_random_enemy(position, &mut state.rng)?;
            enemy.adjust_stats(state.score);
            state.grid.place(position, Entity::Enemy(enemy));
        }

        state.advance_time();
        Ok(state)
    }

    /// The grid, for rendering and inspection.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The player's record: stats, position, active decays.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Current score. Monotonically non-decreasing within a session.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Whether the session has ended. Latches true when the player dies and
    /// never resets.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Position of the creature currently holding a turn, if any.
    #[must_use]
    pub const fn current_actor(&self) -> Option<Position> {
        self.current_actor
    }

    /// Whether the engine is waiting on a player action.
    #[must_use]
    pub fn is_player_turn(&self) -> bool {
        self.current_actor == Some(self.player.creature.position)
    }

    /// Sprite identifier for the entity at a position, if any.
    #[must_use]
    pub fn sprite_at(&self, position: Position) -> Option<&str> {
        match self.grid.entity_at(position)? {
            Entity::Player => Some(&self.player.creature.sprite),
            entity => entity.sprite(),
        }
    }

    /// Place a specific enemy kind, with stats adjusted to the current
    /// score, onto an empty tile.
    ///
    /// Returns `Ok(false)` without mutation if the tile is occupied or out
    /// of bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntityKind`] for an unconfigured name.
    pub fn spawn_enemy(&mut self, position: Position, name: &str) -> GameResult<bool> {
        let mut enemy = self.factory.create_enemy(position, name)?;
        enemy.adjust_stats(self.score);
        Ok(self.grid.place(position, Entity::Enemy(enemy)))
    }

    /// Place a specific item kind onto an empty tile.
    ///
    /// Returns `Ok(false)` without mutation if the tile is occupied or out
    /// of bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntityKind`] for an unconfigured name.
    pub fn spawn_item(&mut self, position: Position, name: &str) -> GameResult<bool> {
        let item = self.factory.create_item(name)?;
        Ok(self.grid.place(position, Entity::Item(item)))
    }

    /// Resolve a player action against the tile at `target`.
    ///
    /// Only valid while it is the player's turn. Dispatch follows the
    /// target's occupant: empty tile → move, item → consume, enemy →
    /// attack. Every gate failure (wrong turn, out of bounds, not adjacent,
    /// blocked) returns `false` with no state change.
    ///
    /// A successful action runs the player's decay bookkeeping, ends the
    /// turn, and drives enemy turns until the player is up again or dead.
    pub fn interact_with_tile(&mut self, target: Position) -> bool {
        if self.game_over || !self.is_player_turn() {
            return false;
        }

        let acted = match self.grid.entity_at(target).map(Entity::kind) {
            Some(EntityKind::Empty) => self.move_player(target),
            Some(EntityKind::Item) => self.use_item(target),
            Some(EntityKind::Enemy) => self.attack_enemy(target),
            Some(EntityKind::Player) | None => false,
        };

        if acted {
            self.player.decay();
            self.player.decay_countdown();
            self.end_turn();
        }
        acted
    }

    /// Run the turn scheduler until an actor is selected.
    ///
    /// Repeatedly adds each creature's speed to its turn meter in row-major
    /// order, then grants the turn to the first creature (row-major) at or
    /// above the threshold. Enemy turns resolve immediately and the
    /// scheduler re-enters; the call returns once the player is selected,
    /// the player is dead, or no creature can ever reach the threshold.
    ///
    /// Calling this while a turn is already pending is a no-op.
    pub fn advance_time(&mut self) {
        if self.current_actor.is_some() {
            return;
        }
        loop {
            if !self.player.is_alive() {
                return;
            }
            if !self.accumulate_turn_meters() {
                // Stall guard: no alive creature has positive speed, so no
                // meter will ever reach the threshold.
                return;
            }
            if let Some(actor) = self.first_ready_actor() {
                self.current_actor = Some(actor);
                if actor == self.player.creature.position {
                    return;
                }
                self.enemy_turn(actor);
                self.finish_turn();
            }
        }
    }

    /// Add each creature's speed to its meter, row-major. Returns whether
    /// any alive creature can still make scheduling progress.
    fn accumulate_turn_meters(&mut self) -> bool {
        let mut progress = false;
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                match self.grid.entity_at_mut(Position::new(x, y)) {
                    Some(Entity::Enemy(creature)) => {
                        creature.turn_meter += creature.speed;
                        progress |= creature.speed > 0;
                    }
                    Some(Entity::Player) => {
                        let creature = &mut self.player.creature;
                        creature.turn_meter += creature.speed;
                        progress |= creature.speed > 0;
                    }
                    _ => {}
                }
            }
        }
        progress
    }

    /// First creature in row-major order whose meter reached the threshold.
    fn first_ready_actor(&self) -> Option<Position> {
        for (position, entity) in self.grid.iter() {
            let meter = match entity {
                Entity::Enemy(creature) => creature.turn_meter,
                Entity::Player => self.player.creature.turn_meter,
                _ => continue,
            };
            if meter >= TURN_METER_THRESHOLD {
                return Some(position);
            }
        }
        None
    }

    /// Resolve one enemy turn: attack the player when adjacent, otherwise
    /// take one greedy step toward the player. A blocked step forfeits the
    /// turn.
    fn enemy_turn(&mut self, actor: Position) {
        let player_position = self.player.creature.position;

        if is_adjacent(actor, player_position) {
            let Some(Entity::Enemy(creature)) = self.grid.entity_at(actor) else {
                return;
            };
            let damage = creature.attack_damage;
            self.player.creature.take_damage(damage);
        } else {
            let destination = step_toward(actor, player_position);
            if self.grid.move_occupant(actor, destination) {
                self.current_actor = Some(destination);
            }
        }
    }

    /// End the current turn: debit the actor's meter, sweep the dead, run
    /// the spawn timers, and re-enter the scheduler.
    fn end_turn(&mut self) {
        self.finish_turn();
        self.advance_time();
    }

    /// The end-of-turn pipeline without scheduler re-entry.
    fn finish_turn(&mut self) {
        if let Some(actor) = self.current_actor.take() {
            if actor == self.player.creature.position {
                self.player.creature.turn_meter -= TURN_METER_COST;
            } else if let Some(Entity::Enemy(creature)) = self.grid.entity_at_mut(actor) {
                creature.turn_meter -= TURN_METER_COST;
            }
        }

        if !self.player.is_alive() {
            self.game_over = true;
        }

        self.sweep_dead();
        self.tick_spawn_timers();
    }

    /// Replace every dead creature's tile with empty.
    fn sweep_dead(&mut self) {
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let position = Position::new(x, y);
                let dead = match self.grid.entity_at(position) {
                    Some(Entity::Enemy(creature)) => !creature.is_alive(),
                    Some(Entity::Player) => !self.player.is_alive(),
                    _ => false,
                };
                if dead {
                    self.grid.clear(position);
                }
            }
        }
    }

    /// Count down both spawn timers, spawning and reseeding at zero.
    ///
    /// A full grid makes the spawn itself a no-op; the timer still reseeds.
    fn tick_spawn_timers(&mut self) {
        self.enemy_spawn_timer -= 1;
        if self.enemy_spawn_timer <= 0 {
            self.spawn_random_enemy();
            self.enemy_spawn_timer = self.rng.gen_range(SPAWN_TIMER_RANGE);
        }

        self.item_spawn_timer -= 1;
        if self.item_spawn_timer <= 0 {
            self.spawn_random_item();
            self.item_spawn_timer = self.rng.gen_range(SPAWN_TIMER_RANGE);
        }
    }

    fn spawn_random_enemy(&mut self) {
        let Some(position) = self.grid.random_empty_position(&mut self.rng) else {
            return;
        };
        let Ok(mut enemy) = self.factory.create_random_enemy(position, &mut self.rng) else {
            return;
        };
        enemy.adjust_stats(self.score);
        self.grid.place(position, Entity::Enemy(enemy));
    }

    fn spawn_random_item(&mut self) {
        let Some(position) = self.grid.random_empty_position(&mut self.rng) else {
            return;
        };
        let Ok(item) = self.factory.create_random_item(&mut self.rng) else {
            return;
        };
        self.grid.place(position, Entity::Item(item));
    }

    /// Move the player to an adjacent empty tile.
    fn move_player(&mut self, destination: Position) -> bool {
        let origin = self.player.creature.position;
        if !is_adjacent(origin, destination) {
            return false;
        }
        if !self.grid.move_occupant(origin, destination) {
            return false;
        }
        self.player.creature.position = destination;
        if self.current_actor == Some(origin) {
            self.current_actor = Some(destination);
        }
        true
    }

    /// Consume an adjacent item: boosts, decay entries, healing, and score.
    fn use_item(&mut self, target: Position) -> bool {
        let origin = self.player.creature.position;
        if !is_adjacent(origin, target) {
            return false;
        }
        let Some(Entity::Item(item)) = self.grid.entity_at(target) else {
            return false;
        };
        let item = item.clone();
        self.grid.clear(target);
        self.player.consume(&item);
        self.score += item.score_boost;
        true
    }

    /// Strike an adjacent enemy with the player's attack damage.
    fn attack_enemy(&mut self, target: Position) -> bool {
        let origin = self.player.creature.position;
        if !can_attack(origin, target) {
            return false;
        }
        let damage = self.player.creature.attack_damage;
        let Some(Entity::Enemy(creature)) = self.grid.entity_at_mut(target) else {
            return false;
        };
        creature.take_damage(damage);
        true
    }
}
