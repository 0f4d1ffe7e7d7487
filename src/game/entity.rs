//! Entity model: the closed set of things a tile can hold.

use crate::game::factory::CreatureTemplate;
use crate::game::grid::Position;

/// What a tile holds.
///
/// The variant set is fixed; dispatch is exhaustive pattern matching rather
/// than open-ended polymorphism. Enemy creatures carry their record inline.
/// The player's [`Creature`] record is owned by the game state (there is
/// exactly one player per session, and it outlives its grid slot), so the
/// player's tile holds a marker variant.
#[derive(Debug, Clone)]
pub enum Entity {
    /// Unoccupied tile.
    Empty,
    /// A consumable item.
    Item(Item),
    /// The player's tile. The creature record lives on the game state.
    Player,
    /// An enemy creature.
    Enemy(Creature),
}

impl Entity {
    /// Discriminant of this entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Entity::Empty => EntityKind::Empty,
            Entity::Item(_) => EntityKind::Item,
            Entity::Player => EntityKind::Player,
            Entity::Enemy(_) => EntityKind::Enemy,
        }
    }

    /// Check whether this is the empty entity.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Entity::Empty)
    }

    /// Check whether this entity is a creature (player or enemy).
    #[must_use]
    pub const fn is_creature(&self) -> bool {
        matches!(self, Entity::Player | Entity::Enemy(_))
    }

    /// Sprite identifier carried by the entity, if it carries one inline.
    ///
    /// The player's sprite lives on the game state's player record; empty
    /// tiles have no sprite at all.
    #[must_use]
    pub fn sprite(&self) -> Option<&str> {
        match self {
            Entity::Item(item) => Some(&item.sprite),
            Entity::Enemy(creature) => Some(&creature.sprite),
            Entity::Empty | Entity::Player => None,
        }
    }
}

/// Discriminant-only view of an [`Entity`], for dispatch and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Unoccupied tile.
    Empty,
    /// A consumable item.
    Item,
    /// The player.
    Player,
    /// An enemy creature.
    Enemy,
}

/// A consumable item: an immutable stat bundle.
///
/// Items are created by spawn logic, sit on a tile, and are destroyed when
/// consumed. The boosts apply immediately; the decays are pushed onto the
/// player's decay sequences and wear off after `decay_duration` turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Sprite identifier (opaque to the simulation).
    pub sprite: String,
    /// Added to the player's max health on consumption.
    pub max_health_boost: i32,
    /// Removed from the player's max health each turn while in effect.
    pub max_health_decay: i32,
    /// Added to the player's speed on consumption.
    pub speed_boost: i32,
    /// Removed from the player's speed each turn while in effect.
    pub speed_decay: i32,
    /// Added to the player's attack damage on consumption.
    pub attack_boost: i32,
    /// Removed from the player's attack damage each turn while in effect.
    pub attack_decay: i32,
    /// Added to the score on consumption.
    pub score_boost: u32,
    /// Healing applied to current health on consumption.
    pub curr_health_boost: i32,
    /// Number of turns the decays stay in effect.
    pub decay_duration: i32,
}

/// A creature: the stat record shared by the player and enemies.
#[derive(Debug, Clone)]
pub struct Creature {
    /// Sprite identifier (opaque to the simulation).
    pub sprite: String,
    base_health: i32,
    base_attack: i32,
    base_speed: i32,
    health_scale: f64,
    attack_scale: f64,
    speed_scale: f64,
    /// Current maximum health.
    pub max_health: i32,
    /// Current health, always within `[0, max_health]`.
    pub curr_health: i32,
    /// Current attack damage.
    pub attack_damage: i32,
    /// Current speed: the amount added to the turn meter each scheduler pass.
    pub speed: i32,
    alive: bool,
    /// Turn-meter accumulator; reaching the threshold grants a turn.
    pub turn_meter: i32,
    /// Current grid position. Kept in sync by the grid's move operation.
    pub position: Position,
}

impl Creature {
    /// Build a creature from a stat template at the given position.
    ///
    /// Effective stats start at the template's base values; enemies get them
    /// rescaled against the current score once, at spawn time.
    pub(crate) fn from_template(template: &CreatureTemplate, position: Position) -> Self {
        Self {
            sprite: template.sprite.clone(),
            base_health: template.health.base,
            base_attack: template.attack.base,
            base_speed: template.speed.base,
            health_scale: template.health.scale,
            attack_scale: template.attack.scale,
            speed_scale: template.speed.scale,
            max_health: template.health.base,
            curr_health: template.health.base,
            attack_damage: template.attack.base,
            speed: template.speed.base,
            alive: true,
            turn_meter: 0,
            position,
        }
    }

    /// Whether the creature is alive. Latches to `false` on death; there is
    /// no resurrection.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Apply incoming damage, clamping health at zero.
    ///
    /// Health reaching zero kills the creature.
    pub fn take_damage(&mut self, amount: i32) {
        self.curr_health = self.curr_health.saturating_sub(amount).max(0);
        if self.curr_health == 0 {
            self.alive = false;
        }
    }

    /// Restore health, clamped at the current maximum.
    pub fn heal(&mut self, amount: i32) {
        self.curr_health = self.curr_health.saturating_add(amount).min(self.max_health);
    }

    /// Rescale effective stats to `round(base + scale * score)`.
    ///
    /// Called exactly once, when an enemy spawns; enemies do not get stronger
    /// mid-life.
    pub(crate) fn adjust_stats(&mut self, score: u32) {
        self.max_health = scaled(self.base_health, self.health_scale, score);
        self.curr_health = self.max_health;
        self.attack_damage = scaled(self.base_attack, self.attack_scale, score);
        self.speed = scaled(self.base_speed, self.speed_scale, score);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scaled(base: i32, scale: f64, score: u32) -> i32 {
    (f64::from(base) + scale * f64::from(score)).round() as i32
}

/// Kani formal verification proofs.
///
/// These prove clamp properties for the health arithmetic.
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    /// Prove the damage clamp keeps health in `[0, before]` for any
    /// non-negative damage amount.
    #[kani::proof]
    fn prove_damage_clamp_bounds() {
        let before: i32 = kani::any();
        let amount: i32 = kani::any();
        kani::assume(before >= 0);
        kani::assume(amount >= 0);

        // Mirror the clamp in Creature::take_damage
        let after = before.saturating_sub(amount).max(0);
        assert!(after >= 0);
        assert!(after <= before);
    }

    /// Prove healing never exceeds the maximum.
    #[kani::proof]
    fn prove_heal_clamp_bounds() {
        let curr: i32 = kani::any();
        let max: i32 = kani::any();
        let amount: i32 = kani::any();
        kani::assume(curr >= 0 && max >= curr);
        kani::assume(amount >= 0);

        let after = curr.saturating_add(amount).min(max);
        assert!(after <= max);
        assert!(after >= curr || after == max);
    }
}
