//! Player state: the creature record plus item-decay bookkeeping.

use crate::game::entity::{Creature, Item};

/// Floor for the player's max health under decay.
const MIN_MAX_HEALTH: i32 = 5;
/// Floor for the player's speed under decay.
const MIN_SPEED: i32 = 5;
/// Floor for the player's attack damage under decay.
const MIN_ATTACK_DAMAGE: i32 = 2;

/// The player: a creature plus the decay state from consumed items.
///
/// The four decay sequences are parallel: index `i` across all four describes
/// the `i`-th still-active consumed item. They always have equal length.
#[derive(Debug, Clone)]
pub struct Player {
    /// The player's creature record.
    pub creature: Creature,
    max_health_decay: Vec<i32>,
    speed_decay: Vec<i32>,
    attack_damage_decay: Vec<i32>,
    decay_turns_left: Vec<i32>,
}

impl Player {
    pub(crate) fn new(creature: Creature) -> Self {
        Self {
            creature,
            max_health_decay: Vec::new(),
            speed_decay: Vec::new(),
            attack_damage_decay: Vec::new(),
            decay_turns_left: Vec::new(),
        }
    }

    /// Whether the player is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.creature.is_alive()
    }

    /// Number of consumed-item effects currently active.
    #[must_use]
    pub fn active_decays(&self) -> usize {
        self.decay_turns_left.len()
    }

    /// Check that the four parallel decay sequences have equal length.
    #[must_use]
    pub fn decay_sequences_aligned(&self) -> bool {
        let len = self.decay_turns_left.len();
        self.max_health_decay.len() == len
            && self.speed_decay.len() == len
            && self.attack_damage_decay.len() == len
    }

    /// Apply a consumed item: boosts now, decays registered for later.
    ///
    /// Score is the game state's concern; the item's `score_boost` is not
    /// applied here.
    pub(crate) fn consume(&mut self, item: &Item) {
        self.max_health_decay.push(item.max_health_decay);
        self.speed_decay.push(item.speed_decay);
        self.attack_damage_decay.push(item.attack_decay);
        self.decay_turns_left.push(item.decay_duration);

        self.creature.max_health += item.max_health_boost;
        self.creature.speed += item.speed_boost;
        self.creature.attack_damage += item.attack_boost;
        if self.creature.curr_health > self.creature.max_health {
            self.creature.curr_health = self.creature.max_health;
        }
        self.creature.heal(item.curr_health_boost);
    }

    /// Apply the summed decay of all active effects to the current stats.
    ///
    /// Each stat is floored at its fixed minimum, and current health is
    /// re-clamped to the (possibly lowered) max. Runs exactly once per
    /// player-initiated turn, after the action resolves.
    pub(crate) fn decay(&mut self) {
        let max_health_cut: i32 = self.max_health_decay.iter().sum();
        let speed_cut: i32 = self.speed_decay.iter().sum();
        let attack_cut: i32 = self.attack_damage_decay.iter().sum();

        self.creature.max_health = (self.creature.max_health - max_health_cut).max(MIN_MAX_HEALTH);
        self.creature.speed = (self.creature.speed - speed_cut).max(MIN_SPEED);
        self.creature.attack_damage =
            (self.creature.attack_damage - attack_cut).max(MIN_ATTACK_DAMAGE);

        if self.creature.curr_health > self.creature.max_health {
            self.creature.curr_health = self.creature.max_health;
        }
    }

    /// Count down each active effect, dropping the ones that expired.
    ///
    /// Iterates in reverse index order: removal by index must not shift
    /// entries that have not been visited yet. An expired index is removed
    /// from all four sequences, keeping them parallel.
    pub(crate) fn decay_countdown(&mut self) {
        for index in (0..self.decay_turns_left.len()).rev() {
            self.decay_turns_left[index] -= 1;

            if self.decay_turns_left[index] <= 0 {
                self.decay_turns_left.remove(index);
                self.max_health_decay.remove(index);
                self.speed_decay.remove(index);
                self.attack_damage_decay.remove(index);
            }
        }
    }
}
