//! Game invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented engine. They are
//! bug detectors for tests and fuzzing, not gameplay rules.

use crate::game::entity::Entity;
use crate::game::state::GameState;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let player = state.player();
    let player_position = player.creature.position;

    // Player health bounds
    if player.creature.curr_health < 0 || player.creature.curr_health > player.creature.max_health
    {
        violations.push(InvariantViolation {
            message: format!(
                "Player health {} outside [0, {}]",
                player.creature.curr_health, player.creature.max_health
            ),
        });
    }

    // The four decay sequences stay parallel
    if !player.decay_sequences_aligned() {
        violations.push(InvariantViolation {
            message: "Player decay sequences have diverging lengths".to_string(),
        });
    }

    // Game over agrees with player liveness
    if state.is_game_over() && player.is_alive() {
        violations.push(InvariantViolation {
            message: "Game over latched while the player is alive".to_string(),
        });
    }

    let mut player_tiles = 0usize;
    for (position, entity) in state.grid().iter() {
        match entity {
            Entity::Player => {
                player_tiles += 1;
                if position != player_position {
                    violations.push(InvariantViolation {
                        message: format!(
                            "Player tile at {position:?} disagrees with stored position {player_position:?}"
                        ),
                    });
                }
            }
            Entity::Enemy(creature) => {
                if creature.position != position {
                    violations.push(InvariantViolation {
                        message: format!(
                            "Enemy at {position:?} stores position {:?}",
                            creature.position
                        ),
                    });
                }
                if creature.curr_health < 0 || creature.curr_health > creature.max_health {
                    violations.push(InvariantViolation {
                        message: format!(
                            "Enemy at {position:?} has health {} outside [0, {}]",
                            creature.curr_health, creature.max_health
                        ),
                    });
                }
                if creature.turn_meter < 0 {
                    violations.push(InvariantViolation {
                        message: format!(
                            "Enemy at {position:?} has negative turn meter {}",
                            creature.turn_meter
                        ),
                    });
                }
            }
            _ => {}
        }
    }

    // Exactly one player tile while alive, none once dead and swept
    if player.is_alive() && player_tiles != 1 {
        violations.push(InvariantViolation {
            message: format!("Expected exactly 1 player tile, found {player_tiles}"),
        });
    }
    if !player.is_alive() && player_tiles > 0 {
        violations.push(InvariantViolation {
            message: format!("Dead player still occupies {player_tiles} tile(s)"),
        });
    }

    // The pending actor, if any, must be a creature tile
    if let Some(actor) = state.current_actor() {
        let is_creature = state
            .grid()
            .entity_at(actor)
            .is_some_and(Entity::is_creature);
        if !is_creature {
            violations.push(InvariantViolation {
                message: format!("Current actor {actor:?} is not a creature tile"),
            });
        }
    }

    violations
}
