//! Attack gating and the enemy decision rule.
//!
//! Adjacency is 8-directional (Chebyshev distance at most 1), diagonals
//! included, and a position counts as adjacent to itself. Every combat
//! precondition failure is an expected rejection, not an error.

use crate::game::grid::Position;

/// Check 8-directional adjacency between two positions.
///
/// Symmetric, and every position is adjacent to itself.
#[must_use]
pub fn is_adjacent(a: Position, b: Position) -> bool {
    (b.x - a.x).abs() <= 1 && (b.y - a.y).abs() <= 1
}

/// Check whether an attacker at `attacker` may strike a target at `target`.
///
/// Requires adjacency and a distinct target; a creature cannot attack its
/// own tile.
#[must_use]
pub fn can_attack(attacker: Position, target: Position) -> bool {
    attacker != target && is_adjacent(attacker, target)
}

/// Greedy single-step destination from `from` toward `target`.
///
/// Steps by the sign of the coordinate delta in each axis independently.
/// The caller attempts the move through the grid; a blocked or out-of-bounds
/// destination forfeits the step. No fallback pathing.
#[must_use]
pub fn step_toward(from: Position, target: Position) -> Position {
    Position::new(
        from.x + (target.x - from.x).signum(),
        from.y + (target.y - from.y).signum(),
    )
}
