//! Damage calculation and application.

use crate::config::GameConfig;
use crate::state::{Direction, Position};

/// True when the defender faces directly away from the attacker, i.e. the
/// attacker stands on the defender's back cell.
pub fn is_back_attack(attacker: Position, defender: Position, facing: Direction) -> bool {
    defender.step(facing.reversed()) == attacker
}

/// Damage dealt by a robot attack.
pub fn attack_damage(back_attack: bool) -> f64 {
    if back_attack {
        GameConfig::BACK_ATTACK_DAMAGE
    } else {
        GameConfig::ROBOT_ATTACK_DAMAGE
    }
}

/// Plain subtraction. Health may drop below zero; callers test `<= 0.0`.
pub fn apply_damage(health: f64, damage: f64) -> f64 {
    health - damage
}
