//! Combat result types and attack resolution.

use crate::config::GameConfig;
use crate::state::{EnemyId, EntitiesState};

use super::damage::{apply_damage, attack_damage, is_back_attack};

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Nothing living in the faced cell.
    Miss,
    Hit,
}

/// Result of a combat resolution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,

    /// Enemy that was hit. `None` for misses and for strikes on the robot.
    pub target: Option<EnemyId>,

    /// Damage dealt (0 on a miss).
    pub damage: f64,

    pub back_attack: bool,

    /// The defender's health reached zero or below with this hit.
    pub defeated: bool,
}

impl AttackResult {
    pub const MISS: Self = Self {
        outcome: AttackOutcome::Miss,
        target: None,
        damage: 0.0,
        back_attack: false,
        defeated: false,
    };

    pub fn is_hit(&self) -> bool {
        self.outcome == AttackOutcome::Hit
    }
}

/// Resolves a robot attack against the cell it faces.
///
/// A defeated enemy stays in the roster with non-positive health and the
/// defeat counter is incremented.
pub fn resolve_attack(state: &mut EntitiesState) -> AttackResult {
    let attacker = state.robot.position;
    let Some(index) = state.living_enemy_at(state.robot.front()) else {
        return AttackResult::MISS;
    };

    let defender = &mut state.enemies[index];
    let back_attack = is_back_attack(attacker, defender.position, defender.direction);
    let damage = attack_damage(back_attack);
    defender.health = apply_damage(defender.health, damage);

    let defeated = !defender.is_alive();
    let target = Some(defender.id);
    if defeated {
        state.defeated_enemies += 1;
    }

    AttackResult {
        outcome: AttackOutcome::Hit,
        target,
        damage,
        back_attack,
        defeated,
    }
}

/// Resolves a strike by enemy `index` on the robot. Connects only if the
/// robot occupies the cell the enemy faces.
pub fn resolve_enemy_strike(state: &mut EntitiesState, index: usize) -> AttackResult {
    let connects = state
        .enemies
        .get(index)
        .is_some_and(|enemy| enemy.is_alive() && enemy.front() == state.robot.position);
    if !connects || !state.robot.is_alive() {
        return AttackResult::MISS;
    }

    let damage = GameConfig::ENEMY_ATTACK_DAMAGE;
    state.robot.health = apply_damage(state.robot.health, damage);

    AttackResult {
        outcome: AttackOutcome::Hit,
        target: None,
        damage,
        back_attack: false,
        defeated: !state.robot.is_alive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Direction, EnemyState, Position, RobotState};
    use std::collections::BTreeSet;

    fn duel(enemy_facing: Direction) -> EntitiesState {
        EntitiesState {
            robot: RobotState::new(Position::new(1, 1), Direction::Right),
            enemies: vec![EnemyState::new(
                EnemyId(7),
                Position::new(2, 1),
                enemy_facing,
                vec![],
            )],
            collected_coins: BTreeSet::new(),
            defeated_enemies: 0,
        }
    }

    #[test]
    fn two_plain_hits_defeat_an_enemy() {
        let mut state = duel(Direction::Left);

        let first = resolve_attack(&mut state);
        assert!(first.is_hit());
        assert_eq!(first.damage, 1.0);
        assert!(!first.defeated);
        assert_eq!(state.enemies[0].health, 1.0);

        let second = resolve_attack(&mut state);
        assert!(second.defeated);
        assert_eq!(second.target, Some(EnemyId(7)));
        assert_eq!(state.defeated_enemies, 1);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn back_attack_defeats_in_one_hit() {
        let mut state = duel(Direction::Right);
        let result = resolve_attack(&mut state);
        assert!(result.back_attack);
        assert_eq!(result.damage, 4.0);
        assert!(result.defeated);
    }

    #[test]
    fn side_hits_deal_normal_damage() {
        for facing in [Direction::Up, Direction::Down, Direction::Left] {
            let mut state = duel(facing);
            let result = resolve_attack(&mut state);
            assert!(!result.back_attack);
            assert_eq!(result.damage, 1.0);
        }
    }

    #[test]
    fn defeated_enemies_cannot_be_hit_again() {
        let mut state = duel(Direction::Right);
        resolve_attack(&mut state);
        assert_eq!(resolve_attack(&mut state), AttackResult::MISS);
        assert_eq!(state.defeated_enemies, 1);
    }

    #[test]
    fn attack_on_empty_cell_misses() {
        let mut state = duel(Direction::Left);
        state.robot.direction = Direction::Down;
        assert_eq!(resolve_attack(&mut state), AttackResult::MISS);
        assert_eq!(state.enemies[0].health, 2.0);
    }

    #[test]
    fn enemy_strike_needs_robot_in_front() {
        let mut state = duel(Direction::Up);
        assert_eq!(resolve_enemy_strike(&mut state, 0), AttackResult::MISS);

        state.enemies[0].direction = Direction::Left;
        let result = resolve_enemy_strike(&mut state, 0);
        assert!(result.is_hit());
        assert_eq!(state.robot.health, 6.0 - 1.2);
    }
}
