//! Win-condition evaluation.

use crate::level::WinCondition;
use crate::state::EntitiesState;

impl WinCondition {
    /// True when every specified subgoal holds. Unset subgoals pass.
    pub fn is_satisfied(&self, state: &EntitiesState) -> bool {
        let coins = self
            .required_coins
            .is_none_or(|required| state.collected_count() >= required as usize);
        let enemies = self
            .required_enemies
            .is_none_or(|required| state.defeated_enemies >= required);
        let goal = self.goal.is_none_or(|goal| state.robot.position == goal);

        coins && enemies && goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Direction, Position, RobotState};
    use std::collections::BTreeSet;

    fn state_at(position: Position) -> EntitiesState {
        EntitiesState {
            robot: RobotState::new(position, Direction::Right),
            enemies: vec![],
            collected_coins: BTreeSet::new(),
            defeated_enemies: 0,
        }
    }

    #[test]
    fn goal_only_completes_iff_robot_on_goal() {
        let condition = WinCondition {
            goal: Some(Position::new(3, 1)),
            ..WinCondition::default()
        };
        assert!(!condition.is_satisfied(&state_at(Position::new(2, 1))));
        assert!(condition.is_satisfied(&state_at(Position::new(3, 1))));
    }

    #[test]
    fn all_specified_subgoals_must_hold() {
        let condition = WinCondition {
            required_coins: Some(2),
            required_enemies: Some(1),
            goal: Some(Position::new(3, 1)),
        };
        let mut state = state_at(Position::new(3, 1));
        assert!(!condition.is_satisfied(&state));

        state.collected_coins.insert(Position::new(1, 1));
        state.collected_coins.insert(Position::new(2, 1));
        assert!(!condition.is_satisfied(&state));

        state.defeated_enemies = 1;
        assert!(condition.is_satisfied(&state));
    }

    #[test]
    fn enemies_only_ignores_position() {
        let condition = WinCondition {
            required_enemies: Some(1),
            ..WinCondition::default()
        };
        let mut state = state_at(Position::new(9, 9));
        assert!(!condition.is_satisfied(&state));
        state.defeated_enemies = 1;
        assert!(condition.is_satisfied(&state));
    }

    #[test]
    fn empty_condition_is_vacuously_satisfied() {
        assert!(WinCondition::default().is_satisfied(&state_at(Position::ORIGIN)));
    }
}
