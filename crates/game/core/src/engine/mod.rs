//! Authoritative reducer for [`EntitiesState`].
//!
//! [`GameEngine`] borrows the static [`Level`] and a mutable state, and
//! exposes one method per rule-level operation. It never suspends: the
//! runtime sequences these calls with pacing delays in between, and the
//! preview simulator drives the same methods against a scratch clone.

use crate::behavior::{self, NpcTurn, ScriptStep};
use crate::combat::{self, AttackResult};
use crate::config::GameConfig;
use crate::env::CellKind;
use crate::level::Level;
use crate::state::{Direction, EntitiesState, Position, Rotation};

/// What happened when the robot tried to step forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A living enemy was orthogonally adjacent; the robot turned to face it
    /// instead of moving.
    FacedAdjacentEnemy(Direction),
    Moved {
        to: Position,
        collected_coin: bool,
        restored_health: bool,
    },
    /// The forward cell is a wall or out of bounds.
    Blocked,
}

impl MoveOutcome {
    /// The robot changed cell.
    pub fn moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Result of an enemy strike on the robot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyStrike {
    /// Robot left the faced cell during the wind-up.
    Missed,
    Hit { remaining: f64 },
    RobotDefeated,
}

pub struct GameEngine<'a> {
    level: &'a Level,
    state: &'a mut EntitiesState,
}

impl<'a> GameEngine<'a> {
    pub fn new(level: &'a Level, state: &'a mut EntitiesState) -> Self {
        Self { level, state }
    }

    pub fn state(&self) -> &EntitiesState {
        &*self.state
    }

    /// Steps the robot one cell forward, applying pickups and healing.
    ///
    /// The forward cell is one of the four neighbours, so an enemy standing
    /// there is caught by the adjacency check.
    pub fn advance_robot(&mut self) -> MoveOutcome {
        if let Some(direction) = self.state.adjacent_enemy_direction() {
            self.state.robot.direction = direction;
            return MoveOutcome::FacedAdjacentEnemy(direction);
        }

        let target = self.state.robot.front();

        let map = self.level.map();
        if !map.is_walkable(target) {
            return MoveOutcome::Blocked;
        }

        self.state.robot.position = target;
        let collected_coin =
            self.level.is_coin(target) && self.state.collected_coins.insert(target);

        let restored_health = map.cell(target) == Some(CellKind::HealthRestore)
            && self.state.robot.health < GameConfig::ROBOT_MAX_HEALTH;
        if restored_health {
            self.state.robot.health = GameConfig::ROBOT_MAX_HEALTH;
        }

        MoveOutcome::Moved {
            to: target,
            collected_coin,
            restored_health,
        }
    }

    pub fn rotate_robot(&mut self, rotation: Rotation) -> Direction {
        let robot = &mut self.state.robot;
        robot.direction = robot.direction.rotated(rotation);
        robot.direction
    }

    /// Orients the robot towards an enemy.
    ///
    /// An adjacent living enemy wins (up, right, down, left). Otherwise the
    /// nearest living enemy is faced along the dominant axis, horizontal on
    /// ties. Returns `None` when no enemy is alive.
    pub fn face_enemy(&mut self) -> Option<Direction> {
        let direction = match self.state.adjacent_enemy_direction() {
            Some(direction) => direction,
            None => {
                let target = self.state.nearest_enemy()?.position;
                let (dx, dy) = self.state.robot.position.delta_to(target);
                if dx.abs() >= dy.abs() {
                    if dx > 0 { Direction::Right } else { Direction::Left }
                } else if dy > 0 {
                    Direction::Down
                } else {
                    Direction::Up
                }
            }
        };

        self.state.robot.direction = direction;
        Some(direction)
    }

    pub fn robot_attack(&mut self) -> AttackResult {
        combat::resolve_attack(self.state)
    }

    /// Selects this tick's actor.
    ///
    /// A striking enemy is turned towards the robot here; the hit itself
    /// lands later through [`Self::resolve_enemy_strike`] so the caller can
    /// telegraph it. A scripted enemy executes its primitive immediately.
    pub fn begin_npc_tick(&mut self) -> (NpcTurn, Option<ScriptStep>) {
        let turn = behavior::select_actor(self.state);
        let step = match turn {
            NpcTurn::Idle => None,
            NpcTurn::Strike { index } => {
                let robot = self.state.robot.position;
                behavior::face_towards(&mut self.state.enemies[index], robot);
                None
            }
            NpcTurn::Scripted { index } => {
                Some(behavior::step_script(self.level.map(), self.state, index))
            }
        };
        (turn, step)
    }

    pub fn resolve_enemy_strike(&mut self, index: usize) -> EnemyStrike {
        let result = combat::resolve_enemy_strike(self.state, index);
        if !result.is_hit() {
            EnemyStrike::Missed
        } else if result.defeated {
            EnemyStrike::RobotDefeated
        } else {
            EnemyStrike::Hit {
                remaining: self.state.robot.health,
            }
        }
    }

    /// One scripted step for enemy `index`, with no attack. Defeated enemies
    /// and empty scripts do nothing.
    pub fn preview_step(&mut self, index: usize) -> ScriptStep {
        match self.state.enemies.get(index) {
            Some(enemy) if enemy.is_alive() => {
                behavior::step_script(self.level.map(), self.state, index)
            }
            _ => ScriptStep::Empty,
        }
    }

    pub fn any_engaged(&self) -> bool {
        behavior::any_engaged(&*self.state)
    }

    pub fn objective_met(&self) -> bool {
        self.level.win_condition().is_satisfied(&*self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::EnemyAction;
    use crate::level::{EnemyTemplate, LevelDefinition, RobotStart, WinCondition};
    use crate::state::EnemyId;

    fn level(map: &[&str], enemies: Vec<EnemyTemplate>, coins: Vec<Position>) -> Level {
        LevelDefinition {
            id: "engine".into(),
            name: "engine".into(),
            description: String::new(),
            hint: None,
            map: map.iter().map(|row| row.to_string()).collect(),
            robot_start: RobotStart {
                position: Position::new(1, 1),
                direction: Direction::Right,
            },
            enemies,
            coins,
            win_condition: WinCondition {
                required_coins: Some(1),
                ..WinCondition::default()
            },
        }
        .build()
        .unwrap()
    }

    fn guard(x: i32, y: i32, direction: Direction) -> EnemyTemplate {
        EnemyTemplate {
            id: EnemyId(1),
            position: Position::new(x, y),
            direction,
            behavior: vec![EnemyAction::MoveForward, EnemyAction::TurnRight],
        }
    }

    #[test]
    fn moving_collects_coins_once() {
        let level = level(&["######", "#....#", "######"], vec![], vec![Position::new(2, 1)]);
        let mut state = level.initial_state();
        let mut engine = GameEngine::new(&level, &mut state);

        assert!(!engine.objective_met());
        assert_eq!(
            engine.advance_robot(),
            MoveOutcome::Moved {
                to: Position::new(2, 1),
                collected_coin: true,
                restored_health: false
            }
        );
        assert!(engine.objective_met());

        engine.rotate_robot(Rotation::Right);
        engine.rotate_robot(Rotation::Right);
        engine.advance_robot();
        engine.rotate_robot(Rotation::Left);
        engine.rotate_robot(Rotation::Left);
        let again = engine.advance_robot();
        assert_eq!(
            again,
            MoveOutcome::Moved {
                to: Position::new(2, 1),
                collected_coin: false,
                restored_health: false
            }
        );
        assert_eq!(state.collected_count(), 1);
    }

    #[test]
    fn walls_block_without_turning() {
        let level = level(&["####", "#..#", "####"], vec![], vec![]);
        let mut state = level.initial_state();
        state.robot.position = Position::new(2, 1);
        let mut engine = GameEngine::new(&level, &mut state);
        assert_eq!(engine.advance_robot(), MoveOutcome::Blocked);
        assert_eq!(state.robot.direction, Direction::Right);
    }

    #[test]
    fn health_restore_only_when_hurt() {
        let level = level(&["#####", "#.HH#", "#####"], vec![], vec![]);
        let mut state = level.initial_state();
        let mut engine = GameEngine::new(&level, &mut state);
        assert!(matches!(
            engine.advance_robot(),
            MoveOutcome::Moved {
                restored_health: false,
                ..
            }
        ));

        state.robot.health = 1.2;
        let mut engine = GameEngine::new(&level, &mut state);
        assert!(matches!(
            engine.advance_robot(),
            MoveOutcome::Moved {
                restored_health: true,
                ..
            }
        ));
        assert_eq!(state.robot.health, 6.0);
    }

    #[test]
    fn enemy_in_front_keeps_the_robot_in_place() {
        let level = level(
            &["#####", "#...#", "#####"],
            vec![guard(2, 1, Direction::Left)],
            vec![],
        );
        let mut state = level.initial_state();
        let mut engine = GameEngine::new(&level, &mut state);
        assert_eq!(
            engine.advance_robot(),
            MoveOutcome::FacedAdjacentEnemy(Direction::Right)
        );
        assert_eq!(state.robot.position, Position::new(1, 1));
        assert_eq!(state.robot.direction, Direction::Right);
    }

    #[test]
    fn adjacent_enemy_turns_move_into_facing() {
        let level = level(
            &["#####", "#...#", "#...#", "#####"],
            vec![guard(1, 2, Direction::Up)],
            vec![],
        );
        let mut state = level.initial_state();
        let mut engine = GameEngine::new(&level, &mut state);
        assert_eq!(
            engine.advance_robot(),
            MoveOutcome::FacedAdjacentEnemy(Direction::Down)
        );
        assert_eq!(state.robot.position, Position::new(1, 1));
        assert_eq!(state.robot.direction, Direction::Down);
    }

    #[test]
    fn face_enemy_uses_dominant_axis() {
        let level = level(
            &["#######", "#.....#", "#.....#", "#.....#", "#######"],
            vec![guard(4, 3, Direction::Up)],
            vec![],
        );
        let mut state = level.initial_state();
        let mut engine = GameEngine::new(&level, &mut state);
        // dx = 3, dy = 2
        assert_eq!(engine.face_enemy(), Some(Direction::Right));

        state.robot.position = Position::new(3, 1);
        state.robot.direction = Direction::Left;
        let mut engine = GameEngine::new(&level, &mut state);
        // dx = 1, dy = 2
        assert_eq!(engine.face_enemy(), Some(Direction::Down));

        state.enemies[0].health = 0.0;
        state.robot.direction = Direction::Left;
        let mut engine = GameEngine::new(&level, &mut state);
        assert_eq!(engine.face_enemy(), None);
        assert_eq!(state.robot.direction, Direction::Left);
    }

    #[test]
    fn engaged_enemy_faces_then_strikes() {
        let level = level(
            &["#####", "#...#", "#...#", "#####"],
            vec![guard(2, 1, Direction::Down)],
            vec![],
        );
        let mut state = level.initial_state();
        let mut engine = GameEngine::new(&level, &mut state);

        let (turn, step) = engine.begin_npc_tick();
        assert_eq!(turn, NpcTurn::Strike { index: 0 });
        assert_eq!(step, None);
        assert_eq!(engine.state().enemies[0].direction, Direction::Left);

        for _ in 0..4 {
            assert!(matches!(engine.resolve_enemy_strike(0), EnemyStrike::Hit { .. }));
        }
        assert_eq!(engine.resolve_enemy_strike(0), EnemyStrike::RobotDefeated);
        assert_eq!(engine.resolve_enemy_strike(0), EnemyStrike::Missed);
    }

    #[test]
    fn strike_misses_when_robot_steps_away() {
        let level = level(
            &["#####", "#...#", "#...#", "#####"],
            vec![guard(2, 1, Direction::Down)],
            vec![],
        );
        let mut state = level.initial_state();
        let mut engine = GameEngine::new(&level, &mut state);
        engine.begin_npc_tick();
        drop(engine);

        state.robot.position = Position::new(1, 2);
        let mut engine = GameEngine::new(&level, &mut state);
        assert_eq!(engine.resolve_enemy_strike(0), EnemyStrike::Missed);
        assert_eq!(state.robot.health, 6.0);
    }

    #[test]
    fn idle_tick_without_enemies() {
        let level = level(&["####", "#..#", "####"], vec![], vec![]);
        let mut state = level.initial_state();
        let mut engine = GameEngine::new(&level, &mut state);
        assert_eq!(engine.begin_npc_tick(), (NpcTurn::Idle, None));
    }
}
