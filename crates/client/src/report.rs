//! Text rendering of a finished (or in-progress) run.
use std::fmt;

use game_core::{Direction, EntitiesState, Level, Position};
use runtime::ScriptOutcome;

/// Draws the board: `#` walls, `H` health cells, `c` coins, `G` goal,
/// `E` living enemies and an arrow for the robot.
pub fn render_board(level: &Level, state: &EntitiesState) -> String {
    let map = level.map();
    let goal = level.win_condition().goal;
    let mut out = String::new();

    for y in 0..map.height() as i32 {
        for x in 0..map.width() as i32 {
            let position = Position::new(x, y);
            let glyph = if state.robot.position == position {
                robot_glyph(state.robot.direction)
            } else if state.living_enemy_at(position).is_some() {
                'E'
            } else if level.is_coin(position) && !state.collected_coins.contains(&position) {
                'c'
            } else if goal == Some(position) {
                'G'
            } else {
                map.cell(position).map_or(' ', |cell| cell.symbol())
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn robot_glyph(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Right => '>',
        Direction::Down => 'v',
        Direction::Left => '<',
    }
}

/// Summary printed after a program ends.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub level_id: String,
    pub outcome: ScriptOutcome,
    pub completed: bool,
    /// Robot position in program coordinates.
    pub position: Position,
    pub health: f64,
    pub coins: (usize, usize),
    pub defeated_enemies: u32,
    pub board: String,
}

impl RunReport {
    pub fn new(level: &Level, state: &EntitiesState, outcome: ScriptOutcome, completed: bool) -> Self {
        Self {
            level_id: level.id().to_owned(),
            outcome,
            completed,
            position: level.map().to_relative(state.robot.position),
            health: state.robot.health,
            coins: (state.collected_count(), level.total_coins()),
            defeated_enemies: state.defeated_enemies,
            board: render_board(level, state),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f, "level:    {}", self.level_id)?;
        match &self.outcome {
            ScriptOutcome::Completed => writeln!(f, "program:  finished")?,
            ScriptOutcome::Stopped(reason) => writeln!(f, "program:  stopped ({reason})")?,
            ScriptOutcome::Faulted(err) => writeln!(f, "program:  failed ({err})")?,
        }
        writeln!(f, "position: {}", self.position)?;
        writeln!(f, "health:   {:.1}", self.health)?;
        writeln!(f, "coins:    {}/{}", self.coins.0, self.coins.1)?;
        writeln!(f, "defeated: {}", self.defeated_enemies)?;
        write!(
            f,
            "result:   {}",
            if self.completed { "LEVEL COMPLETE" } else { "incomplete" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_content::LevelCatalog;

    #[test]
    fn renders_the_starting_board_of_level1() {
        let catalog = LevelCatalog::builtin().unwrap();
        let level = catalog.get("level1").unwrap();
        let board = render_board(level, &level.initial_state());

        let rows: Vec<&str> = board.lines().collect();
        assert_eq!(rows[0], "#########");
        assert_eq!(rows[1], "#>c..E..#");
        assert_eq!(rows[2], "#......G#");
        assert_eq!(rows[3], "#.....c.#");
    }

    #[test]
    fn report_uses_program_coordinates() {
        let catalog = LevelCatalog::builtin().unwrap();
        let level = catalog.get("level1").unwrap();
        let report = RunReport::new(
            level,
            &level.initial_state(),
            ScriptOutcome::Completed,
            false,
        );

        assert_eq!(report.position, Position::ORIGIN);
        assert_eq!(report.coins, (0, 2));
        let text = report.to_string();
        assert!(text.contains("program:  finished"));
        assert!(text.ends_with("incomplete"));
    }
}
