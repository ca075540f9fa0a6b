//! Plain-text robot programs.
//!
//! One command per line; `#` starts a comment. Blocks open with `repeat N`
//! or `while_enemy_adjacent` and close with `end`.
//!
//! ```text
//! move_to 1 0
//! repeat 2
//!     attack
//! end
//! say "done" 1.5
//! ```

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;

use runtime::{ActionScript, RunMode, Runtime};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: '{command}' expects {expected}")]
    BadArguments {
        line: usize,
        command: String,
        expected: &'static str,
    },

    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    #[error("line {line}: block is never closed with 'end'")]
    UnclosedBlock { line: usize },

    #[error("line {line}: 'end' without an open block")]
    UnexpectedEnd { line: usize },

    #[error("line {line}: loop body is empty")]
    EmptyLoop { line: usize },
}

/// One program statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    MoveForward,
    TurnLeft,
    TurnRight,
    Attack,
    FaceEnemy,
    MoveTo { x: i32, y: i32 },
    MoveToNearestEnemy,
    Say { text: String, seconds: f64 },
    /// Runs the behaviour preview, then resumes the game.
    Preview { cycles: u32 },
    Repeat { times: u32, body: Vec<Statement> },
    WhileEnemyAdjacent { body: Vec<Statement> },
}

/// A parsed program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read program {}: {}", path.display(), e))?;
        Ok(source.parse()?)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

impl FromStr for Program {
    type Err = ProgramError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        // stack of open blocks: (opening line, header, collected body)
        let mut stack: Vec<(usize, Statement, Vec<Statement>)> = Vec::new();
        let mut root = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let tokens = tokenize(raw, line)?;
            let Some((command, args)) = tokens.split_first() else {
                continue;
            };

            let statement = match command.as_str() {
                "end" => {
                    let (opened, header, body) =
                        stack.pop().ok_or(ProgramError::UnexpectedEnd { line })?;
                    if body.is_empty() {
                        return Err(ProgramError::EmptyLoop { line: opened });
                    }
                    close_block(header, body)
                }
                "repeat" => {
                    let times = one_arg(command, args, line, "a repeat count")?;
                    stack.push((line, Statement::Repeat { times, body: Vec::new() }, Vec::new()));
                    continue;
                }
                "while_enemy_adjacent" => {
                    no_args(command, args, line)?;
                    stack.push((
                        line,
                        Statement::WhileEnemyAdjacent { body: Vec::new() },
                        Vec::new(),
                    ));
                    continue;
                }
                _ => parse_simple(command, args, line)?,
            };

            match stack.last_mut() {
                Some((_, _, body)) => body.push(statement),
                None => root.push(statement),
            }
        }

        if let Some((line, _, _)) = stack.pop() {
            return Err(ProgramError::UnclosedBlock { line });
        }
        Ok(Program { statements: root })
    }
}

fn close_block(header: Statement, body: Vec<Statement>) -> Statement {
    match header {
        Statement::Repeat { times, .. } => Statement::Repeat { times, body },
        _ => Statement::WhileEnemyAdjacent { body },
    }
}

fn parse_simple(command: &str, args: &[String], line: usize) -> Result<Statement, ProgramError> {
    let statement = match command {
        "move_forward" | "forward" => Statement::MoveForward,
        "turn_left" | "left" => Statement::TurnLeft,
        "turn_right" | "right" => Statement::TurnRight,
        "attack" => Statement::Attack,
        "face_enemy" => Statement::FaceEnemy,
        "move_to_nearest_enemy" => Statement::MoveToNearestEnemy,
        "move_to" => {
            let [x, y] = args else {
                return Err(bad(command, line, "two coordinates"));
            };
            Statement::MoveTo {
                x: number(x, command, line, "two coordinates")?,
                y: number(y, command, line, "two coordinates")?,
            }
        }
        "say" => {
            let [text, seconds] = args else {
                return Err(bad(command, line, "a quoted text and seconds"));
            };
            Statement::Say {
                text: text.clone(),
                seconds: number(seconds, command, line, "a quoted text and seconds")?,
            }
        }
        "preview" => Statement::Preview {
            cycles: one_arg(command, args, line, "a cycle count")?,
        },
        _ => {
            return Err(ProgramError::UnknownCommand {
                line,
                command: command.to_owned(),
            });
        }
    };

    if matches!(
        statement,
        Statement::MoveForward
            | Statement::TurnLeft
            | Statement::TurnRight
            | Statement::Attack
            | Statement::FaceEnemy
            | Statement::MoveToNearestEnemy
    ) {
        no_args(command, args, line)?;
    }
    Ok(statement)
}

/// Splits on whitespace, keeping double-quoted text together and dropping
/// `#` comments.
fn tokenize(raw: &str, line: usize) -> Result<Vec<String>, ProgramError> {
    let mut tokens = Vec::new();
    let mut chars = raw.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '#' {
            break;
        } else if c == '"' {
            chars.next();
            let mut text = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(c) => text.push(c),
                    None => return Err(ProgramError::UnterminatedString { line }),
                }
            }
            tokens.push(text);
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(word);
        }
    }
    Ok(tokens)
}

fn one_arg<T: FromStr>(
    command: &str,
    args: &[String],
    line: usize,
    expected: &'static str,
) -> Result<T, ProgramError> {
    match args {
        [value] => number(value, command, line, expected),
        _ => Err(bad(command, line, expected)),
    }
}

fn no_args(command: &str, args: &[String], line: usize) -> Result<(), ProgramError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(bad(command, line, "no arguments"))
    }
}

fn number<T: FromStr>(
    value: &str,
    command: &str,
    line: usize,
    expected: &'static str,
) -> Result<T, ProgramError> {
    value.parse().map_err(|_| bad(command, line, expected))
}

fn bad(command: &str, line: usize, expected: &'static str) -> ProgramError {
    ProgramError::BadArguments {
        line,
        command: command.to_owned(),
        expected,
    }
}

type StepFuture<'a> = Pin<Box<dyn Future<Output = runtime::Result<()>> + Send + 'a>>;

fn execute<'a>(statements: &'a [Statement], runtime: &'a Runtime) -> StepFuture<'a> {
    Box::pin(async move {
        for statement in statements {
            match statement {
                Statement::MoveForward => runtime.move_forward().await?,
                Statement::TurnLeft => runtime.turn_left().await?,
                Statement::TurnRight => runtime.turn_right().await?,
                Statement::Attack => runtime.attack().await?,
                Statement::FaceEnemy => runtime.face_enemy().await?,
                Statement::MoveTo { x, y } => runtime.move_to_position(*x, *y).await?,
                Statement::MoveToNearestEnemy => runtime.move_to_nearest_enemy().await?,
                Statement::Say { text, seconds } => {
                    runtime.say_message(text.as_str(), *seconds).await?
                }
                Statement::Preview { cycles } => {
                    runtime.preview_enemy_movement(*cycles).await?;
                    runtime.start_game().await;
                }
                Statement::Repeat { times, body } => {
                    for _ in 0..*times {
                        execute(body, runtime).await?;
                    }
                }
                Statement::WhileEnemyAdjacent { body } => {
                    while runtime.run_mode() == RunMode::Running
                        && runtime.is_enemy_adjacent().await
                    {
                        execute(body, runtime).await?;
                        // a body of zero-cost actions must not starve the NPC loop
                        tokio::task::yield_now().await;
                    }
                }
            }
        }
        Ok(())
    })
}

#[async_trait]
impl ActionScript for Program {
    async fn run(&self, runtime: &Runtime) -> runtime::Result<()> {
        execute(&self.statements, runtime).await
    }
}
