pub mod ui;

use std::fmt;
use std::io;

use crossterm::terminal;
use log::info;

use common::config::{ConfigError, MazeConfig};
use common::maze::{MazeError, MazeMaker, MazeSolver, Opening};
use common::time::SleepPacer;

use crate::ui::{TerminalRenderer, required_size, wait_for_close};

#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Maze(MazeError),
    Io(io::Error),
    TerminalTooSmall {
        needed: (usize, usize),
        available: (u16, u16),
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "Configuration error: {}", e),
            RunError::Maze(e) => write!(f, "Maze error: {}", e),
            RunError::Io(e) => write!(f, "Terminal error: {}.", e),
            RunError::TerminalTooSmall { needed, available } => write!(
                f,
                "Terminal is {} x {} but the maze needs {} x {}. Enlarge the window or lower MAZE_COLS/MAZE_ROWS.",
                available.0, available.1, needed.0, needed.1
            ),
        }
    }
}

impl std::error::Error for RunError {}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<MazeError> for RunError {
    fn from(e: MazeError) -> Self {
        RunError::Maze(e)
    }
}

impl From<io::Error> for RunError {
    fn from(e: io::Error) -> Self {
        RunError::Io(e)
    }
}

pub fn run_client() -> Result<(), RunError> {
    let config = MazeConfig::from_env()?;
    let mut maze = config.build()?;

    let needed = required_size(maze.cols(), maze.rows());
    let available = terminal::size()?;
    if needed.0 > available.0 as usize || needed.1 > available.1 as usize {
        return Err(RunError::TerminalTooSmall { needed, available });
    }

    info!(
        "{} x {} maze, algorithm {}, seed {:?}",
        config.cols, config.rows, config.algorithm, config.seed
    );

    let entrance = Opening::entrance(&maze);
    let exit = Opening::exit(&maze);
    let mut pacer = SleepPacer::new(config.delay);
    let mut renderer = TerminalRenderer::new(maze.layout(), maze.rows())?;

    renderer.show_status("Generating...")?;
    MazeMaker::new(&mut maze, config.seed, &mut renderer, &mut pacer).generate(
        config.algorithm,
        entrance,
        exit,
    )?;
    if let Some(e) = renderer.take_error() {
        return Err(e.into());
    }

    renderer.show_status("Solving...")?;
    let (solved, steps) = {
        let mut solver = MazeSolver::new(&mut maze, &mut renderer, &mut pacer);
        let solved = solver.solve();
        (solved, solver.moves().len())
    };
    if let Some(e) = renderer.take_error() {
        return Err(e.into());
    }

    let outcome = if solved {
        format!("Solved in {} steps.", steps)
    } else {
        "No path from entrance to exit.".to_string()
    };
    renderer.show_status(&format!("{} Press q to close.", outcome))?;
    wait_for_close()?;
    drop(renderer);

    println!("{}", maze);
    println!("{}", outcome);

    Ok(())
}
