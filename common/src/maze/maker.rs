pub mod algorithms;

use log::{debug, trace};
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use strum::{Display, EnumString, IntoEnumIterator};

use algorithms::{backtrack::Backtrack, kruskal::Kruskal};

use super::{CellId, Direction, Maze, MazeError};
use crate::render::{Pacer, Renderer, Stroke};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Algorithm {
    #[default]
    Backtrack, // Long winding corridors.
    Kruskal, // Short branches, more dead ends.
}

/// A hole in the outer boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Opening {
    pub cell: CellId,
    pub side: Direction,
}

impl Opening {
    /// Top of the top-left cell.
    pub fn entrance(maze: &Maze) -> Self {
        Opening {
            cell: maze.start(),
            side: Direction::Up,
        }
    }

    /// Bottom of the bottom-right cell.
    pub fn exit(maze: &Maze) -> Self {
        Opening {
            cell: maze.target(),
            side: Direction::Down,
        }
    }
}

pub struct MazeMaker<'a> {
    pub maze: &'a mut Maze,
    pub rng: StdRng,
    renderer: &'a mut dyn Renderer,
    pacer: &'a mut dyn Pacer,
    carves: usize,
}

impl<'a> MazeMaker<'a> {
    /// With a seed, the same dimensions always give the same maze.
    pub fn new(
        maze: &'a mut Maze,
        seed: Option<u64>,
        renderer: &'a mut dyn Renderer,
        pacer: &'a mut dyn Pacer,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        MazeMaker {
            maze,
            rng,
            renderer,
            pacer,
            carves: 0,
        }
    }

    pub fn generate(
        &mut self,
        algorithm: Algorithm,
        entrance: Opening,
        exit: Opening,
    ) -> Result<(), MazeError> {
        for opening in [entrance, exit] {
            if !self.maze.is_boundary(opening.cell, opening.side) {
                return Err(MazeError::NotOnBoundary(opening));
            }
        }

        debug!(
            "generating {} x {} maze with {}",
            self.maze.cols(),
            self.maze.rows(),
            algorithm
        );

        self.draw_layout();

        for opening in [entrance, exit] {
            self.maze.breach(opening.cell, opening.side);
            self.draw_cell(opening.cell);
        }

        match algorithm {
            Algorithm::Backtrack => {
                let root = self.maze.target();
                self.backtrack(root);
            }
            Algorithm::Kruskal => self.kruskal(),
        }

        self.maze.reset_visited();

        debug!("carved {} passages", self.carves);
        Ok(())
    }

    fn draw_layout(&mut self) {
        let ids: Vec<CellId> = self.maze.cells().map(|(id, _)| id).collect();
        for id in ids {
            self.draw_cell(id);
        }
    }

    fn draw_cell(&mut self, id: CellId) {
        for direction in Direction::iter() {
            let line = self.maze.wall_line(id, direction);
            let stroke = if self.maze.has_wall(id, direction) {
                Stroke::Wall
            } else {
                Stroke::Erased
            };
            self.renderer.draw_segment(line, stroke);
        }
        self.pacer.pace();
    }

    fn get_unvisited_neighbors(&self, id: CellId) -> Vec<Direction> {
        Direction::iter()
            .filter(|&direction| {
                self.maze
                    .neighbor(id, direction)
                    .is_some_and(|neighbor| !self.is_visited(neighbor))
            })
            .collect()
    }

    fn pick_neighbor(&mut self, id: CellId) -> Option<Direction> {
        let directions = self.get_unvisited_neighbors(id);
        directions.choose(&mut self.rng).copied()
    }

    fn visit_cell(&mut self, id: CellId) {
        self.maze.cell_mut(id).carved = true;
    }

    fn is_visited(&self, id: CellId) -> bool {
        self.maze.cell(id).carved
    }

    fn remove_wall_between(&mut self, id: CellId, direction: Direction) -> CellId {
        let next = self
            .maze
            .carve(id, direction)
            .expect("carving is only attempted towards in-bounds neighbors");
        self.carves += 1;
        trace!("carve ({}, {}) -> ({}, {})", id.i, id.j, next.i, next.j);
        next
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::maze::Layout;
    use crate::render::{Headless, Recorder};

    #[test]
    fn algorithm_parses_from_lowercase_names() {
        assert_eq!(Algorithm::from_str("backtrack"), Ok(Algorithm::Backtrack));
        assert_eq!(Algorithm::from_str("Kruskal"), Ok(Algorithm::Kruskal));
        assert!(Algorithm::from_str("wilson").is_err());
        assert_eq!(Algorithm::Kruskal.to_string(), "kruskal");
        assert_eq!(Algorithm::default(), Algorithm::Backtrack);
    }

    #[test]
    fn generate_rejects_openings_off_the_boundary() {
        let mut maze = Maze::new(3, 3, Layout::default()).expect("dimensions are valid");
        let entrance = Opening {
            cell: CellId::new(1, 1),
            side: Direction::Up,
        };
        let exit = Opening::exit(&maze);
        let (mut renderer, mut pacer) = (Headless, Headless);

        let result = MazeMaker::new(&mut maze, Some(0), &mut renderer, &mut pacer).generate(
            Algorithm::Backtrack,
            entrance,
            exit,
        );

        assert_eq!(result, Err(MazeError::NotOnBoundary(entrance)));
        assert_eq!(maze.open_edges(), 0, "nothing is carved after a rejection");
    }

    #[test]
    fn generate_draws_layout_breaches_and_finished_cells() {
        let mut maze = Maze::new(3, 2, Layout::default()).expect("dimensions are valid");
        let entrance = Opening::entrance(&maze);
        let exit = Opening::exit(&maze);
        let mut recorder = Recorder::new();
        let mut pacer = Headless;

        MazeMaker::new(&mut maze, Some(7), &mut recorder, &mut pacer)
            .generate(Algorithm::Backtrack, entrance, exit)
            .expect("corner openings are on the boundary");

        // Four walls per cell for the layout, for each breach, and for each
        // cell as backtracking finishes it.
        let cells = 6;
        assert_eq!(recorder.segments.len(), 4 * (cells + 2 + cells));
        assert_eq!(recorder.count(Stroke::Path), 0);
        assert_eq!(recorder.count(Stroke::Retreat), 0);
    }

    #[test]
    fn carving_counts_one_passage_per_extra_cell() {
        for algorithm in [Algorithm::Backtrack, Algorithm::Kruskal] {
            let mut maze = Maze::new(5, 4, Layout::default()).expect("dimensions are valid");
            let entrance = Opening::entrance(&maze);
            let exit = Opening::exit(&maze);
            let (mut renderer, mut pacer) = (Headless, Headless);

            let mut maker = MazeMaker::new(&mut maze, Some(3), &mut renderer, &mut pacer);
            maker
                .generate(algorithm, entrance, exit)
                .expect("corner openings are on the boundary");

            assert_eq!(maker.carves, 19, "{} should carve a spanning tree", algorithm);
        }
    }

    #[test]
    fn generate_clears_carved_flags_afterwards() {
        let maze = Maze::generate(4, 4, Some(11), Algorithm::Backtrack).expect("valid maze");
        assert!(maze.cells().all(|(_, cell)| !cell.carved));
    }
}
