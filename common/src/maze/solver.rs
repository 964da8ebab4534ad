use log::{debug, trace};
use strum::IntoEnumIterator;

use super::{CellId, Direction, Maze};
use crate::render::{Line, Pacer, Renderer, Stroke};

/// One step of the solver. `undo` marks a retreat out of a dead end.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Move {
    pub from: CellId,
    pub to: CellId,
    pub undo: bool,
}

/// Depth-first search from the top-left cell to the bottom-right one. Cells
/// that lead nowhere are marked as dead ends and never entered again, except
/// to pass back through while retreating.
pub struct MazeSolver<'a> {
    maze: &'a mut Maze,
    renderer: &'a mut dyn Renderer,
    pacer: &'a mut dyn Pacer,
    moves: Vec<Move>,
    path: Vec<CellId>,
}

impl<'a> MazeSolver<'a> {
    pub fn new(
        maze: &'a mut Maze,
        renderer: &'a mut dyn Renderer,
        pacer: &'a mut dyn Pacer,
    ) -> Self {
        MazeSolver {
            maze,
            renderer,
            pacer,
            moves: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn solve(&mut self) -> bool {
        let start = self.maze.start();
        let target = self.maze.target();

        self.moves.clear();
        self.path = vec![start];
        let mut curr = start;

        // Every pass either explores a new cell or marks a new dead end, so
        // this ends within twice the cell count.
        loop {
            self.maze.cell_mut(curr).explored = true;

            if curr == target {
                debug!(
                    "solved in {} moves, path length {}",
                    self.moves.len(),
                    self.path.len()
                );
                return true;
            }

            if let Some(next) = self.first_passable(curr, true) {
                self.step(curr, next, false);
                self.path.push(next);
                curr = next;
                continue;
            }

            self.maze.cell_mut(curr).dead_end = true;

            let Some(prev) = self.first_passable(curr, false) else {
                debug!("no path after {} moves", self.moves.len());
                return false;
            };

            self.step(curr, prev, true);
            self.path.pop();
            if self.path.last() != Some(&prev) {
                self.path.push(prev);
            }
            curr = prev;
        }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// From the start to the cell the solver stopped at.
    pub fn path(&self) -> &[CellId] {
        &self.path
    }

    // First open, live neighbor in scan order. With `only_unexplored` this is
    // a forward candidate, otherwise any retreat target will do.
    fn first_passable(&self, id: CellId, only_unexplored: bool) -> Option<CellId> {
        Direction::iter()
            .filter(|&direction| self.maze.is_open(id, direction))
            .filter_map(|direction| self.maze.neighbor(id, direction))
            .filter(|&neighbor| !self.maze.cell(neighbor).dead_end)
            .find(|&neighbor| !only_unexplored || !self.maze.cell(neighbor).explored)
    }

    fn step(&mut self, from: CellId, to: CellId, undo: bool) {
        trace!(
            "{} ({}, {}) -> ({}, {})",
            if undo { "back" } else { "move" },
            from.i,
            from.j,
            to.i,
            to.j
        );

        let line = Line::new(self.maze.center(from), self.maze.center(to));
        let stroke = if undo { Stroke::Retreat } else { Stroke::Path };
        self.renderer.draw_segment(line, stroke);
        self.pacer.pace();

        self.moves.push(Move { from, to, undo });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Layout;
    use crate::render::{Headless, Recorder};

    fn maze_from_carves(cols: usize, rows: usize, carves: &[(usize, usize, Direction)]) -> Maze {
        let mut maze = Maze::new(cols, rows, Layout::default()).expect("dimensions are valid");
        for &(i, j, direction) in carves {
            maze.carve(CellId::new(i, j), direction)
                .expect("test carves stay inside the grid");
        }
        maze
    }

    #[test]
    fn single_cell_is_solved_without_moving() {
        let mut maze = maze_from_carves(1, 1, &[]);
        let (mut renderer, mut pacer) = (Headless, Headless);
        let mut solver = MazeSolver::new(&mut maze, &mut renderer, &mut pacer);

        assert!(solver.solve());
        assert!(solver.moves().is_empty());
        assert_eq!(solver.path(), &[CellId::new(0, 0)]);
    }

    #[test]
    fn forward_scan_prefers_right_then_down() {
        // Both right and down are open at the start; right leads to a dead end.
        //
        //   S > x
        //   v
        //   . > T
        let mut maze = maze_from_carves(
            2,
            2,
            &[(0, 0, Direction::Right), (0, 0, Direction::Down), (0, 1, Direction::Right)],
        );
        let (mut renderer, mut pacer) = (Headless, Headless);
        let mut solver = MazeSolver::new(&mut maze, &mut renderer, &mut pacer);

        assert!(solver.solve());

        let moves = solver.moves().to_vec();
        let path = solver.path().to_vec();
        assert_eq!(
            moves,
            vec![
                Move {
                    from: CellId::new(0, 0),
                    to: CellId::new(1, 0),
                    undo: false
                },
                Move {
                    from: CellId::new(1, 0),
                    to: CellId::new(0, 0),
                    undo: true
                },
                Move {
                    from: CellId::new(0, 0),
                    to: CellId::new(0, 1),
                    undo: false
                },
                Move {
                    from: CellId::new(0, 1),
                    to: CellId::new(1, 1),
                    undo: false
                },
            ]
        );
        assert_eq!(
            path,
            vec![CellId::new(0, 0), CellId::new(0, 1), CellId::new(1, 1)]
        );
        assert!(maze.cell(CellId::new(1, 0)).dead_end);
        assert!(!maze.cell(CellId::new(0, 0)).dead_end);
    }

    #[test]
    fn retreat_passes_through_explored_cells() {
        // The top row branches into pockets that all dead-end; the real route
        // runs down the left edge and along the bottom.
        let mut maze = maze_from_carves(
            4,
            3,
            &[
                (0, 0, Direction::Right),
                (1, 0, Direction::Right),
                (2, 0, Direction::Right),
                (1, 0, Direction::Down),
                (2, 0, Direction::Down),
                (2, 1, Direction::Right),
                (0, 0, Direction::Down),
                (0, 1, Direction::Down),
                (0, 2, Direction::Right),
                (1, 2, Direction::Right),
                (2, 2, Direction::Right),
            ],
        );
        assert!(maze.is_perfect());
        let (mut renderer, mut pacer) = (Headless, Headless);
        let mut solver = MazeSolver::new(&mut maze, &mut renderer, &mut pacer);

        assert!(solver.solve());

        let path = solver.path().to_vec();
        assert_eq!(
            path,
            vec![
                CellId::new(0, 0),
                CellId::new(0, 1),
                CellId::new(0, 2),
                CellId::new(1, 2),
                CellId::new(2, 2),
                CellId::new(3, 2),
            ]
        );
        let retreats = solver.moves().iter().filter(|m| m.undo).count();
        assert_eq!(retreats, 6, "every cell of the top branch is backed out of");
    }

    #[test]
    fn walled_off_target_is_reported_as_failure() {
        let mut maze = maze_from_carves(3, 1, &[(0, 0, Direction::Right)]);
        let (mut renderer, mut pacer) = (Headless, Headless);
        let mut solver = MazeSolver::new(&mut maze, &mut renderer, &mut pacer);

        assert!(!solver.solve());
        assert_eq!(solver.moves().len(), 2);
        assert!(maze.cell(CellId::new(0, 0)).dead_end);
        assert!(maze.cell(CellId::new(1, 0)).dead_end);
    }

    #[test]
    fn solving_never_touches_walls() {
        let mut maze = Maze::generate(6, 6, Some(9), crate::maze::Algorithm::Backtrack)
            .expect("valid maze");
        let walls: Vec<[bool; 4]> = maze
            .cells()
            .map(|(_, c)| [c.top, c.bottom, c.left, c.right])
            .collect();

        assert!(maze.solve());

        let after: Vec<[bool; 4]> = maze
            .cells()
            .map(|(_, c)| [c.top, c.bottom, c.left, c.right])
            .collect();
        assert_eq!(walls, after);
    }

    #[test]
    fn every_move_is_drawn_between_cell_centers() {
        let layout = Layout {
            origin: glam::vec2(10.0, 10.0),
            cell_size: glam::vec2(20.0, 20.0),
        };
        let mut maze = Maze::new(2, 1, layout).expect("dimensions are valid");
        maze.carve(CellId::new(0, 0), Direction::Right);
        let mut recorder = Recorder::new();
        let mut pacer = Headless;

        assert!(MazeSolver::new(&mut maze, &mut recorder, &mut pacer).solve());

        assert_eq!(
            recorder.segments,
            vec![(
                Line::new(glam::vec2(20.0, 20.0), glam::vec2(40.0, 20.0)),
                Stroke::Path
            )]
        );
    }
}
