pub mod maker;
pub mod solver;

use std::collections::VecDeque;
use std::fmt;

use glam::{Vec2, vec2};
use strum::{EnumIter, IntoEnumIterator};

pub use maker::{Algorithm, MazeMaker, Opening};
pub use solver::{MazeSolver, Move};

use crate::render::{Headless, Line};

#[derive(Debug, Clone, PartialEq)]
pub enum MazeError {
    InvalidDimensions { cols: usize, rows: usize },
    InvalidCellSize(Vec2),
    NotOnBoundary(Opening),
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimensions { cols, rows } => write!(
                f,
                "Maze must have at least one column and one row, got {} x {}.",
                cols, rows
            ),
            MazeError::InvalidCellSize(size) => write!(
                f,
                "Cell size must be positive and finite, got {} x {}.",
                size.x, size.y
            ),
            MazeError::NotOnBoundary(opening) => write!(
                f,
                "Cannot open the {:?} side of cell ({}, {}): it is not on the outer boundary.",
                opening.side, opening.cell.i, opening.cell.j
            ),
        }
    }
}

impl std::error::Error for MazeError {}

/// Column `i`, row `j`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CellId {
    pub i: usize,
    pub j: usize,
}

impl CellId {
    pub fn new(i: usize, j: usize) -> Self {
        CellId { i, j }
    }
}

/// Declaration order is the neighbor scan order used everywhere a first match
/// is taken: right, down, left, up.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumIter)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }

    fn offset(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cell {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub carved: bool,   // Reached by the generator.
    pub explored: bool, // Entered by the solver.
    pub dead_end: bool, // Proven by the solver to lead nowhere.
}

impl Cell {
    pub fn new() -> Self {
        Cell {
            top: true,
            bottom: true,
            left: true,
            right: true,
            carved: false,
            explored: false,
            dead_end: false,
        }
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        match direction {
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
            Direction::Up => self.top,
        }
    }

    fn remove_wall(&mut self, direction: Direction) {
        match direction {
            Direction::Right => self.right = false,
            Direction::Down => self.bottom = false,
            Direction::Left => self.left = false,
            Direction::Up => self.top = false,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the grid sits on a canvas. Only renderers care.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub origin: Vec2,
    pub cell_size: Vec2,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            origin: Vec2::ZERO,
            cell_size: Vec2::ONE,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Maze {
    cells: Vec<Vec<Cell>>, // Indexed `[i][j]`.
    cols: usize,
    rows: usize,
    layout: Layout,
}

impl Maze {
    pub fn new(cols: usize, rows: usize, layout: Layout) -> Result<Self, MazeError> {
        if cols == 0 || rows == 0 {
            return Err(MazeError::InvalidDimensions { cols, rows });
        }

        let size = layout.cell_size;
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return Err(MazeError::InvalidCellSize(size));
        }

        Ok(Maze {
            cells: vec![vec![Cell::new(); rows]; cols],
            cols,
            rows,
            layout,
        })
    }

    /// Builds and carves a maze without drawing anything, opening the top of
    /// the top-left cell and the bottom of the bottom-right cell.
    pub fn generate(
        cols: usize,
        rows: usize,
        seed: Option<u64>,
        algorithm: Algorithm,
    ) -> Result<Self, MazeError> {
        let mut maze = Maze::new(cols, rows, Layout::default())?;
        let entrance = Opening::entrance(&maze);
        let exit = Opening::exit(&maze);
        let (mut renderer, mut pacer) = (Headless, Headless);

        MazeMaker::new(&mut maze, seed, &mut renderer, &mut pacer)
            .generate(algorithm, entrance, exit)?;

        Ok(maze)
    }

    /// Runs the solver without drawing anything.
    pub fn solve(&mut self) -> bool {
        let (mut renderer, mut pacer) = (Headless, Headless);
        MazeSolver::new(self, &mut renderer, &mut pacer).solve()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn start(&self) -> CellId {
        CellId::new(0, 0)
    }

    pub fn target(&self) -> CellId {
        CellId::new(self.cols - 1, self.rows - 1)
    }

    pub fn contains(&self, id: CellId) -> bool {
        id.i < self.cols && id.j < self.rows
    }

    /// Panics if `id` is out of bounds.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.i][id.j]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.i][id.j]
    }

    pub(crate) fn index(&self, id: CellId) -> usize {
        id.i * self.rows + id.j
    }

    /// Column-major, matching the storage order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(i, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(j, cell)| (CellId::new(i, j), cell))
        })
    }

    pub fn neighbor(&self, id: CellId, direction: Direction) -> Option<CellId> {
        if !self.contains(id) {
            return None;
        }

        let (di, dj) = direction.offset();
        let neighbor = CellId::new(id.i.checked_add_signed(di)?, id.j.checked_add_signed(dj)?);

        self.contains(neighbor).then_some(neighbor)
    }

    pub fn has_wall(&self, id: CellId, direction: Direction) -> bool {
        self.cell(id).has_wall(direction)
    }

    /// True if there's a neighbor in that direction and no wall in between.
    pub fn is_open(&self, id: CellId, direction: Direction) -> bool {
        self.neighbor(id, direction).is_some() && !self.has_wall(id, direction)
    }

    /// Removes the wall between `id` and its neighbor on both sides at once.
    /// Returns the neighbor, or `None` on the boundary, where nothing changes.
    pub fn carve(&mut self, id: CellId, direction: Direction) -> Option<CellId> {
        let neighbor = self.neighbor(id, direction)?;
        self.cell_mut(id).remove_wall(direction);
        self.cell_mut(neighbor).remove_wall(direction.opposite());
        Some(neighbor)
    }

    /// Opens an outer wall. Inter-cell walls are left alone and `false` is
    /// returned.
    pub fn breach(&mut self, id: CellId, direction: Direction) -> bool {
        if !self.is_boundary(id, direction) {
            return false;
        }
        self.cell_mut(id).remove_wall(direction);
        true
    }

    pub fn is_boundary(&self, id: CellId, direction: Direction) -> bool {
        self.contains(id) && self.neighbor(id, direction).is_none()
    }

    pub fn reset_visited(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.carved = false;
            cell.explored = false;
            cell.dead_end = false;
        }
    }

    pub fn open_edges(&self) -> usize {
        self.cells()
            .map(|(id, _)| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|&direction| self.is_open(id, direction))
                    .count()
            })
            .sum()
    }

    pub fn open_boundaries(&self) -> Vec<(CellId, Direction)> {
        self.cells()
            .flat_map(move |(id, cell)| {
                Direction::iter()
                    .filter(move |&direction| {
                        self.is_boundary(id, direction) && !cell.has_wall(direction)
                    })
                    .map(move |direction| (id, direction))
            })
            .collect()
    }

    /// Every wall agrees on both sides.
    pub fn walls_agree(&self) -> bool {
        self.cells().all(|(id, cell)| {
            Direction::iter().all(|direction| match self.neighbor(id, direction) {
                Some(neighbor) => {
                    cell.has_wall(direction) == self.has_wall(neighbor, direction.opposite())
                }
                None => true,
            })
        })
    }

    /// Connected, acyclic and consistent: exactly one route between any two
    /// cells.
    pub fn is_perfect(&self) -> bool {
        self.walls_agree()
            && self.open_edges() == self.cols * self.rows - 1
            && self.reachable_from(self.start()) == self.cols * self.rows
    }

    fn reachable_from(&self, start: CellId) -> usize {
        let mut seen = vec![false; self.cols * self.rows];
        let mut queue = VecDeque::new();
        let mut count = 0;

        seen[self.index(start)] = true;
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            count += 1;
            for direction in Direction::iter() {
                if !self.is_open(id, direction) {
                    continue;
                }
                if let Some(neighbor) = self.neighbor(id, direction) {
                    let k = self.index(neighbor);
                    if !seen[k] {
                        seen[k] = true;
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        count
    }

    /// Top-left and bottom-right corners of a cell on the canvas.
    pub fn bounds(&self, id: CellId) -> (Vec2, Vec2) {
        let Layout { origin, cell_size } = self.layout;
        let top_left = origin + cell_size * vec2(id.i as f32, id.j as f32);
        (top_left, top_left + cell_size)
    }

    pub fn center(&self, id: CellId) -> Vec2 {
        let (top_left, bottom_right) = self.bounds(id);
        (top_left + bottom_right) / 2.0
    }

    pub fn wall_line(&self, id: CellId, direction: Direction) -> Line {
        let (a, b) = self.bounds(id);
        match direction {
            Direction::Right => Line::new(vec2(b.x, a.y), b),
            Direction::Down => Line::new(vec2(a.x, b.y), b),
            Direction::Left => Line::new(a, vec2(a.x, b.y)),
            Direction::Up => Line::new(a, vec2(b.x, a.y)),
        }
    }

    pub fn log(&self) -> String {
        let width = 2 * self.cols + 1;
        let height = 2 * self.rows + 1;

        (0..height)
            .map(|z| {
                (0..width)
                    .map(|x| if self.is_solid(x, z) { "██" } else { "  " })
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    // Pillars sit where both coordinates are even, rooms where both are odd.
    // Everything else is a wall slot belonging to the cell above/left of it,
    // or to the first cell for the outer edge.
    fn is_solid(&self, x: usize, z: usize) -> bool {
        match (x % 2, z % 2) {
            (0, 0) => true,
            (1, 1) => false,
            (1, 0) => {
                let i = (x - 1) / 2;
                if z == 0 {
                    self.cells[i][0].top
                } else {
                    self.cells[i][z / 2 - 1].bottom
                }
            }
            _ => {
                let j = (z - 1) / 2;
                if x == 0 {
                    self.cells[0][j].left
                } else {
                    self.cells[x / 2 - 1][j].right
                }
            }
        }
    }
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log())
    }
}
