use disjoint::DisjointSetVec;
use rand::seq::SliceRandom;

use super::super::{CellId, Direction, MazeMaker};

pub trait Kruskal {
    fn kruskal(&mut self);
}

impl Kruskal for MazeMaker<'_> {
    fn kruskal(&mut self) {
        let cells: Vec<CellId> = self.maze.cells().map(|(id, _)| id).collect();
        let mut walls = get_inner_walls(self, &cells);
        let mut cells = DisjointSetVec::from(cells);

        walls.shuffle(&mut self.rng);
        for (cell_1, direction) in walls {
            let cell_2 = self
                .maze
                .neighbor(cell_1, direction)
                .expect("inner walls always have a cell on both sides");
            let i = self.maze.index(cell_1);
            let j = self.maze.index(cell_2);

            if cells.root_of(i) != cells.root_of(j) {
                cells.join(i, j);
                self.visit_cell(cell_1);
                self.visit_cell(cell_2);
                self.remove_wall_between(cell_1, direction);
                self.draw_cell(cell_1);
                self.draw_cell(cell_2);
            }
        }
    }
}

// Each inner wall once, named by the cell on its left or above it.
fn get_inner_walls(maker: &MazeMaker<'_>, cells: &[CellId]) -> Vec<(CellId, Direction)> {
    cells
        .iter()
        .flat_map(|&cell| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter(move |&direction| maker.maze.neighbor(cell, direction).is_some())
                .map(move |direction| (cell, direction))
        })
        .collect()
}
