use super::super::{CellId, MazeMaker};

pub trait Backtrack {
    fn backtrack(&mut self, root: CellId);
}

impl Backtrack for MazeMaker<'_> {
    // Randomized depth-first carving. A cell stays on the stack until it has
    // no unvisited neighbors left, and its next neighbor is drawn from the
    // live candidates each time control returns to it.
    fn backtrack(&mut self, root: CellId) {
        let mut stack = vec![root];
        self.visit_cell(root);

        while let Some(&curr) = stack.last() {
            match self.pick_neighbor(curr) {
                Some(direction) => {
                    let next = self.remove_wall_between(curr, direction);
                    self.visit_cell(next);
                    stack.push(next);
                }
                None => {
                    self.draw_cell(curr);
                    stack.pop();
                }
            }
        }
    }
}
