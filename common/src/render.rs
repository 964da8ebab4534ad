use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Line { start, end }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Stroke {
    Wall,    // A wall that blocks movement.
    Erased,  // Where a wall used to be.
    Path,    // Forward step of the solver.
    Retreat, // Backtrack step of the solver.
}

/// Receives every structural change made to a maze. Purely observational: the
/// generator and solver never read anything back.
pub trait Renderer {
    fn draw_segment(&mut self, line: Line, stroke: Stroke);
}

/// Throttles animation. Called once per structural change.
pub trait Pacer {
    fn pace(&mut self);
}

/// Draws nothing and never waits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl Renderer for Headless {
    fn draw_segment(&mut self, _line: Line, _stroke: Stroke) {}
}

impl Pacer for Headless {
    fn pace(&mut self) {}
}

/// Keeps every segment it's asked to draw, in order.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub segments: Vec<(Line, Stroke)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, stroke: Stroke) -> usize {
        self.segments.iter().filter(|(_, s)| *s == stroke).count()
    }
}

impl Renderer for Recorder {
    fn draw_segment(&mut self, line: Line, stroke: Stroke) {
        self.segments.push((line, stroke));
    }
}
