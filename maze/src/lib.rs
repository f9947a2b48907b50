pub mod builder;
pub mod carve;
pub mod grid;
pub mod solve;

pub use builder::full_grid;
pub use carve::{CarveStep, Carver};
pub use grid::{Cell, CellStorage, Direction, Edge, Maze, Orientation, Point, Wall};
pub use solve::{PathResult, Solver, SolverState, Visited, VisitedItem};
