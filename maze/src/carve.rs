use anyhow::ensure;
use log::debug;
use rand::prelude::{IndexedRandom, Rng};
use rand::rngs::ThreadRng;

use crate::grid::{CellStorage, Maze, Point, Wall};

/// What a single carving step did. `WallRemoved` is the event a renderer
/// reacts to by erasing the boundary segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CarveStep {
    WallRemoved(Wall),
    Backtracked(Point),
    Done,
}

/// Randomized depth-first carver. Walks the grid with an explicit stack,
/// opening the wall to one unvisited neighbor at a time; when every cell
/// has been visited the open passages form a spanning tree, so any two
/// cells are connected by exactly one open path.
pub struct Carver<R: Rng> {
    stack: Vec<Point>,
    visited: CellStorage<bool>,
    rng: R,
    removed: usize,
    finished: bool,
}

impl Carver<ThreadRng> {
    pub fn new(maze: &Maze, start: Point) -> Result<Self, anyhow::Error> {
        Self::with_rng(maze, start, rand::rng())
    }
}

impl<R: Rng> Carver<R> {
    /// Like [`Carver::new`] but with a caller-provided randomness source,
    /// so a seeded rng reproduces the same maze.
    pub fn with_rng(maze: &Maze, start: Point, rng: R) -> Result<Self, anyhow::Error> {
        ensure!(maze.contains(start), "carve origin {start} is not in the graph");

        let mut visited = maze.create_storage::<bool>();
        *visited.get_mut(start) = true;

        Ok(Self {
            stack: vec![start],
            visited,
            rng,
            removed: 0,
            finished: false,
        })
    }

    /// Process one cell off the stack. Terminal once the stack is empty;
    /// further calls keep returning [`CarveStep::Done`].
    pub fn step(&mut self, maze: &mut Maze) -> CarveStep {
        let Some(current) = self.stack.pop() else {
            if !self.finished {
                self.finished = true;
                debug!("carving finished after removing {} walls", self.removed);
            }
            return CarveStep::Done;
        };

        let unvisited: Vec<Point> = maze
            .neighbors_of(current)
            .filter(|&n| !self.visited.get(n))
            .collect();

        match unvisited.choose(&mut self.rng) {
            Some(&next) => {
                // current may still have other unvisited neighbors, keep it
                // on the stack underneath the one we descend into
                self.stack.push(current);
                *self.visited.get_mut(next) = true;
                self.stack.push(next);

                let wall = maze
                    .remove_wall(current, next)
                    .expect("an unvisited neighbor always shares an intact wall");
                self.removed += 1;
                CarveStep::WallRemoved(wall)
            }
            None => CarveStep::Backtracked(current),
        }
    }

    /// Drive the carve to completion in one call.
    pub fn finish(&mut self, maze: &mut Maze) {
        while !matches!(self.step(maze), CarveStep::Done) {}
    }

    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }
}
