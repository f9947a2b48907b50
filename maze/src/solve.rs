use std::collections::VecDeque;
use std::fmt::Display;
use std::ops::{Deref, DerefMut};

use anyhow::{bail, ensure};
use log::debug;

use crate::grid::{CellStorage, Maze, Point};

/// Search record of one cell: its distance from the start and the cell it
/// was first reached from.
#[derive(Clone, Copy, Debug)]
pub struct VisitedItem {
    pub dist: usize,
    pub from: Option<Point>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Visited(Option<VisitedItem>);

impl Deref for Visited {
    type Target = Option<VisitedItem>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Visited {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for Visited {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(item) => write!(f, "{:3} ", item.dist),
            None => write!(f, "  . "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
    /// Number of cells on the path, endpoints included.
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverState {
    Computing,
    NoPathFound,
    PathFound(PathResult),
}

/// Breadth-first shortest-path search over the open passages of a carved
/// maze. Stepped one dequeue at a time so a renderer can show the frontier
/// expanding; the first time the goal is dequeued its parent chain is a
/// shortest path by cell count.
pub struct Solver {
    start: Point,
    goal: Point,
    visited: CellStorage<Visited>,
    queue: VecDeque<Point>,
    state: SolverState,
}

impl Solver {
    pub fn new(maze: &Maze, start: Point, goal: Point) -> Result<Self, anyhow::Error> {
        ensure!(maze.contains(start), "start vertex {start} is not in the graph");
        ensure!(maze.contains(goal), "goal vertex {goal} is not in the graph");

        let mut visited = maze.create_storage::<Visited>();
        *visited.get_mut(start) = Visited(Some(VisitedItem {
            dist: 0,
            from: None,
        }));

        Ok(Self {
            start,
            goal,
            visited,
            queue: VecDeque::from([start]),
            state: SolverState::Computing,
        })
    }

    /// Run the search to a terminal state and hand the visited storage
    /// back for inspection.
    pub fn finish(mut self, maze: &Maze) -> Result<(SolverState, CellStorage<Visited>), anyhow::Error> {
        loop {
            match self.step(maze)? {
                SolverState::Computing => {}
                state => return Ok((state, self.visited)),
            }
        }
    }

    /// Dequeue and process one cell. An exhausted queue is the legitimate
    /// no-path outcome; a broken parent chain while rebuilding the path is
    /// an internal error and reported as such.
    pub fn step(&mut self, maze: &Maze) -> Result<SolverState, anyhow::Error> {
        if self.state != SolverState::Computing {
            return Ok(self.state.clone());
        }

        if let Some(current) = self.queue.pop_front() {
            if current == self.goal {
                let path = self.reconstruct(maze)?;
                debug!("goal {} reached, {} cells on the path", self.goal, path.len());

                self.state = SolverState::PathFound(PathResult {
                    length: path.len(),
                    path,
                    start: self.start,
                    goal: self.goal,
                });
                return Ok(self.state.clone());
            }

            let Visited(Some(item)) = self.visited.get(current) else {
                bail!("dequeued {current} without a visited record");
            };

            for neighbor in maze.open_neighbors_of(current) {
                if self.visited.get(neighbor).is_none() {
                    *self.visited.get_mut(neighbor) = Visited(Some(VisitedItem {
                        dist: item.dist + 1,
                        from: Some(current),
                    }));
                    self.queue.push_back(neighbor);
                }
            }
        } else {
            debug!("queue exhausted before reaching {}", self.goal);
            self.state = SolverState::NoPathFound;
        }

        Ok(self.state.clone())
    }

    /// Walk the parent pointers back from the goal and reverse the result
    /// into start-to-goal order. The chain must lead to the start; anything
    /// else means the search state is corrupt.
    fn reconstruct(&self, maze: &Maze) -> Result<Vec<Point>, anyhow::Error> {
        let mut path = vec![self.goal];
        let mut cursor = self.visited.get(self.goal);

        // a valid parent chain can never be longer than the vertex count
        let bound = maze.columns() * maze.rows();

        loop {
            ensure!(path.len() <= bound, "parent chain exceeded the vertex count");

            cursor = match cursor {
                Visited(Some(VisitedItem { from: None, .. })) => break,
                Visited(Some(VisitedItem {
                    from: Some(from), ..
                })) => {
                    path.push(from);
                    self.visited.get(from)
                }
                Visited(None) => bail!("parent chain reached a cell that was never visited"),
            };
        }

        path.reverse();
        ensure!(
            path.first() == Some(&self.start),
            "parent chain did not terminate at the start {}",
            self.start
        );

        Ok(path)
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn visited(&self) -> &CellStorage<Visited> {
        &self.visited
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }
}

#[cfg(test)]
mod test {

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::builder::full_grid;
    use crate::carve::Carver;

    const ORIGIN: Point = Point { col: 0, row: 0 };

    fn carved(columns: usize, rows: usize, seed: u64) -> Maze {
        let mut maze = full_grid(columns, rows).unwrap();
        let mut carver = Carver::with_rng(&maze, ORIGIN, StdRng::seed_from_u64(seed)).unwrap();
        carver.finish(&mut maze);
        maze
    }

    fn far_corner(maze: &Maze) -> Point {
        Point {
            col: maze.columns() - 1,
            row: maze.rows() - 1,
        }
    }

    fn solve(maze: &Maze) -> SolverState {
        let solver = Solver::new(maze, ORIGIN, far_corner(maze)).unwrap();
        solver.finish(maze).unwrap().0
    }

    /// Independent distance computation to check the solver against.
    fn open_distance(maze: &Maze, from: Point, to: Point) -> Option<usize> {
        let mut dist = maze.create_storage::<Option<usize>>();
        let mut queue = VecDeque::from([from]);
        *dist.get_mut(from) = Some(0);

        while let Some(current) = queue.pop_front() {
            let d = dist.get(current).unwrap();
            if current == to {
                return Some(d);
            }
            for n in maze.open_neighbors_of(current) {
                if dist.get(n).is_none() {
                    *dist.get_mut(n) = Some(d + 1);
                    queue.push_back(n);
                }
            }
        }

        None
    }

    #[test]
    fn single_cell_path_is_the_origin() {
        let maze = full_grid(1, 1).unwrap();
        match solve(&maze) {
            SolverState::PathFound(result) => {
                assert_eq!(result.path, vec![ORIGIN]);
                assert_eq!(result.length, 1);
            }
            state => panic!("expected a path, got {state:?}"),
        }
    }

    #[test]
    fn two_cell_maze_has_the_obvious_path() {
        let maze = carved(2, 1, 4);
        match solve(&maze) {
            SolverState::PathFound(result) => {
                assert_eq!(result.path, vec![ORIGIN, Point { col: 1, row: 0 }]);
            }
            state => panic!("expected a path, got {state:?}"),
        }
    }

    #[test]
    fn path_is_provably_shortest() {
        for seed in 0..8 {
            let maze = carved(5, 5, seed);
            let goal = far_corner(&maze);

            let SolverState::PathFound(result) = solve(&maze) else {
                panic!("carved maze must have a path");
            };

            assert_eq!(result.path.first(), Some(&ORIGIN));
            assert_eq!(result.path.last(), Some(&goal));
            for pair in result.path.windows(2) {
                assert!(
                    maze.open_neighbors_of(pair[0]).any(|n| n == pair[1]),
                    "{} and {} are not connected by an open passage",
                    pair[0],
                    pair[1]
                );
            }

            let expected = open_distance(&maze, ORIGIN, goal).unwrap();
            assert_eq!(result.length, expected + 1);
        }
    }

    #[test]
    fn repeated_solves_return_the_same_path() {
        let maze = carved(6, 6, 21);
        let first = solve(&maze);
        let second = solve(&maze);
        assert_eq!(first, second);
    }

    #[test]
    fn unbroken_grid_has_no_path() {
        // all walls intact, the origin is sealed in
        let maze = full_grid(3, 3).unwrap();
        assert_eq!(solve(&maze), SolverState::NoPathFound);
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let mut maze = Maze::new(2, 2);
        maze.add_cell(ORIGIN);
        assert!(Solver::new(&maze, ORIGIN, Point { col: 1, row: 1 }).is_err());
        assert!(Solver::new(&maze, Point { col: 1, row: 1 }, ORIGIN).is_err());
    }

    #[test]
    fn terminal_state_is_sticky() {
        let maze = full_grid(2, 2).unwrap();
        let mut solver = Solver::new(&maze, ORIGIN, far_corner(&maze)).unwrap();

        while *solver.state() == SolverState::Computing {
            solver.step(&maze).unwrap();
        }
        assert_eq!(solver.step(&maze).unwrap(), SolverState::NoPathFound);
    }

    #[test]
    fn finish_exposes_the_visited_frontier() {
        let maze = carved(4, 4, 2);
        let solver = Solver::new(&maze, ORIGIN, far_corner(&maze)).unwrap();
        let (state, visited) = solver.finish(&maze).unwrap();

        assert!(matches!(state, SolverState::PathFound(_)));
        assert!(visited.get(far_corner(&maze)).is_some());
        assert_eq!(visited.get(ORIGIN).map(|item| item.dist), Some(0));
    }
}
