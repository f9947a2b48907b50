use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identity of a cell in the grid, column first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub col: usize,
    pub row: usize,
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The direction that leads from `a` to `b`, if the two cells are
    /// 4-directionally adjacent.
    pub fn from_to(a: Point, b: Point) -> Option<Direction> {
        if a.col == b.col {
            if a.row == b.row + 1 {
                Some(Direction::Up)
            } else if b.row == a.row + 1 {
                Some(Direction::Down)
            } else {
                None
            }
        } else if a.row == b.row {
            if a.col == b.col + 1 {
                Some(Direction::Left)
            } else if b.col == a.col + 1 {
                Some(Direction::Right)
            } else {
                None
            }
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A wall separating two adjacent cells: the min-coordinate cell of the
/// pair plus the run of the separating segment. Vertical walls sit between
/// horizontal neighbors, horizontal walls between vertical neighbors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Wall {
    pub x: usize,
    pub y: usize,
    pub orientation: Orientation,
}

impl Wall {
    pub fn between(a: Point, b: Point) -> Wall {
        debug_assert!(
            Direction::from_to(a, b).is_some(),
            "wall endpoints must be adjacent cells"
        );

        let x = a.col.min(b.col);
        let y = a.row.min(b.row);

        let orientation = if a.row == b.row {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };

        Wall { x, y, orientation }
    }

    /// Endpoints of the separating segment, in cell units.
    pub fn endpoints(&self) -> ((usize, usize), (usize, usize)) {
        match self.orientation {
            Orientation::Vertical => ((self.x + 1, self.y), (self.x + 1, self.y + 1)),
            Orientation::Horizontal => ((self.x, self.y + 1), (self.x + 1, self.y + 1)),
        }
    }
}

/// One side of an edge: the neighbor it leads to and the wall state of the
/// shared boundary. `Some` means the wall is intact and blocks passage.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Edge {
    pub to: Point,
    pub wall: Option<Wall>,
}

/// A vertex of the maze graph with one adjacency slot per direction.
#[derive(Clone, Debug)]
pub struct Cell {
    pub coord: Point,
    neighbors: [Option<Edge>; 4],
}

impl Cell {
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.neighbors.iter().flatten()
    }
}

/// The maze as a graph over a rectangular grid: a dense arena of cells with
/// row-major coordinate lookup. Vertices and edges are inserted while
/// building; carving only mutates the wall state inside the cells.
#[derive(Clone, Debug)]
pub struct Maze {
    columns: usize,
    rows: usize,
    cells: Vec<Option<Cell>>,
}

impl Maze {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![None; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, p: Point) -> usize {
        p.row * self.columns + p.col
    }

    fn in_bounds(&self, p: Point) -> bool {
        p.col < self.columns && p.row < self.rows
    }

    pub fn vertex(&self, p: Point) -> Option<&Cell> {
        if !self.in_bounds(p) {
            return None;
        }
        self.cells[self.index(p)].as_ref()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.vertex(p).is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Insert a vertex. Returns false if the coordinate is out of bounds or
    /// already occupied.
    pub fn add_cell(&mut self, p: Point) -> bool {
        if !self.in_bounds(p) {
            return false;
        }
        let i = self.index(p);
        if self.cells[i].is_some() {
            return false;
        }
        self.cells[i] = Some(Cell {
            coord: p,
            neighbors: [None; 4],
        });
        true
    }

    /// Connect two adjacent vertices with a walled edge, updating both
    /// sides. A no-op returning false when either vertex is missing; a
    /// no-op returning true when the edge already exists, whatever its
    /// current wall state.
    pub fn add_edge(&mut self, a: Point, b: Point) -> bool {
        let Some(direction) = Direction::from_to(a, b) else {
            return false;
        };
        if !self.contains(a) || !self.contains(b) {
            return false;
        }

        let (ia, ib) = (self.index(a), self.index(b));
        if let Some(cell) = &self.cells[ia] {
            if cell.neighbors[direction.index()].is_some() {
                return true;
            }
        }

        let wall = Some(Wall::between(a, b));
        if let Some(cell) = self.cells[ia].as_mut() {
            cell.neighbors[direction.index()] = Some(Edge { to: b, wall });
        }
        if let Some(cell) = self.cells[ib].as_mut() {
            cell.neighbors[direction.opposite().index()] = Some(Edge { to: a, wall });
        }
        true
    }

    pub fn neighbors_of(&self, p: Point) -> impl Iterator<Item = Point> {
        let mut points = Vec::with_capacity(4);
        if let Some(cell) = self.vertex(p) {
            points.extend(cell.edges().map(|edge| edge.to));
        }
        points.into_iter()
    }

    /// Neighbors reachable from `p` through an open passage.
    pub fn open_neighbors_of(&self, p: Point) -> impl Iterator<Item = Point> {
        let mut points = Vec::with_capacity(4);
        if let Some(cell) = self.vertex(p) {
            points.extend(
                cell.edges()
                    .filter(|edge| edge.wall.is_none())
                    .map(|edge| edge.to),
            );
        }
        points.into_iter()
    }

    /// The intact wall between two adjacent vertices, if any.
    pub fn wall_between(&self, a: Point, b: Point) -> Option<Wall> {
        self.vertex(a)?.edges().find(|edge| edge.to == b)?.wall
    }

    /// Open the passage between two adjacent vertices, clearing the wall on
    /// both sides, and return the removed wall so a renderer can erase it.
    /// Returns None when there is no such edge or the wall is already gone;
    /// a removed wall never comes back.
    pub fn remove_wall(&mut self, a: Point, b: Point) -> Option<Wall> {
        let direction = Direction::from_to(a, b)?;
        if !self.contains(a) || !self.contains(b) {
            return None;
        }

        let ia = self.index(a);
        let wall = {
            let edge = self.cells[ia].as_mut()?.neighbors[direction.index()].as_mut()?;
            if edge.to != b {
                return None;
            }
            edge.wall.take()?
        };

        let ib = self.index(b);
        if let Some(edge) = self.cells[ib]
            .as_mut()
            .and_then(|cell| cell.neighbors[direction.opposite().index()].as_mut())
        {
            if edge.to == a {
                edge.wall = None;
            }
        }

        Some(wall)
    }

    /// Every intact wall, reported once from the cell that owns its
    /// canonical coordinate.
    pub fn walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.cells.iter().flatten().flat_map(|cell| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter_map(move |direction| cell.neighbors[direction.index()].as_ref()?.wall)
        })
    }

    /// Create a dense per-cell side storage for values of type T.
    pub fn create_storage<T: Default + Clone>(&self) -> CellStorage<T> {
        CellStorage {
            columns: self.columns,
            cells: vec![T::default(); self.columns * self.rows],
        }
    }
}

/// Adjacency-list dump of the graph: one line per vertex with its neighbor
/// coordinates in direction order.
impl Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in self.cells.iter().flatten() {
            write!(f, "{}\t", cell.coord)?;
            for edge in cell.edges() {
                write!(f, " {}", edge.to)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Per-cell side storage backed by a single row-major Vec.
#[derive(Clone, Debug)]
pub struct CellStorage<T> {
    columns: usize,
    cells: Vec<T>,
}

impl<T> CellStorage<T> {
    fn index(&self, p: Point) -> usize {
        debug_assert!(p.col < self.columns, "column {} is out of bounds", p.col);
        p.row * self.columns + p.col
    }

    pub fn get_mut(&mut self, p: Point) -> &mut T {
        let i = self.index(p);
        &mut self.cells[i]
    }
}

impl<T: Copy> CellStorage<T> {
    pub fn get(&self, p: Point) -> T {
        self.cells[self.index(p)]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
