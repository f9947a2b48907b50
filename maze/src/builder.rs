use anyhow::ensure;

use crate::grid::{Maze, Point};

/// Build the fully connected starting grid: one cell per coordinate of
/// `[0, columns) x [0, rows)` and a walled edge between every
/// 4-directionally adjacent pair. Carving opens passages in it afterwards.
pub fn full_grid(columns: usize, rows: usize) -> Result<Maze, anyhow::Error> {
    ensure!(
        columns > 0 && rows > 0,
        "maze dimensions must be positive, got {}x{}",
        columns,
        rows
    );

    let mut maze = Maze::new(columns, rows);

    for row in 0..rows {
        for col in 0..columns {
            maze.add_cell(Point { col, row });
        }
    }

    // connecting every cell to its right and down neighbor covers each
    // adjacent pair exactly once
    for row in 0..rows {
        for col in 0..columns {
            let p = Point { col, row };
            if col + 1 < columns {
                maze.add_edge(p, Point { col: col + 1, row });
            }
            if row + 1 < rows {
                maze.add_edge(p, Point { col, row: row + 1 });
            }
        }
    }

    Ok(maze)
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(full_grid(0, 5).is_err());
        assert!(full_grid(5, 0).is_err());
        assert!(full_grid(0, 0).is_err());
    }

    #[test]
    fn creates_every_vertex() {
        let maze = full_grid(3, 4).unwrap();
        assert_eq!(maze.vertex_count(), 12);
        for row in 0..4 {
            for col in 0..3 {
                assert!(maze.contains(Point { col, row }));
            }
        }
    }

    #[test]
    fn vertex_degrees_match_their_position() {
        let maze = full_grid(3, 3).unwrap();
        // corner, edge and interior cells
        assert_eq!(maze.neighbors_of(Point { col: 0, row: 0 }).count(), 2);
        assert_eq!(maze.neighbors_of(Point { col: 1, row: 0 }).count(), 3);
        assert_eq!(maze.neighbors_of(Point { col: 1, row: 1 }).count(), 4);
        assert_eq!(maze.neighbors_of(Point { col: 2, row: 2 }).count(), 2);
    }

    #[test]
    fn adjacency_is_symmetric_with_intact_walls() {
        let maze = full_grid(4, 3).unwrap();
        for row in 0..3 {
            for col in 0..4 {
                let p = Point { col, row };
                for n in maze.neighbors_of(p) {
                    assert!(maze.neighbors_of(n).any(|q| q == p));
                    assert!(maze.wall_between(p, n).is_some());
                    assert_eq!(maze.wall_between(p, n), maze.wall_between(n, p));
                }
            }
        }
    }

    #[test]
    fn no_passage_is_open_before_carving() {
        let maze = full_grid(4, 4).unwrap();
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(maze.open_neighbors_of(Point { col, row }).count(), 0);
            }
        }
    }

    #[test]
    fn single_cell_grid_has_no_edges() {
        let maze = full_grid(1, 1).unwrap();
        assert_eq!(maze.vertex_count(), 1);
        assert_eq!(maze.neighbors_of(Point { col: 0, row: 0 }).count(), 0);
    }
}
