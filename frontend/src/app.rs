use std::time::Duration;

use egui::{pos2, vec2, Color32, Pos2, Rect, Rounding, Stroke, Ui};
use log::{error, info};
use rand::rngs::ThreadRng;

use maze::{CarveStep, Carver, Maze, Point, Solver, SolverState};

const BACKGROUND: Color32 = Color32::WHITE;
const BOUNDARY: Color32 = Color32::from_rgb(0, 0, 255);
const WALL: Color32 = Color32::BLACK;
const VISITED: Color32 = Color32::from_rgb(255, 0, 0);
const PATH: Color32 = Color32::from_rgb(0, 0, 255);

const LINE_WIDTH: f32 = 1.0;
const CARVE_STEPS_PER_FRAME: usize = 8;
const SOLVE_STEPS_PER_FRAME: usize = 4;
const STEP_DELAY: Duration = Duration::from_millis(15);

enum Phase {
    Carving(Carver<ThreadRng>),
    Solving(Solver),
    Finished(SolverState),
    Failed(String),
}

/// Window shell around the carve and solve state machines: steps them a few
/// times per frame so the traversal is visible, and draws the maze from its
/// current wall state every frame.
pub struct MazeApp {
    maze: Maze,
    phase: Phase,
}

impl MazeApp {
    pub fn new(maze: Maze) -> Result<Self, anyhow::Error> {
        let carver = Carver::new(&maze, Point { col: 0, row: 0 })?;
        Ok(Self {
            maze,
            phase: Phase::Carving(carver),
        })
    }

    fn advance(&mut self, ctx: &egui::Context) {
        let next = match &mut self.phase {
            Phase::Carving(carver) => {
                let mut done = false;
                for _ in 0..CARVE_STEPS_PER_FRAME {
                    if matches!(carver.step(&mut self.maze), CarveStep::Done) {
                        done = true;
                        break;
                    }
                }
                ctx.request_repaint_after(STEP_DELAY);

                if done {
                    info!("maze carved, starting the solver");
                    let start = Point { col: 0, row: 0 };
                    // the goal is always the far corner of this maze
                    let goal = Point {
                        col: self.maze.columns() - 1,
                        row: self.maze.rows() - 1,
                    };
                    match Solver::new(&self.maze, start, goal) {
                        Ok(solver) => Some(Phase::Solving(solver)),
                        Err(err) => {
                            error!("could not start the solver: {err:#}");
                            Some(Phase::Failed(err.to_string()))
                        }
                    }
                } else {
                    None
                }
            }
            Phase::Solving(solver) => {
                let mut outcome = None;
                for _ in 0..SOLVE_STEPS_PER_FRAME {
                    match solver.step(&self.maze) {
                        Ok(SolverState::Computing) => {}
                        Ok(state) => {
                            outcome = Some(Ok(state));
                            break;
                        }
                        Err(err) => {
                            outcome = Some(Err(err));
                            break;
                        }
                    }
                }
                ctx.request_repaint_after(STEP_DELAY);

                match outcome {
                    None => None,
                    Some(Ok(state)) => {
                        // generation and solving are complete, dump the graph
                        print!("{}", self.maze);
                        match &state {
                            SolverState::PathFound(result) => {
                                info!("shortest path found, {} cells", result.length)
                            }
                            SolverState::NoPathFound => {
                                error!("no path from the origin to the far corner")
                            }
                            SolverState::Computing => {}
                        }
                        Some(Phase::Finished(state))
                    }
                    Some(Err(err)) => {
                        error!("solver failed: {err:#}");
                        Some(Phase::Failed(err.to_string()))
                    }
                }
            }
            Phase::Finished(_) | Phase::Failed(_) => None,
        };

        if let Some(phase) = next {
            self.phase = phase;
        }
    }

    fn draw(&self, ui: &mut Ui) {
        let columns = self.maze.columns();
        let rows = self.maze.rows();

        let available = ui.max_rect();
        let scale = (available.width() / columns as f32).min(available.height() / rows as f32);
        let origin = available.min;
        let board = Rect::from_min_size(origin, vec2(columns as f32 * scale, rows as f32 * scale));

        let painter = ui.painter();
        painter.rect_filled(board, Rounding::ZERO, BACKGROUND);

        // explored cells while the search is still running
        if let Phase::Solving(solver) = &self.phase {
            for row in 0..rows {
                for col in 0..columns {
                    let p = Point { col, row };
                    if solver.visited().get(p).is_some() {
                        painter.rect_filled(cell_rect(origin, scale, p), Rounding::ZERO, VISITED);
                    }
                }
            }
        }

        // once the path is known the visited highlights give way to it
        if let Phase::Finished(SolverState::PathFound(result)) = &self.phase {
            for &p in &result.path {
                painter.rect_filled(cell_rect(origin, scale, p), Rounding::ZERO, PATH);
            }
        }

        let stroke = Stroke::new(LINE_WIDTH, WALL);
        for wall in self.maze.walls() {
            let (a, b) = wall.endpoints();
            painter.line_segment([to_screen(origin, scale, a), to_screen(origin, scale, b)], stroke);
        }
        painter.rect_stroke(board, Rounding::ZERO, Stroke::new(LINE_WIDTH, BOUNDARY));

        match &self.phase {
            Phase::Failed(message) => {
                ui.colored_label(Color32::RED, message.as_str());
            }
            Phase::Finished(SolverState::NoPathFound) => {
                ui.colored_label(Color32::RED, "no path found");
            }
            _ => {}
        }
    }
}

impl eframe::App for MazeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance(ctx);

        egui::CentralPanel::default().show(ctx, |ui| self.draw(ui));
    }
}

fn to_screen(origin: Pos2, scale: f32, (x, y): (usize, usize)) -> Pos2 {
    pos2(origin.x + x as f32 * scale, origin.y + y as f32 * scale)
}

fn cell_rect(origin: Pos2, scale: f32, p: Point) -> Rect {
    Rect::from_min_size(
        pos2(
            origin.x + p.col as f32 * scale + 1.0,
            origin.y + p.row as f32 * scale + 1.0,
        ),
        vec2(scale - 1.0, scale - 1.0),
    )
}
