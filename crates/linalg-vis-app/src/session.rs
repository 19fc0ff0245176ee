//! Command session: executes parsed commands against a board and writes
//! their output.

use linalg_vis_core::{BoardConfig, Command, CommandError, StoreError, Viewport};
use linalg_vis_core::command::HELP;
use linalg_vis_render::{Board, RetainedScene, to_svg};
use std::io::Write;
use thiserror::Error;

/// Errors surfaced to the user for a rejected command.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("No shape with id \"{0}\"")]
    UnknownShape(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whether the shell keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A board plus the sink command output goes to.
pub struct Session<W: Write> {
    board: Board<RetainedScene>,
    background: String,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(config: &BoardConfig, out: W) -> Result<Self, SessionError> {
        Ok(Self {
            board: Board::new(config, RetainedScene::new())?,
            background: config.background_color.clone(),
            out,
        })
    }

    pub fn board(&self) -> &Board<RetainedScene> {
        &self.board
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Parse and execute one input line. Blank lines and `#` comments are
    /// ignored.
    pub fn run_line(&mut self, line: &str) -> Result<Flow, SessionError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let command: Command = line.parse()?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow, SessionError> {
        log::debug!("Executing {command:?}");
        let store = self.board.store();
        match command {
            Command::Matrix(matrix) => store.set_matrix(matrix)?,
            Command::Vector { color, start, end } => {
                let id = store.add_vector(&color, start.x, start.y, end.x, end.y)?;
                writeln!(self.out, "{id}")?;
            }
            Command::Dot { color, at } => {
                let id = store.add_dot(&color, at.x, at.y)?;
                writeln!(self.out, "{id}")?;
            }
            Command::Ellipse {
                color,
                center,
                radius_x,
                radius_y,
            } => {
                let id = store.add_ellipse(&color, center.x, center.y, radius_x, radius_y)?;
                writeln!(self.out, "{id}")?;
            }
            Command::Rectangle {
                color,
                x,
                y,
                width,
                height,
            } => {
                let id = store.add_rectangle(&color, x, y, width, height)?;
                writeln!(self.out, "{id}")?;
            }
            Command::Polygon { color, points } => {
                let id = store.add_polygon(&color, points)?;
                writeln!(self.out, "{id}")?;
            }
            Command::Remove(id) => {
                if !self.board.remove_shape(&id) {
                    return Err(SessionError::UnknownShape(id));
                }
            }
            Command::Clear => store.clear_shapes(),
            Command::Range(range) => store.set_range(range)?,
            Command::Viewport { width, height } => {
                let margin = store.viewport().margin;
                store.set_viewport(Viewport::new(width, height, margin))?;
            }
            Command::Info => self.write_info()?,
            Command::List => {
                for shape in store.shapes().iter() {
                    writeln!(self.out, "{}", shape.summary())?;
                }
            }
            Command::Svg(path) => {
                let svg = self.svg();
                match path {
                    Some(path) => {
                        std::fs::write(&path, svg)?;
                        log::info!("Wrote SVG to {}", path.display());
                    }
                    None => self.out.write_all(svg.as_bytes())?,
                }
            }
            Command::Dump => {
                let json = self.board.renderer().surface().to_json()?;
                writeln!(self.out, "{json}")?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Current scene as an SVG document.
    pub fn svg(&self) -> String {
        let viewport = self.board.store().viewport();
        to_svg(
            self.board.renderer().surface(),
            viewport.width,
            viewport.height,
            &self.background,
        )
    }

    fn write_info(&mut self) -> Result<(), SessionError> {
        let matrix = *self.board.store().matrix();
        let (i, j) = matrix.columns();
        writeln!(self.out, "matrix:       {matrix}")?;
        writeln!(self.out, "determinant:  {}", matrix.determinant())?;
        writeln!(self.out, "trace:        {}", matrix.trace())?;
        writeln!(self.out, "rank:         {}", matrix.rank())?;
        writeln!(self.out, "i -> ({}, {})", i.x, i.y)?;
        writeln!(self.out, "j -> ({}, {})", j.x, j.y)?;

        let eigen = matrix.eigen_decomposition();
        writeln!(self.out, "eigenvalues:  {}", eigen.values)?;
        for v in &eigen.vectors {
            writeln!(self.out, "eigenvector:  ({}, {})", v.x, v.y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linalg_vis_core::Matrix2;
    use linalg_vis_render::AXIS_GROUP_ID;

    fn session() -> Session<Vec<u8>> {
        let config = BoardConfig {
            show_base_vectors: false,
            ..BoardConfig::default()
        };
        Session::new(&config, Vec::new()).unwrap()
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8(session.output().clone()).unwrap()
    }

    #[test]
    fn test_add_shapes_prints_ids() {
        let mut s = session();
        s.run_line("vector red 0 0 1 1").unwrap();
        s.run_line("dot blue 2 3").unwrap();
        assert_eq!(output(&s), "shape-1\nshape-2\n");
        assert_eq!(s.board().renderer().rendered_ids(), &["shape-1", "shape-2"]);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let mut s = session();
        assert_eq!(s.run_line("").unwrap(), Flow::Continue);
        assert_eq!(s.run_line("  # note").unwrap(), Flow::Continue);
        assert_eq!(s.run_line("quit").unwrap(), Flow::Quit);
    }

    #[test]
    fn test_rejected_command_leaves_board_untouched() {
        let mut s = session();
        assert!(matches!(
            s.run_line("matrix 1 oops 0 1"),
            Err(SessionError::Command(CommandError::InvalidNumber(_)))
        ));
        assert_eq!(*s.board().store().matrix(), Matrix2::IDENTITY);
        assert!(matches!(
            s.run_line("polygon red 0 0"),
            Err(SessionError::Store(StoreError::Shape(_)))
        ));
        assert!(s.board().store().shapes().is_empty());
    }

    #[test]
    fn test_remove_unknown_shape() {
        let mut s = session();
        assert!(matches!(s.run_line("remove shape-9"), Err(SessionError::UnknownShape(_))));
        s.run_line("dot red 0 0").unwrap();
        s.run_line("remove shape-1").unwrap();
        assert!(s.board().store().shapes().is_empty());
        assert!(!s.board().renderer().surface().contains("shape-1"));
    }

    #[test]
    fn test_info_reports_determinant_and_rank() {
        let mut s = session();
        s.run_line("matrix 2 0 0 3").unwrap();
        s.run_line("info").unwrap();
        let text = output(&s);
        assert!(text.contains("matrix:       [[2, 0], [0, 3]]"));
        assert!(text.contains("determinant:  6"));
        assert!(text.contains("rank:         2"));
        assert!(text.contains("i -> (2, 0)"));
        assert!(text.contains("j -> (0, 3)"));
    }

    #[test]
    fn test_list_uses_summaries() {
        let mut s = session();
        s.run_line("dot red 1 2").unwrap();
        s.run_line("list").unwrap();
        assert!(output(&s).contains("dot shape-1 [red] (1, 2)"));
    }

    #[test]
    fn test_svg_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.svg");
        let mut s = session();
        s.run_line("rect green 1 1 2 2").unwrap();
        s.run_line(&format!("svg {}", path.display())).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains(r#"<g id="shape-1" class="rectangle">"#));
        assert!(svg.contains(&format!(r#"<g id="{AXIS_GROUP_ID}" class="axis">"#)));
    }

    #[test]
    fn test_range_and_viewport() {
        let mut s = session();
        s.run_line("range 5").unwrap();
        assert!((s.board().store().x_scale().range() - 5.0).abs() < f64::EPSILON);
        s.run_line("viewport 600 300").unwrap();
        let store = s.board().store();
        assert!((store.x_scale().map(0.0) - 300.0).abs() < 1e-9);
        assert!((store.y_scale().map(0.0) - 150.0).abs() < 1e-9);
        assert!(matches!(s.run_line("range 0"), Err(SessionError::Store(_))));
        assert!(matches!(s.run_line("range 1e12"), Err(SessionError::Store(_))));
        assert!((s.board().store().x_scale().range() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dump_is_json() {
        let mut s = session();
        s.run_line("dot red 0 0").unwrap();
        s.run_line("dump").unwrap();
        let text = output(&s);
        assert!(text.contains("\"groups\""));
        assert!(text.contains("\"kind\": \"circle\""));
    }
}
