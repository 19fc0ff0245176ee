//! Text commands that drive the board.
//!
//! Parsing is strict: a command with a malformed or non-finite number is
//! rejected as a whole, so nothing reaches the store.

use crate::matrix::Matrix2;
use kurbo::Point;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Command parsing errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command \"{0}\" (try \"help\")")]
    Unknown(String),
    #[error("\"{command}\" expects {expected}")]
    Arity { command: &'static str, expected: &'static str },
    #[error("\"{0}\" is not a finite number")]
    InvalidNumber(String),
}

/// One board command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `matrix a b c d` sets `[[a, b], [c, d]]`.
    Matrix(Matrix2),
    Vector { color: String, start: Point, end: Point },
    Dot { color: String, at: Point },
    Ellipse {
        color: String,
        center: Point,
        radius_x: f64,
        radius_y: f64,
    },
    Rectangle {
        color: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Polygon { color: String, points: Vec<Point> },
    Remove(String),
    Clear,
    Range(f64),
    Viewport { width: f64, height: f64 },
    Info,
    List,
    /// Write the scene as SVG, to stdout when no path is given.
    Svg(Option<PathBuf>),
    /// Dump the drawn primitives as JSON.
    Dump,
    Help,
    Quit,
}

/// Usage text for the command shell.
pub const HELP: &str = "\
matrix A B C D                 set the matrix [[A, B], [C, D]]
vector COLOR X1 Y1 X2 Y2       add a vector
dot COLOR X Y                  add a dot
ellipse COLOR CX CY RX RY      add an ellipse
rect COLOR X Y W H             add a rectangle
polygon COLOR X1 Y1 X2 Y2 ...  add a polygon (at least 2 points)
remove ID                      remove a shape
clear                          remove all shapes except the base vectors
range R                        show [-R, R] on both axes
viewport W H                   resize the drawing area
info                           matrix, determinant, rank, eigenvalues
list                           list shapes
svg [PATH]                     write the scene as SVG
dump                           print drawn primitives as JSON
help                           this text
quit                           exit";

/// Parse a finite number.
pub fn parse_number(token: &str) -> Result<f64, CommandError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CommandError::InvalidNumber(token.to_string())),
    }
}

fn parse_numbers(tokens: &[&str]) -> Result<Vec<f64>, CommandError> {
    tokens.iter().map(|t| parse_number(t)).collect()
}

/// Parse exactly `N` numbers, or report the command's arity.
fn exact<const N: usize>(
    tokens: &[&str],
    command: &'static str,
    expected: &'static str,
) -> Result<[f64; N], CommandError> {
    if tokens.len() != N {
        return Err(CommandError::Arity { command, expected });
    }
    let values = parse_numbers(tokens)?;
    let mut out = [0.0; N];
    out.copy_from_slice(&values);
    Ok(out)
}

/// Split `COLOR rest...`.
fn color_and_rest<'a>(
    tokens: &'a [&'a str],
    command: &'static str,
    expected: &'static str,
) -> Result<(String, &'a [&'a str]), CommandError> {
    match tokens.split_first() {
        Some((color, rest)) => Ok((color.to_string(), rest)),
        None => Err(CommandError::Arity { command, expected }),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Err(CommandError::Empty);
        };

        match name.to_ascii_lowercase().as_str() {
            "matrix" => {
                let [a, b, c, d] = exact::<4>(args, "matrix", "4 numbers")?;
                Ok(Command::Matrix(Matrix2::new(a, b, c, d)))
            }
            "vector" => {
                const EXPECTED: &str = "a color and 4 numbers";
                let (color, rest) = color_and_rest(args, "vector", EXPECTED)?;
                let [x1, y1, x2, y2] = exact::<4>(rest, "vector", EXPECTED)?;
                Ok(Command::Vector {
                    color,
                    start: Point::new(x1, y1),
                    end: Point::new(x2, y2),
                })
            }
            "dot" => {
                const EXPECTED: &str = "a color and 2 numbers";
                let (color, rest) = color_and_rest(args, "dot", EXPECTED)?;
                let [x, y] = exact::<2>(rest, "dot", EXPECTED)?;
                Ok(Command::Dot {
                    color,
                    at: Point::new(x, y),
                })
            }
            "ellipse" => {
                const EXPECTED: &str = "a color and 4 numbers";
                let (color, rest) = color_and_rest(args, "ellipse", EXPECTED)?;
                let [cx, cy, rx, ry] = exact::<4>(rest, "ellipse", EXPECTED)?;
                Ok(Command::Ellipse {
                    color,
                    center: Point::new(cx, cy),
                    radius_x: rx,
                    radius_y: ry,
                })
            }
            "rect" | "rectangle" => {
                const EXPECTED: &str = "a color and 4 numbers";
                let (color, rest) = color_and_rest(args, "rect", EXPECTED)?;
                let [x, y, width, height] = exact::<4>(rest, "rect", EXPECTED)?;
                Ok(Command::Rectangle {
                    color,
                    x,
                    y,
                    width,
                    height,
                })
            }
            "polygon" => {
                const EXPECTED: &str = "a color and an even number of coordinates";
                let (color, rest) = color_and_rest(args, "polygon", EXPECTED)?;
                if rest.len() % 2 != 0 {
                    return Err(CommandError::Arity {
                        command: "polygon",
                        expected: EXPECTED,
                    });
                }
                let coords = parse_numbers(rest)?;
                let points = coords
                    .chunks_exact(2)
                    .map(|pair| Point::new(pair[0], pair[1]))
                    .collect();
                Ok(Command::Polygon { color, points })
            }
            "remove" => match args {
                [id] => Ok(Command::Remove(id.to_string())),
                _ => Err(CommandError::Arity {
                    command: "remove",
                    expected: "a shape id",
                }),
            },
            "range" => {
                let [range] = exact::<1>(args, "range", "1 number")?;
                Ok(Command::Range(range))
            }
            "viewport" => {
                let [width, height] = exact::<2>(args, "viewport", "2 numbers")?;
                Ok(Command::Viewport { width, height })
            }
            "svg" => match args {
                [] => Ok(Command::Svg(None)),
                [path] => Ok(Command::Svg(Some(PathBuf::from(*path)))),
                _ => Err(CommandError::Arity {
                    command: "svg",
                    expected: "at most one path",
                }),
            },
            "clear" => Ok(Command::Clear),
            "info" => Ok(Command::Info),
            "list" => Ok(Command::List),
            "dump" => Ok(Command::Dump),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matrix() {
        let cmd: Command = "matrix 2 0 0 2".parse().unwrap();
        assert_eq!(cmd, Command::Matrix(Matrix2::new(2.0, 0.0, 0.0, 2.0)));
    }

    #[test]
    fn test_parse_shapes() {
        assert_eq!(
            "vector red 0 0 1 2".parse::<Command>().unwrap(),
            Command::Vector {
                color: "red".to_string(),
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 2.0),
            }
        );
        assert_eq!(
            "DOT #00f 1.5 -2".parse::<Command>().unwrap(),
            Command::Dot {
                color: "#00f".to_string(),
                at: Point::new(1.5, -2.0),
            }
        );
        let Command::Polygon { points, .. } = "polygon orange 0 0 1 0 0 1".parse::<Command>().unwrap() else {
            panic!("expected polygon");
        };
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_malformed_number_rejects_command() {
        assert_eq!(
            "matrix 1 x 0 1".parse::<Command>(),
            Err(CommandError::InvalidNumber("x".to_string()))
        );
        assert_eq!(
            "dot red NaN 1".parse::<Command>(),
            Err(CommandError::InvalidNumber("NaN".to_string()))
        );
        assert!("range inf".parse::<Command>().is_err());
    }

    #[test]
    fn test_arity_errors() {
        assert!(matches!(
            "matrix 1 0 0".parse::<Command>(),
            Err(CommandError::Arity { command: "matrix", .. })
        ));
        assert!(matches!(
            "polygon red 0 0 1".parse::<Command>(),
            Err(CommandError::Arity { command: "polygon", .. })
        ));
        assert!(matches!(
            "vector".parse::<Command>(),
            Err(CommandError::Arity { command: "vector", .. })
        ));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "rotate 90".parse::<Command>(),
            Err(CommandError::Unknown("rotate".to_string()))
        );
    }

    #[test]
    fn test_svg_optional_path() {
        assert_eq!("svg".parse::<Command>().unwrap(), Command::Svg(None));
        assert_eq!(
            "svg out.svg".parse::<Command>().unwrap(),
            Command::Svg(Some(PathBuf::from("out.svg")))
        );
    }
}
