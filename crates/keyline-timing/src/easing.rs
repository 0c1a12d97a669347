//! The typed timing-function value and its CSS text conversions.

use std::fmt;

use cssparser::{ParseError, Parser, ParserInput};

/// A CSS timing function, either a cubic-Bezier curve or a step function.
///
/// This is the single easing representation shared by the rule model, the
/// text-patch engine and the playback layer. It round-trips losslessly
/// through [`TimelineEasing::parse`] / [`TimelineEasing::to_css`] for every
/// well-formed timing-function string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineEasing {
    /// A cubic-Bezier curve described by its two free control points, in
    /// unit-square coordinates: `[[x1, y1], [x2, y2]]`.
    Curve {
        /// The curve's control points `P1` and `P2`.
        control_points: [[f32; 2]; 2],
    },
    /// A discrete step function: `steps(count, jump_term)`.
    Steps {
        /// Number of steps, always at least 1.
        count: u32,
        /// Where the jumps occur within each interval.
        jump_term: JumpTerm,
    },
}

/// The jump position of a `steps()` timing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpTerm {
    /// Jump at the start of each interval (`start` / `jump-start`).
    Start,
    /// Jump at the end of each interval (`end` / `jump-end`). CSS default.
    #[default]
    End,
    /// No jump at either edge (`jump-none`).
    None,
    /// Jump at both edges (`jump-both`).
    Both,
}

impl JumpTerm {
    /// Parse a jump-term keyword.
    ///
    /// Accepts both the short (`start`) and prefixed (`jump-start`) spellings.
    /// Unrecognized keywords fall back to [`JumpTerm::End`], the CSS default.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "start" | "jump-start" => Self::Start,
            "end" | "jump-end" => Self::End,
            "jump-none" | "none" => Self::None,
            "jump-both" | "both" => Self::Both,
            other => {
                tracing::debug!("unrecognized jump term '{other}', defaulting to end");
                Self::End
            }
        }
    }

    /// The CSS keyword for this jump term.
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::None => "jump-none",
            Self::Both => "jump-both",
        }
    }
}

impl TimelineEasing {
    /// The CSS `ease` curve, also the fallback for unparseable input.
    pub const EASE: Self = Self::Curve {
        control_points: [[0.25, 0.1], [0.25, 1.0]],
    };
    /// The CSS `linear` curve.
    pub const LINEAR: Self = Self::Curve {
        control_points: [[0.0, 0.0], [1.0, 1.0]],
    };
    /// The CSS `ease-in` curve.
    pub const EASE_IN: Self = Self::Curve {
        control_points: [[0.42, 0.0], [1.0, 1.0]],
    };
    /// The CSS `ease-out` curve.
    pub const EASE_OUT: Self = Self::Curve {
        control_points: [[0.0, 0.0], [0.58, 1.0]],
    };
    /// The CSS `ease-in-out` curve.
    pub const EASE_IN_OUT: Self = Self::Curve {
        control_points: [[0.42, 0.0], [0.58, 1.0]],
    };
    /// The CSS `step-start` function.
    pub const STEP_START: Self = Self::Steps {
        count: 1,
        jump_term: JumpTerm::Start,
    };
    /// The CSS `step-end` function.
    pub const STEP_END: Self = Self::Steps {
        count: 1,
        jump_term: JumpTerm::End,
    };

    /// Parse a CSS timing-function string.
    ///
    /// Recognizes, in order: the named curves (`ease`, `linear`, `ease-in`,
    /// `ease-out`, `ease-in-out`, `step-start`, `step-end`), then
    /// `cubic-bezier(x1, y1, x2, y2)`, then `steps(n[, jump-term])`.
    ///
    /// This function never fails. Anything it cannot make sense of — an empty
    /// string, arbitrary garbage, a `cubic-bezier(` with fewer than four
    /// finite numbers — yields [`TimelineEasing::EASE`]. The source text is
    /// routinely malformed while the user is mid-edit, and a broken easing
    /// must degrade, not abort, the extraction pipeline.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(named) = Self::from_keyword(trimmed) {
            return named;
        }

        let mut input = ParserInput::new(trimmed);
        let mut parser = Parser::new(&mut input);
        match parse_function(&mut parser) {
            Some(easing) => easing,
            None => {
                tracing::debug!("unparseable timing function '{trimmed}', defaulting to ease");
                Self::EASE
            }
        }
    }

    /// Look up a named timing-function keyword, case-insensitively.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let named = match keyword.to_ascii_lowercase().as_str() {
            "ease" => Self::EASE,
            "linear" => Self::LINEAR,
            "ease-in" => Self::EASE_IN,
            "ease-out" => Self::EASE_OUT,
            "ease-in-out" => Self::EASE_IN_OUT,
            "step-start" => Self::STEP_START,
            "step-end" => Self::STEP_END,
            _ => return None,
        };
        Some(named)
    }

    /// Serialize back to CSS timing-function text.
    ///
    /// Curves always serialize in functional form, so `parse("ease-in")`
    /// serializes as `cubic-bezier(0.42, 0, 1, 1)` — textually different from
    /// the keyword but the same timing function.
    pub fn to_css(&self) -> String {
        match self {
            Self::Curve {
                control_points: [[x1, y1], [x2, y2]],
            } => format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"),
            Self::Steps { count, jump_term } => {
                format!("steps({count}, {})", jump_term.as_css())
            }
        }
    }

    /// The curve's control points, if this is a Bezier easing.
    pub fn control_points(&self) -> Option<[[f32; 2]; 2]> {
        match self {
            Self::Curve { control_points } => Some(*control_points),
            Self::Steps { .. } => None,
        }
    }
}

impl Default for TimelineEasing {
    fn default() -> Self {
        Self::EASE
    }
}

impl fmt::Display for TimelineEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Parse a `cubic-bezier(...)` or `steps(...)` functional notation.
fn parse_function(parser: &mut Parser<'_, '_>) -> Option<TimelineEasing> {
    let name = parser.expect_function().ok()?.clone();
    if name.eq_ignore_ascii_case("cubic-bezier") {
        parser.parse_nested_block(parse_cubic_bezier).ok()
    } else if name.eq_ignore_ascii_case("steps") {
        parser.parse_nested_block(parse_steps).ok()
    } else {
        None
    }
}

/// Parse the four comma-separated numbers inside `cubic-bezier(...)`.
fn parse_cubic_bezier<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<TimelineEasing, ParseError<'i, ()>> {
    let x1 = parser.expect_number()?;
    parser.expect_comma()?;
    let y1 = parser.expect_number()?;
    parser.expect_comma()?;
    let x2 = parser.expect_number()?;
    parser.expect_comma()?;
    let y2 = parser.expect_number()?;
    Ok(TimelineEasing::Curve {
        control_points: [[x1, y1], [x2, y2]],
    })
}

/// Parse the body of `steps(n[, jump-term])`.
fn parse_steps<'i>(parser: &mut Parser<'i, '_>) -> Result<TimelineEasing, ParseError<'i, ()>> {
    let count = parser.expect_integer()?.max(1) as u32;
    let jump_term = if parser.try_parse(|parser| parser.expect_comma()).is_ok() {
        match parser.expect_ident() {
            Ok(keyword) => JumpTerm::from_keyword(keyword),
            Err(_) => JumpTerm::End,
        }
    } else {
        JumpTerm::End
    };
    Ok(TimelineEasing::Steps { count, jump_term })
}
