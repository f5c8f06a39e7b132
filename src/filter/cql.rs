// ECQL rendering of filters
//
//  Copyright (C) 2014-2023 Ryan Specialty, LLC.
//
//  This file is part of sldyaml.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Render [`Filter`]s as ECQL.
//!
//! ECQL is the compact textual filter language understood by YSLD
//!   consumers.
//! Rendering is infallible:
//!   every filter that can be parsed has an ECQL representation.
//!
//! Literals are always rendered as quoted strings,
//!   since the filter markup does not distinguish numeric literals from
//!   textual ones.

use super::{
    ArithOp, CompareOp, DistanceOp, Envelope, Expr, Filter, Geometry, Point,
    SpatialOp,
};
use std::fmt::{self, Display, Write};

/// Render a filter as ECQL text.
pub fn encode(filter: &Filter) -> String {
    Ecql(filter).to_string()
}

/// [`Display`] adapter producing ECQL.
#[derive(Debug, Clone, Copy)]
pub struct Ecql<'a>(pub &'a Filter);

impl<'a> Display for Ecql<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Filter::And(operands) => junction(f, operands, "AND"),
            Filter::Or(operands) => junction(f, operands, "OR"),
            Filter::Not(inner) => write!(f, "NOT ({})", Ecql(inner)),

            Filter::Compare {
                op, left, right, ..
            } => write!(f, "{} {} {}", ExprEcql(left), op, ExprEcql(right)),

            Filter::Like {
                expr,
                pattern,
                wildcard,
                single,
                escape,
                match_case,
            } => {
                let op = if *match_case { "LIKE" } else { "ILIKE" };

                write!(f, "{} {op} '", ExprEcql(expr))?;
                like_pattern(f, pattern, *wildcard, *single, *escape)?;
                f.write_char('\'')
            }

            Filter::IsNull(expr) => write!(f, "{} IS NULL", ExprEcql(expr)),

            Filter::Between { expr, lower, upper } => write!(
                f,
                "{} BETWEEN {} AND {}",
                ExprEcql(expr),
                ExprEcql(lower),
                ExprEcql(upper),
            ),

            Filter::Id(ids) => {
                f.write_str("IN (")?;

                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    quoted(f, id)?;
                }

                f.write_char(')')
            }

            Filter::BBox {
                property,
                envelope:
                    Envelope {
                        min_x,
                        min_y,
                        max_x,
                        max_y,
                        srs,
                    },
            } => {
                write!(
                    f,
                    "BBOX({}, {min_x}, {min_y}, {max_x}, {max_y}",
                    ExprEcql(property),
                )?;

                if let Some(srs) = srs {
                    f.write_str(", ")?;
                    quoted(f, srs)?;
                }

                f.write_char(')')
            }

            Filter::Spatial {
                op,
                property,
                geometry,
            } => write!(
                f,
                "{op}({}, {})",
                ExprEcql(property),
                GeometryWkt(geometry),
            ),

            Filter::Distance {
                op,
                property,
                geometry,
                distance,
                units,
            } => write!(
                f,
                "{op}({}, {}, {distance}, {units})",
                ExprEcql(property),
                GeometryWkt(geometry),
            ),
        }
    }
}

/// Geometry literal in well-known text,
///   as ECQL expects it.
///
/// Envelopes have no WKT form of their own and are written as the
///   equivalent closed polygon.
struct GeometryWkt<'a>(&'a Geometry);

impl<'a> Display for GeometryWkt<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Geometry::Point((x, y)) => write!(f, "POINT ({x} {y})"),

            Geometry::LineString(points) => {
                f.write_str("LINESTRING ")?;
                point_list(f, points)
            }

            Geometry::Polygon(rings) => {
                f.write_str("POLYGON ")?;
                ring_list(f, rings)
            }

            Geometry::Envelope(Envelope {
                min_x,
                min_y,
                max_x,
                max_y,
                ..
            }) => {
                let ring = [
                    (*min_x, *min_y),
                    (*min_x, *max_y),
                    (*max_x, *max_y),
                    (*max_x, *min_y),
                    (*min_x, *min_y),
                ];

                f.write_str("POLYGON (")?;
                point_list(f, &ring)?;
                f.write_char(')')
            }
        }
    }
}

fn point_list(f: &mut fmt::Formatter<'_>, points: &[Point]) -> fmt::Result {
    f.write_char('(')?;

    for (i, (x, y)) in points.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{x} {y}")?;
    }

    f.write_char(')')
}

fn ring_list(f: &mut fmt::Formatter<'_>, rings: &[Vec<Point>]) -> fmt::Result {
    f.write_char('(')?;

    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        point_list(f, ring)?;
    }

    f.write_char(')')
}

/// Join operands with a logical operator,
///   parenthesizing nested junctions.
fn junction(
    f: &mut fmt::Formatter<'_>,
    operands: &[Filter],
    op: &str,
) -> fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }

        match operand {
            Filter::And(_) | Filter::Or(_) => {
                write!(f, "({})", Ecql(operand))?
            }
            _ => write!(f, "{}", Ecql(operand))?,
        }
    }

    Ok(())
}

/// Translate a filter `LIKE` pattern into ECQL `%`/`_` wildcards.
///
/// Characters escaped in the source pattern are emitted literally;
///   ECQL metacharacters appearing literally are escaped with a
///   backslash.
fn like_pattern(
    f: &mut fmt::Formatter<'_>,
    pattern: &str,
    wildcard: char,
    single: char,
    escape: char,
) -> fmt::Result {
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            _ if c == escape => match chars.next() {
                Some(next) => like_literal(f, next)?,
                None => like_literal(f, c)?,
            },
            _ if c == wildcard => f.write_char('%')?,
            _ if c == single => f.write_char('_')?,
            _ => like_literal(f, c)?,
        }
    }

    Ok(())
}

fn like_literal(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        '%' | '_' | '\\' => write!(f, "\\{c}"),
        '\'' => f.write_str("''"),
        _ => f.write_char(c),
    }
}

/// Single-quoted string literal.
fn quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('\'')?;

    for c in s.chars() {
        match c {
            '\'' => f.write_str("''")?,
            _ => f.write_char(c)?,
        }
    }

    f.write_char('\'')
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
        })
    }
}

impl Display for SpatialOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Intersects => "INTERSECTS",
            Self::Within => "WITHIN",
            Self::Contains => "CONTAINS",
            Self::Disjoint => "DISJOINT",
            Self::Touches => "TOUCHES",
            Self::Crosses => "CROSSES",
            Self::Overlaps => "OVERLAPS",
            Self::Equals => "EQUALS",
        })
    }
}

impl Display for DistanceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DWithin => "DWITHIN",
            Self::Beyond => "BEYOND",
        })
    }
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        })
    }
}

struct ExprEcql<'a>(&'a Expr);

impl<'a> Display for ExprEcql<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Property(name) if is_simple_name(name) => f.write_str(name),
            Expr::Property(name) => {
                f.write_char('"')?;
                for c in name.chars() {
                    match c {
                        '"' => f.write_str("\"\"")?,
                        _ => f.write_char(c)?,
                    }
                }
                f.write_char('"')
            }

            Expr::Literal(value) => quoted(f, value),

            Expr::Function(name, args) => {
                write!(f, "{name}(")?;

                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", ExprEcql(arg))?;
                }

                f.write_char(')')
            }

            Expr::Arith(op, left, right) => {
                operand(f, left)?;
                write!(f, " {op} ")?;
                operand(f, right)
            }
        }
    }
}

/// Arithmetic operand,
///   parenthesized if it is itself arithmetic.
fn operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Arith(..) => write!(f, "({})", ExprEcql(expr)),
        _ => write!(f, "{}", ExprEcql(expr)),
    }
}

/// Whether a property name can be written without quoting.
fn is_simple_name(name: &str) -> bool {
    let mut chars = name.chars();

    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':'))
}
