// Filter Encoding parser
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

//! Pushdown parser for OGC Filter Encoding.
//!
//! Each recognized element opens a [`Frame`] that accumulates the values
//!   produced by its children.
//! When an element closes,
//!   its frame is reduced into a [`Value`] that is offered to the frame
//!   beneath it;
//!     the parent decides whether it accepts that kind of value.
//! This keeps the grammar of each operator local to its frame rather than
//!   encoding it in a separate validation pass.

use super::{
    ArithOp, CompareOp, Dialect, DistanceOp, EngineStatus, Envelope, Expr,
    Filter, FilterEngine, FilterError, Geometry, Point, SpatialOp,
};
use crate::{
    span::Span,
    xml::{Element, EndTag, NS_GML},
};

type Result<T> = std::result::Result<T, FilterError>;

/// Parser for a single filter of a given [`Dialect`].
#[derive(Debug)]
pub struct FilterParser {
    dialect: Dialect,
    stack: Vec<Frame>,
}

impl FilterParser {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            stack: Vec::new(),
        }
    }

    /// Determine the frame to open for the given element.
    ///
    /// Elements are matched by local name only;
    ///   the namespace of filter elements varies too much in the wild to
    ///   be useful.
    fn frame_for(&self, el: &Element) -> Result<Frame> {
        use Dialect::*;

        let name = el.name.as_str();
        let span = el.span;

        if let Some(op) = CompareOp::from_element(name) {
            return Ok(Frame::Compare {
                op,
                match_case: self.match_case(el),
                exprs: Vec::new(),
            });
        }

        if let Some(op) = ArithOp::from_element(name) {
            return Ok(Frame::Arith {
                op,
                exprs: Vec::new(),
            });
        }

        if let Some(op) = SpatialOp::from_element(name) {
            return Ok(Frame::Spatial {
                op,
                property: None,
                geometry: None,
            });
        }

        if let Some(op) = DistanceOp::from_element(name) {
            return Ok(Frame::Distance {
                op,
                property: None,
                geometry: None,
                distance: None,
            });
        }

        Ok(match (name, self.dialect) {
            ("Filter", _) => Frame::Root {
                filters: Vec::new(),
                ids: Vec::new(),
            },

            ("And", _) => Frame::Logical(Logic::And, Vec::new()),
            ("Or", _) => Frame::Logical(Logic::Or, Vec::new()),
            ("Not", _) => Frame::Logical(Logic::Not, Vec::new()),

            ("PropertyIsLike", dialect) => {
                let escape_attr = match dialect {
                    Filter10 => "escape",
                    Filter11 => "escapeChar",
                };

                Frame::Like {
                    wildcard: char_attr(el, "wildCard", '*')?,
                    single: char_attr(el, "singleChar", '.')?,
                    escape: char_attr(el, escape_attr, '!')?,
                    match_case: self.match_case(el),
                    exprs: Vec::new(),
                }
            }

            ("PropertyIsNull", _) => Frame::IsNull(Vec::new()),

            ("PropertyIsBetween", _) => Frame::Between {
                expr: None,
                lower: None,
                upper: None,
            },
            ("LowerBoundary", _) => Frame::Boundary(Bound::Lower, Vec::new()),
            ("UpperBoundary", _) => Frame::Boundary(Bound::Upper, Vec::new()),

            ("FeatureId", _) => Frame::Id(required_attr(el, "FeatureId", "fid")?),
            ("GmlObjectId", Filter11) => Frame::Id(
                el.attr_ns(NS_GML, "id")
                    .or_else(|| el.attr("id"))
                    .map(String::from)
                    .ok_or(FilterError::MissingAttr {
                        attr: "gml:id",
                        el: "GmlObjectId",
                        span,
                    })?,
            ),

            ("BBOX", _) => Frame::BBox {
                property: None,
                envelope: None,
            },
            ("Distance", _) => Frame::DistanceValue {
                units: required_attr(el, "Distance", "units")?,
                text: String::new(),
            },

            ("Point", _) => Frame::Point(Vec::new()),
            ("LineString", _) => Frame::LineString(Vec::new()),
            ("LinearRing", _) => Frame::LinearRing(Vec::new()),
            ("Polygon", _) => Frame::Polygon {
                exterior: None,
                interiors: Vec::new(),
            },
            ("outerBoundaryIs", Filter10) => {
                Frame::ring(Ring::Exterior, "outerBoundaryIs")
            }
            ("innerBoundaryIs", Filter10) => {
                Frame::ring(Ring::Interior, "innerBoundaryIs")
            }
            ("exterior", Filter11) => Frame::ring(Ring::Exterior, "exterior"),
            ("interior", Filter11) => Frame::ring(Ring::Interior, "interior"),
            ("pos", Filter11) => Frame::Pos(String::new()),
            ("posList", Filter11) => Frame::PosList(String::new()),

            ("Box", Filter10) => Frame::Box {
                srs: el.attr("srsName").map(String::from),
                points: None,
            },
            ("coordinates", Filter10) => Frame::Coordinates {
                cs: el.attr("cs").unwrap_or(",").to_string(),
                ts: el.attr("ts").unwrap_or(" ").to_string(),
                text: String::new(),
            },
            ("Envelope", Filter11) => Frame::Envelope {
                srs: el.attr("srsName").map(String::from),
                lower: None,
                upper: None,
            },
            ("lowerCorner", Filter11) => {
                Frame::Corner(Bound::Lower, String::new())
            }
            ("upperCorner", Filter11) => {
                Frame::Corner(Bound::Upper, String::new())
            }

            ("PropertyName", _) => Frame::Property(String::new()),
            ("Literal", _) => Frame::Literal(String::new()),
            ("Function", _) => {
                Frame::Function(required_attr(el, "Function", "name")?, Vec::new())
            }

            (_, dialect) => {
                return Err(FilterError::UnknownElement {
                    name: el.name.clone(),
                    dialect,
                    span,
                })
            }
        })
    }

    /// Case sensitivity of a comparison.
    ///
    /// The `matchCase` attribute was introduced with Filter Encoding 1.1
    ///   and is ignored for older documents.
    fn match_case(&self, el: &Element) -> bool {
        match self.dialect {
            Dialect::Filter10 => true,
            Dialect::Filter11 => {
                !matches!(el.attr("matchCase").map(str::trim), Some("false"))
            }
        }
    }
}

impl FilterEngine for FilterParser {
    fn start(&mut self, el: &Element) -> Result<()> {
        let frame = self.frame_for(el)?;

        // Only the first element may be the root,
        //   and the root must be first.
        if matches!(frame, Frame::Root { .. }) != self.stack.is_empty() {
            return Err(FilterError::UnexpectedChild {
                name: el.name.clone(),
                parent: self
                    .stack
                    .last()
                    .map(Frame::name)
                    .unwrap_or("(start of filter)"),
                span: el.span,
            });
        }

        self.stack.push(frame);
        Ok(())
    }

    fn characters(&mut self, text: &str, span: Span) -> Result<()> {
        match self.stack.last_mut() {
            Some(
                Frame::Property(buf)
                | Frame::Literal(buf)
                | Frame::Corner(_, buf)
                | Frame::Pos(buf)
                | Frame::PosList(buf)
                | Frame::DistanceValue { text: buf, .. }
                | Frame::Coordinates { text: buf, .. },
            ) => {
                buf.push_str(text);
                Ok(())
            }

            _ if text.trim().is_empty() => Ok(()),
            _ => Err(FilterError::UnexpectedText(span)),
        }
    }

    fn end(&mut self, end: &EndTag) -> Result<EngineStatus> {
        let frame = self.stack.pop().ok_or_else(|| {
            FilterError::UnexpectedEnd(end.name.clone(), end.span)
        })?;

        let value = frame.reduce(end.span)?;

        match (self.stack.last_mut(), value) {
            (Some(parent), value) => {
                parent.accept(value, &end.name, end.span)?;
                Ok(EngineStatus::Incomplete)
            }

            (None, Value::Filter(filter)) => Ok(EngineStatus::Done(filter)),

            // Only the root may be the bottom of the stack,
            //   and the root always reduces into a filter.
            (None, _) => {
                Err(FilterError::UnexpectedEnd(end.name.clone(), end.span))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Logic {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ring {
    Exterior,
    Interior,
}

/// Partially parsed filter element.
#[derive(Debug)]
enum Frame {
    Root {
        filters: Vec<Filter>,
        ids: Vec<String>,
    },
    Logical(Logic, Vec<Filter>),
    Compare {
        op: CompareOp,
        match_case: bool,
        exprs: Vec<Expr>,
    },
    Like {
        wildcard: char,
        single: char,
        escape: char,
        match_case: bool,
        exprs: Vec<Expr>,
    },
    IsNull(Vec<Expr>),
    Between {
        expr: Option<Expr>,
        lower: Option<Expr>,
        upper: Option<Expr>,
    },
    Boundary(Bound, Vec<Expr>),
    Id(String),
    BBox {
        property: Option<Expr>,
        envelope: Option<Envelope>,
    },
    Spatial {
        op: SpatialOp,
        property: Option<Expr>,
        geometry: Option<Geometry>,
    },
    Distance {
        op: DistanceOp,
        property: Option<Expr>,
        geometry: Option<Geometry>,
        distance: Option<(f64, String)>,
    },
    DistanceValue {
        units: String,
        text: String,
    },
    Point(Vec<Point>),
    LineString(Vec<Point>),
    LinearRing(Vec<Point>),
    Polygon {
        exterior: Option<Vec<Point>>,
        interiors: Vec<Vec<Point>>,
    },
    /// Polygon boundary wrapping a single linear ring.
    Ring {
        kind: Ring,
        el: &'static str,
        ring: Option<Vec<Point>>,
    },
    Pos(String),
    PosList(String),
    Box {
        srs: Option<String>,
        points: Option<Vec<Point>>,
    },
    Coordinates {
        cs: String,
        ts: String,
        text: String,
    },
    Envelope {
        srs: Option<String>,
        lower: Option<(f64, f64)>,
        upper: Option<(f64, f64)>,
    },
    Corner(Bound, String),
    Property(String),
    Literal(String),
    Function(String, Vec<Expr>),
    Arith {
        op: ArithOp,
        exprs: Vec<Expr>,
    },
}

/// Result of reducing a [`Frame`],
///   offered to its parent.
#[derive(Debug)]
enum Value {
    Filter(Filter),
    Expr(Expr),
    Id(String),
    Boundary(Bound, Expr),
    Envelope(Envelope),
    Geometry(Geometry),
    Points(Vec<Point>),
    LinearRing(Vec<Point>),
    Ring(Ring, Vec<Point>),
    Distance(f64, String),
    Corner(Bound, Point),
}

impl Frame {
    fn ring(kind: Ring, el: &'static str) -> Self {
        Self::Ring {
            kind,
            el,
            ring: None,
        }
    }

    /// Element name for diagnostics.
    fn name(&self) -> &'static str {
        match self {
            Self::Root { .. } => "Filter",
            Self::Logical(Logic::And, _) => "And",
            Self::Logical(Logic::Or, _) => "Or",
            Self::Logical(Logic::Not, _) => "Not",
            Self::Compare { op, .. } => op.element_name(),
            Self::Like { .. } => "PropertyIsLike",
            Self::IsNull(_) => "PropertyIsNull",
            Self::Between { .. } => "PropertyIsBetween",
            Self::Boundary(Bound::Lower, _) => "LowerBoundary",
            Self::Boundary(Bound::Upper, _) => "UpperBoundary",
            Self::Id(_) => "FeatureId",
            Self::BBox { .. } => "BBOX",
            Self::Spatial { op, .. } => op.element_name(),
            Self::Distance { op, .. } => op.element_name(),
            Self::DistanceValue { .. } => "Distance",
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::LinearRing(_) => "LinearRing",
            Self::Polygon { .. } => "Polygon",
            Self::Ring { el, .. } => *el,
            Self::Pos(_) => "pos",
            Self::PosList(_) => "posList",
            Self::Box { .. } => "Box",
            Self::Coordinates { .. } => "coordinates",
            Self::Envelope { .. } => "Envelope",
            Self::Corner(Bound::Lower, _) => "lowerCorner",
            Self::Corner(Bound::Upper, _) => "upperCorner",
            Self::Property(_) => "PropertyName",
            Self::Literal(_) => "Literal",
            Self::Function(..) => "Function",
            Self::Arith { op, .. } => op.element_name(),
        }
    }

    /// Offer the value of a closed child element.
    fn accept(&mut self, value: Value, child: &str, span: Span) -> Result<()> {
        let parent = self.name();

        match (self, value) {
            (Self::Root { filters, .. }, Value::Filter(f)) => filters.push(f),
            (Self::Root { ids, .. }, Value::Id(id)) => ids.push(id),

            (Self::Logical(_, operands), Value::Filter(f)) => operands.push(f),

            (
                Self::Compare { exprs, .. }
                | Self::Like { exprs, .. }
                | Self::IsNull(exprs)
                | Self::Boundary(_, exprs)
                | Self::Function(_, exprs)
                | Self::Arith { exprs, .. },
                Value::Expr(e),
            ) => exprs.push(e),

            (Self::Between { expr: expr @ None, .. }, Value::Expr(e)) => {
                *expr = Some(e)
            }
            (
                Self::Between {
                    lower: lower @ None,
                    ..
                },
                Value::Boundary(Bound::Lower, e),
            ) => *lower = Some(e),
            (
                Self::Between {
                    upper: upper @ None,
                    ..
                },
                Value::Boundary(Bound::Upper, e),
            ) => *upper = Some(e),

            (
                Self::BBox {
                    property: property @ None,
                    ..
                },
                Value::Expr(e @ Expr::Property(_)),
            ) => *property = Some(e),
            (
                Self::BBox {
                    envelope: envelope @ None,
                    ..
                },
                Value::Envelope(env),
            ) => *envelope = Some(env),

            (
                Self::Spatial {
                    property: property @ None,
                    ..
                }
                | Self::Distance {
                    property: property @ None,
                    ..
                },
                Value::Expr(e @ Expr::Property(_)),
            ) => *property = Some(e),
            (
                Self::Spatial {
                    geometry: geometry @ None,
                    ..
                }
                | Self::Distance {
                    geometry: geometry @ None,
                    ..
                },
                Value::Geometry(g),
            ) => *geometry = Some(g),
            (
                Self::Spatial {
                    geometry: geometry @ None,
                    ..
                }
                | Self::Distance {
                    geometry: geometry @ None,
                    ..
                },
                Value::Envelope(env),
            ) => *geometry = Some(Geometry::Envelope(env)),
            (
                Self::Distance {
                    distance: distance @ None,
                    ..
                },
                Value::Distance(value, units),
            ) => *distance = Some((value, units)),

            (
                Self::Point(points)
                | Self::LineString(points)
                | Self::LinearRing(points),
                Value::Points(more),
            ) => points.extend(more),
            (
                Self::Ring {
                    ring: ring @ None,
                    ..
                },
                Value::LinearRing(points),
            ) => *ring = Some(points),
            (
                Self::Polygon {
                    exterior: exterior @ None,
                    ..
                },
                Value::Ring(Ring::Exterior, points),
            ) => *exterior = Some(points),
            (
                Self::Polygon { interiors, .. },
                Value::Ring(Ring::Interior, points),
            ) => interiors.push(points),

            (
                Self::Box {
                    points: points @ None,
                    ..
                },
                Value::Points(pair),
            ) => *points = Some(pair),

            (
                Self::Envelope {
                    lower: lower @ None,
                    ..
                },
                Value::Corner(Bound::Lower, pt),
            ) => *lower = Some(pt),
            (
                Self::Envelope {
                    upper: upper @ None,
                    ..
                },
                Value::Corner(Bound::Upper, pt),
            ) => *upper = Some(pt),

            _ => {
                return Err(FilterError::UnexpectedChild {
                    name: child.to_string(),
                    parent,
                    span,
                })
            }
        }

        Ok(())
    }

    /// Reduce a closed element into the value it represents.
    ///
    /// The provided span is that of the closing tag.
    fn reduce(self, span: Span) -> Result<Value> {
        let el = self.name();

        let count = |expected, found| FilterError::OperandCount {
            el,
            expected,
            found,
            span,
        };
        let coords = |expected, found| FilterError::CoordinateCount {
            el,
            expected,
            found,
            span,
        };

        Ok(match self {
            Self::Root { mut filters, ids } => {
                match (filters.len(), ids.is_empty()) {
                    (0, false) => Value::Filter(Filter::Id(ids)),
                    (1, true) => match filters.pop() {
                        Some(filter) => Value::Filter(filter),
                        None => return Err(FilterError::EmptyFilter(span)),
                    },
                    (0, true) => return Err(FilterError::EmptyFilter(span)),
                    _ => return Err(FilterError::MultiplePredicates(span)),
                }
            }

            Self::Logical(Logic::Not, mut operands) => {
                match (operands.pop(), operands.len()) {
                    (Some(f), 0) => Value::Filter(Filter::Not(Box::new(f))),
                    (_, n) => return Err(count("1", n + 1)),
                }
            }
            Self::Logical(_, operands) if operands.len() < 2 => {
                return Err(count("2 or more", operands.len()));
            }
            Self::Logical(Logic::And, operands) => {
                Value::Filter(Filter::And(operands))
            }
            Self::Logical(Logic::Or, operands) => {
                Value::Filter(Filter::Or(operands))
            }

            Self::Compare {
                op,
                match_case,
                exprs,
            } => {
                let [left, right] = pair(exprs).map_err(|n| count("2", n))?;

                Value::Filter(Filter::Compare {
                    op,
                    left,
                    right,
                    match_case,
                })
            }

            Self::Like {
                wildcard,
                single,
                escape,
                match_case,
                exprs,
            } => match pair(exprs).map_err(|n| count("2", n))? {
                [expr, Expr::Literal(pattern)] => Value::Filter(Filter::Like {
                    expr,
                    pattern,
                    wildcard,
                    single,
                    escape,
                    match_case,
                }),
                _ => return Err(FilterError::ExpectedLiteral(span)),
            },

            Self::IsNull(mut exprs) => match (exprs.pop(), exprs.len()) {
                (Some(e), 0) => Value::Filter(Filter::IsNull(e)),
                (_, n) => return Err(count("1", n + 1)),
            },

            Self::Between {
                expr: Some(expr),
                lower: Some(lower),
                upper: Some(upper),
            } => Value::Filter(Filter::Between { expr, lower, upper }),
            Self::Between { expr, lower, upper } => {
                let found = [expr.is_some(), lower.is_some(), upper.is_some()]
                    .into_iter()
                    .filter(|x| *x)
                    .count();

                return Err(count("3", found));
            }

            Self::Boundary(bound, mut exprs) => {
                match (exprs.pop(), exprs.len()) {
                    (Some(e), 0) => Value::Boundary(bound, e),
                    (_, n) => return Err(count("1", n + 1)),
                }
            }

            Self::Id(id) => Value::Id(id),

            Self::BBox {
                property: Some(property),
                envelope: Some(envelope),
            } => Value::Filter(Filter::BBox { property, envelope }),
            Self::BBox { property, envelope } => {
                let found = usize::from(property.is_some())
                    + usize::from(envelope.is_some());

                return Err(count("2", found));
            }

            Self::Spatial {
                op,
                property: Some(property),
                geometry: Some(geometry),
            } => Value::Filter(Filter::Spatial {
                op,
                property,
                geometry,
            }),
            Self::Spatial {
                property, geometry, ..
            } => {
                let found = usize::from(property.is_some())
                    + usize::from(geometry.is_some());

                return Err(count("2", found));
            }

            Self::Distance {
                op,
                property: Some(property),
                geometry: Some(geometry),
                distance: Some((distance, units)),
            } => Value::Filter(Filter::Distance {
                op,
                property,
                geometry,
                distance,
                units,
            }),
            Self::Distance {
                property,
                geometry,
                distance,
                ..
            } => {
                let found = [
                    property.is_some(),
                    geometry.is_some(),
                    distance.is_some(),
                ]
                .into_iter()
                .filter(|x| *x)
                .count();

                return Err(count("3", found));
            }

            Self::DistanceValue { units, text } => {
                let text = text.trim();
                let distance = text.parse().map_err(|_| {
                    FilterError::InvalidDistance(text.into(), span)
                })?;

                Value::Distance(distance, units.trim().to_string())
            }

            Self::Point(points) => match points.as_slice() {
                [point] => Value::Geometry(Geometry::Point(*point)),
                _ => return Err(coords("1", points.len())),
            },
            Self::LineString(points) if points.len() < 2 => {
                return Err(coords("2 or more", points.len()));
            }
            Self::LineString(points) => {
                Value::Geometry(Geometry::LineString(points))
            }
            Self::LinearRing(points) if points.len() < 4 => {
                return Err(coords("4 or more", points.len()));
            }
            Self::LinearRing(points) => Value::LinearRing(points),

            Self::Ring {
                kind,
                ring: Some(points),
                ..
            } => Value::Ring(kind, points),
            Self::Ring { ring: None, .. } => return Err(count("1", 0)),

            Self::Polygon {
                exterior: Some(exterior),
                interiors,
            } => Value::Geometry(Geometry::Polygon(
                std::iter::once(exterior).chain(interiors).collect(),
            )),
            Self::Polygon { exterior: None, .. } => {
                return Err(count("1", 0));
            }

            Self::Pos(text) => Value::Points(vec![parse_point(&text, span)?]),
            Self::PosList(text) => Value::Points(parse_pos_list(&text, span)?),

            Self::Box {
                srs,
                points: Some(points),
            } => match <[Point; 2]>::try_from(points) {
                Ok([(min_x, min_y), (max_x, max_y)]) => {
                    Value::Envelope(Envelope {
                        min_x,
                        min_y,
                        max_x,
                        max_y,
                        srs,
                    })
                }
                Err(points) => return Err(coords("2", points.len())),
            },
            Self::Box { points: None, .. } => return Err(count("1", 0)),

            Self::Coordinates { cs, ts, text } => {
                Value::Points(parse_coordinates(&text, &cs, &ts, span)?)
            }

            Self::Envelope {
                srs,
                lower: Some((min_x, min_y)),
                upper: Some((max_x, max_y)),
            } => Value::Envelope(Envelope {
                min_x,
                min_y,
                max_x,
                max_y,
                srs,
            }),
            Self::Envelope { lower, upper, .. } => {
                let found =
                    usize::from(lower.is_some()) + usize::from(upper.is_some());

                return Err(count("2", found));
            }

            Self::Corner(bound, text) => {
                Value::Corner(bound, parse_point(&text, span)?)
            }

            Self::Property(name) => {
                Value::Expr(Expr::Property(name.trim().to_string()))
            }
            Self::Literal(text) => {
                Value::Expr(Expr::Literal(text.trim().to_string()))
            }
            Self::Function(name, args) => Value::Expr(Expr::Function(name, args)),

            Self::Arith { op, exprs } => {
                let [left, right] = pair(exprs).map_err(|n| count("2", n))?;
                Value::Expr(Expr::Arith(op, Box::new(left), Box::new(right)))
            }
        })
    }
}

/// Exactly two expressions,
///   or the number that was actually found.
fn pair(exprs: Vec<Expr>) -> std::result::Result<[Expr; 2], usize> {
    let n = exprs.len();
    <[Expr; 2]>::try_from(exprs).map_err(|_| n)
}

fn required_attr(
    el: &Element,
    el_name: &'static str,
    attr: &'static str,
) -> Result<String> {
    el.attr(attr)
        .map(String::from)
        .ok_or(FilterError::MissingAttr {
            attr,
            el: el_name,
            span: el.span,
        })
}

/// A single-character attribute,
///   falling back to `default` when absent or empty.
fn char_attr(el: &Element, attr: &'static str, default: char) -> Result<char> {
    let value = match el.attr(attr) {
        None => return Ok(default),
        Some(value) => value,
    };

    let mut chars = value.chars();

    match (chars.next(), chars.next()) {
        (None, _) => Ok(default),
        (Some(c), None) => Ok(c),
        (Some(_), Some(_)) => Err(FilterError::InvalidAttr {
            attr,
            value: value.to_string(),
            span: el.span,
        }),
    }
}

/// Parse a GML2 `coordinates` list of two-dimensional tuples.
fn parse_coordinates(
    text: &str,
    cs: &str,
    ts: &str,
    span: Span,
) -> Result<Vec<Point>> {
    let invalid = || FilterError::InvalidCoordinates(text.trim().into(), span);

    let tuples: Vec<&str> = if ts.trim().is_empty() {
        text.split_whitespace().collect()
    } else {
        text.split(ts)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    };

    tuples
        .into_iter()
        .map(|tuple| {
            let mut parts = tuple.split(cs).map(str::trim);

            match (parts.next(), parts.next(), parts.next()) {
                (Some(x), Some(y), None) => Ok((
                    x.parse().map_err(|_| invalid())?,
                    y.parse().map_err(|_| invalid())?,
                )),
                _ => Err(invalid()),
            }
        })
        .collect()
}

/// Parse a GML3 corner,
///   which is a whitespace-separated pair.
fn parse_point(text: &str, span: Span) -> Result<Point> {
    let invalid = || FilterError::InvalidCoordinates(text.trim().into(), span);
    let mut parts = text.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => Ok((
            x.parse().map_err(|_| invalid())?,
            y.parse().map_err(|_| invalid())?,
        )),
        _ => Err(invalid()),
    }
}

/// Parse a GML3 `posList` of two-dimensional positions.
fn parse_pos_list(text: &str, span: Span) -> Result<Vec<Point>> {
    let invalid = || FilterError::InvalidCoordinates(text.trim().into(), span);

    let values = text
        .split_whitespace()
        .map(|v| v.parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    if values.len() % 2 != 0 {
        return Err(invalid());
    }

    Ok(values.chunks_exact(2).map(|xy| (xy[0], xy[1])).collect())
}
