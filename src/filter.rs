// OGC filters
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

//! OGC Filter Encoding.
//!
//! Rules in a style may be conditioned on a filter expressed in the OGC
//!   Filter Encoding grammar,
//!     which is a language of its own embedded within SLD.
//! Two versions of that grammar are supported
//!   (see [`Dialect`]);
//!     which one applies is decided by the `version` attribute of the
//!     style document's root element.
//!
//! Filters are parsed by a [`FilterEngine`] that is fed markup events one
//!   at a time,
//!     mirroring how the transformer itself consumes its input.
//! Once the filter root closes,
//!   the engine yields a [`Filter`],
//!     which [`cql::encode`] renders as compact ECQL text.

pub mod cql;
mod error;
mod parse;

pub use error::FilterError;
pub use parse::FilterParser;

use crate::{
    span::Span,
    xml::{Element, EndTag},
};
use std::fmt::{self, Display};

/// A boolean predicate over features.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Compare {
        op: CompareOp,
        left: Expr,
        right: Expr,
        match_case: bool,
    },
    Like {
        expr: Expr,
        pattern: String,
        wildcard: char,
        single: char,
        escape: char,
        match_case: bool,
    },
    IsNull(Expr),
    Between {
        expr: Expr,
        lower: Expr,
        upper: Expr,
    },
    Id(Vec<String>),
    BBox {
        property: Expr,
        envelope: Envelope,
    },
    Spatial {
        op: SpatialOp,
        property: Expr,
        geometry: Geometry,
    },
    Distance {
        op: DistanceOp,
        property: Expr,
        geometry: Geometry,
        distance: f64,
        units: String,
    },
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl CompareOp {
    /// Operator represented by the given element local name.
    pub fn from_element(name: &str) -> Option<Self> {
        Some(match name {
            "PropertyIsEqualTo" => Self::Eq,
            "PropertyIsNotEqualTo" => Self::NotEq,
            "PropertyIsLessThan" => Self::Lt,
            "PropertyIsGreaterThan" => Self::Gt,
            "PropertyIsLessThanOrEqualTo" => Self::LtEq,
            "PropertyIsGreaterThanOrEqualTo" => Self::GtEq,
            _ => return None,
        })
    }

    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Eq => "PropertyIsEqualTo",
            Self::NotEq => "PropertyIsNotEqualTo",
            Self::Lt => "PropertyIsLessThan",
            Self::Gt => "PropertyIsGreaterThan",
            Self::LtEq => "PropertyIsLessThanOrEqualTo",
            Self::GtEq => "PropertyIsGreaterThanOrEqualTo",
        }
    }
}

/// A value-producing expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Property(String),
    Literal(String),
    Function(String, Vec<Expr>),
    Arith(ArithOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_element(name: &str) -> Option<Self> {
        Some(match name {
            "Add" => Self::Add,
            "Sub" => Self::Sub,
            "Mul" => Self::Mul,
            "Div" => Self::Div,
            _ => return None,
        })
    }

    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::Div => "Div",
        }
    }
}

/// A bounding box,
///   with an optional spatial reference system name.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub srs: Option<String>,
}

/// Topological relationship between a property and a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialOp {
    Intersects,
    Within,
    Contains,
    Disjoint,
    Touches,
    Crosses,
    Overlaps,
    Equals,
}

impl SpatialOp {
    pub fn from_element(name: &str) -> Option<Self> {
        Some(match name {
            "Intersects" => Self::Intersects,
            "Within" => Self::Within,
            "Contains" => Self::Contains,
            "Disjoint" => Self::Disjoint,
            "Touches" => Self::Touches,
            "Crosses" => Self::Crosses,
            "Overlaps" => Self::Overlaps,
            "Equals" => Self::Equals,
            _ => return None,
        })
    }

    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Intersects => "Intersects",
            Self::Within => "Within",
            Self::Contains => "Contains",
            Self::Disjoint => "Disjoint",
            Self::Touches => "Touches",
            Self::Crosses => "Crosses",
            Self::Overlaps => "Overlaps",
            Self::Equals => "Equals",
        }
    }
}

/// Distance relationship between a property and a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceOp {
    DWithin,
    Beyond,
}

impl DistanceOp {
    pub fn from_element(name: &str) -> Option<Self> {
        Some(match name {
            "DWithin" => Self::DWithin,
            "Beyond" => Self::Beyond,
            _ => return None,
        })
    }

    pub fn element_name(&self) -> &'static str {
        match self {
            Self::DWithin => "DWithin",
            Self::Beyond => "Beyond",
        }
    }
}

/// A planar coordinate.
pub type Point = (f64, f64);

/// A literal GML geometry operand of a spatial operator.
///
/// Spatial reference systems of geometries other than envelopes are not
///   retained,
///     since ECQL geometry literals have no place for them.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(Vec<Point>),

    /// Exterior ring followed by any interior rings.
    Polygon(Vec<Vec<Point>>),

    Envelope(Envelope),
}

/// Version of the Filter Encoding grammar.
///
/// The dialect is determined once per document and held for the
///   remainder of the transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Filter Encoding 1.0,
    ///   used by SLD 1.0.
    #[default]
    Filter10,

    /// Filter Encoding 1.1,
    ///   used by SLD 1.1 / Symbology Encoding.
    Filter11,
}

impl Dialect {
    /// Select a dialect from the `version` attribute of a style's root
    ///   element.
    ///
    /// Only `1.1.0` selects [`Dialect::Filter11`];
    ///   anything else,
    ///     including absence,
    ///     selects the oldest dialect.
    pub fn from_version(version: Option<&str>) -> Self {
        match version.map(str::trim) {
            Some("1.1.0") => Self::Filter11,
            _ => Self::Filter10,
        }
    }

    /// Instantiate a new engine to parse a single filter in this dialect.
    pub fn engine(self) -> Box<dyn FilterEngine> {
        Box::new(FilterParser::new(self))
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter10 => write!(f, "Filter Encoding 1.0"),
            Self::Filter11 => write!(f, "Filter Encoding 1.1"),
        }
    }
}

/// Whether an engine has finished parsing its filter.
#[derive(Debug, PartialEq)]
pub enum EngineStatus {
    Incomplete,
    Done(Filter),
}

/// Push-style parser for a single filter.
///
/// Events are provided exactly as they appear in the source document,
///   beginning with the filter root element.
/// [`EngineStatus::Done`] is returned from [`FilterEngine::end`] when the
///   filter root element closes;
///     the engine must not be fed after that point.
pub trait FilterEngine: fmt::Debug {
    fn start(&mut self, el: &Element) -> Result<(), FilterError>;

    fn characters(&mut self, text: &str, span: Span) -> Result<(), FilterError>;

    fn end(&mut self, end: &EndTag) -> Result<EngineStatus, FilterError>;
}
