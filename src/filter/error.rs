// Filter errors
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

//! Errors while parsing filters.

use super::Dialect;
use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::Span,
};
use std::{error::Error, fmt};

#[derive(Debug, PartialEq)]
pub enum FilterError {
    /// The element is not part of the filter grammar of this dialect.
    UnknownElement {
        name: String,
        dialect: Dialect,
        span: Span,
    },

    /// A recognized element appeared where it is not permitted.
    UnexpectedChild {
        name: String,
        parent: &'static str,
        span: Span,
    },

    /// Non-whitespace text outside of a property name,
    ///   literal,
    ///   or coordinate list.
    UnexpectedText(Span),

    MissingAttr {
        attr: &'static str,
        el: &'static str,
        span: Span,
    },

    /// An attribute value is not of the expected form.
    InvalidAttr {
        attr: &'static str,
        value: String,
        span: Span,
    },

    /// An operator received the wrong number of operands.
    OperandCount {
        el: &'static str,
        expected: &'static str,
        found: usize,
        span: Span,
    },

    /// A pattern was not provided as a literal.
    ExpectedLiteral(Span),

    InvalidCoordinates(String, Span),

    /// A geometry received the wrong number of coordinates.
    CoordinateCount {
        el: &'static str,
        expected: &'static str,
        found: usize,
        span: Span,
    },

    /// A `Distance` is not numeric.
    InvalidDistance(String, Span),

    /// The filter contains no predicate.
    EmptyFilter(Span),

    /// The filter contains more than one top-level predicate.
    MultiplePredicates(Span),

    /// An element closed that was never opened by this engine.
    UnexpectedEnd(String, Span),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement { name, dialect, .. } => {
                write!(f, "`{name}` is not a recognized {dialect} element")
            }
            Self::UnexpectedChild { name, parent, .. } => {
                write!(f, "`{name}` is not permitted within `{parent}`")
            }
            Self::UnexpectedText(_) => {
                write!(f, "unexpected text within filter")
            }
            Self::MissingAttr { attr, el, .. } => {
                write!(f, "`{el}` is missing required attribute `{attr}`")
            }
            Self::InvalidAttr { attr, value, .. } => {
                write!(f, "invalid value `{value}` for attribute `{attr}`")
            }
            Self::OperandCount {
                el,
                expected,
                found,
                ..
            } => write!(
                f,
                "`{el}` expects {expected} operand(s), but found {found}"
            ),
            Self::ExpectedLiteral(_) => {
                write!(f, "`PropertyIsLike` pattern must be a `Literal`")
            }
            Self::InvalidCoordinates(text, _) => {
                write!(f, "invalid coordinates `{text}`")
            }
            Self::CoordinateCount {
                el,
                expected,
                found,
                ..
            } => write!(
                f,
                "`{el}` expects {expected} coordinate(s), but found {found}"
            ),
            Self::InvalidDistance(text, _) => {
                write!(f, "invalid distance `{text}`")
            }
            Self::EmptyFilter(_) => write!(f, "filter is empty"),
            Self::MultiplePredicates(_) => {
                write!(f, "filter contains more than one predicate")
            }
            Self::UnexpectedEnd(name, _) => {
                write!(f, "unexpected closing of `{name}` within filter")
            }
        }
    }
}

impl Error for FilterError {}

impl Diagnostic for FilterError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::UnknownElement { span, dialect, .. } => span
                .error(format!("not part of {dialect}"))
                .with_help(
                    "the dialect is selected by the `version` attribute \
                       of the root element",
                )
                .to_vec(),
            Self::UnexpectedChild { span, parent, .. } => {
                span.error(format!("unexpected within `{parent}`")).into()
            }
            Self::UnexpectedText(span) => span.error("unexpected text").into(),
            Self::MissingAttr { attr, span, .. } => {
                span.error(format!("expected `{attr}` here")).into()
            }
            Self::InvalidAttr { span, .. } => span
                .error("expected a single character")
                .into(),
            Self::OperandCount { expected, span, .. } => span
                .error(format!("expected {expected} operand(s)"))
                .into(),
            Self::ExpectedLiteral(span) => span
                .error("this pattern is not a literal")
                .with_help("wrap the pattern in `<ogc:Literal>`")
                .to_vec(),
            Self::InvalidCoordinates(_, span) => {
                span.error("expected a pair of numeric coordinates").into()
            }
            Self::CoordinateCount { expected, span, .. } => span
                .error(format!("expected {expected} coordinate(s)"))
                .into(),
            Self::InvalidDistance(_, span) => {
                span.error("expected a numeric distance").into()
            }
            Self::EmptyFilter(span) | Self::MultiplePredicates(span) => {
                span.error("filter ends here").into()
            }
            Self::UnexpectedEnd(_, span) => span.internal_error(
                "the filter engine did not see this element open",
            ).into(),
        }
    }
}
