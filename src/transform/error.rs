// Transformation errors
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

//! Errors that abort a transformation.

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    filter::FilterError,
    global,
    span::Span,
    xml, yaml,
};
use std::{error::Error, fmt};

/// The first error encountered during a transformation.
///
/// Errors from the markup reader,
///   the filter engine,
///   and the YAML sink are propagated unchanged.
#[derive(Debug)]
pub enum TransformError {
    Xml(xml::Error),
    Filter(FilterError),
    Emit(yaml::Error),

    /// The root handler attempted to pop.
    ///
    /// This represents a bug in a handler,
    ///   not a problem with the input.
    StackUnderflow(Span),

    /// Handlers nested beyond
    ///   [`MAX_HANDLER_DEPTH`](crate::global::MAX_HANDLER_DEPTH).
    DepthExceeded(Span),

    /// A required attribute is missing from an element.
    MissingAttr {
        attr: &'static str,
        el: String,
        span: Span,
    },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(e) => fmt::Display::fmt(e, f),
            Self::Filter(e) => fmt::Display::fmt(e, f),
            Self::Emit(e) => write!(f, "failed to write output: {e}"),
            Self::StackUnderflow(_) => write!(f, "handler stack underflow"),
            Self::DepthExceeded(_) => write!(
                f,
                "handler stack depth exceeded ({} handlers)",
                global::MAX_HANDLER_DEPTH,
            ),
            Self::MissingAttr { attr, el, .. } => {
                write!(f, "`{el}` is missing required attribute `{attr}`")
            }
        }
    }
}

impl Error for TransformError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Emit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xml::Error> for TransformError {
    fn from(e: xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<FilterError> for TransformError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

impl From<yaml::Error> for TransformError {
    fn from(e: yaml::Error) -> Self {
        Self::Emit(e)
    }
}

impl Diagnostic for TransformError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Xml(e) => e.describe(),
            Self::Filter(e) => e.describe(),

            // Output is not associated with any location in the input.
            Self::Emit(_) => vec![],

            Self::StackUnderflow(span) => span
                .internal_error("a handler popped the root while reading this")
                .into(),
            Self::DepthExceeded(span) => span
                .error("nesting limit reached here")
                .with_help("this document is nested far deeper than SLD allows")
                .to_vec(),
            Self::MissingAttr { attr, span, .. } => {
                span.error(format!("expected `{attr}` on this element")).into()
            }
        }
    }
}
