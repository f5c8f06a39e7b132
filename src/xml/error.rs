// XML reader errors
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

//! Errors while reading markup events.

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::Span,
};
use std::{error, fmt};

/// Error attempting to produce an [`Event`](super::Event).
#[derive(Debug)]
pub enum Error {
    /// The underlying parser failed,
    ///   together with the span of the read that failed.
    QuickXml(quick_xml::Error, Span),

    /// An element or attribute uses a namespace prefix that was never
    ///   declared.
    UnboundPrefix(String, Span),

    /// Input ended while the element at the given span was still open.
    UnclosedElement(String, Span),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuickXml(e, _) => write!(f, "malformed XML: {e}"),
            Self::UnboundPrefix(prefix, _) => {
                write!(f, "undeclared namespace prefix `{prefix}`")
            }
            Self::UnclosedElement(name, _) => {
                write!(f, "unexpected end of input: `<{name}>` is unclosed")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::QuickXml(e, _) => Some(e),
            _ => None,
        }
    }
}

impl Diagnostic for Error {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::QuickXml(_, span) => span.mark_error().into(),
            Self::UnboundPrefix(prefix, span) => span
                .error(format!("`{prefix}` is not bound to a namespace"))
                .with_help("declare it with an `xmlns:` attribute")
                .to_vec(),
            Self::UnclosedElement(_, span) => {
                span.error("element opened here").into()
            }
        }
    }
}
