// XML event stream
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

//! Markup events consumed by the transformer.
//!
//! The transformer never sees a tree;
//!   it is fed a depth-first stream of [`Event`]s in document order.
//! Each element carries its local name,
//!   resolved namespace URI,
//!   and attributes;
//!     prefixes are resolved by the reader and are not retained.
//!
//! See [`reader::XmlEventReader`] for producing events from a byte stream.

mod error;
pub mod reader;

pub use error::Error;
pub use reader::XmlEventReader;

use crate::span::{Span, UNKNOWN_SPAN};
use std::fmt::{self, Display};

/// Namespace of `xlink:` attributes such as `xlink:href`.
pub const NS_XLINK: &str = "http://www.w3.org/1999/xlink";

/// Namespace of GML elements and attributes such as `gml:id`.
pub const NS_GML: &str = "http://www.opengis.net/gml";

/// An attribute of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub ns: Option<String>,
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            ns: None,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The opening of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub ns: Option<String>,
    pub attrs: Vec<Attr>,
    pub span: Span,
}

impl Element {
    pub fn new<N: Into<String>>(name: N, span: Span) -> Self {
        Self {
            name: name.into(),
            ns: None,
            attrs: Vec::new(),
            span,
        }
    }

    /// Add an attribute,
    ///   for constructing elements outside of the reader.
    pub fn with_attr<N: Into<String>, V: Into<String>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.attrs.push(Attr::new(name, value));
        self
    }

    /// Value of the first attribute with the given local name,
    ///   irrespective of namespace.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Value of the attribute with the given namespace and local name.
    pub fn attr_ns(&self, ns: &str, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name && attr.ns.as_deref() == Some(ns))
            .map(|attr| attr.value.as_str())
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// The closing of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag {
    pub name: String,
    pub ns: Option<String>,
    pub span: Span,
}

impl EndTag {
    pub fn new<N: Into<String>>(name: N, span: Span) -> Self {
        Self {
            name: name.into(),
            ns: None,
            span,
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// A single markup event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    DocumentStart,
    ElementStart(Element),
    Characters(String, Span),
    ElementEnd(EndTag),
    DocumentEnd,
}

impl Event {
    /// Location of the markup that produced this event.
    ///
    /// Document boundaries have no meaningful location.
    pub fn span(&self) -> Span {
        match self {
            Self::ElementStart(el) => el.span,
            Self::Characters(_, span) => *span,
            Self::ElementEnd(end) => end.span,
            Self::DocumentStart | Self::DocumentEnd => UNKNOWN_SPAN,
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentStart => write!(f, "start of document"),
            Self::ElementStart(el) => {
                write!(f, "`<{}>` at {}", el.name, el.span)
            }
            Self::Characters(text, span) if text.trim().is_empty() => {
                write!(f, "whitespace at {span}")
            }
            Self::Characters(_, span) => write!(f, "text at {span}"),
            Self::ElementEnd(end) => {
                write!(f, "`</{}>` at {}", end.name, end.span)
            }
            Self::DocumentEnd => write!(f, "end of document"),
        }
    }
}
