// Symbolizer handlers
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

//! Symbolizers.
//!
//! Each symbolizer is an item of a rule's `symbolizers` sequence and is
//!   represented as a mapping with a single key naming its kind,
//!     whose value is a mapping of its properties:
//!
//! ```yaml
//! - point:
//!     size: 6
//! ```
//!
//! All kinds share geometry,
//!   units of measure,
//!   and vendor options;
//!     everything else is specific to the kind.

use super::{
    expr::{expr_entry, TextHandler},
    graphic::{GraphicHandler, ParamHandler, Params, TupleHandler},
    raster, text, Context, Handler, Slot, Then, TransformError,
};
use crate::{
    global,
    xml::{Element, EndTag},
};
use fxhash::FxHashMap;

type Result<T = ()> = std::result::Result<T, TransformError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Point,
    Line,
    Polygon,
    Text,
    Raster,
}

impl Kind {
    pub fn from_element(name: &str) -> Option<Self> {
        Some(match name {
            "PointSymbolizer" => Self::Point,
            "LineSymbolizer" => Self::Line,
            "PolygonSymbolizer" => Self::Polygon,
            "TextSymbolizer" => Self::Text,
            "RasterSymbolizer" => Self::Raster,
            _ => return None,
        })
    }

    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Point => "PointSymbolizer",
            Self::Line => "LineSymbolizer",
            Self::Polygon => "PolygonSymbolizer",
            Self::Text => "TextSymbolizer",
            Self::Raster => "RasterSymbolizer",
        }
    }

    /// Key of the symbolizer in the output.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Polygon => "polygon",
            Self::Text => "text",
            Self::Raster => "raster",
        }
    }
}

/// Push a handler for `el` if it opens a symbolizer,
///   returning whether it did.
pub fn push_symbolizer(el: &Element, cx: &mut Context) -> Result<bool> {
    match Kind::from_element(&el.name) {
        Some(kind) => {
            let sym = SymbolizerHandler::start(kind, el, cx)?;
            cx.push(sym);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[derive(Debug)]
pub struct SymbolizerHandler {
    kind: Kind,
    options: VendorOptions,
}

impl SymbolizerHandler {
    pub fn start(kind: Kind, el: &Element, cx: &mut Context) -> Result<Self> {
        cx.mapping()?.scalar(kind.key())?.mapping()?;

        if let Some(uom) = el.attr("uom") {
            cx.entry("uom", short_uom(uom))?;
        }

        Ok(Self {
            kind,
            options: VendorOptions::default(),
        })
    }
}

impl Handler for SymbolizerHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        use Kind::*;

        match (el.name.as_str(), self.kind) {
            ("Geometry", _) => expr_entry(cx, "geometry")?,
            ("VendorOption", _) => self.options.begin(el, cx)?,

            ("Graphic", Point) => {
                cx.push(GraphicHandler::default());
            }

            ("Fill", Polygon) => {
                cx.push(ParamHandler::new(Params::Fill));
            }

            ("Stroke", Line | Polygon) => {
                cx.push(ParamHandler::new(Params::Stroke));
            }

            ("PerpendicularOffset", Line | Polygon) => {
                expr_entry(cx, "offset")?
            }

            ("Displacement", Polygon) => {
                cx.scalar("displacement")?
                    .push(TupleHandler::displacement());
            }

            (_, Text) => text::element(el, cx)?,
            (_, Raster) => raster::element(el, cx)?,

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is(self.kind.element_name()) {
            self.options.flush(cx)?;
            cx.end_mapping()?.end_mapping()?.pop();
        }

        Ok(())
    }

    fn capture(&mut self, _: Slot, value: String) {
        self.options.capture(value);
    }
}

/// Shorten the well-known SE unit of measure URIs.
fn short_uom(uom: &str) -> &str {
    match uom.trim() {
        "http://www.opengeospatial.org/se/units/metre" => "metre",
        "http://www.opengeospatial.org/se/units/foot" => "foot",
        "http://www.opengeospatial.org/se/units/pixel" => "pixel",
        other => other,
    }
}

/// Vendor options accumulated for flushing when their construct closes.
///
/// Options keep the position of their first occurrence;
///   a repeated option replaces the earlier value.
#[derive(Debug, Default)]
pub struct VendorOptions {
    pending: Option<String>,
    options: Vec<(String, String)>,
    index: FxHashMap<String, usize>,
}

impl VendorOptions {
    /// Begin reading the value of the `VendorOption` element `el`.
    ///
    /// The value is captured by the owning handler,
    ///   which must pass it to [`Self::capture`].
    pub fn begin(&mut self, el: &Element, cx: &mut Context) -> Result {
        let name = el.attr("name").ok_or_else(|| TransformError::MissingAttr {
            attr: "name",
            el: el.name.clone(),
            span: el.span,
        })?;

        self.pending = Some(name.trim().to_string());
        cx.push(TextHandler::new(Then::Capture(Slot::First)));

        Ok(())
    }

    /// Complete the pending option,
    ///   returning whether there was one.
    pub fn capture(&mut self, value: String) -> bool {
        let Some(name) = self.pending.take() else {
            return false;
        };

        match self.index.get(&name) {
            Some(&i) => self.options[i].1 = value,
            None => {
                self.index.insert(name.clone(), self.options.len());
                self.options.push((name, value));
            }
        }

        true
    }

    /// Emit all accumulated options as entries of the current mapping.
    pub fn flush(&mut self, cx: &mut Context) -> Result {
        for (name, value) in self.options.drain(..) {
            let key = format!("{}{name}", global::VENDOR_OPTION_PREFIX);
            cx.entry(key, value)?;
        }

        self.index.clear();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn uom_shortened() {
        assert_eq!(
            "metre",
            short_uom("http://www.opengeospatial.org/se/units/metre")
        );
        assert_eq!(
            "pixel",
            short_uom(" http://www.opengeospatial.org/se/units/pixel ")
        );
        assert_eq!(
            "http://example.com/furlong",
            short_uom("http://example.com/furlong")
        );
    }

    #[test]
    fn repeated_vendor_option_keeps_position() {
        let mut sut = VendorOptions::default();

        for (name, value) in [("a", "1"), ("b", "2"), ("a", "3")] {
            sut.pending = Some(name.into());
            assert!(sut.capture(value.into()));
        }

        assert!(!sut.capture("orphan".into()));

        assert_eq!(
            vec![("a".to_string(), "3".to_string()), ("b".into(), "2".into())],
            sut.options,
        );
    }
}
