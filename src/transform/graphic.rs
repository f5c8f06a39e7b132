// Graphic, fill and stroke handlers
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

//! Fills, strokes, fonts and graphics.
//!
//! Parameters of fills,
//!   strokes and fonts are written inline into the mapping of the
//!   construct that contains them,
//!     keyed by parameter name.
//! Graphics used as fills or strokes are nested in a mapping of their
//!   own.

use super::{
    expr::{expr_entry, text_entry, ExpressionHandler},
    Context, Handler, Slot, Then, TransformError,
};
use crate::xml::{Element, EndTag, NS_XLINK};

type Result<T = ()> = std::result::Result<T, TransformError>;

/// Kind of parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Params {
    Fill,
    Stroke,
    Font,
}

impl Params {
    fn element_name(self) -> &'static str {
        match self {
            Self::Fill => "Fill",
            Self::Stroke => "Stroke",
            Self::Font => "Font",
        }
    }

    /// Output key for the parameter `name`.
    fn key(self, name: &str) -> &str {
        match (self, name) {
            (Self::Fill, "fill") => "fill-color",
            (Self::Stroke, "stroke") => "stroke-color",
            (_, name) => name,
        }
    }
}

/// A list of `CssParameter`s (SLD 1.0) or `SvgParameter`s (SE 1.1),
///   along with any graphic fill or stroke.
#[derive(Debug)]
pub struct ParamHandler {
    params: Params,
}

impl ParamHandler {
    pub fn new(params: Params) -> Self {
        Self { params }
    }
}

impl Handler for ParamHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match (el.name.as_str(), self.params) {
            ("CssParameter" | "SvgParameter", params) => {
                let name = el.attr("name").ok_or_else(|| {
                    TransformError::MissingAttr {
                        attr: "name",
                        el: el.name.clone(),
                        span: el.span,
                    }
                })?;

                expr_entry(cx, params.key(name.trim()))?;
            }

            ("GraphicFill", Params::Fill) => {
                let fill =
                    GraphicContainer::start(cx, "fill-graphic", "GraphicFill")?;
                cx.push(fill);
            }

            ("GraphicFill", Params::Stroke) => {
                let fill = GraphicContainer::start(
                    cx,
                    "stroke-graphic-fill",
                    "GraphicFill",
                )?;
                cx.push(fill);
            }

            ("GraphicStroke", Params::Stroke) => {
                let stroke = GraphicContainer::start(
                    cx,
                    "stroke-graphic-stroke",
                    "GraphicStroke",
                )?;
                cx.push(stroke);
            }

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is(self.params.element_name()) {
            cx.pop();
        }

        Ok(())
    }
}

/// A mapping holding a single graphic.
#[derive(Debug)]
pub struct GraphicContainer {
    closes_on: &'static str,
}

impl GraphicContainer {
    pub fn start(
        cx: &mut Context,
        key: &str,
        closes_on: &'static str,
    ) -> Result<Self> {
        cx.scalar(key)?.mapping()?;
        Ok(Self { closes_on })
    }
}

impl Handler for GraphicContainer {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        if el.is("Graphic") {
            cx.push(GraphicHandler::default());
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is(self.closes_on) {
            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// A graphic,
///   written inline into the current mapping or into a mapping of its
///   own.
///
/// Marks and external graphics are items of a `symbols` sequence,
///   which is closed as soon as any other property of the graphic
///   appears.
/// The schema places all symbols before those properties;
///   a symbol that follows them would reopen `symbols` and is rejected
///   by the writer as a duplicate key.
#[derive(Debug, Default)]
pub struct GraphicHandler {
    symbols_open: bool,
    own_mapping: bool,
}

impl GraphicHandler {
    /// A graphic written as the mapping value of `key`,
    ///   which is closed along with the graphic.
    pub fn keyed(cx: &mut Context, key: &str) -> Result<Self> {
        cx.scalar(key)?.mapping()?;

        Ok(Self {
            symbols_open: false,
            own_mapping: true,
        })
    }

    fn open_symbols(&mut self, cx: &mut Context) -> Result {
        if !self.symbols_open {
            cx.scalar("symbols")?.sequence()?;
            self.symbols_open = true;
        }

        Ok(())
    }

    fn close_symbols(&mut self, cx: &mut Context) -> Result {
        if self.symbols_open {
            cx.end_sequence()?;
            self.symbols_open = false;
        }

        Ok(())
    }
}

impl Handler for GraphicHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "Mark" => {
                self.open_symbols(cx)?;
                let mark = MarkHandler::start(cx)?;
                cx.push(mark);
            }

            "ExternalGraphic" => {
                self.open_symbols(cx)?;
                let ext = ExternalGraphicHandler::start(cx)?;
                cx.push(ext);
            }

            "Opacity" => {
                self.close_symbols(cx)?;
                expr_entry(cx, "opacity")?;
            }

            "Size" => {
                self.close_symbols(cx)?;
                expr_entry(cx, "size")?;
            }

            "Rotation" => {
                self.close_symbols(cx)?;
                expr_entry(cx, "rotation")?;
            }

            "AnchorPoint" => {
                self.close_symbols(cx)?;
                cx.scalar("anchor")?.push(TupleHandler::anchor());
            }

            "Displacement" => {
                self.close_symbols(cx)?;
                cx.scalar("displacement")?
                    .push(TupleHandler::displacement());
            }

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("Graphic") {
            self.close_symbols(cx)?;

            if self.own_mapping {
                cx.end_mapping()?;
            }

            cx.pop();
        }

        Ok(())
    }
}

/// A well-known mark.
#[derive(Debug)]
pub struct MarkHandler;

impl MarkHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.mapping()?.scalar("mark")?.mapping()?;
        Ok(Self)
    }
}

impl Handler for MarkHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "WellKnownName" => text_entry(cx, "shape")?,

            "Fill" => {
                cx.push(ParamHandler::new(Params::Fill));
            }

            "Stroke" => {
                cx.push(ParamHandler::new(Params::Stroke));
            }

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("Mark") {
            cx.end_mapping()?.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// A graphic referenced by URL.
#[derive(Debug)]
pub struct ExternalGraphicHandler;

impl ExternalGraphicHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.mapping()?.scalar("external")?.mapping()?;
        Ok(Self)
    }
}

impl Handler for ExternalGraphicHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "OnlineResource" => {
                let href = el
                    .attr_ns(NS_XLINK, "href")
                    .or_else(|| el.attr("href"))
                    .ok_or_else(|| TransformError::MissingAttr {
                        attr: "xlink:href",
                        el: el.name.clone(),
                        span: el.span,
                    })?;

                cx.entry("url", href.trim())?;
            }

            "Format" => text_entry(cx, "format")?,

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("ExternalGraphic") {
            cx.end_mapping()?.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// Combines two child expressions into a single pair.
///
/// The expressions are captured from the handlers that render them and
///   emitted together when the enclosing element closes;
///     a missing component is left empty.
#[derive(Debug)]
pub struct TupleHandler {
    closes_on: &'static str,
    first: &'static str,
    second: &'static str,
    values: [Option<String>; 2],
}

impl TupleHandler {
    pub fn new(
        closes_on: &'static str,
        first: &'static str,
        second: &'static str,
    ) -> Self {
        Self {
            closes_on,
            first,
            second,
            values: [None, None],
        }
    }

    pub fn anchor() -> Self {
        Self::new("AnchorPoint", "AnchorPointX", "AnchorPointY")
    }

    pub fn displacement() -> Self {
        Self::new("Displacement", "DisplacementX", "DisplacementY")
    }
}

impl Handler for TupleHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        let slot = match el.name.as_str() {
            name if name == self.first => Slot::First,
            name if name == self.second => Slot::Second,
            _ => return Ok(()),
        };

        cx.push(ExpressionHandler::new(Then::Capture(slot)));
        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is(self.closes_on) {
            let [first, second] = &self.values;

            cx.tuple(
                first.as_deref().unwrap_or(""),
                second.as_deref().unwrap_or(""),
            )?
            .pop();
        }

        Ok(())
    }

    fn capture(&mut self, slot: Slot, value: String) {
        match slot {
            Slot::First => self.values[0] = Some(value),
            Slot::Second => self.values[1] = Some(value),
        }
    }
}
