// Raster symbolizer handlers
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

//! Properties specific to raster symbolizers.
//!
//! Most raster properties are small mappings of their own,
//!   each represented by a handler that opens its mapping when pushed and
//!   closes it when its element closes.

use super::{
    expr::{expr_entry, text_entry},
    symbolizer::{Kind, SymbolizerHandler},
    Context, Handler, TransformError,
};
use crate::{
    span::Span,
    xml::{Element, EndTag},
};

type Result<T = ()> = std::result::Result<T, TransformError>;

/// React to a child of a `RasterSymbolizer`.
pub fn element(el: &Element, cx: &mut Context) -> Result {
    match el.name.as_str() {
        "Opacity" => expr_entry(cx, "opacity")?,

        "ColorMap" => {
            let map = ColorMapHandler::start(el, cx)?;
            cx.push(map);
        }

        "ContrastEnhancement" => {
            let contrast = ContrastHandler::start(cx)?;
            cx.push(contrast);
        }

        "ChannelSelection" => {
            let channels = ChannelsHandler::start(cx)?;
            cx.push(channels);
        }

        "OverlapBehavior" => {
            cx.scalar("overlap-behavior")?
                .push(OverlapHandler::default());
        }

        "ShadedRelief" => {
            let relief = ReliefHandler::start(cx)?;
            cx.push(relief);
        }

        "ImageOutline" => {
            cx.push(OutlineHandler);
        }

        _ => (),
    }

    Ok(())
}

/// A color map,
///   whose entries are each rendered as a tuple
///   `(color,opacity,quantity,label)` in document order.
#[derive(Debug, Default)]
pub struct ColorMapHandler {
    entries_open: bool,
}

impl ColorMapHandler {
    pub fn start(el: &Element, cx: &mut Context) -> Result<Self> {
        cx.scalar("color-map")?.mapping()?;

        if let Some(ty) = el.attr("type") {
            cx.entry("type", ty.trim())?;
        }

        if let Some(extended) = el.attr("extended") {
            cx.entry("extended", extended.trim())?;
        }

        Ok(Self::default())
    }
}

impl Handler for ColorMapHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        if el.is("ColorMapEntry") {
            if !self.entries_open {
                cx.scalar("entries")?.sequence()?;
                self.entries_open = true;
            }

            cx.scalar(entry_tuple(el))?;
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("ColorMap") {
            if self.entries_open {
                cx.end_sequence()?;
            }

            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// Render a color map entry,
///   leaving absent attributes empty.
fn entry_tuple(el: &Element) -> String {
    let attr = |name| el.attr(name).map(str::trim).unwrap_or("");

    format!(
        "({},{},{},{})",
        attr("color"),
        attr("opacity"),
        attr("quantity"),
        attr("label"),
    )
}

/// Contrast enhancement,
///   either of the whole raster or of a single channel.
#[derive(Debug)]
pub struct ContrastHandler;

impl ContrastHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.scalar("contrast-enhancement")?.mapping()?;
        Ok(Self)
    }
}

impl Handler for ContrastHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            name @ ("Normalize" | "Histogram" | "Logarithmic"
            | "Exponential") => {
                cx.entry("mode", name.to_lowercase())?;
            }

            "GammaValue" => expr_entry(cx, "gamma")?,

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("ContrastEnhancement") {
            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// Channel selection.
#[derive(Debug)]
pub struct ChannelsHandler;

impl ChannelsHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.scalar("channels")?.mapping()?;
        Ok(Self)
    }
}

impl Handler for ChannelsHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        let key = match el.name.as_str() {
            "RedChannel" => "red",
            "GreenChannel" => "green",
            "BlueChannel" => "blue",
            "GrayChannel" => "gray",
            _ => return Ok(()),
        };

        let channel = ChannelHandler::start(cx, key, el)?;
        cx.push(channel);

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("ChannelSelection") {
            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// A single selected channel.
#[derive(Debug)]
pub struct ChannelHandler {
    closes_on: String,
}

impl ChannelHandler {
    pub fn start(cx: &mut Context, key: &str, el: &Element) -> Result<Self> {
        cx.scalar(key)?.mapping()?;

        Ok(Self {
            closes_on: el.name.clone(),
        })
    }
}

impl Handler for ChannelHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "SourceChannelName" => text_entry(cx, "name")?,

            "ContrastEnhancement" => {
                let contrast = ContrastHandler::start(cx)?;
                cx.push(contrast);
            }

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.name == self.closes_on {
            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// Overlap behavior,
///   given either as the name of an empty child element
///     (`<AVERAGE/>`)
///   or as text.
#[derive(Debug, Default)]
pub struct OverlapHandler {
    element: Option<String>,
    text: String,
}

impl Handler for OverlapHandler {
    fn element(&mut self, el: &Element, _: &mut Context) -> Result {
        if self.element.is_none() {
            self.element = Some(el.name.clone());
        }

        Ok(())
    }

    fn characters(&mut self, text: &str, _: Span, _: &mut Context) -> Result {
        self.text.push_str(text);
        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("OverlapBehavior") {
            let value = match self.element.take() {
                Some(name) => name,
                None => self.text.trim().to_string(),
            };

            cx.scalar(value)?.pop();
        }

        Ok(())
    }
}

/// Shaded relief.
#[derive(Debug)]
pub struct ReliefHandler;

impl ReliefHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.scalar("shaded-relief")?.mapping()?;
        Ok(Self)
    }
}

impl Handler for ReliefHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "BrightnessOnly" => text_entry(cx, "brightness-only")?,
            "ReliefFactor" => expr_entry(cx, "relief-factor")?,
            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("ShadedRelief") {
            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// Outline of the raster's footprint,
///   drawn by a nested line or polygon symbolizer.
///
/// The key is written only once the symbolizer is found so that an empty
///   outline produces no output.
#[derive(Debug)]
pub struct OutlineHandler;

impl Handler for OutlineHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        if let Some(kind @ (Kind::Line | Kind::Polygon)) =
            Kind::from_element(&el.name)
        {
            cx.scalar("image-outline")?;

            let sym = SymbolizerHandler::start(kind, el, cx)?;
            cx.push(sym);
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("ImageOutline") {
            cx.pop();
        }

        Ok(())
    }
}
