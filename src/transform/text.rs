// Text symbolizer handlers
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

//! Properties specific to text symbolizers.

use super::{
    expr::{expr_entry, text_entry},
    graphic::{GraphicHandler, ParamHandler, Params, TupleHandler},
    Context, Handler, TransformError,
};
use crate::xml::{Element, EndTag};

type Result<T = ()> = std::result::Result<T, TransformError>;

/// React to a child of a `TextSymbolizer`.
pub fn element(el: &Element, cx: &mut Context) -> Result {
    match el.name.as_str() {
        "Label" => expr_entry(cx, "label")?,
        "Priority" => expr_entry(cx, "priority")?,

        "Font" => {
            cx.push(ParamHandler::new(Params::Font));
        }

        "Fill" => {
            cx.push(ParamHandler::new(Params::Fill));
        }

        "Graphic" => {
            let graphic = GraphicHandler::keyed(cx, "graphic")?;
            cx.push(graphic);
        }

        "LabelPlacement" => {
            let placement = PlacementHandler::start(cx)?;
            cx.push(placement);
        }

        "Halo" => {
            let halo = HaloHandler::start(cx)?;
            cx.push(halo);
        }

        _ => (),
    }

    Ok(())
}

/// Point or line placement of a label.
///
/// Both forms share this handler since their children do not overlap;
///   the form is recorded as the `type` of the placement.
#[derive(Debug)]
pub struct PlacementHandler;

impl PlacementHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.scalar("placement")?.mapping()?;
        Ok(Self)
    }
}

impl Handler for PlacementHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "PointPlacement" => {
                cx.entry("type", "point")?;
            }
            "LinePlacement" => {
                cx.entry("type", "line")?;
            }

            "AnchorPoint" => {
                cx.scalar("anchor")?.push(TupleHandler::anchor());
            }
            "Displacement" => {
                cx.scalar("displacement")?
                    .push(TupleHandler::displacement());
            }
            "Rotation" => expr_entry(cx, "rotation")?,

            "PerpendicularOffset" => expr_entry(cx, "offset")?,
            "IsRepeated" => text_entry(cx, "repeat")?,
            "IsAligned" => text_entry(cx, "aligned")?,
            "GeneralizeLine" => text_entry(cx, "generalize-line")?,
            "Gap" => expr_entry(cx, "gap")?,
            "InitialGap" => expr_entry(cx, "initial-gap")?,

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("LabelPlacement") {
            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// A halo around label text.
#[derive(Debug)]
pub struct HaloHandler;

impl HaloHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.scalar("halo")?.mapping()?;
        Ok(Self)
    }
}

impl Handler for HaloHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "Radius" => expr_entry(cx, "radius")?,

            "Fill" => {
                cx.push(ParamHandler::new(Params::Fill));
            }

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("Halo") {
            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}
