// Style structure handlers
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

//! Handlers for the structure of a style:
//!   the layer wrappers,
//!   the style itself,
//!   feature type styles and rules.
//!
//! A YSLD document holds exactly one style,
//!   whose root mapping corresponds to the first `UserStyle` in the
//!   input.

use super::{
    expr::{text_entry, SkipHandler, TextHandler},
    filter::FilterHandler,
    symbolizer::{push_symbolizer, Kind, VendorOptions},
    Context, Handler, Slot, Then, TransformError,
};
use crate::xml::{Element, EndTag};

type Result<T = ()> = std::result::Result<T, TransformError>;

/// The handler seeded at the bottom of the stack.
///
/// Layer wrappers such as `StyledLayerDescriptor`,
///   `NamedLayer` and `UserLayer` are passed through.
/// Only the first `UserStyle` is transformed;
///   any others are skipped in their entirety.
#[derive(Debug, Default)]
pub struct RootHandler {
    styled: bool,
}

impl Handler for RootHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match (el.name.as_str(), self.styled) {
            ("UserStyle", false) => {
                let style = UserStyleHandler::start(cx)?;
                cx.push(style);
                self.styled = true;
            }

            ("UserStyle", true) => {
                cx.push(SkipHandler::default());
            }

            _ => (),
        }

        Ok(())
    }
}

/// The style mapping.
#[derive(Debug, Default)]
pub struct UserStyleHandler {
    styles_open: bool,
}

impl UserStyleHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.mapping()?;
        Ok(Self::default())
    }
}

impl Handler for UserStyleHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "Name" => text_entry(cx, "name")?,
            "Title" => text_entry(cx, "title")?,
            "Abstract" => text_entry(cx, "abstract")?,

            "FeatureTypeStyle" | "CoverageStyle" if !self.styles_open => {
                cx.scalar("feature-styles")?.sequence()?;
                cx.push(SequenceHandler::new("UserStyle", Items::FeatureStyles))
                    .forward();

                self.styles_open = true;
            }

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("UserStyle") {
            if self.styles_open {
                cx.end_sequence()?;
            }

            cx.end_mapping()?.pop();
        }

        Ok(())
    }
}

/// What a [`SequenceHandler`] installs for each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Items {
    FeatureStyles,
    Symbolizers,
}

/// Installs a handler for each item of a sequence opened by its parent.
///
/// The lifetime of this handler spans all of the items of the sequence;
///   it pops only when the element enclosing the sequence closes,
///     forwarding that closing to its parent so that the parent may close
///     the sequence.
/// Elements that are not items are ignored.
#[derive(Debug)]
pub struct SequenceHandler {
    closes_on: &'static str,
    items: Items,
}

impl SequenceHandler {
    pub fn new(closes_on: &'static str, items: Items) -> Self {
        Self { closes_on, items }
    }
}

impl Handler for SequenceHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match self.items {
            Items::FeatureStyles
                if el.is("FeatureTypeStyle") || el.is("CoverageStyle") =>
            {
                let fts = FeatureStyleHandler::start(el, cx)?;
                cx.push(fts);
            }

            Items::FeatureStyles => (),

            Items::Symbolizers => {
                push_symbolizer(el, cx)?;
            }
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is(self.closes_on) {
            cx.pop().forward();
        }

        Ok(())
    }
}

/// A feature type style.
///
/// Rules are handled directly rather than through a [`SequenceHandler`]
///   since vendor options may follow them.
#[derive(Debug)]
pub struct FeatureStyleHandler {
    closes_on: String,
    rules_open: bool,
    options: VendorOptions,
}

impl FeatureStyleHandler {
    pub fn start(el: &Element, cx: &mut Context) -> Result<Self> {
        cx.mapping()?;

        Ok(Self {
            closes_on: el.name.clone(),
            rules_open: false,
            options: VendorOptions::default(),
        })
    }
}

impl Handler for FeatureStyleHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match (el.name.as_str(), self.rules_open) {
            ("Name", false) => text_entry(cx, "name")?,
            ("Title", false) => text_entry(cx, "title")?,
            ("Abstract", false) => text_entry(cx, "abstract")?,

            ("Rule", _) => {
                if !self.rules_open {
                    cx.scalar("rules")?.sequence()?;
                    self.rules_open = true;
                }

                let rule = RuleHandler::start(cx)?;
                cx.push(rule);
            }

            ("VendorOption", _) => self.options.begin(el, cx)?,

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.name == self.closes_on {
            if self.rules_open {
                cx.end_sequence()?;
            }

            self.options.flush(cx)?;
            cx.end_mapping()?.pop();
        }

        Ok(())
    }

    fn capture(&mut self, _: Slot, value: String) {
        self.options.capture(value);
    }
}

/// A rule.
///
/// Scale denominators are captured rather than emitted,
///   and are written as a single `scale` tuple just before the
///   `symbolizers` sequence opens.
/// A rule without symbolizers therefore has no `scale`.
#[derive(Debug, Default)]
pub struct RuleHandler {
    min_scale: Option<String>,
    max_scale: Option<String>,
    symbolizers_open: bool,
}

impl RuleHandler {
    pub fn start(cx: &mut Context) -> Result<Self> {
        cx.mapping()?;
        Ok(Self::default())
    }

    fn open_symbolizers(&mut self, cx: &mut Context) -> Result {
        if self.min_scale.is_some() || self.max_scale.is_some() {
            cx.scalar("scale")?.tuple(
                self.min_scale.as_deref().unwrap_or(""),
                self.max_scale.as_deref().unwrap_or(""),
            )?;
        }

        cx.scalar("symbolizers")?.sequence()?;
        self.symbolizers_open = true;

        Ok(())
    }
}

impl Handler for RuleHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        match el.name.as_str() {
            "Name" => text_entry(cx, "name")?,
            "Title" => text_entry(cx, "title")?,
            "Abstract" => text_entry(cx, "abstract")?,

            "Filter" => {
                cx.scalar("filter")?.push(FilterHandler::new()).forward();
            }

            "ElseFilter" => {
                cx.entry("else", "true")?;
            }

            "MinScaleDenominator" => {
                cx.push(TextHandler::new(Then::Capture(Slot::First)));
            }

            "MaxScaleDenominator" => {
                cx.push(TextHandler::new(Then::Capture(Slot::Second)));
            }

            // Legends are not part of YSLD.
            "LegendGraphic" => {
                cx.push(SkipHandler::default());
            }

            name if Kind::from_element(name).is_some() => {
                self.open_symbolizers(cx)?;

                cx.push(SequenceHandler::new("Rule", Items::Symbolizers))
                    .forward();
            }

            _ => (),
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        if end.is("Rule") {
            if self.symbolizers_open {
                cx.end_sequence()?;
            }

            cx.end_mapping()?.pop();
        }

        Ok(())
    }

    fn capture(&mut self, slot: Slot, value: String) {
        match slot {
            Slot::First => self.min_scale = Some(value),
            Slot::Second => self.max_scale = Some(value),
        }
    }
}
