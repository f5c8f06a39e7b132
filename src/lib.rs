// Streaming SLD to YSLD transformer
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

//! Streaming transformation of OGC Styled Layer Descriptor documents into
//!   YSLD.
//!
//! Input is read as a stream of markup events by [`xml`],
//!   transformed by the handler stack of [`transform`],
//!   and written as block-style YAML by [`yaml`].
//! Filters embedded in rules are parsed by [`filter`] and rendered as
//!   ECQL.
//! Errors are reported against the input using [`diagnose`].

// We build docs for private items.
#![allow(rustdoc::private_intra_doc_links)]

pub mod global;

#[macro_use]
extern crate static_assertions;

pub mod diagnose;
pub mod filter;
pub mod span;
pub mod transform;
pub mod xml;
pub mod yaml;

pub use transform::{run, transform, TransformError};
