// Global constants
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

//! System-wide static configuration.
//!
//! By convention,
//!   import this entire module rather than individual members and reference
//!   them as `global::foo` to emphasize their nature and risk.

/// Maximum number of handlers that may be active on the handler stack at
///   any one time.
///
/// The depth of the stack is bounded by the nesting of the SLD grammar
///   rather than by the size of a document,
///     but graphics may nest within fills and strokes that are themselves
///     within graphics,
///       so this leaves generous room for that recursion.
/// Exceeding this depth is an error rather than a reallocation.
pub const MAX_HANDLER_DEPTH: usize = 64;

/// Prefix applied to the keys of vendor options when they are flushed
///   into the output mapping of their construct.
pub const VENDOR_OPTION_PREFIX: &str = "x-";

// The deepest construct in an ordinary style
//   (a mark stroke within a graphic stroke of a line within a rule)
//   requires about sixteen handlers.
const_assert!(MAX_HANDLER_DEPTH >= 16);
