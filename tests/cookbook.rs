// Cookbook style transformation tests
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

// These tests transform complete SLD documents in the manner of the SLD
//   Cook Book and parse the output back as YAML,
//     ensuring that the output is well-formed and structurally complete.

use serde_yaml::Value;
use std::{fs::File, io::BufReader, path::PathBuf};

fn fixture(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "data", name]
        .iter()
        .collect()
}

fn transform(name: &str) -> Value {
    let src = BufReader::new(File::open(fixture(name)).unwrap());
    let out = sldyaml::transform(src, Vec::new()).unwrap();

    serde_yaml::from_slice(&out).unwrap()
}

/// Look up a path of mapping keys and sequence indexes.
fn at<'a>(value: &'a Value, path: &[&str]) -> &'a Value {
    path.iter().fold(value, |v, seg| match seg.parse::<usize>() {
        Ok(i) => &v[i],
        Err(_) => &v[*seg],
    })
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> &'a str {
    at(value, path)
        .as_str()
        .unwrap_or_else(|| panic!("no string at {path:?} in {value:?}"))
}

#[test]
fn simple_point() {
    let ysld = transform("simple_point.sld");

    assert_eq!("SLD Cook Book: Simple point", str_at(&ysld, &["title"]));

    let point = at(
        &ysld,
        &["feature-styles", "0", "rules", "0", "symbolizers", "0", "point"],
    );

    assert_eq!("circle", str_at(point, &["symbols", "0", "mark", "shape"]));
    assert_eq!(
        "#FF0000",
        str_at(point, &["symbols", "0", "mark", "fill-color"])
    );
    assert_eq!(Some(6), at(point, &["size"]).as_u64());
}

#[test]
fn attribute_based_point() {
    let ysld = transform("population.sld");
    let rules = at(&ysld, &["feature-styles", "0", "rules"]);

    assert_eq!(Some(3), rules.as_sequence().map(Vec::len));

    assert_eq!("SmallPop", str_at(rules, &["0", "name"]));
    assert_eq!("1 to 50000", str_at(rules, &["0", "title"]));
    assert_eq!("pop < '50000'", str_at(rules, &["0", "filter"]));
    assert_eq!("(,160000000)", str_at(rules, &["0", "scale"]));

    assert_eq!(
        "pop >= '50000' AND pop < '100000'",
        str_at(rules, &["1", "filter"])
    );
    assert_eq!(Value::Null, rules[1]["scale"]);

    assert_eq!(Some(true), at(rules, &["2", "else"]).as_bool());

    let sizes: Vec<_> = (0..3)
        .map(|i| {
            at(
                &rules[i],
                &["symbolizers", "0", "point", "size"],
            )
            .as_u64()
        })
        .collect();

    assert_eq!(vec![Some(8), Some(12), Some(16)], sizes);
}

#[test]
fn line_with_label() {
    let ysld = transform("labeled_line.sld");
    let syms = at(&ysld, &["feature-styles", "0", "rules", "0", "symbolizers"]);

    assert_eq!("#FF0000", str_at(syms, &["0", "line", "stroke-color"]));
    assert_eq!("5 2", str_at(syms, &["0", "line", "stroke-dasharray"]));

    let text = at(syms, &["1", "text"]);

    assert_eq!("${name}", str_at(text, &["label"]));
    assert_eq!("bold", str_at(text, &["font-weight"]));
    assert_eq!("line", str_at(text, &["placement", "type"]));
    assert_eq!(Some(10), at(text, &["placement", "offset"]).as_u64());
    assert_eq!("#000000", str_at(text, &["fill-color"]));
    assert_eq!(Some(true), at(text, &["x-followLine"]).as_bool());
    assert_eq!(Some(90), at(text, &["x-maxAngleDelta"]).as_u64());
}

#[test]
fn hatching_fill() {
    let ysld = transform("hatched_polygon.sld");
    let polygon = at(
        &ysld,
        &["feature-styles", "0", "rules", "0", "symbolizers", "0", "polygon"],
    );

    let graphic = at(polygon, &["fill-graphic"]);

    assert_eq!(
        "shape://times",
        str_at(graphic, &["symbols", "0", "mark", "shape"])
    );
    assert_eq!(
        "#990099",
        str_at(graphic, &["symbols", "0", "mark", "stroke-color"])
    );
    assert_eq!(Some(16), at(graphic, &["size"]).as_u64());

    assert_eq!("#000000", str_at(polygon, &["stroke-color"]));
}

#[test]
fn three_color_gradient() {
    let ysld = transform("raster_ramp.sld");
    let raster = at(
        &ysld,
        &["feature-styles", "0", "rules", "0", "symbolizers", "0", "raster"],
    );

    let entries: Vec<_> = at(raster, &["color-map", "entries"])
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();

    assert_eq!(
        vec!["(#0000FF,,150,)", "(#FFFF00,,200,)", "(#FF0000,,250,)"],
        entries,
    );

    assert_eq!(
        Some(0.5),
        at(raster, &["contrast-enhancement", "gamma"]).as_f64()
    );
}
