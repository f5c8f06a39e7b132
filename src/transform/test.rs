// Tests for streaming SLD transformation
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

use super::*;
use crate::filter::FilterError;
use YamlEvent::*;

const SLD_NS: &str = r#"xmlns="http://www.opengis.net/sld"
    xmlns:ogc="http://www.opengis.net/ogc"
    xmlns:gml="http://www.opengis.net/gml"
    xmlns:xlink="http://www.w3.org/1999/xlink""#;

/// Wrap `rules` in a single feature type style of a single user style.
fn sld(rules: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<StyledLayerDescriptor version="1.0.0" {SLD_NS}>
  <NamedLayer>
    <Name>layer</Name>
    <UserStyle>
      <FeatureTypeStyle>
        {rules}
      </FeatureTypeStyle>
    </UserStyle>
  </NamedLayer>
</StyledLayerDescriptor>"#
    )
}

fn ysld(src: &str) -> Result<String, TransformError> {
    let out = transform(src.as_bytes(), Vec::new())?;
    Ok(String::from_utf8(out).expect("output is not UTF-8"))
}

fn events(src: &str) -> Result<Vec<YamlEvent>, TransformError> {
    let mut sink = Vec::new();
    run(XmlEventReader::new(src.as_bytes()), &mut sink)?;
    Ok(sink)
}

fn scalar(s: &str) -> YamlEvent {
    Scalar(s.into())
}

#[test]
fn document_boundaries_wrap_style() {
    let src = format!(
        r#"<StyledLayerDescriptor {SLD_NS}>
             <NamedLayer>
               <UserStyle><Name>s</Name></UserStyle>
             </NamedLayer>
           </StyledLayerDescriptor>"#
    );

    assert_eq!(
        Ok(vec![
            DocumentStart,
            MappingStart,
            scalar("name"),
            scalar("s"),
            MappingEnd,
            DocumentEnd,
        ]),
        events(&src).map_err(|e| e.to_string()),
    );
}

#[test]
fn no_user_style_yields_empty_document() {
    let src = format!(
        r#"<StyledLayerDescriptor {SLD_NS}>
             <NamedLayer><Name>nothing here</Name></NamedLayer>
           </StyledLayerDescriptor>"#
    );

    assert_eq!("", ysld(&src).unwrap());
}

#[test]
fn simple_point() {
    let src = format!(
        r#"<StyledLayerDescriptor version="1.0.0" {SLD_NS}>
  <NamedLayer>
    <Name>simple_point</Name>
    <UserStyle>
      <Title>Simple point</Title>
      <FeatureTypeStyle>
        <Rule>
          <PointSymbolizer>
            <Graphic>
              <Mark>
                <WellKnownName>circle</WellKnownName>
                <Fill>
                  <CssParameter name="fill">#FF0000</CssParameter>
                </Fill>
              </Mark>
              <Size>6</Size>
            </Graphic>
          </PointSymbolizer>
        </Rule>
      </FeatureTypeStyle>
    </UserStyle>
  </NamedLayer>
</StyledLayerDescriptor>"#
    );

    let expected = "\
title: Simple point
feature-styles:
- rules:
  - symbolizers:
    - point:
        symbols:
        - mark:
            shape: circle
            fill-color: '#FF0000'
        size: 6
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn scale_precedes_symbolizers() {
    let src = sld(r#"
        <Rule>
          <Name>mid</Name>
          <ogc:Filter>
            <ogc:PropertyIsLessThan>
              <ogc:PropertyName>pop</ogc:PropertyName>
              <ogc:Literal>50000</ogc:Literal>
            </ogc:PropertyIsLessThan>
          </ogc:Filter>
          <MinScaleDenominator>100</MinScaleDenominator>
          <MaxScaleDenominator>500</MaxScaleDenominator>
          <LineSymbolizer>
            <Stroke>
              <CssParameter name="stroke">#0000FF</CssParameter>
              <CssParameter name="stroke-width">2</CssParameter>
            </Stroke>
          </LineSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - name: mid
    filter: pop < '50000'
    scale: (100,500)
    symbolizers:
    - line:
        stroke-color: '#0000FF'
        stroke-width: 2
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn open_scale_bound_is_empty() {
    let src = sld(r#"
        <Rule>
          <MaxScaleDenominator>160000000</MaxScaleDenominator>
          <PolygonSymbolizer/>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - scale: (,160000000)
    symbolizers:
    - polygon: {}
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn scale_without_symbolizers_is_dropped() {
    let src = sld(r#"
        <Rule>
          <Name>empty</Name>
          <MinScaleDenominator>100</MinScaleDenominator>
        </Rule>"#);

    assert_eq!(
        "feature-styles:\n- rules:\n  - name: empty\n",
        ysld(&src).unwrap(),
    );
}

#[test]
fn compound_filter_and_else() {
    let src = sld(r#"
        <Rule>
          <ogc:Filter>
            <ogc:And>
              <ogc:PropertyIsGreaterThanOrEqualTo>
                <ogc:PropertyName>pop</ogc:PropertyName>
                <ogc:Literal>50000</ogc:Literal>
              </ogc:PropertyIsGreaterThanOrEqualTo>
              <ogc:PropertyIsLessThan>
                <ogc:PropertyName>pop</ogc:PropertyName>
                <ogc:Literal>100000</ogc:Literal>
              </ogc:PropertyIsLessThan>
            </ogc:And>
          </ogc:Filter>
        </Rule>
        <Rule>
          <ElseFilter/>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - filter: pop >= '50000' AND pop < '100000'
  - else: true
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn raster_color_map() {
    let src = sld(r##"
        <Rule>
          <RasterSymbolizer>
            <Opacity>1.0</Opacity>
            <ColorMap type="ramp">
              <ColorMapEntry color="#FF0000" quantity="10"/>
              <ColorMapEntry color="#00FF00" quantity="20"
                             opacity="0.5" label="high"/>
            </ColorMap>
          </RasterSymbolizer>
        </Rule>"##);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - raster:
        opacity: 1.0
        color-map:
          type: ramp
          entries:
          - (#FF0000,,10,)
          - (#00FF00,0.5,20,high)
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn scale_precedes_many_symbolizers() {
    let src = sld(r#"
        <Rule>
          <MinScaleDenominator>100</MinScaleDenominator>
          <MaxScaleDenominator>500</MaxScaleDenominator>
          <PolygonSymbolizer>
            <Fill><CssParameter name="fill">#AAAAAA</CssParameter></Fill>
          </PolygonSymbolizer>
          <LineSymbolizer>
            <Stroke><CssParameter name="stroke-width">2</CssParameter></Stroke>
          </LineSymbolizer>
          <TextSymbolizer>
            <Label><ogc:PropertyName>name</ogc:PropertyName></Label>
          </TextSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - scale: (100,500)
    symbolizers:
    - polygon:
        fill-color: '#AAAAAA'
    - line:
        stroke-width: 2
    - text:
        label: ${name}
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn raster_channels_with_contrast() {
    let src = sld(r#"
        <Rule>
          <RasterSymbolizer>
            <ChannelSelection>
              <RedChannel>
                <SourceChannelName>1</SourceChannelName>
                <ContrastEnhancement><Normalize/></ContrastEnhancement>
              </RedChannel>
              <GreenChannel>
                <SourceChannelName>2</SourceChannelName>
              </GreenChannel>
              <BlueChannel>
                <SourceChannelName>3</SourceChannelName>
                <ContrastEnhancement>
                  <GammaValue>1.5</GammaValue>
                </ContrastEnhancement>
              </BlueChannel>
            </ChannelSelection>
            <ContrastEnhancement><Histogram/></ContrastEnhancement>
          </RasterSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - raster:
        channels:
          red:
            name: 1
            contrast-enhancement:
              mode: normalize
          green:
            name: 2
          blue:
            name: 3
            contrast-enhancement:
              gamma: 1.5
        contrast-enhancement:
          mode: histogram
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn raster_gray_channel() {
    let src = sld(r#"
        <Rule>
          <RasterSymbolizer>
            <ChannelSelection>
              <GrayChannel>
                <SourceChannelName>band1</SourceChannelName>
              </GrayChannel>
            </ChannelSelection>
          </RasterSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - raster:
        channels:
          gray:
            name: band1
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn raster_overlap_behavior_element_or_text() {
    let src = sld(r#"
        <Rule>
          <RasterSymbolizer>
            <OverlapBehavior>
              <LATEST_ON_TOP/>
            </OverlapBehavior>
          </RasterSymbolizer>
          <RasterSymbolizer>
            <OverlapBehavior> AVERAGE </OverlapBehavior>
          </RasterSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - raster:
        overlap-behavior: LATEST_ON_TOP
    - raster:
        overlap-behavior: AVERAGE
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn raster_shaded_relief() {
    let src = sld(r#"
        <Rule>
          <RasterSymbolizer>
            <ShadedRelief>
              <BrightnessOnly>true</BrightnessOnly>
              <ReliefFactor>55</ReliefFactor>
            </ShadedRelief>
          </RasterSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - raster:
        shaded-relief:
          brightness-only: true
          relief-factor: 55
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn raster_image_outline() {
    let src = sld(r#"
        <Rule>
          <RasterSymbolizer>
            <ImageOutline>
              <LineSymbolizer>
                <Stroke>
                  <CssParameter name="stroke">#0000FF</CssParameter>
                </Stroke>
              </LineSymbolizer>
            </ImageOutline>
            <Opacity>0.5</Opacity>
          </RasterSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - raster:
        image-outline:
          line:
            stroke-color: '#0000FF'
        opacity: 0.5
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn empty_image_outline_is_dropped() {
    let src = sld(r#"
        <Rule>
          <RasterSymbolizer>
            <ImageOutline/>
            <Opacity>0.5</Opacity>
          </RasterSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - raster:
        opacity: 0.5
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn stroke_graphic_stroke_and_fill() {
    let src = sld(r#"
        <Rule>
          <LineSymbolizer>
            <Stroke>
              <GraphicStroke>
                <Graphic>
                  <Mark><WellKnownName>circle</WellKnownName></Mark>
                  <Size>4</Size>
                </Graphic>
              </GraphicStroke>
            </Stroke>
          </LineSymbolizer>
          <LineSymbolizer>
            <Stroke>
              <GraphicFill>
                <Graphic>
                  <Mark><WellKnownName>shape://slash</WellKnownName></Mark>
                </Graphic>
              </GraphicFill>
              <CssParameter name="stroke-width">8</CssParameter>
            </Stroke>
          </LineSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - line:
        stroke-graphic-stroke:
          symbols:
          - mark:
              shape: circle
          size: 4
    - line:
        stroke-graphic-fill:
          symbols:
          - mark:
              shape: shape://slash
        stroke-width: 8
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn label_graphic_is_nested() {
    let src = sld(r#"
        <Rule>
          <TextSymbolizer>
            <Label><ogc:PropertyName>name</ogc:PropertyName></Label>
            <Graphic>
              <Mark><WellKnownName>circle</WellKnownName></Mark>
              <Size>4</Size>
            </Graphic>
            <Priority>10</Priority>
          </TextSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - text:
        label: ${name}
        graphic:
          symbols:
          - mark:
              shape: circle
          size: 4
        priority: 10
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn symbol_after_graphic_properties_is_rejected() {
    let src = sld(r#"
        <Rule>
          <PointSymbolizer>
            <Graphic>
              <Mark><WellKnownName>circle</WellKnownName></Mark>
              <Size>4</Size>
              <Mark><WellKnownName>square</WellKnownName></Mark>
            </Graphic>
          </PointSymbolizer>
        </Rule>"#);

    assert!(matches!(
        ysld(&src),
        Err(TransformError::Emit(crate::yaml::Error::DuplicateKey(key)))
            if key == "symbols"
    ));
}

#[test]
fn unknown_elements_are_tolerated() {
    let src = sld(r#"
        <Rule>
          <Unknown><Deeper>text</Deeper></Unknown>
          <PolygonSymbolizer>
            <Whatever/>
            <Fill>
              <CssParameter name="fill">#AAAAAA</CssParameter>
            </Fill>
          </PolygonSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - polygon:
        fill-color: '#AAAAAA'
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn labels_with_placement_and_options() {
    let src = sld(r#"
        <Rule>
          <TextSymbolizer>
            <Label><ogc:PropertyName>name</ogc:PropertyName></Label>
            <Font>
              <CssParameter name="font-family">Arial</CssParameter>
              <CssParameter name="font-size">12</CssParameter>
            </Font>
            <LabelPlacement>
              <PointPlacement>
                <AnchorPoint>
                  <AnchorPointX>0.5</AnchorPointX>
                  <AnchorPointY>0.0</AnchorPointY>
                </AnchorPoint>
                <Displacement>
                  <DisplacementX>0</DisplacementX>
                  <DisplacementY>5</DisplacementY>
                </Displacement>
              </PointPlacement>
            </LabelPlacement>
            <Halo>
              <Radius>2</Radius>
              <Fill><CssParameter name="fill">#FFFFFF</CssParameter></Fill>
            </Halo>
            <VendorOption name="maxDisplacement">10</VendorOption>
          </TextSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - text:
        label: ${name}
        font-family: Arial
        font-size: 12
        placement:
          type: point
          anchor: (0.5,0.0)
          displacement: (0,5)
        halo:
          radius: 2
          fill-color: '#FFFFFF'
        x-maxDisplacement: 10
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn feature_style_options_follow_rules() {
    let src = sld(r#"
        <Name>fts</Name>
        <Rule><Name>only</Name></Rule>
        <VendorOption name="ruleEvaluation">first</VendorOption>
        <VendorOption name="composite">multiply</VendorOption>"#);

    let expected = "\
feature-styles:
- name: fts
  rules:
  - name: only
  x-ruleEvaluation: first
  x-composite: multiply
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn external_graphic_and_uom() {
    let src = sld(r#"
        <Rule>
          <PointSymbolizer
              uom="http://www.opengeospatial.org/se/units/pixel">
            <Graphic>
              <ExternalGraphic>
                <OnlineResource xlink:type="simple"
                                xlink:href="http://example.com/a.png"/>
                <Format>image/png</Format>
              </ExternalGraphic>
              <Rotation>
                <ogc:Function name="toDegrees">
                  <ogc:PropertyName>angle</ogc:PropertyName>
                </ogc:Function>
              </Rotation>
            </Graphic>
          </PointSymbolizer>
        </Rule>"#);

    let expected = "\
feature-styles:
- rules:
  - symbolizers:
    - point:
        uom: pixel
        symbols:
        - external:
            url: http://example.com/a.png
            format: image/png
        rotation: toDegrees(${angle})
";

    assert_eq!(expected, ysld(&src).unwrap());
}

#[test]
fn only_first_user_style_is_transformed() {
    let src = format!(
        r#"<StyledLayerDescriptor {SLD_NS}>
             <NamedLayer>
               <UserStyle><Name>first</Name></UserStyle>
             </NamedLayer>
             <NamedLayer>
               <UserStyle>
                 <Name>second</Name>
                 <FeatureTypeStyle><Rule><Name>r</Name></Rule></FeatureTypeStyle>
               </UserStyle>
             </NamedLayer>
           </StyledLayerDescriptor>"#
    );

    assert_eq!("name: first\n", ysld(&src).unwrap());
}

#[test]
fn dialect_follows_root_version() {
    let rule = r#"
        <Rule>
          <ogc:Filter>
            <ogc:PropertyIsLike wildCard="*" singleChar="." escapeChar="!"
                                matchCase="false">
              <ogc:PropertyName>name</ogc:PropertyName>
              <ogc:Literal>st*</ogc:Literal>
            </ogc:PropertyIsLike>
          </ogc:Filter>
        </Rule>"#;

    let se = format!(
        r#"<StyledLayerDescriptor version="1.1.0" {SLD_NS}>
             <NamedLayer><UserStyle><FeatureTypeStyle>{rule}
             </FeatureTypeStyle></UserStyle></NamedLayer>
           </StyledLayerDescriptor>"#
    );

    assert_eq!(
        "feature-styles:\n- rules:\n  - filter: name ILIKE 'st%'\n",
        ysld(&se).unwrap(),
    );

    // `matchCase` does not exist in Filter Encoding 1.0.
    assert_eq!(
        "feature-styles:\n- rules:\n  - filter: name LIKE 'st%'\n",
        ysld(&sld(rule)).unwrap(),
    );
}

#[test]
fn dialect_rejects_foreign_elements() {
    let src = sld(r#"
        <Rule>
          <ogc:Filter>
            <ogc:GmlObjectId gml:id="river.1"/>
          </ogc:Filter>
        </Rule>"#);

    assert!(matches!(
        ysld(&src),
        Err(TransformError::Filter(FilterError::UnknownElement { name, .. }))
            if name == "GmlObjectId"
    ));
}

#[test]
fn filter_error_terminates_transformation() {
    let src = sld(r#"
        <Rule>
          <ogc:Filter>
            <ogc:PropertyIsEqualTo>
              <ogc:PropertyName>a</ogc:PropertyName>
            </ogc:PropertyIsEqualTo>
          </ogc:Filter>
        </Rule>"#);

    assert!(matches!(
        ysld(&src),
        Err(TransformError::Filter(FilterError::OperandCount {
            found: 1,
            ..
        }))
    ));
}

#[test]
fn missing_parameter_name() {
    let src = sld(r#"
        <Rule>
          <LineSymbolizer>
            <Stroke><CssParameter>#000000</CssParameter></Stroke>
          </LineSymbolizer>
        </Rule>"#);

    assert!(matches!(
        ysld(&src),
        Err(TransformError::MissingAttr { attr: "name", el, .. })
            if el == "CssParameter"
    ));
}

#[test]
fn malformed_markup_is_an_xml_error() {
    let src = format!(
        r#"<StyledLayerDescriptor {SLD_NS}><UserStyle></NamedLayer>"#
    );

    assert!(matches!(ysld(&src), Err(TransformError::Xml(_))));
}
