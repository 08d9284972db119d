//! package::svg
//!
//! SVG interchange documents.
//!
//! The document shows the rendered path and carries the complete JSON
//! package in a metadata element:
//!
//! ```text
//! <metadata id="qbc-package"><![CDATA[{ ...package json... }]]></metadata>
//! ```
//!
//! That element is the only thing [`from_svg`] reads. Geometry is never
//! decoded: an SVG whose metadata was stripped fails with
//! [`PackageError::NoEmbeddedMetadata`].
//!
//! # Tolerance
//!
//! Editors and optimizers re-save SVGs. Extraction survives:
//! - attribute reordering, either quote style, extra whitespace
//! - namespace prefixes (`<svg:metadata>`)
//! - CDATA rewritten as entity-escaped text
//! - comments and nested elements inside or around the block
//!
//! The document is read with `quick_xml`, so broken markup fails as
//! [`PackageError::Malformed`]. Several blocks are accepted only if they hold the same package.

use std::fmt::{self, Write as _};

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::codec::event::PathEvent;
use crate::package::schema::{from_json, to_json, GlyphPackage, PackageError};

/// `id` of the metadata element holding the package.
pub const PACKAGE_ELEMENT_ID: &str = "qbc-package";

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Visual parameters of a rendered glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Width and height of the square canvas, in pixels
    pub size: u32,
    /// Blank margin on every side, in pixels
    pub padding: f64,
    pub stroke: String,
    pub stroke_width: f64,
    /// Length of a repeat tick, in pixels
    pub tick_length: f64,
    pub background: Option<String>,
    /// Draw a dot where the path starts
    pub start_marker: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            size: 512,
            padding: 24.0,
            stroke: "#1b1f3b".to_string(),
            stroke_width: 3.0,
            tick_length: 14.0,
            background: None,
            start_marker: true,
        }
    }
}

impl RenderStyle {
    /// Check that the style describes a drawable canvas.
    pub fn validate(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err("size must be positive".to_string());
        }
        if !self.padding.is_finite() || self.padding < 0.0 || self.padding * 2.0 >= self.size as f64 {
            return Err(format!(
                "padding {} leaves no drawing area on a {}px canvas",
                self.padding, self.size
            ));
        }
        for (name, value) in [
            ("stroke_width", self.stroke_width),
            ("tick_length", self.tick_length),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a positive number"));
            }
        }
        let colours = std::iter::once(&self.stroke).chain(self.background.as_ref());
        for colour in colours {
            if colour.is_empty() || colour.contains(['<', '>', '"', '\'', '&']) {
                return Err(format!("invalid colour '{colour}'"));
            }
        }
        Ok(())
    }

    /// Map a unit-square coordinate onto the canvas.
    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        let span = self.size as f64 - 2.0 * self.padding;
        (self.padding + x * span, self.padding + y * span)
    }
}

/// Render `package` as an SVG document with the package embedded.
///
/// 3D paths are projected orthographically onto the XY plane. Repeat
/// ticks at one vertex are fanned out along the direction of travel.
///
/// # Errors
///
/// Returns `PackageError::Malformed` if the package cannot be serialized.
pub fn to_svg(package: &GlyphPackage, style: &RenderStyle) -> Result<String, PackageError> {
    let json = to_json(package)?.replace('>', "\\u003e");
    let mut svg = String::with_capacity(json.len() + package.path.len() * 24 + 512);
    render(&mut svg, package, style, &json)
        .map_err(|e| PackageError::Malformed(format!("failed to render SVG: {e}")))?;
    Ok(svg)
}

fn render(svg: &mut String, package: &GlyphPackage, style: &RenderStyle, json: &str) -> fmt::Result {
    let size = style.size;
    let lattice = escape(package.metadata.lattice_key.as_str());
    let events = &package.path.events;

    writeln!(
        svg,
        r#"<svg xmlns="{SVG_NS}" width="{size}" height="{size}" viewBox="0 0 {size} {size}" data-qbc-version="{}" data-qbc-lattice="{lattice}">"#,
        escape(&package.version),
    )?;
    writeln!(svg, "  <title>QBC glyph ({lattice}, {} events)</title>", events.len())?;
    writeln!(svg, r#"  <metadata id="{PACKAGE_ELEMENT_ID}"><![CDATA[{json}]]></metadata>"#)?;

    if let Some(background) = &style.background {
        writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, escape(background))?;
    }

    let stroke = escape(&style.stroke);
    let stroke_width = num(style.stroke_width);

    if events.iter().any(|e| !matches!(e, PathEvent::Tick { .. })) {
        svg.push_str("  <path d=\"");
        write_path_data(svg, package, style)?;
        writeln!(
            svg,
            r#"" fill="none" stroke="{stroke}" stroke-width="{stroke_width}" stroke-linecap="round" stroke-linejoin="round"/>"#
        )?;
    }

    if events.iter().any(|e| matches!(e, PathEvent::Tick { .. })) {
        writeln!(
            svg,
            r#"  <g class="qbc-ticks" stroke="{stroke}" stroke-width="{stroke_width}" stroke-linecap="round">"#
        )?;
        write_ticks(svg, package, style)?;
        writeln!(svg, "  </g>")?;
    }

    if style.start_marker {
        if let Some(first) = events.first() {
            let at = first.coord();
            let (cx, cy) = style.project(at.x, at.y);
            writeln!(
                svg,
                r#"  <circle class="qbc-start" cx="{}" cy="{}" r="{}" fill="{stroke}"/>"#,
                num(cx),
                num(cy),
                num(style.stroke_width * 1.5)
            )?;
        }
    }

    writeln!(svg, "</svg>")
}

fn write_path_data(svg: &mut String, package: &GlyphPackage, style: &RenderStyle) -> fmt::Result {
    let mut first = true;
    for event in &package.path.events {
        let command = match event {
            PathEvent::Move { .. } => 'M',
            PathEvent::Line { .. } => 'L',
            PathEvent::Tick { .. } => continue,
        };
        let at = event.coord();
        let (x, y) = style.project(at.x, at.y);
        if !first {
            svg.push(' ');
        }
        first = false;
        write!(svg, "{command}{} {}", num(x), num(y))?;
    }
    Ok(())
}

fn write_ticks(svg: &mut String, package: &GlyphPackage, style: &RenderStyle) -> fmt::Result {
    let half = style.tick_length / 2.0;
    let spacing = style.tick_length * 0.5;
    let mut run = 0u32;

    for event in &package.path.events {
        let PathEvent::Tick { axis, .. } = event else {
            run = 0;
            continue;
        };
        run += 1;

        let at = event.coord();
        let (cx, cy) = style.project(at.x, at.y);
        let across = axis.to_radians();
        // Travel is perpendicular to the tick.
        let along = across - std::f64::consts::FRAC_PI_2;
        let shift = spacing * f64::from(run);
        let (mx, my) = (cx + shift * along.cos(), cy + shift * along.sin());
        let (dx, dy) = (half * across.cos(), half * across.sin());

        writeln!(
            svg,
            r#"    <line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            num(mx - dx),
            num(my - dy),
            num(mx + dx),
            num(my + dy)
        )?;
    }
    Ok(())
}

/// Two decimals, trailing zeros trimmed.
fn num(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Extract the package embedded in an SVG document.
///
/// # Errors
///
/// - `PackageError::NoEmbeddedMetadata` if no non-empty package block exists
/// - `PackageError::Malformed` if the markup is broken, a block is not a
///   valid package, or blocks disagree
/// - `PackageError::UnsupportedVersion` from the embedded package
pub fn from_svg(svg: &str) -> Result<GlyphPackage, PackageError> {
    let blocks: Vec<String> = embedded_blocks(svg)?
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect();

    let Some((first, rest)) = blocks.split_first() else {
        return Err(PackageError::NoEmbeddedMetadata);
    };

    let package = from_json(first)?;
    for other in rest {
        if from_json(other)? != package {
            return Err(PackageError::Malformed(
                "SVG holds conflicting embedded packages".to_string(),
            ));
        }
    }
    if !rest.is_empty() {
        tracing::debug!(blocks = blocks.len(), "identical embedded packages accepted");
    }
    Ok(package)
}

/// Trimmed character data of every package element, in document order.
///
/// Only text and CDATA directly inside the element count; nested elements
/// and comments are skipped.
fn embedded_blocks(svg: &str) -> Result<Vec<String>, PackageError> {
    let mut reader = Reader::from_str(svg);
    let mut blocks = Vec::new();
    // Text of the open package element and the depth of nested elements in it.
    let mut open: Option<String> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event().map_err(invalid_markup)? {
            Event::Start(tag) => {
                if open.is_some() {
                    depth += 1;
                } else if is_package_element(&tag)? {
                    open = Some(String::new());
                    depth = 0;
                }
            }
            Event::Empty(tag) => {
                if open.is_none() && is_package_element(&tag)? {
                    blocks.push(String::new());
                }
            }
            Event::End(_) => {
                if depth > 0 {
                    depth -= 1;
                } else if let Some(text) = open.take() {
                    blocks.push(text.trim().to_string());
                }
            }
            Event::Text(text) if depth == 0 => {
                if let Some(buf) = open.as_mut() {
                    buf.push_str(&text.unescape().map_err(invalid_markup)?);
                }
            }
            Event::CData(data) if depth == 0 => {
                if let Some(buf) = open.as_mut() {
                    buf.push_str(std::str::from_utf8(&data).map_err(invalid_markup)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if open.is_some() {
        return Err(PackageError::Malformed(
            "unterminated embedded package block".to_string(),
        ));
    }
    Ok(blocks)
}

/// `<metadata id="qbc-package">`, under any namespace prefix.
fn is_package_element(tag: &BytesStart<'_>) -> Result<bool, PackageError> {
    if tag.local_name().as_ref() != b"metadata" {
        return Ok(false);
    }
    for attr in tag.attributes() {
        let attr = attr.map_err(invalid_markup)?;
        if attr.key.local_name().as_ref() == b"id" {
            let id = attr.unescape_value().map_err(invalid_markup)?;
            return Ok(id.trim() == PACKAGE_ELEMENT_ID);
        }
    }
    Ok(false)
}

fn invalid_markup(err: impl fmt::Display) -> PackageError {
    PackageError::Malformed(format!("invalid SVG markup: {err}"))
}
