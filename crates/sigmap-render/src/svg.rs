//! Static SVG view of a [`SignalGraphLayout`]: frames, edges, then nodes with their labels.

use crate::highlight::{ElementId, FULL_OPACITY, Highlight};
use crate::model::{Bounds, LayoutNode, SignalGraphLayout};
use crate::text::{NodeShape, TextStyle};
use std::fmt::Write as _;

const ORIGIN_FILL: &str = "#e0f7fa";
const EVENT_FILL: &str = "#c8e6c9";
const TARGET_FILL: &str = "#ffe0b2";
const EDGE_STROKE: &str = "rgb(120,160,255)";
const FRAME_STROKE: &str = "#a0a0a4";
const FRAME_FILL: &str = "rgba(240,240,255,0.235)";
const CAPTION_FILL: &str = "rgb(80,100,180)";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Adds extra space around the computed viewBox.
    pub viewbox_padding: f64,
    /// Root `<svg id="...">`.
    pub diagram_id: Option<String>,
    pub font: TextStyle,
    /// Text shown when there is nothing to draw.
    pub empty_message: String,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 8.0,
            diagram_id: None,
            font: TextStyle::default(),
            empty_message: "No signals found".to_string(),
        }
    }
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form without `-0` or tiny float noise.
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn opacity_attr(highlight: Option<&Highlight>, id: ElementId) -> String {
    let opacity = highlight.map_or(FULL_OPACITY, |h| h.opacity(&id));
    if (opacity - FULL_OPACITY).abs() < 1e-9 {
        String::new()
    } else {
        format!(r#" opacity="{}""#, fmt(opacity))
    }
}

fn font_attrs(font: &TextStyle) -> String {
    let mut out = format!(r#" font-size="{}""#, fmt(font.font_size));
    if let Some(family) = font.font_family.as_deref() {
        let _ = write!(&mut out, r#" font-family="{}""#, escape_xml(family));
    }
    if let Some(weight) = font.font_weight.as_deref() {
        let _ = write!(&mut out, r#" font-weight="{}""#, escape_xml(weight));
    }
    out
}

/// Centred multi-line text; one `<tspan>` per line.
fn write_centered_text(out: &mut String, cx: f64, cy: f64, text: &str, font: &TextStyle) {
    let lines: Vec<&str> = text.split('\n').collect();
    let line_height = font.font_size * 1.2;
    let first_y = cy - line_height * (lines.len() as f64 - 1.0) / 2.0;
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" fill="black"{}>"#,
        fmt(cx),
        fmt(first_y),
        font_attrs(font)
    );
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            let _ = write!(out, "<tspan x=\"{}\">{}</tspan>", fmt(cx), escape_xml(line));
        } else {
            let _ = write!(
                out,
                "<tspan x=\"{}\" dy=\"{}\">{}</tspan>",
                fmt(cx),
                fmt(line_height),
                escape_xml(line)
            );
        }
    }
    out.push_str("</text>");
}

fn write_node_shape(out: &mut String, node: &LayoutNode, opacity: &str) {
    let (x, y, w, h) = (node.x, node.y, node.width, node.height);
    match NodeShape::for_kind(node.kind) {
        NodeShape::Box => {
            let _ = write!(
                out,
                r#"<rect class="node origin" x="{}" y="{}" width="{}" height="{}" fill="{ORIGIN_FILL}" stroke="black"{opacity}/>"#,
                fmt(x - w / 2.0),
                fmt(y - h / 2.0),
                fmt(w),
                fmt(h)
            );
        }
        NodeShape::Diamond => {
            let _ = write!(
                out,
                r#"<polygon class="node event" points="{},{} {},{} {},{} {},{}" fill="{EVENT_FILL}" stroke="black"{opacity}/>"#,
                fmt(x),
                fmt(y - h / 2.0),
                fmt(x + w / 2.0),
                fmt(y),
                fmt(x),
                fmt(y + h / 2.0),
                fmt(x - w / 2.0),
                fmt(y)
            );
        }
        NodeShape::Ellipse => {
            let _ = write!(
                out,
                r#"<ellipse class="node target" cx="{}" cy="{}" rx="{}" ry="{}" fill="{TARGET_FILL}" stroke="black"{opacity}/>"#,
                fmt(x),
                fmt(y),
                fmt(w / 2.0),
                fmt(h / 2.0)
            );
        }
    }
}

/// Renders `layout`, applying `highlight` opacities when given.
///
/// An empty layout renders a small placeholder with `options.empty_message`.
pub fn render_svg(
    layout: &SignalGraphLayout,
    highlight: Option<&Highlight>,
    options: &SvgRenderOptions,
) -> String {
    let pad = options.viewbox_padding.max(0.0);
    let bounds = layout.bounds.clone().unwrap_or(Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 240.0,
        max_y: 40.0,
    });
    let (vb_x, vb_y) = (bounds.min_x - pad, bounds.min_y - pad);
    let (vb_w, vb_h) = (
        (bounds.width() + pad * 2.0).max(1.0),
        (bounds.height() + pad * 2.0).max(1.0),
    );

    let diagram_id = escape_xml(options.diagram_id.as_deref().unwrap_or("sigmap"));
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{diagram_id}" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        fmt(vb_w),
        fmt(vb_h),
        fmt(vb_x),
        fmt(vb_y),
        fmt(vb_w),
        fmt(vb_h)
    );

    if layout.is_empty() {
        write_centered_text(
            &mut out,
            bounds.min_x + bounds.width() / 2.0,
            bounds.min_y + bounds.height() / 2.0,
            &options.empty_message,
            &options.font,
        );
        out.push_str("</svg>");
        return out;
    }

    out.push_str(r#"<g class="frames">"#);
    for frame in &layout.frames {
        let opacity = opacity_attr(highlight, ElementId::Frame(frame.origin.clone()));
        let _ = write!(
            &mut out,
            r#"<rect class="frame" data-origin="{}" x="{}" y="{}" width="{}" height="{}" fill="{FRAME_FILL}" stroke="{FRAME_STROKE}" stroke-width="2" stroke-dasharray="6,4"{opacity}/>"#,
            escape_xml(&frame.origin),
            fmt(frame.x),
            fmt(frame.y),
            fmt(frame.width),
            fmt(frame.height)
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="edges">"#);
    for edge in &layout.edges {
        let (Some(start), Some(end)) = (edge.start(), edge.end()) else {
            continue;
        };
        let opacity = opacity_attr(highlight, ElementId::Edge(edge.id.clone()));
        let _ = write!(
            &mut out,
            r#"<line class="edge" id="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{EDGE_STROKE}" stroke-width="2"{opacity}/>"#,
            escape_xml(&edge.id),
            fmt(start.x),
            fmt(start.y),
            fmt(end.x),
            fmt(end.y)
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for node in &layout.nodes {
        let opacity = opacity_attr(highlight, ElementId::Node(node.id.clone()));
        let _ = write!(
            &mut out,
            r#"<g class="node" data-id="{}"{opacity}>"#,
            escape_xml(&node.id)
        );
        write_node_shape(&mut out, node, "");
        write_centered_text(&mut out, node.x, node.y, &node.label, &options.font);
        out.push_str("</g>");
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="captions">"#);
    for frame in &layout.frames {
        let label = &frame.title_label;
        let opacity = opacity_attr(highlight, ElementId::FrameLabel(frame.origin.clone()));
        let _ = write!(
            &mut out,
            r#"<text class="caption" x="{}" y="{}" dominant-baseline="hanging" fill="{CAPTION_FILL}"{}{opacity}>{}</text>"#,
            fmt(label.x),
            fmt(label.y),
            font_attrs(&options.font),
            escape_xml(&label.text)
        );
    }
    out.push_str("</g>");

    out.push_str("</svg>");
    out
}
