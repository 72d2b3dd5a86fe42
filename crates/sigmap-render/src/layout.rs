//! Grouped three-column layout: one frame per origin, stacked top to bottom.
//!
//! Within a frame the origin box sits on the left, the distinct events form the middle column and
//! the distinct targets the right column. Column widths are fixed per group (the widest label of
//! the column), so nodes in one column never jitter horizontally.

use crate::config::LayoutConfig;
use crate::model::{
    Bounds, GroupFrame, LayoutEdge, LayoutLabel, LayoutNode, LayoutPoint, SignalGraphLayout,
};
use crate::text::{LabelSize, NodeShape, TextMeasurer, measure_label};
use sigmap_core::{Group, NodeKind, RelationshipRecord, group_records};

pub fn node_id(group_index: usize, kind: NodeKind, label: &str) -> String {
    format!("{group_index}:{kind}:{label}")
}

fn column_width(sizes: &[LabelSize]) -> f64 {
    sizes.iter().map(|s| s.width).fold(0.0, f64::max)
}

struct GroupPlacement {
    top: f64,
    height: f64,
    x_origin: f64,
    x_event: f64,
    x_target: f64,
    target_width: f64,
}

fn layout_group(
    group_index: usize,
    group: &Group<'_>,
    top: f64,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
    out: &mut SignalGraphLayout,
) -> GroupPlacement {
    let events = group.events();
    let targets = group.targets();

    let tier_count = events.len().max(targets.len()).max(1);
    let height = tier_count as f64 * config.node_spacing + config.group_padding;

    let origin_size = measure_label(measurer, group.origin, NodeShape::Box, &config.font);
    let event_sizes: Vec<LabelSize> = events
        .iter()
        .map(|e| measure_label(measurer, e, NodeShape::Diamond, &config.font))
        .collect();
    let target_sizes: Vec<LabelSize> = targets
        .iter()
        .map(|t| measure_label(measurer, t, NodeShape::Ellipse, &config.font))
        .collect();
    let event_width = column_width(&event_sizes);
    let target_width = column_width(&target_sizes);

    let x_origin = config.origin_x + origin_size.width / 2.0;
    let x_event = x_origin + origin_size.width / 2.0 + config.column_gap + event_width / 2.0;
    let x_target = x_event + event_width / 2.0 + config.column_gap + target_width / 2.0;
    let row_y = |i: usize| top + config.tier_offset + i as f64 * config.node_spacing;

    let origin_id = node_id(group_index, NodeKind::Origin, group.origin);
    let origin_center = LayoutPoint {
        x: x_origin,
        y: top + height / 2.0,
    };
    out.nodes.push(LayoutNode {
        id: origin_id.clone(),
        kind: NodeKind::Origin,
        label: group.origin.to_string(),
        x: origin_center.x,
        y: origin_center.y,
        width: origin_size.width,
        height: origin_size.height,
    });

    let mut event_nodes: Vec<(String, LayoutPoint)> = Vec::with_capacity(events.len());
    for (i, (event, size)) in events.iter().zip(&event_sizes).enumerate() {
        let id = node_id(group_index, NodeKind::Event, event);
        let center = LayoutPoint {
            x: x_event,
            y: row_y(i),
        };
        out.nodes.push(LayoutNode {
            id: id.clone(),
            kind: NodeKind::Event,
            label: event.to_string(),
            x: center.x,
            y: center.y,
            width: event_width,
            height: size.height,
        });
        event_nodes.push((id, center));
    }

    let mut target_nodes: Vec<(String, LayoutPoint)> = Vec::with_capacity(targets.len());
    for (i, (target, size)) in targets.iter().zip(&target_sizes).enumerate() {
        let id = node_id(group_index, NodeKind::Target, target);
        let center = LayoutPoint {
            x: x_target,
            y: row_y(i),
        };
        out.nodes.push(LayoutNode {
            id: id.clone(),
            kind: NodeKind::Target,
            label: target.to_string(),
            x: center.x,
            y: center.y,
            width: target_width,
            height: size.height,
        });
        target_nodes.push((id, center));
    }

    for record in &group.records {
        let Some((event_id, event_center)) = events
            .get_index_of(record.event.as_str())
            .and_then(|i| event_nodes.get(i))
        else {
            continue;
        };
        let Some((target_id, target_center)) = targets
            .get_index_of(record.target.as_str())
            .and_then(|i| target_nodes.get(i))
        else {
            continue;
        };
        push_edge(out, &origin_id, origin_center, event_id, *event_center);
        push_edge(out, event_id, *event_center, target_id, *target_center);
    }

    GroupPlacement {
        top,
        height,
        x_origin,
        x_event,
        x_target,
        target_width,
    }
}

fn push_edge(
    out: &mut SignalGraphLayout,
    from: &str,
    start: LayoutPoint,
    to: &str,
    end: LayoutPoint,
) {
    let id = format!("e{}", out.edges.len());
    out.edges.push(LayoutEdge {
        id,
        from: from.to_string(),
        to: to.to_string(),
        points: vec![start, end],
    });
}

fn group_frame(
    origin: &str,
    placement: &GroupPlacement,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> GroupFrame {
    let left = config.origin_x - config.frame_margin;
    let right = placement.x_target + placement.target_width / 2.0 + config.frame_margin;
    let caption = measurer.measure(origin, &config.font);
    GroupFrame {
        origin: origin.to_string(),
        x: left,
        y: placement.top,
        width: right - left,
        height: placement.height,
        title_label: LayoutLabel {
            text: origin.to_string(),
            x: left + config.caption_dx,
            y: placement.top + config.caption_dy,
            width: caption.width,
            height: caption.height,
        },
    }
}

fn layout_bounds(frames: &[GroupFrame]) -> Option<Bounds> {
    Bounds::from_points(frames.iter().flat_map(|f| {
        let l = &f.title_label;
        [
            (f.x, f.y),
            (f.x + f.width, f.y + f.height),
            (l.x, l.y),
            (l.x + l.width, l.y + l.height),
        ]
    }))
}

/// Lays out `records` grouped by origin.
///
/// Pure and total: the result depends only on the record order, `config` and `measurer`, and an
/// empty input yields an empty layout.
pub fn layout_records(
    records: &[RelationshipRecord],
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> SignalGraphLayout {
    let mut out = SignalGraphLayout::default();
    let mut top = config.start_y;

    for (group_index, group) in group_records(records).iter().enumerate() {
        let placement = layout_group(group_index, group, top, config, measurer, &mut out);
        tracing::debug!(
            origin = group.origin,
            records = group.records.len(),
            top = placement.top,
            height = placement.height,
            x_origin = placement.x_origin,
            x_event = placement.x_event,
            x_target = placement.x_target,
            "laid out group"
        );
        out.frames
            .push(group_frame(group.origin, &placement, config, measurer));
        top += placement.height + config.group_gap;
    }

    out.bounds = layout_bounds(&out.frames);
    out
}
