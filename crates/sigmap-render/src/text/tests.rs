use super::*;

/// Fixed-size glyphs: 10px per column, 20px per line, regardless of style.
struct GridMeasurer;

impl TextMeasurer for GridMeasurer {
    fn measure(&self, text: &str, _style: &TextStyle) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f64 * 10.0,
            height: 20.0,
            line_count: 1,
        }
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn short_labels_hit_the_minimum_box() {
    let style = TextStyle::default();
    for shape in [NodeShape::Box, NodeShape::Diamond] {
        let s = measure_label(&GridMeasurer, "ab", shape, &style);
        assert_eq!(s, LabelSize { width: 80.0, height: 40.0 });
    }
}

#[test]
fn box_and_diamond_pad_by_twenty() {
    let style = TextStyle::default();
    let s = measure_label(&GridMeasurer, "update_inventory", NodeShape::Box, &style);
    assert!(approx_eq(s.width, 180.0));
    assert!(approx_eq(s.height, 40.0));
}

#[test]
fn ellipse_pads_more_and_inflates_width() {
    let style = TextStyle::default();
    let s = measure_label(&GridMeasurer, "update_inventory", NodeShape::Ellipse, &style);
    assert!(approx_eq(s.width, (160.0 + 40.0) * 1.15), "width {}", s.width);
    assert!(approx_eq(s.height, 50.0), "height {}", s.height);

    // The 80px floor is applied before the inflation.
    let s = measure_label(&GridMeasurer, "a", NodeShape::Ellipse, &style);
    assert!(approx_eq(s.width, 80.0 * 1.15));
}

#[test]
fn multi_line_labels_use_widest_line_and_summed_height() {
    let style = TextStyle::default();
    let s = measure_label(&GridMeasurer, "Order\n(orders.py)", NodeShape::Box, &style);
    assert!(approx_eq(s.width, 110.0 + 20.0));
    assert!(approx_eq(s.height, 40.0 + 20.0));
}

#[test]
fn deterministic_measurer_counts_display_columns() {
    let m = DeterministicTextMeasurer::default();
    let style = TextStyle {
        font_size: 10.0,
        ..TextStyle::default()
    };
    let ascii = m.measure("abcd", &style);
    assert!(approx_eq(ascii.width, 24.0));
    assert!(approx_eq(ascii.height, 12.0));
    assert_eq!(ascii.line_count, 1);

    let wide = m.measure("信号", &style);
    assert!(approx_eq(wide.width, ascii.width), "two wide chars span four columns");

    let two = m.measure("ab\nabcdef", &style);
    assert!(approx_eq(two.width, 36.0));
    assert!(approx_eq(two.height, 24.0));
    assert_eq!(two.line_count, 2);
}

#[test]
fn shape_follows_node_kind() {
    assert_eq!(NodeShape::for_kind(NodeKind::Origin), NodeShape::Box);
    assert_eq!(NodeShape::for_kind(NodeKind::Event), NodeShape::Diamond);
    assert_eq!(NodeShape::for_kind(NodeKind::Target), NodeShape::Ellipse);
}
