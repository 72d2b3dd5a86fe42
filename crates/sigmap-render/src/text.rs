use serde::{Deserialize, Serialize};
use sigmap_core::NodeKind;
use unicode_width::UnicodeWidthStr;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        // 12pt bold, the label font of the desktop viewer.
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: Some("bold".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

/// Stateless text measurement. Implementations must not keep anything from one call to the next.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-free measurer: every display column is `font_size * char_width_factor` wide and every line
/// is `font_size * line_height_factor` tall. Wide (CJK) characters count as two columns.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn text_lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::text_lines(text);
        let font_size = style.font_size.max(1.0);
        let max_cols = lines
            .iter()
            .map(|line| UnicodeWidthStr::width(*line))
            .max()
            .unwrap_or(0);

        TextMetrics {
            width: max_cols as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * font_size * line_height_factor,
            line_count: lines.len(),
        }
    }
}

/// How a node is drawn; also selects the label padding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Box,
    Diamond,
    Ellipse,
}

impl NodeShape {
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Origin => NodeShape::Box,
            NodeKind::Event => NodeShape::Diamond,
            NodeKind::Target => NodeShape::Ellipse,
        }
    }
}

pub const LABEL_PAD_X: f64 = 20.0;
pub const LABEL_PAD_Y: f64 = 20.0;
pub const ELLIPSE_EXTRA_PAD_X: f64 = 20.0;
pub const ELLIPSE_EXTRA_PAD_Y: f64 = 10.0;
pub const ELLIPSE_WIDTH_INFLATION: f64 = 1.15;
pub const MIN_NODE_WIDTH: f64 = 80.0;
pub const MIN_NODE_HEIGHT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSize {
    pub width: f64,
    pub height: f64,
}

/// Measures a node label under the padding rule of `shape`.
///
/// Each `\n`-separated line is measured on its own; the text box is the widest line by the sum of
/// the line heights. Ellipses get extra padding and their width is inflated so the text clears the
/// curve; the 80x40 floor applies before inflation.
pub fn measure_label(
    measurer: &dyn TextMeasurer,
    label: &str,
    shape: NodeShape,
    style: &TextStyle,
) -> LabelSize {
    let mut text_width = 0.0f64;
    let mut text_height = 0.0f64;
    for line in label.split('\n') {
        let m = measurer.measure(line, style);
        text_width = text_width.max(m.width);
        text_height += m.height;
    }

    match shape {
        NodeShape::Box | NodeShape::Diamond => LabelSize {
            width: (text_width + LABEL_PAD_X).max(MIN_NODE_WIDTH),
            height: (text_height + LABEL_PAD_Y).max(MIN_NODE_HEIGHT),
        },
        NodeShape::Ellipse => LabelSize {
            width: (text_width + LABEL_PAD_X + ELLIPSE_EXTRA_PAD_X).max(MIN_NODE_WIDTH)
                * ELLIPSE_WIDTH_INFLATION,
            height: (text_height + LABEL_PAD_Y + ELLIPSE_EXTRA_PAD_Y).max(MIN_NODE_HEIGHT),
        },
    }
}
