use crate::text::TextStyle;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Geometry constants of the grouped three-column layout.
///
/// Defaults reproduce the desktop viewer. Overrides come from a JSON object:
///
/// ```json
/// { "layout": { "nodeSpacing": 80, "columnGap": 40 }, "font": { "size": 14 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Left edge of every origin column.
    pub origin_x: f64,
    /// Top of the first group.
    pub start_y: f64,
    /// Vertical distance between consecutive event (or target) nodes.
    pub node_spacing: f64,
    /// Extra height added to `tiers * node_spacing` for each group.
    pub group_padding: f64,
    /// Horizontal gap between adjacent columns' node edges.
    pub column_gap: f64,
    /// Offset from the group top to the first event/target row.
    pub tier_offset: f64,
    /// Horizontal distance between the outer columns and the frame border.
    pub frame_margin: f64,
    /// Vertical gap between consecutive groups.
    pub group_gap: f64,
    /// Frame caption position relative to the frame's top-left corner.
    pub caption_dx: f64,
    pub caption_dy: f64,
    pub font: TextStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            start_y: 100.0,
            node_spacing: 70.0,
            group_padding: 60.0,
            column_gap: 60.0,
            tier_offset: 40.0,
            frame_margin: 60.0,
            group_gap: 60.0,
            caption_dx: 10.0,
            caption_dy: -30.0,
            font: TextStyle::default(),
        }
    }
}

fn lookup<'a>(cfg: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = cfg;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

fn config_f64(cfg: &Value, path: &[&str]) -> Result<Option<f64>> {
    let Some(v) = lookup(cfg, path) else {
        return Ok(None);
    };
    let n = v
        .as_f64()
        .or_else(|| v.as_i64().map(|n| n as f64))
        .or_else(|| v.as_u64().map(|n| n as f64));
    match n {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(Error::InvalidConfig {
            message: format!("`{}` must be a finite number", path.join(".")),
        }),
    }
}

fn config_string(cfg: &Value, path: &[&str]) -> Result<Option<String>> {
    let Some(v) = lookup(cfg, path) else {
        return Ok(None);
    };
    match v {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Null => Ok(None),
        _ => Err(Error::InvalidConfig {
            message: format!("`{}` must be a string", path.join(".")),
        }),
    }
}

fn positive(path: &str, v: f64) -> Result<()> {
    if v > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            message: format!("`{path}` must be greater than zero"),
        })
    }
}

fn non_negative(path: &str, v: f64) -> Result<()> {
    if v >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            message: format!("`{path}` must not be negative"),
        })
    }
}

impl LayoutConfig {
    /// Applies overrides from `value` on top of the defaults. Unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.merge_value(value)?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Applies overrides from `value`. On error `self` is left untouched.
    pub fn merge_value(&mut self, value: &Value) -> Result<()> {
        if !value.is_object() {
            return Err(Error::InvalidConfig {
                message: "layout config must be a JSON object".to_string(),
            });
        }

        let mut next = self.clone();
        let fields: [(&str, &mut f64); 10] = [
            ("originX", &mut next.origin_x),
            ("startY", &mut next.start_y),
            ("nodeSpacing", &mut next.node_spacing),
            ("groupPadding", &mut next.group_padding),
            ("columnGap", &mut next.column_gap),
            ("tierOffset", &mut next.tier_offset),
            ("frameMargin", &mut next.frame_margin),
            ("groupGap", &mut next.group_gap),
            ("captionDx", &mut next.caption_dx),
            ("captionDy", &mut next.caption_dy),
        ];
        for (key, slot) in fields {
            if let Some(v) = config_f64(value, &["layout", key])? {
                *slot = v;
            }
        }

        if let Some(size) = config_f64(value, &["font", "size"])? {
            next.font.font_size = size;
        }
        if let Some(family) = config_string(value, &["font", "family"])? {
            next.font.font_family = Some(family);
        }
        if let Some(weight) = config_string(value, &["font", "weight"])? {
            next.font.font_weight = Some(weight);
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Rejects values that would reorder columns or push nodes out of their frame.
    pub fn validate(&self) -> Result<()> {
        positive("layout.nodeSpacing", self.node_spacing)?;
        positive("font.size", self.font.font_size)?;
        for (path, v) in [
            ("layout.groupPadding", self.group_padding),
            ("layout.columnGap", self.column_gap),
            ("layout.tierOffset", self.tier_offset),
            ("layout.frameMargin", self.frame_margin),
            ("layout.groupGap", self.group_gap),
        ] {
            non_negative(path, v)?;
        }
        if self.tier_offset > self.node_spacing + self.group_padding {
            return Err(Error::InvalidConfig {
                message: "`layout.tierOffset` must not exceed `layout.nodeSpacing + layout.groupPadding`"
                    .to_string(),
            });
        }
        Ok(())
    }
}
