use serde::{Deserialize, Serialize};
use sigmap_core::NodeKind;
use sigmap_core::geom::{Point, Rect, point, rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn to_point(self) -> Point {
        point(self.x, self.y)
    }
}

/// A positioned text box. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A placed node. `(x, y)` is the centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutNode {
    pub fn center(&self) -> Point {
        point(self.x, self.y)
    }
}

/// The dashed box around one origin's nodes. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFrame {
    pub origin: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub title_label: LayoutLabel,
}

impl GroupFrame {
    pub fn rect(&self) -> Rect {
        rect(self.x, self.y, self.width, self.height)
    }
}

/// A straight connector between two node centres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub points: Vec<LayoutPoint>,
}

impl LayoutEdge {
    pub fn start(&self) -> Option<Point> {
        self.points.first().map(|p| p.to_point())
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().map(|p| p.to_point())
    }
}

/// Output of one layout pass. Rebuilt from scratch whenever the record list changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalGraphLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub frames: Vec<GroupFrame>,
    pub bounds: Option<Bounds>,
}

impl SignalGraphLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.frames.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn frame(&self, origin: &str) -> Option<&GroupFrame> {
        self.frames.iter().find(|f| f.origin == origin)
    }
}
