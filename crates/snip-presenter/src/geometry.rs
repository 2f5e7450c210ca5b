//! Badge anchoring math

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn intersects(&self, other: Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn bounds(&self) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
    }
}

/// Anchor a box near the top-right corner of the target's bounding rect,
/// clamped so it stays fully inside the viewport.
pub fn anchor_near(target: Rect, size: Size, viewport: Viewport) -> Point {
    let x = target.x + target.width - size.width;
    let y = target.y - size.height - 4.0;
    Point {
        x: x.clamp(0.0, (viewport.width - size.width).max(0.0)),
        y: y.clamp(0.0, (viewport.height - size.height).max(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        let a = Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let b = Rect {
            x: 5.0,
            y: 5.0,
            width: 10.0,
            height: 10.0,
        };
        let c = Rect {
            x: 20.0,
            y: 20.0,
            width: 5.0,
            height: 5.0,
        };
        assert!(a.intersects(b));
        assert!(!a.intersects(c));
    }

    #[test]
    fn test_anchor_above_target() {
        let target = Rect {
            x: 100.0,
            y: 200.0,
            width: 300.0,
            height: 40.0,
        };
        let size = Size {
            width: 120.0,
            height: 28.0,
        };
        let viewport = Viewport {
            width: 800.0,
            height: 600.0,
        };
        let p = anchor_near(target, size, viewport);
        assert_eq!(p.x, 280.0);
        assert_eq!(p.y, 200.0 - 28.0 - 4.0);
    }

    #[test]
    fn test_anchor_clamps_at_edges() {
        let target = Rect {
            x: -50.0,
            y: -50.0,
            width: 60.0,
            height: 20.0,
        };
        let size = Size {
            width: 120.0,
            height: 28.0,
        };
        let viewport = Viewport {
            width: 800.0,
            height: 600.0,
        };
        let p = anchor_near(target, size, viewport);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 0.0);
    }
}
