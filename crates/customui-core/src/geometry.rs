use serde::{Deserialize, Serialize};

use crate::markup::Element;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Placement of a widget inside its parent, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reads `geometry="x,y,w,h"`. Absent or malformed leaves it unset.
    pub fn from_attr(el: &Element) -> Option<Self> {
        el.int_list("geometry", 4)
            .map(|g| Geometry::new(g[0], g[1], g[2], g[3]))
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// `"a,b"` pairs such as `size` and `position` on windows.
pub fn pair_attr(el: &Element, name: &str) -> Option<(i32, i32)> {
    el.int_list(name, 2).map(|v| (v[0], v[1]))
}
