use serde::Serialize;

use crate::style::ColorToken;

/// Center point and size on the board; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameElement {
    pub theme_index: usize,
    pub title: String,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    RoundRectangle,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RoundRectangle => "round_rectangle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneTitleElement {
    pub theme_index: usize,
    pub lane_index: usize,
    pub title: String,
    pub shape: ShapeKind,
    pub font_size: u32,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileElement {
    pub theme_index: usize,
    pub lane_index: usize,
    pub story_index: usize,
    pub text: String,
    pub color: ColorToken,
    pub marker: &'static str,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Frame,
    LaneTitle,
    Tile,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frame => "frame",
            Self::LaneTitle => "lane_title",
            Self::Tile => "tile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacedElement {
    Frame(FrameElement),
    LaneTitle(LaneTitleElement),
    Tile(TileElement),
}

impl PlacedElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Frame(_) => ElementKind::Frame,
            Self::LaneTitle(_) => ElementKind::LaneTitle,
            Self::Tile(_) => ElementKind::Tile,
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Frame(frame) => frame.bounds,
            Self::LaneTitle(lane) => lane.bounds,
            Self::Tile(tile) => tile.bounds,
        }
    }
}
