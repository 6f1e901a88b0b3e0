#[cfg(feature = "http")]
mod miro;

#[cfg(feature = "http")]
pub use miro::MiroSink;

use serde::Serialize;
use thiserror::Error;

use crate::layout::{FrameElement, LaneTitleElement, ShapeKind, TileElement};
use crate::style::ColorToken;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRequest {
    pub title: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<&FrameElement> for FrameRequest {
    fn from(frame: &FrameElement) -> Self {
        Self {
            title: frame.title.clone(),
            x: frame.bounds.x,
            y: frame.bounds.y,
            width: frame.bounds.width,
            height: frame.bounds.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeRequest {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub shape: ShapeKind,
    pub font_size: u32,
}

impl From<&LaneTitleElement> for ShapeRequest {
    fn from(lane: &LaneTitleElement) -> Self {
        Self {
            text: lane.title.clone(),
            x: lane.bounds.x,
            y: lane.bounds.y,
            width: lane.bounds.width,
            height: lane.bounds.height,
            shape: lane.shape,
            font_size: lane.font_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileRequest {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: ColorToken,
    pub width: f32,
    pub height: f32,
}

impl From<&TileElement> for TileRequest {
    fn from(tile: &TileElement) -> Self {
        Self {
            text: tile.text.clone(),
            x: tile.bounds.x,
            y: tile.bounds.y,
            color: tile.color,
            width: tile.bounds.width,
            height: tile.bounds.height,
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("POST {target} failed: {status} {body}")]
    Http {
        target: String,
        status: u16,
        body: String,
    },
    #[error("POST {target} returned no item id")]
    MissingId { target: String },
    #[error("request to {target} failed: {message}")]
    Transport { target: String, message: String },
}

/// Whiteboard that materializes placed elements and hands back their ids.
pub trait Sink {
    fn create_frame(&mut self, request: &FrameRequest) -> Result<String, SinkError>;
    fn create_shape(&mut self, request: &ShapeRequest) -> Result<String, SinkError>;
    fn create_tile(&mut self, request: &TileRequest) -> Result<String, SinkError>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn create_frame(&mut self, request: &FrameRequest) -> Result<String, SinkError> {
        (**self).create_frame(request)
    }

    fn create_shape(&mut self, request: &ShapeRequest) -> Result<String, SinkError> {
        (**self).create_shape(request)
    }

    fn create_tile(&mut self, request: &TileRequest) -> Result<String, SinkError> {
        (**self).create_tile(request)
    }
}
