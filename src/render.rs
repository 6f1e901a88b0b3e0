use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{DispatchConfig, FailurePolicy};
use crate::layout::{ElementKind, PlacedElement};
use crate::sink::{FrameRequest, ShapeRequest, Sink, SinkError, TileRequest};

const PREVIEW_TEXT_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedElement {
    pub index: usize,
    pub kind: ElementKind,
    pub id: String,
}

#[derive(Debug)]
pub struct FailedElement {
    pub index: usize,
    pub kind: ElementKind,
    pub error: SinkError,
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub created: Vec<CreatedElement>,
    pub failures: Vec<FailedElement>,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.created.iter().map(|created| created.id.as_str()).collect()
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "{} #{index} failed after {} element(s) were created: {source}",
        .kind.as_str(),
        .partial.created.len()
    )]
    Aborted {
        index: usize,
        kind: ElementKind,
        #[source]
        source: SinkError,
        partial: Box<DispatchReport>,
    },
}

/// Walks placed elements in layout order, one sink call at a time.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// One description line per element; the sink is never touched.
    pub fn preview(&self, elements: &[PlacedElement]) -> Vec<String> {
        elements.iter().map(describe).collect()
    }

    pub fn apply<S: Sink>(
        &self,
        elements: &[PlacedElement],
        sink: &mut S,
    ) -> Result<DispatchReport, DispatchError> {
        let mut report = DispatchReport::default();
        for (index, element) in elements.iter().enumerate() {
            let kind = element.kind();
            match create(element, sink) {
                Ok(id) => {
                    log_created(element, &id);
                    report.created.push(CreatedElement { index, kind, id });
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(DispatchError::Aborted {
                            index,
                            kind,
                            source: error,
                            partial: Box::new(report),
                        });
                    }
                    FailurePolicy::Continue => {
                        warn!(index, kind = kind.as_str(), error = %error, "element creation failed");
                        report.failures.push(FailedElement { index, kind, error });
                    }
                },
            }
            self.pause(kind);
        }
        Ok(report)
    }

    fn pause(&self, kind: ElementKind) {
        let delay = match kind {
            ElementKind::Frame => self.config.frame_delay(),
            ElementKind::LaneTitle => self.config.lane_delay(),
            ElementKind::Tile => self.config.tile_delay(),
        };
        if delay > Duration::ZERO {
            std::thread::sleep(delay);
        }
    }
}

fn create<S: Sink>(element: &PlacedElement, sink: &mut S) -> Result<String, SinkError> {
    match element {
        PlacedElement::Frame(frame) => sink.create_frame(&FrameRequest::from(frame)),
        PlacedElement::LaneTitle(lane) => sink.create_shape(&ShapeRequest::from(lane)),
        PlacedElement::Tile(tile) => sink.create_tile(&TileRequest::from(tile)),
    }
}

fn log_created(element: &PlacedElement, id: &str) {
    match element {
        PlacedElement::Frame(frame) => info!(id, title = %frame.title, "frame created"),
        PlacedElement::LaneTitle(lane) => info!(id, title = %lane.title, "lane title created"),
        PlacedElement::Tile(tile) => {
            info!(id, text = %truncate_chars(&tile.text, 60), "sticky note created")
        }
    }
}

/// Coordinates print through `f32` `Display`, so whole values have no trailing `.0`.
pub fn describe(element: &PlacedElement) -> String {
    let bounds = element.bounds();
    match element {
        PlacedElement::Frame(frame) => {
            format!("[DRY] Frame '{}' @ ({},{})", frame.title, bounds.x, bounds.y)
        }
        PlacedElement::LaneTitle(lane) => {
            format!("[DRY] Lane '{}' title @ ({},{})", lane.title, bounds.x, bounds.y)
        }
        PlacedElement::Tile(tile) => format!(
            "[DRY] Sticky '{}...' @ ({},{}) color={}",
            truncate_chars(&tile.text, PREVIEW_TEXT_CHARS),
            bounds.x,
            bounds.y,
            tile.color
        ),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
