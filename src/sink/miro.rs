use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{FrameRequest, ShapeRequest, Sink, SinkError, TileRequest};

const STICKY_TEXT_ALIGN: &str = "left";

/// Miro REST API v2 client for one board.
pub struct MiroSink {
    client: Client,
    api_base: String,
    board_id: String,
    token: String,
}

impl MiroSink {
    pub fn new(
        api_base: &str,
        board_id: &str,
        token: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, SinkError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| SinkError::Transport {
            target: api_base.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            board_id: board_id.to_string(),
            token: token.to_string(),
        })
    }

    fn endpoint(&self, collection: &str) -> String {
        format!("{}/boards/{}/{}", self.api_base, self.board_id, collection)
    }

    fn post<P: Serialize>(&self, collection: &str, payload: &P) -> Result<String, SinkError> {
        let url = self.endpoint(collection);
        if let Ok(body) = serde_json::to_string(payload) {
            debug!(target: "storymap::sink", url = %url, body = %body, "POST");
        }
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .map_err(|err| SinkError::Transport {
                target: url.clone(),
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|err| SinkError::Transport {
            target: url.clone(),
            message: err.to_string(),
        })?;
        if status.as_u16() >= 400 {
            return Err(SinkError::Http {
                target: url,
                status: status.as_u16(),
                body,
            });
        }
        extract_id(&body).ok_or(SinkError::MissingId { target: url })
    }
}

impl Sink for MiroSink {
    fn create_frame(&mut self, request: &FrameRequest) -> Result<String, SinkError> {
        self.post("frames", &frame_payload(request))
    }

    fn create_shape(&mut self, request: &ShapeRequest) -> Result<String, SinkError> {
        self.post("shapes", &shape_payload(request))
    }

    fn create_tile(&mut self, request: &TileRequest) -> Result<String, SinkError> {
        self.post("sticky_notes", &sticky_payload(request))
    }
}

#[derive(Debug, Serialize)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Serialize)]
struct Geometry {
    width: f32,
    height: f32,
}

#[derive(Debug, Serialize)]
struct FramePayload<'a> {
    data: FrameData<'a>,
    position: Position,
    geometry: Geometry,
}

#[derive(Debug, Serialize)]
struct FrameData<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct ShapePayload<'a> {
    data: ShapeData<'a>,
    position: Position,
    geometry: Geometry,
    style: ShapeStyle,
}

#[derive(Debug, Serialize)]
struct ShapeData<'a> {
    content: &'a str,
    shape: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeStyle {
    // The API takes font sizes as strings.
    font_size: String,
}

#[derive(Debug, Serialize)]
struct StickyPayload<'a> {
    data: StickyData<'a>,
    style: StickyStyle,
    position: Position,
}

#[derive(Debug, Serialize)]
struct StickyData<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StickyStyle {
    fill_color: &'static str,
    text_align: &'static str,
}

fn frame_payload(request: &FrameRequest) -> FramePayload<'_> {
    FramePayload {
        data: FrameData {
            title: &request.title,
        },
        position: Position {
            x: request.x,
            y: request.y,
        },
        geometry: Geometry {
            width: request.width,
            height: request.height,
        },
    }
}

fn shape_payload(request: &ShapeRequest) -> ShapePayload<'_> {
    ShapePayload {
        data: ShapeData {
            content: &request.text,
            shape: request.shape.as_str(),
        },
        position: Position {
            x: request.x,
            y: request.y,
        },
        geometry: Geometry {
            width: request.width,
            height: request.height,
        },
        style: ShapeStyle {
            font_size: request.font_size.to_string(),
        },
    }
}

// Sticky geometry is left to the board; only the fill color is styled.
fn sticky_payload(request: &TileRequest) -> StickyPayload<'_> {
    StickyPayload {
        data: StickyData {
            content: &request.text,
        },
        style: StickyStyle {
            fill_color: request.color.as_str(),
            text_align: STICKY_TEXT_ALIGN,
        },
        position: Position {
            x: request.x,
            y: request.y,
        },
    }
}

fn extract_id(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
