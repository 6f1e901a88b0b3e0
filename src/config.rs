use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.miro.com/v2";
pub const DEFAULT_TITLE_PREFIX: &str = "R4";

/// Geometry constants for the story-map grid, in board pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub origin_x: f32,
    pub origin_y: f32,
    pub frame_width: f32,
    pub frame_height: f32,
    pub column_gap: f32,
    pub title_height: f32,
    pub lane_height: f32,
    pub lane_title_inset_x: f32,
    pub lane_title_inset_y: f32,
    pub lane_title_width: f32,
    pub lane_title_height: f32,
    pub lane_title_font_size: u32,
    pub tile_inset_x: f32,
    pub tile_width: f32,
    pub tile_height: f32,
    pub tile_gap_x: f32,
    pub tile_gap_y: f32,
    pub grid_columns: usize,
    pub title_prefix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: -2000.0,
            origin_y: -1000.0,
            frame_width: 1800.0,
            frame_height: 1400.0,
            column_gap: 300.0,
            title_height: 100.0,
            lane_height: 260.0,
            lane_title_inset_x: 200.0,
            lane_title_inset_y: 30.0,
            lane_title_width: 600.0,
            lane_title_height: 60.0,
            lane_title_font_size: 28,
            tile_inset_x: 300.0,
            tile_width: 220.0,
            tile_height: 140.0,
            tile_gap_x: 40.0,
            tile_gap_y: 30.0,
            grid_columns: 4,
            title_prefix: DEFAULT_TITLE_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first sink failure.
    #[default]
    Abort,
    /// Record the failure and move on to the next element.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub frame_delay_ms: u64,
    pub lane_delay_ms: u64,
    pub tile_delay_ms: u64,
    pub failure_policy: FailurePolicy,
    pub request_timeout_secs: Option<u64>,
    pub api_base: String,
}

impl DispatchConfig {
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    pub fn lane_delay(&self) -> Duration {
        Duration::from_millis(self.lane_delay_ms)
    }

    pub fn tile_delay(&self) -> Duration {
        Duration::from_millis(self.tile_delay_ms)
    }

    /// Same settings with every post-call delay removed.
    pub fn without_delays(mut self) -> Self {
        self.frame_delay_ms = 0;
        self.lane_delay_ms = 0;
        self.tile_delay_ms = 0;
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            frame_delay_ms: 200,
            lane_delay_ms: 150,
            tile_delay_ms: 120,
            failure_policy: FailurePolicy::Abort,
            request_timeout_secs: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    origin_x: Option<f32>,
    origin_y: Option<f32>,
    frame_width: Option<f32>,
    frame_height: Option<f32>,
    column_gap: Option<f32>,
    title_height: Option<f32>,
    lane_height: Option<f32>,
    lane_title_inset_x: Option<f32>,
    lane_title_inset_y: Option<f32>,
    lane_title_width: Option<f32>,
    lane_title_height: Option<f32>,
    lane_title_font_size: Option<u32>,
    tile_inset_x: Option<f32>,
    tile_width: Option<f32>,
    tile_height: Option<f32>,
    tile_gap_x: Option<f32>,
    tile_gap_y: Option<f32>,
    grid_columns: Option<usize>,
    title_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DispatchConfigFile {
    frame_delay_ms: Option<u64>,
    lane_delay_ms: Option<u64>,
    tile_delay_ms: Option<u64>,
    failure_policy: Option<FailurePolicy>,
    request_timeout_secs: Option<u64>,
    api_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    dispatch: Option<DispatchConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_config_file(&contents).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    if let Some(vars) = parsed.layout {
        apply_layout_overrides(&mut config.layout, vars);
    }
    if let Some(vars) = parsed.dispatch {
        apply_dispatch_overrides(&mut config.dispatch, vars);
    }
    Ok(config)
}

// Strict JSON first; JSON5 allows comments and trailing commas in hand-written files.
fn parse_config_file(contents: &str) -> Result<ConfigFile, String> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        Err(json_err) => json5::from_str::<ConfigFile>(contents)
            .map_err(|json5_err| format!("{json_err} (json5: {json5_err})")),
    }
}

fn apply_layout_overrides(layout: &mut LayoutConfig, vars: LayoutConfigFile) {
    if let Some(v) = vars.origin_x {
        layout.origin_x = v;
    }
    if let Some(v) = vars.origin_y {
        layout.origin_y = v;
    }
    if let Some(v) = vars.frame_width {
        layout.frame_width = v;
    }
    if let Some(v) = vars.frame_height {
        layout.frame_height = v;
    }
    if let Some(v) = vars.column_gap {
        layout.column_gap = v;
    }
    if let Some(v) = vars.title_height {
        layout.title_height = v;
    }
    if let Some(v) = vars.lane_height {
        layout.lane_height = v;
    }
    if let Some(v) = vars.lane_title_inset_x {
        layout.lane_title_inset_x = v;
    }
    if let Some(v) = vars.lane_title_inset_y {
        layout.lane_title_inset_y = v;
    }
    if let Some(v) = vars.lane_title_width {
        layout.lane_title_width = v;
    }
    if let Some(v) = vars.lane_title_height {
        layout.lane_title_height = v;
    }
    if let Some(v) = vars.lane_title_font_size {
        layout.lane_title_font_size = v;
    }
    if let Some(v) = vars.tile_inset_x {
        layout.tile_inset_x = v;
    }
    if let Some(v) = vars.tile_width {
        layout.tile_width = v;
    }
    if let Some(v) = vars.tile_height {
        layout.tile_height = v;
    }
    if let Some(v) = vars.tile_gap_x {
        layout.tile_gap_x = v;
    }
    if let Some(v) = vars.tile_gap_y {
        layout.tile_gap_y = v;
    }
    if let Some(v) = vars.grid_columns {
        layout.grid_columns = v;
    }
    if let Some(v) = vars.title_prefix {
        layout.title_prefix = v;
    }
}

fn apply_dispatch_overrides(dispatch: &mut DispatchConfig, vars: DispatchConfigFile) {
    if let Some(v) = vars.frame_delay_ms {
        dispatch.frame_delay_ms = v;
    }
    if let Some(v) = vars.lane_delay_ms {
        dispatch.lane_delay_ms = v;
    }
    if let Some(v) = vars.tile_delay_ms {
        dispatch.tile_delay_ms = v;
    }
    if let Some(v) = vars.failure_policy {
        dispatch.failure_policy = v;
    }
    if vars.request_timeout_secs.is_some() {
        dispatch.request_timeout_secs = vars.request_timeout_secs;
    }
    if let Some(v) = vars.api_base {
        dispatch.api_base = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.dispatch, DispatchConfig::default());
        assert_eq!(config.dispatch.frame_delay(), Duration::from_millis(200));
    }

    #[test]
    fn file_overrides_only_given_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"layout": {{"gridColumns": 3, "titlePrefix": "R5"}}, "dispatch": {{"failurePolicy": "continue", "tileDelayMs": 0}}}}"#
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout.grid_columns, 3);
        assert_eq!(config.layout.title_prefix, "R5");
        assert_eq!(config.layout.frame_width, 1800.0);
        assert_eq!(config.dispatch.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.dispatch.tile_delay_ms, 0);
        assert_eq!(config.dispatch.frame_delay_ms, 200);
    }

    #[test]
    fn json5_comments_are_accepted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{{\n  // wider columns\n  layout: {{ columnGap: 500, }},\n}}"
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout.column_gap, 500.0);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not a config").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn without_delays_zeroes_every_delay() {
        let dispatch = DispatchConfig::default().without_delays();
        assert_eq!(dispatch.frame_delay(), Duration::ZERO);
        assert_eq!(dispatch.lane_delay(), Duration::ZERO);
        assert_eq!(dispatch.tile_delay(), Duration::ZERO);
    }
}
