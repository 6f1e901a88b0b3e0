#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod sink;
pub mod source;
pub mod style;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, DispatchConfig, FailurePolicy, LayoutConfig, load_config};
pub use ir::{Activity, Story, StoryMap, Theme};
pub use layout::{PlacedElement, compute_layout};
pub use render::{DispatchError, DispatchReport, Dispatcher};
pub use sink::{Sink, SinkError};
pub use source::{load_csv, load_story_map, sample_story_map};
pub use style::{ColorToken, resolve_color, resolve_status_marker};
