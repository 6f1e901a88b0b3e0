use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Sticky-note fill colors understood by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    LightYellow,
    LightGreen,
    LightBlue,
    LightPink,
}

impl ColorToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LightYellow => "light_yellow",
            Self::LightGreen => "light_green",
            Self::LightBlue => "light_blue",
            Self::LightPink => "light_pink",
        }
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_COLOR: ColorToken = ColorToken::LightYellow;
pub const DEFAULT_MARKER: &str = "⬜️";

static TEAM_COLORS: Lazy<HashMap<&'static str, ColorToken>> = Lazy::new(|| {
    HashMap::from([
        ("IHM", ColorToken::LightYellow),
        ("BPM", ColorToken::LightGreen),
        ("Métier", ColorToken::LightBlue),
        ("Metier", ColorToken::LightBlue),
        ("Finance", ColorToken::LightBlue),
        ("MO", ColorToken::LightPink),
    ])
});

static STATUS_MARKERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Backlog", DEFAULT_MARKER),
        ("À faire", "🟦"),
        ("En cours", "🟨"),
        ("Bloqué", "🟥"),
        ("À valider", "🟪"),
        ("Terminé", "✅"),
    ])
});

/// Exact, case-sensitive lookup; unknown teams get the IHM color.
pub fn resolve_color(team: &str) -> ColorToken {
    TEAM_COLORS.get(team).copied().unwrap_or(DEFAULT_COLOR)
}

/// Exact, case-sensitive lookup; unknown statuses get the backlog marker.
pub fn resolve_status_marker(status: &str) -> &'static str {
    STATUS_MARKERS.get(status).copied().unwrap_or(DEFAULT_MARKER)
}
