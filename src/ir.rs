use serde::{Deserialize, Serialize};

/// Glyph placed between a story title and its free-text note.
pub const NOTE_GLYPH: &str = "📝";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default = "default_sprint")]
    pub sprint: String,
    #[serde(default = "default_team")]
    pub team: String,
    #[serde(default = "default_status")]
    pub status: String,
}

// Fallbacks for hand-written JSON maps.
fn default_title() -> String {
    "Story".to_string()
}

fn default_sprint() -> String {
    "S?".to_string()
}

fn default_team() -> String {
    "MO".to_string()
}

fn default_status() -> String {
    "Backlog".to_string()
}

impl Story {
    pub fn new(title: &str, sprint: &str, team: &str, status: &str) -> Self {
        Self {
            title: title.to_string(),
            note: None,
            sprint: sprint.to_string(),
            team: team.to_string(),
            status: status.to_string(),
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    /// Title as shown on the board, with the note appended after a blank line.
    pub fn display_title(&self) -> String {
        match self.note.as_deref().map(str::trim) {
            Some(note) if !note.is_empty() => {
                format!("{}\n\n{} {}", self.title, NOTE_GLYPH, note)
            }
            _ => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub stories: Vec<Story>,
}

impl Activity {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stories: Vec::new(),
        }
    }

    pub fn push_story(&mut self, story: Story) {
        self.stories.push(story);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Theme {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            activities: Vec::new(),
        }
    }

    /// Activities merge on a case-insensitive name match; the first spelling wins.
    pub fn ensure_activity(&mut self, name: &str) -> &mut Activity {
        let needle = name.to_lowercase();
        let idx = match self
            .activities
            .iter()
            .position(|activity| activity.name.to_lowercase() == needle)
        {
            Some(idx) => idx,
            None => {
                self.activities.push(Activity::new(name));
                self.activities.len() - 1
            }
        };
        &mut self.activities[idx]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMap {
    pub release: String,
    #[serde(default)]
    pub themes: Vec<Theme>,
}

impl StoryMap {
    pub fn new(release: &str) -> Self {
        Self {
            release: release.to_string(),
            themes: Vec::new(),
        }
    }

    /// Themes merge on an exact, case-sensitive name match.
    pub fn ensure_theme(&mut self, name: &str) -> &mut Theme {
        let idx = match self.themes.iter().position(|theme| theme.name == name) {
            Some(idx) => idx,
            None => {
                self.themes.push(Theme::new(name));
                self.themes.len() - 1
            }
        };
        &mut self.themes[idx]
    }

    pub fn story_count(&self) -> usize {
        self.themes
            .iter()
            .flat_map(|theme| theme.activities.iter())
            .map(|activity| activity.stories.len())
            .sum()
    }

    pub fn activity_count(&self) -> usize {
        self.themes.iter().map(|theme| theme.activities.len()).sum()
    }

    /// Number of placed elements a layout of this map produces.
    pub fn element_count(&self) -> usize {
        self.themes.len() + self.activity_count() + self.story_count()
    }
}

impl Default for StoryMap {
    fn default() -> Self {
        Self::new("")
    }
}
