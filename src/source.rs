use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use tracing::debug;

use crate::ir::{Story, StoryMap};

pub const DEFAULT_RELEASE: &str = "R4";
pub const DEFAULT_THEME: &str = "Unknown";
pub const DEFAULT_ACTIVITY: &str = "General";
pub const DEFAULT_SPRINT: &str = "S1";
pub const DEFAULT_TEAM: &str = "MO";
pub const DEFAULT_STATUS: &str = "Backlog";

const SAMPLE_STORY_MAP: &str = include_str!("../assets/r4_storymap.json");

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid story map JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Column positions resolved from the header row; absent columns stay `None`.
#[derive(Debug, Default)]
struct Columns {
    theme: Option<usize>,
    activity: Option<usize>,
    story: Option<usize>,
    sprint: Option<usize>,
    team: Option<usize>,
    status: Option<usize>,
    notes: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Columns::default();
        for (idx, raw) in headers.iter().enumerate() {
            let name = raw.trim_start_matches('\u{feff}').trim();
            let slot = match name {
                "Theme" => &mut columns.theme,
                "Activity" => &mut columns.activity,
                "Story" => &mut columns.story,
                "Sprint" => &mut columns.sprint,
                "Team" => &mut columns.team,
                "Status" => &mut columns.status,
                "Notes" => &mut columns.notes,
                _ => continue,
            };
            slot.get_or_insert(idx);
        }
        columns
    }
}

fn field<'r>(record: &'r StringRecord, column: Option<usize>) -> Option<&'r str> {
    column
        .and_then(|idx| record.get(idx))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Build a story map from `Theme,Activity,Story,Sprint,Team,Status,Notes` rows.
///
/// Missing or blank cells fall back to defaults instead of failing. Rows with
/// an equal theme name (case-sensitive) share one theme; inside it, activities
/// are matched case-insensitively. Stories keep input order.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<StoryMap, SourceError> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let columns = Columns::from_headers(csv_reader.headers()?);

    let mut map = StoryMap::new(DEFAULT_RELEASE);
    let mut rows = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        rows += 1;
        let theme = field(&record, columns.theme).unwrap_or(DEFAULT_THEME);
        let activity = field(&record, columns.activity).unwrap_or(DEFAULT_ACTIVITY);
        let mut story = Story::new(
            field(&record, columns.story).unwrap_or_default(),
            field(&record, columns.sprint).unwrap_or(DEFAULT_SPRINT),
            field(&record, columns.team).unwrap_or(DEFAULT_TEAM),
            field(&record, columns.status).unwrap_or(DEFAULT_STATUS),
        );
        if let Some(notes) = field(&record, columns.notes) {
            story = story.with_note(notes);
        }
        map.ensure_theme(theme).ensure_activity(activity).push_story(story);
    }
    debug!(rows, themes = map.themes.len(), "loaded CSV story map");
    Ok(map)
}

pub fn load_csv(path: &Path) -> Result<StoryMap, SourceError> {
    let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_csv_reader(file)
}

pub fn load_json(path: &Path) -> Result<StoryMap, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// `.json` files hold a serialized map; anything else is read as CSV.
pub fn load_story_map(path: &Path) -> Result<StoryMap, SourceError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        load_json(path)
    } else {
        load_csv(path)
    }
}

/// The built-in Release 4 map used when no input file is given.
pub fn sample_story_map() -> Result<StoryMap, SourceError> {
    Ok(serde_json::from_str(SAMPLE_STORY_MAP)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Theme,Activity,Story,Sprint,Team,Status,Notes\n";

    fn load(body: &str) -> StoryMap {
        load_csv_reader(format!("{HEADER}{body}").as_bytes()).unwrap()
    }

    #[test]
    fn blank_cells_get_defaults() {
        let map = load(",,Lonely story,,,,\n");
        let theme = &map.themes[0];
        assert_eq!(theme.name, DEFAULT_THEME);
        assert_eq!(theme.activities[0].name, DEFAULT_ACTIVITY);
        let story = &theme.activities[0].stories[0];
        assert_eq!(story.title, "Lonely story");
        assert_eq!(story.sprint, "S1");
        assert_eq!(story.team, "MO");
        assert_eq!(story.status, "Backlog");
        assert_eq!(story.note, None);
    }

    #[test]
    fn short_rows_and_missing_story_are_accepted() {
        let map = load("Syndication,Intégrations\n");
        let story = &map.themes[0].activities[0].stories[0];
        assert_eq!(story.title, "");
        assert_eq!(story.team, DEFAULT_TEAM);
    }

    #[test]
    fn merges_themes_exactly_and_activities_loosely() {
        let map = load(
            "Co-baillage,Création,a,S1,IHM,Backlog,\n\
             co-baillage,Création,b,S1,IHM,Backlog,\n\
             Co-baillage,CRÉATION,c,S2,BPM,En cours,\n\
             Co-baillage,Quote-parts,d,S3,Finance,Backlog,\n",
        );
        let names: Vec<&str> = map.themes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Co-baillage", "co-baillage"]);
        let first = &map.themes[0];
        assert_eq!(first.activities.len(), 2);
        assert_eq!(first.activities[0].name, "Création");
        let titles: Vec<&str> = first.activities[0]
            .stories
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[test]
    fn notes_attach_to_story_and_quotes_are_honoured() {
        let map = load(
            "Cartes Grises & Attestations, Réception & stockage,\"Stocker l'attestation, v2\", S2, IHM, En cours,\"via EKIP360\"\n",
        );
        let story = &map.themes[0].activities[0].stories[0];
        assert_eq!(story.title, "Stocker l'attestation, v2");
        assert_eq!(story.status, "En cours");
        assert_eq!(
            story.display_title(),
            "Stocker l'attestation, v2\n\n📝 via EKIP360"
        );
    }

    #[test]
    fn bom_before_header_is_ignored() {
        let input = format!("\u{feff}{HEADER}T1,A1,s,S3,BPM,Terminé,\n");
        let map = load_csv_reader(input.as_bytes()).unwrap();
        assert_eq!(map.themes[0].name, "T1");
    }

    #[test]
    fn loading_twice_gives_equal_maps() {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        write!(
            file,
            "{HEADER}T1,A1,s1,S1,IHM,Backlog,\nT2,A2,s2,S2,BPM,Bloqué,n\nT1,a1,s3,S3,MO,Terminé,\n"
        )
        .unwrap();
        let first = load_story_map(file.path()).unwrap();
        let second = load_story_map(file.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.story_count(), 3);
    }

    #[test]
    fn json_maps_round_through_the_loader() {
        let sample = sample_story_map().unwrap();
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(serde_json::to_string(&sample).unwrap().as_bytes())
            .unwrap();
        assert_eq!(load_story_map(file.path()).unwrap(), sample);
    }

    #[test]
    fn sample_map_has_release_four_shape() {
        let map = sample_story_map().unwrap();
        assert_eq!(map.release, "R4");
        assert_eq!(map.themes.len(), 4);
        assert_eq!(map.activity_count(), 9);
        assert_eq!(map.story_count(), 20);
        assert_eq!(map.themes[3].name, "Syndication");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_csv(Path::new("/nonexistent/storymap.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/storymap.csv"));
    }
}
