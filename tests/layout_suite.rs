use std::path::{Path, PathBuf};

use storymap_board::layout::{ElementKind, PlacedElement};
use storymap_board::{
    ColorToken, DispatchConfig, Dispatcher, LayoutConfig, StoryMap, compute_layout,
    load_story_map, sample_story_map,
};

fn fixture(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel)
}

fn load_fixture(rel: &str) -> StoryMap {
    let path = fixture(rel);
    assert!(path.exists(), "fixture missing: {rel}");
    load_story_map(&path).expect("fixture load failed")
}

fn kinds(elements: &[PlacedElement]) -> Vec<ElementKind> {
    elements.iter().map(PlacedElement::kind).collect()
}

#[test]
fn csv_fixture_merges_into_expected_tree() {
    let map = load_fixture("release4.csv");
    let themes: Vec<&str> = map.themes.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        themes,
        vec![
            "Cartes Grises & Attestations",
            "Paiement fournisseurs & prélèvements clients",
            "Syndication",
        ]
    );

    let cartes = &map.themes[0];
    assert_eq!(cartes.activities.len(), 2);
    assert_eq!(cartes.activities[0].name, "Réception & stockage");
    assert_eq!(cartes.activities[0].stories.len(), 3);
    assert_eq!(
        cartes.activities[0].stories[2].title,
        "Appariement auto doc⇄dossier"
    );

    let defaulted = &map.themes[2].activities[1].stories[1];
    assert_eq!(defaulted.title, "Story sans équipe");
    assert_eq!(
        (defaulted.sprint.as_str(), defaulted.team.as_str(), defaulted.status.as_str()),
        ("S1", "MO", "Backlog")
    );
}

#[test]
fn reloading_the_same_csv_is_stable() {
    let first = load_fixture("release4.csv");
    let second = load_fixture("release4.csv");
    assert_eq!(first, second);
    let config = LayoutConfig::default();
    assert_eq!(compute_layout(&first, &config), compute_layout(&second, &config));
}

#[test]
fn every_entity_is_placed_parent_first() {
    let map = load_fixture("release4.csv");
    let elements = compute_layout(&map, &LayoutConfig::default());
    assert_eq!(elements.len(), map.element_count());

    let mut current_theme = None;
    let mut lane_seen = false;
    for element in &elements {
        match element {
            PlacedElement::Frame(frame) => {
                current_theme = Some(frame.theme_index);
                lane_seen = false;
            }
            PlacedElement::LaneTitle(lane) => {
                assert_eq!(Some(lane.theme_index), current_theme);
                lane_seen = true;
            }
            PlacedElement::Tile(tile) => {
                assert_eq!(Some(tile.theme_index), current_theme);
                assert!(lane_seen, "tile emitted before its lane title");
            }
        }
    }
}

#[test]
fn tiles_follow_team_colors_and_status_markers() {
    let map = load_fixture("release4.csv");
    let elements = compute_layout(&map, &LayoutConfig::default());
    let tiles: Vec<_> = elements
        .iter()
        .filter_map(|element| match element {
            PlacedElement::Tile(tile) => Some(tile),
            _ => None,
        })
        .collect();

    let notes = tiles
        .iter()
        .find(|tile| tile.text.contains("Détecter"))
        .expect("story with note");
    assert_eq!(notes.marker, "🟨");
    assert_eq!(notes.color, ColorToken::LightGreen);
    assert!(notes.text.contains("\n\n📝 via EKIP360\n[BPM] [S2]"));

    let blocked = tiles
        .iter()
        .find(|tile| tile.text.contains("SEPA"))
        .expect("blocked story");
    assert_eq!(blocked.marker, "🟥");
    assert_eq!(blocked.color, ColorToken::LightPink);
}

#[test]
fn empty_lanes_and_themes_get_no_children() {
    let map = load_fixture("empty_lanes.json");
    assert_eq!(map.release, "R5");
    let elements = compute_layout(&map, &LayoutConfig::default());
    assert_eq!(
        kinds(&elements),
        vec![
            ElementKind::Frame,
            ElementKind::LaneTitle,
            ElementKind::Tile,
            ElementKind::LaneTitle,
            ElementKind::Frame,
        ]
    );
}

#[test]
fn preview_of_sample_map_lists_every_element() {
    let map = sample_story_map().unwrap();
    let elements = compute_layout(&map, &LayoutConfig::default());
    let dispatcher = Dispatcher::new(DispatchConfig::default());
    let lines = dispatcher.preview(&elements);
    assert_eq!(lines.len(), 4 + 9 + 20);

    let frames: Vec<&String> = lines
        .iter()
        .filter(|line| line.starts_with("[DRY] Frame"))
        .collect();
    assert_eq!(frames.len(), 4);
    assert!(frames[3].contains("R4 – Syndication"));
    assert!(frames[3].contains("@ (4300,-1000)"));
}
