mod grid;
mod types;

pub use grid::grid_positions;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Activity, Story, StoryMap, Theme};
use crate::style::{resolve_color, resolve_status_marker};

/// Place every theme, activity and story of `map` on the board.
///
/// Elements come out parent-first: a frame, then each of its lanes followed
/// by that lane's tiles, then the next frame. Frames sit in a single row.
/// Lanes have a fixed height and do not grow with their content, so a lane
/// holding more rows of tiles than fit spills into the lane below.
pub fn compute_layout(map: &StoryMap, config: &LayoutConfig) -> Vec<PlacedElement> {
    let mut elements = Vec::with_capacity(map.element_count());
    for (theme_index, theme) in map.themes.iter().enumerate() {
        let frame = frame_element(theme_index, theme, config);
        let frame_bounds = frame.bounds;
        elements.push(PlacedElement::Frame(frame));

        for (lane_index, activity) in theme.activities.iter().enumerate() {
            elements.push(PlacedElement::LaneTitle(lane_title_element(
                theme_index,
                lane_index,
                activity,
                &frame_bounds,
                config,
            )));
            layout_lane_tiles(
                theme_index,
                lane_index,
                activity,
                &frame_bounds,
                config,
                &mut elements,
            );
        }
    }
    elements
}

pub fn frame_title(prefix: &str, theme_name: &str) -> String {
    if prefix.is_empty() {
        theme_name.to_string()
    } else {
        format!("{prefix} – {theme_name}")
    }
}

pub fn tile_text(story: &Story) -> String {
    format!(
        "{} {}\n[{}] [{}]",
        resolve_status_marker(&story.status),
        story.display_title(),
        story.team,
        story.sprint
    )
}

fn frame_element(theme_index: usize, theme: &Theme, config: &LayoutConfig) -> FrameElement {
    let x = config.origin_x + theme_index as f32 * (config.frame_width + config.column_gap);
    FrameElement {
        theme_index,
        title: frame_title(&config.title_prefix, &theme.name),
        bounds: Bounds::new(x, config.origin_y, config.frame_width, config.frame_height),
    }
}

fn lane_top(frame: &Bounds, lane_index: usize, config: &LayoutConfig) -> f32 {
    frame.top() + config.title_height + lane_index as f32 * config.lane_height
}

fn lane_title_element(
    theme_index: usize,
    lane_index: usize,
    activity: &Activity,
    frame: &Bounds,
    config: &LayoutConfig,
) -> LaneTitleElement {
    LaneTitleElement {
        theme_index,
        lane_index,
        title: activity.name.clone(),
        shape: ShapeKind::RoundRectangle,
        font_size: config.lane_title_font_size,
        bounds: Bounds::new(
            frame.left() + config.lane_title_inset_x,
            lane_top(frame, lane_index, config) + config.lane_title_inset_y,
            config.lane_title_width,
            config.lane_title_height,
        ),
    }
}

fn layout_lane_tiles(
    theme_index: usize,
    lane_index: usize,
    activity: &Activity,
    frame: &Bounds,
    config: &LayoutConfig,
    out: &mut Vec<PlacedElement>,
) {
    if activity.stories.is_empty() {
        return;
    }
    let start_x = frame.left() + config.tile_inset_x;
    let start_y = lane_top(frame, lane_index, config) + config.lane_height / 2.0;
    let positions = grid_positions(start_x, start_y, activity.stories.len(), config);

    for (story_index, (story, (x, y))) in activity.stories.iter().zip(positions).enumerate() {
        out.push(PlacedElement::Tile(TileElement {
            theme_index,
            lane_index,
            story_index,
            text: tile_text(story),
            color: resolve_color(&story.team),
            marker: resolve_status_marker(&story.status),
            bounds: Bounds::new(x, y, config.tile_width, config.tile_height),
        }));
    }
}
