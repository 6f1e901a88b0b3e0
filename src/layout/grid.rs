use crate::config::LayoutConfig;

/// Row-major cell centers for `count` tiles starting at `(start_x, start_y)`.
pub fn grid_positions(
    start_x: f32,
    start_y: f32,
    count: usize,
    config: &LayoutConfig,
) -> Vec<(f32, f32)> {
    let columns = config.grid_columns.max(1);
    let step_x = config.tile_width + config.tile_gap_x;
    let step_y = config.tile_height + config.tile_gap_y;
    (0..count)
        .map(|idx| {
            let row = idx / columns;
            let col = idx % columns;
            (start_x + col as f32 * step_x, start_y + row as f32 * step_y)
        })
        .collect()
}
