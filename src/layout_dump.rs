use crate::ir::StoryMap;
use crate::layout::{ElementKind, PlacedElement};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub release: &'a str,
    pub frames: usize,
    pub lanes: usize,
    pub tiles: usize,
    pub width: f32,
    pub height: f32,
    pub elements: &'a [PlacedElement],
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(map: &'a StoryMap, elements: &'a [PlacedElement]) -> Self {
        let count = |kind: ElementKind| elements.iter().filter(|e| e.kind() == kind).count();
        let (width, height) = extent(elements);
        LayoutDump {
            release: &map.release,
            frames: count(ElementKind::Frame),
            lanes: count(ElementKind::LaneTitle),
            tiles: count(ElementKind::Tile),
            width,
            height,
            elements,
        }
    }
}

/// Width and height of the box enclosing every element.
fn extent(elements: &[PlacedElement]) -> (f32, f32) {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for element in elements {
        let b = element.bounds();
        min_x = min_x.min(b.left());
        min_y = min_y.min(b.top());
        max_x = max_x.max(b.left() + b.width);
        max_y = max_y.max(b.top() + b.height);
    }
    if elements.is_empty() {
        return (0.0, 0.0);
    }
    (max_x - min_x, max_y - min_y)
}

pub fn write_layout_dump(
    path: &Path,
    map: &StoryMap,
    elements: &[PlacedElement],
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(map, elements);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
