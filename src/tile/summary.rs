use crate::collector::BACKGROUND_TYPE;
use crate::element::{Element, MapLine, MapShape};
use crate::geo::Area;
use crate::level::Level;

/// What a compiled tile contributes to the overview.
#[derive(Debug, Clone, Default)]
pub struct TileSummary {
    pub tile: u32,
    pub bounds: Option<Area>,
    pub copyrights: Vec<String>,
    pub lines: Vec<MapLine>,
    pub shapes: Vec<MapShape>,
}

impl TileSummary {
    pub fn new(tile: u32, bounds: Option<Area>, copyrights: Vec<String>) -> Self {
        TileSummary {
            tile,
            bounds,
            copyrights,
            ..Default::default()
        }
    }

    /// Takes the lines and shapes of `level` drawn at `resolution` or
    /// coarser. Roads lose their routing identity and become plain lines,
    /// and the tile background is left out.
    pub fn with_level(mut self, level: &Level, resolution: u8) -> Self {
        for element in level.elements() {
            if element.feature().min_resolution > resolution {
                continue;
            }

            match element {
                Element::Line(line) => self.lines.push(line.clone()),
                Element::Road(road) => self.lines.push(road.line.clone()),
                Element::Shape(shape) if shape.feature.type_code != BACKGROUND_TYPE => {
                    self.shapes.push(shape.clone())
                }
                Element::Shape(_) | Element::Point(_) => {}
            }
        }

        self
    }
}
