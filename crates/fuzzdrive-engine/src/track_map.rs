use serde::{Deserialize, Serialize};

/// Canvas dimensions the original 128x72 maps were painted for.
pub const DEFAULT_CANVAS_WIDTH: f32 = 1280.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 720.0;

#[derive(Debug, derive_more::Display, derive_more::Error, PartialEq, Eq)]
pub enum TrackMapError {
    #[display("track map must have at least one cell")]
    EmptyGrid,
    #[display("cell count {cells} does not match {width}x{height} grid")]
    CellCountMismatch {
        width: usize,
        height: usize,
        cells: usize,
    },
    #[display("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        row: usize,
        column: usize,
        glyph: char,
    },
    #[display("start cell ({x}, {y}) is outside the grid or inside a wall")]
    InvalidStart { x: usize, y: usize },
}

/// Grid map of track walls over a fixed-size pixel canvas.
///
/// Cells are row-major; `true` means wall. All physics and sensing happen in
/// pixel space, with each grid cell covering `cell_width x cell_height`
/// pixels. Anything outside the grid counts as wall.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMap {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    cell_width: f32,
    cell_height: f32,
}

impl TrackMap {
    pub fn new(
        width: usize,
        height: usize,
        cells: Vec<bool>,
        canvas_width: f32,
        canvas_height: f32,
    ) -> Result<Self, TrackMapError> {
        if width == 0 || height == 0 {
            return Err(TrackMapError::EmptyGrid);
        }
        if cells.len() != width * height {
            return Err(TrackMapError::CellCountMismatch {
                width,
                height,
                cells: cells.len(),
            });
        }
        #[expect(clippy::cast_precision_loss)]
        let (cell_width, cell_height) = (canvas_width / width as f32, canvas_height / height as f32);
        Ok(Self {
            width,
            height,
            cells,
            cell_width,
            cell_height,
        })
    }

    /// Open rectangular arena: road everywhere except a one-cell wall border.
    ///
    /// Useful for tests and demos where no circuit is needed.
    #[must_use]
    pub fn open_arena(width: usize, height: usize) -> Self {
        #[expect(clippy::cast_precision_loss)]
        let (canvas_width, canvas_height) = (width as f32 * 10.0, height as f32 * 10.0);
        let cells = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                x == 0 || y == 0 || x == width - 1 || y == height - 1
            })
            .collect();
        Self::new(width, height, cells, canvas_width, canvas_height)
            .expect("arena dimensions are valid")
    }

    /// Built-in rectangular ring circuit on the default 128x72 grid.
    ///
    /// The road is nowhere narrower than 16 cells (~160 px), wide enough for
    /// the default car and for the checkpoint generator's centerline probe.
    #[must_use]
    pub fn ring_circuit() -> Self {
        const WIDTH: usize = 128;
        const HEIGHT: usize = 72;
        let cells = (0..WIDTH * HEIGHT)
            .map(|i| {
                let (x, y) = (i % WIDTH, i / WIDTH);
                let in_outer = (8..120).contains(&x) && (8..64).contains(&y);
                let in_inner = (28..100).contains(&x) && (26..46).contains(&y);
                !(in_outer && !in_inner)
            })
            .collect();
        Self::new(
            WIDTH,
            HEIGHT,
            cells,
            DEFAULT_CANVAS_WIDTH,
            DEFAULT_CANVAS_HEIGHT,
        )
        .expect("ring dimensions are valid")
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn cell_width(&self) -> f32 {
        self.cell_width
    }

    #[must_use]
    pub const fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Whether the grid cell is a wall. Out-of-grid coordinates are walls.
    #[must_use]
    pub fn is_wall(&self, grid_x: isize, grid_y: isize) -> bool {
        let Ok(x) = usize::try_from(grid_x) else {
            return true;
        };
        let Ok(y) = usize::try_from(grid_y) else {
            return true;
        };
        if x >= self.width || y >= self.height {
            return true;
        }
        self.cells[y * self.width + x]
    }

    /// Whether the pixel-space point lies in a wall cell.
    #[must_use]
    pub fn is_wall_at(&self, x: f32, y: f32) -> bool {
        #[expect(clippy::cast_possible_truncation)]
        let (gx, gy) = (
            (x / self.cell_width).floor() as isize,
            (y / self.cell_height).floor() as isize,
        );
        self.is_wall(gx, gy)
    }

    fn glyph_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|&wall| if wall { '#' } else { '.' }).collect())
            .collect()
    }
}

/// Pixel-space spawn pose shared by every car in a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPose {
    pub x: f32,
    pub y: f32,
    /// Heading in degrees; 0 points toward +x, 90 toward +y.
    pub heading: f32,
}

/// Serializable track description: glyph rows plus the start pose.
///
/// `'#'` is wall, `'.'` is road. The start is given in grid coordinates and
/// converted to the pixel-space top-left corner of that cell, matching how
/// painted maps anchored their spawn point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackLayout {
    pub rows: Vec<String>,
    pub start: (usize, usize),
    pub start_heading: f32,
}

impl TrackLayout {
    /// Validates the layout and builds the map and start pose.
    pub fn build(&self) -> Result<(TrackMap, StartPose), TrackMapError> {
        let height = self.rows.len();
        let width = self.rows.first().map_or(0, |row| row.chars().count());
        if width == 0 || height == 0 {
            return Err(TrackMapError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row_index, row) in self.rows.iter().enumerate() {
            let mut count = 0;
            for (column, glyph) in row.chars().enumerate() {
                cells.push(match glyph {
                    '#' => true,
                    '.' => false,
                    _ => {
                        return Err(TrackMapError::UnknownGlyph {
                            row: row_index,
                            column,
                            glyph,
                        });
                    }
                });
                count += 1;
            }
            if count != width {
                return Err(TrackMapError::RaggedRow {
                    row: row_index,
                    expected: width,
                    actual: count,
                });
            }
        }

        let map = TrackMap::new(
            width,
            height,
            cells,
            DEFAULT_CANVAS_WIDTH,
            DEFAULT_CANVAS_HEIGHT,
        )?;

        let (sx, sy) = self.start;
        #[expect(clippy::cast_possible_wrap)]
        let (gx, gy) = (sx as isize, sy as isize);
        if map.is_wall(gx, gy) {
            return Err(TrackMapError::InvalidStart { x: sx, y: sy });
        }
        #[expect(clippy::cast_precision_loss)]
        let pose = StartPose {
            x: sx as f32 * map.cell_width(),
            y: sy as f32 * map.cell_height(),
            heading: self.start_heading,
        };
        Ok((map, pose))
    }

    /// Layout for an existing map, e.g. for exporting the built-in circuit.
    #[must_use]
    pub fn from_map(map: &TrackMap, start: (usize, usize), start_heading: f32) -> Self {
        Self {
            rows: map.glyph_rows(),
            start,
            start_heading,
        }
    }
}
