//! Staggered isometric navigation grid
//!
//! Tiles are diamonds laid out brick-style: every odd row is shifted
//! horizontally relative to the even rows. A cell value of `0` means the
//! tile is blocked (or outside the map), anything else is walkable.

use std::fmt;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Tile coordinate `(tx, ty)`
pub type Tile = IVec2;

/// Value written for plain walkable tiles
pub const WALKABLE: i32 = 1;

/// Value reported for blocked or out-of-range tiles
pub const BLOCKED: i32 = 0;

/// A 2D walkability map addressed by staggered tile coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct NavGrid {
    width: usize,
    height: usize,
    /// World-space anchor of tile `(0, 0)`
    pub origin: Vec2,
    /// Row-major cell values, `cells[ty * width + tx]`
    cells: Vec<i32>,
}

impl NavGrid {
    /// Create a grid with every tile blocked
    #[must_use]
    pub fn new(width: usize, height: usize, origin: Vec2) -> Self {
        Self::filled(width, height, origin, BLOCKED)
    }

    /// Create a grid with every tile set to `value`
    #[must_use]
    pub fn filled(width: usize, height: usize, origin: Vec2, value: i32) -> Self {
        Self {
            width,
            height,
            origin,
            cells: vec![value; width * height],
        }
    }

    /// Build a grid from text rows, row `i` becoming tile row `ty = i`.
    ///
    /// `.` is walkable, `#` and `0` are blocked, `1`-`9` are walkable with
    /// that cell value.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty layout, rows of different lengths or
    /// an unknown symbol.
    pub fn from_rows<S: AsRef<str>>(origin: Vec2, rows: &[S]) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::Empty);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut grid = Self::new(width, rows.len(), origin);
        for (ty, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(GridError::RaggedRow {
                    row: ty,
                    expected: width,
                    found,
                });
            }

            for (tx, symbol) in row.chars().enumerate() {
                let value = match symbol {
                    '.' => WALKABLE,
                    '#' => BLOCKED,
                    d if d.is_ascii_digit() => d as i32 - '0' as i32,
                    _ => {
                        return Err(GridError::UnknownCell {
                            row: ty,
                            column: tx,
                            symbol,
                        });
                    }
                };
                grid.cells[ty * width + tx] = value;
            }
        }

        Ok(grid)
    }

    /// Width in tiles
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles (rows)
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, tile: Tile) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        let (x, y) = (tile.x as usize, tile.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Cell value at `tile`, `0` when out of range
    #[must_use]
    pub fn get_node(&self, tile: Tile) -> i32 {
        self.index(tile).map_or(BLOCKED, |i| self.cells[i])
    }

    /// Write a cell value. Out-of-range writes are ignored.
    pub fn set_node(&mut self, tile: Tile, value: i32) {
        if let Some(i) = self.index(tile) {
            self.cells[i] = value;
        }
    }

    /// Whether `tile` exists and is walkable
    #[must_use]
    pub fn is_walkable(&self, tile: Tile) -> bool {
        self.get_node(tile) != BLOCKED
    }

    /// Iterate over all walkable tiles in row-major order
    pub fn walkable_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != BLOCKED)
            .map(|(i, _)| IVec2::new((i % self.width) as i32, (i / self.width) as i32))
    }

    /// Map a world point to the staggered tile whose diamond contains it
    #[must_use]
    pub fn world_to_tile(&self, world: Vec2) -> Tile {
        let p = world - self.origin;
        let n = (p.x / 2.0 + p.y).floor() as i32;
        let y0 = -n;
        let y1 = (p.x / 2.0 - p.y).ceil() as i32;
        let diff = y1 - y0;

        let ty = 2 * n - diff;
        // Integer division truncates; shifting negative odd values by one
        // turns it into floor division.
        let tx = if diff >= 0 { diff / 2 } else { (diff - 1) / 2 };
        IVec2::new(tx, ty)
    }

    /// World position of a tile's center
    #[must_use]
    pub fn tile_to_world(&self, tile: Tile) -> Vec2 {
        let mut pos = self.origin;
        pos.y += tile.y as f32 / 2.0 + 0.5;
        if tile.y % 2 == 0 {
            pos.x += tile.x as f32 * 2.0;
        } else {
            pos.x += tile.x as f32 * 2.0 + 0.5;
        }
        pos
    }

    /// Snap a world point to the center of its tile
    #[must_use]
    pub fn snap(&self, world: Vec2) -> Vec2 {
        self.tile_to_world(self.world_to_tile(world))
    }

    /// Walkable neighbors of `tile`.
    ///
    /// Diagonals (tiles sharing a diamond edge) only need to be walkable.
    /// Axis moves (left/right/up/down) touch their target at a single
    /// corner, so they also require at least one of the two diagonals
    /// flanking that corner to be open.
    #[must_use]
    pub fn neighbors(&self, tile: Tile) -> SmallVec<[Tile; 8]> {
        let diagonals = Diagonals::of(tile);
        let axis = [
            (tile + IVec2::new(-1, 0), diagonals.upper_left, diagonals.lower_left),
            (tile + IVec2::new(1, 0), diagonals.upper_right, diagonals.lower_right),
            (tile + IVec2::new(0, 2), diagonals.upper_left, diagonals.upper_right),
            (tile + IVec2::new(0, -2), diagonals.lower_left, diagonals.lower_right),
        ];

        let mut result = SmallVec::new();
        for (target, flank_a, flank_b) in axis {
            if self.is_walkable(target) && (self.is_walkable(flank_a) || self.is_walkable(flank_b))
            {
                result.push(target);
            }
        }
        for target in diagonals.all() {
            if self.is_walkable(target) {
                result.push(target);
            }
        }
        result
    }
}

/// The four edge-sharing tiles of a diamond. Offsets mirror between even
/// and odd rows because odd rows sit half a tile further right.
#[derive(Debug, Clone, Copy)]
struct Diagonals {
    upper_left: Tile,
    upper_right: Tile,
    lower_left: Tile,
    lower_right: Tile,
}

impl Diagonals {
    fn of(tile: Tile) -> Self {
        let (left, right) = if tile.y % 2 == 0 {
            (tile.x - 1, tile.x)
        } else {
            (tile.x, tile.x + 1)
        };
        Self {
            upper_left: IVec2::new(left, tile.y + 1),
            upper_right: IVec2::new(right, tile.y + 1),
            lower_left: IVec2::new(left, tile.y - 1),
            lower_right: IVec2::new(right, tile.y - 1),
        }
    }

    fn all(self) -> [Tile; 4] {
        [
            self.upper_left,
            self.upper_right,
            self.lower_left,
            self.lower_right,
        ]
    }
}

impl fmt::Display for NavGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ty in (0..self.height).rev() {
            if ty % 2 == 1 {
                write!(f, " ")?;
            }
            for tx in 0..self.width {
                write!(f, "{} ", self.cells[ty * self.width + tx])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// On-disk level layout, converted into a [`NavGrid`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    /// World-space anchor of tile `(0, 0)`
    #[serde(default)]
    pub origin: Vec2,
    /// Text rows, first row is `ty = 0`
    pub rows: Vec<String>,
}

impl LevelLayout {
    /// Build the navigation grid described by this layout
    ///
    /// # Errors
    ///
    /// See [`NavGrid::from_rows`].
    pub fn to_grid(&self) -> Result<NavGrid, GridError> {
        NavGrid::from_rows(self.origin, &self.rows)
    }
}

/// Errors raised while building a grid from a text layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// No rows, or an empty first row
    Empty,
    /// A row whose length differs from the first row
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A symbol the layout format does not know
    UnknownCell {
        row: usize,
        column: usize,
        symbol: char,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "level layout has no tiles"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} tiles, expected {expected}"),
            Self::UnknownCell {
                row,
                column,
                symbol,
            } => write!(f, "unknown tile symbol {symbol:?} at row {row}, column {column}"),
        }
    }
}

impl std::error::Error for GridError {}
