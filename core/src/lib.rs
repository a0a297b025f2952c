#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across The Floor is Lava engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! terrain views, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "The Floor is Lava!!!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's tile grid using the provided dimensions.
    ConfigureGrid {
        /// Number of tile columns laid out in the grid.
        width: u32,
        /// Number of tile rows laid out in the grid.
        height: u32,
    },
    /// Replaces the static walkability layer derived from map data.
    LoadStaticLayer {
        /// Cells that terrain data marks impassable regardless of hazard.
        blocked: Vec<GridCoord>,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the hazard mask wholesale using a fresh generation seed.
    RegenerateHazard {
        /// Seed driving both the noise field and the post-process stream.
        seed: u64,
    },
    /// Requests that the provided cells become hazardous.
    MarkHazard {
        /// Candidate cells; out-of-bounds entries are ignored.
        cells: Vec<GridCoord>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the grid was resized and all layers reset.
    GridConfigured {
        /// Number of tile columns laid out in the grid.
        width: u32,
        /// Number of tile rows laid out in the grid.
        height: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the hazard mask was regenerated from a seed.
    HazardRegenerated {
        /// Seed used for the regeneration.
        seed: u64,
        /// Number of hazardous cells in the fresh mask.
        hazard_count: usize,
    },
    /// Confirms that cells were newly committed to the hazard mask.
    HazardSpread {
        /// Cells that transitioned from safe to hazardous, in commit order.
        cells: Vec<GridCoord>,
    },
}

/// Location of a single tile expressed as signed grid coordinates.
///
/// Coordinates are signed so that probes outside the active grid, including
/// negative positions produced by screen-to-grid projection, stay
/// representable and resolve to "not walkable, not hazardous" instead of
/// panicking. The derived ordering (column first, then row) keys priority
/// queues and makes tie-breaking deterministic.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    x: i32,
    y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four axis-aligned neighbors in fixed north, east, south, west order.
    ///
    /// Every consumer that walks adjacency uses this order so that searches
    /// and spreading behave identically run to run.
    #[must_use]
    pub const fn neighbors(self) -> [GridCoord; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }
}

/// Width and height of the active grid measured in whole tiles.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    /// Creates a new dimensions descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tile columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells covered by the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reports whether the coordinate lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: GridCoord) -> bool {
        cell.x() >= 0
            && cell.y() >= 0
            && (cell.x() as u32) < self.width
            && (cell.y() as u32) < self.height
    }

    /// Row-major index of the coordinate, if it lies within bounds.
    #[must_use]
    pub fn index_of(&self, cell: GridCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let x = usize::try_from(cell.x()).ok()?;
        let y = usize::try_from(cell.y()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }

    /// Coordinate stored at the provided row-major index, if valid.
    #[must_use]
    pub fn coord_at(&self, index: usize) -> Option<GridCoord> {
        if self.width == 0 || index >= self.cell_count() {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let x = i32::try_from(index % width).ok()?;
        let y = i32::try_from(index / width).ok()?;
        Some(GridCoord::new(x, y))
    }
}

/// Dense boolean layer recording which cells are hazardous.
///
/// Lookup is O(1) via row-major indexing, absence of a grid cell (out of
/// bounds) reads as safe, and mutation is grow-only: a cell, once marked,
/// stays hazardous until the mask is replaced wholesale by regeneration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardMask {
    dimensions: GridDimensions,
    cells: Vec<bool>,
}

impl HazardMask {
    /// Creates an all-safe mask covering the provided dimensions.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![false; dimensions.cell_count()],
        }
    }

    /// Dimensions the mask was created for.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Reports whether the cell is hazardous. Out-of-bounds cells are safe.
    #[must_use]
    pub fn is_hazard(&self, cell: GridCoord) -> bool {
        self.dimensions
            .index_of(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Marks the cell hazardous, reporting whether it was newly marked.
    ///
    /// Out-of-bounds marks are rejected and return `false`.
    pub fn mark(&mut self, cell: GridCoord) -> bool {
        let Some(index) = self.dimensions.index_of(cell) else {
            return false;
        };

        let newly_marked = !self.cells[index];
        self.cells[index] = true;
        newly_marked
    }

    /// Number of hazardous cells currently recorded.
    #[must_use]
    pub fn hazard_count(&self) -> usize {
        self.cells.iter().filter(|hazard| **hazard).count()
    }

    /// Iterator over all hazardous cells in row-major order.
    pub fn iter_hazards(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, hazard)| **hazard)
            .filter_map(|(index, _)| self.dimensions.coord_at(index))
    }
}

/// Read-only oracle combining static layer data with the hazard mask.
///
/// The single seam between the world's terrain data and the systems that
/// consume it: spreading reads hazard state, navigation reads walkability.
pub trait Terrain {
    /// Authoritative dimensions of the active grid.
    fn dimensions(&self) -> GridDimensions;

    /// Reports whether the cell is hazardous. Out-of-bounds cells are not.
    fn is_hazard(&self, cell: GridCoord) -> bool;

    /// Reports whether the cell can be traversed. Out-of-bounds and
    /// hazardous cells never are.
    fn is_walkable(&self, cell: GridCoord) -> bool;
}

/// Shortest-path algorithm selected by routing consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStrategy {
    /// Uniform-cost search expanding nodes in true distance order.
    Dijkstra,
    /// Heuristic search informed by Manhattan distance to the goal.
    AStar,
}
