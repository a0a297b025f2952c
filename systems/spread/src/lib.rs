#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic hazard spreading system.
//!
//! The system accumulates simulated time from [`Event::TimeAdvanced`] and,
//! each time the configured interval is reached, proposes one bounded step
//! of hazard growth as a [`Command::MarkHazard`] batch. Growth is computed
//! from the stable terrain view passed into the call, never from cells
//! proposed earlier in the same step, so a single tick can never cascade.

use std::collections::HashSet;
use std::time::Duration;

use floor_is_lava_core::{Command, Event, GridCoord, Terrain};

/// Configuration parameters required to construct the spreading system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spread_interval: Duration,
    growth_cap: usize,
}

impl Config {
    /// Creates a new configuration using the provided cadence and per-step cap.
    #[must_use]
    pub const fn new(spread_interval: Duration, growth_cap: usize) -> Self {
        Self {
            spread_interval,
            growth_cap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spread_interval: Duration::from_secs(3),
            growth_cap: 10,
        }
    }
}

/// Pure system that grows the hazard mask outward on a fixed cadence.
#[derive(Debug, Default)]
pub struct HazardSpread {
    config: Config,
    accumulator: Duration,
}

impl HazardSpread {
    /// Creates a new spreading system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and the terrain view to emit growth commands.
    ///
    /// Below the configured interval nothing is emitted. Crossing it resets
    /// the timer and performs exactly one spread step: each hazardous cell
    /// may contribute its first safe in-bounds neighbor (fixed north, east,
    /// south, west order) until the global cap is reached.
    pub fn handle<T>(&mut self, events: &[Event], terrain: &T, out: &mut Vec<Command>)
    where
        T: Terrain,
    {
        if self.config.spread_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        if self.accumulator < self.config.spread_interval {
            return;
        }
        self.accumulator = Duration::ZERO;

        let cells = self.plan_growth(terrain);
        if !cells.is_empty() {
            out.push(Command::MarkHazard { cells });
        }
    }

    fn plan_growth<T>(&self, terrain: &T) -> Vec<GridCoord>
    where
        T: Terrain,
    {
        if self.config.growth_cap == 0 {
            return Vec::new();
        }

        let dimensions = terrain.dimensions();
        let mut pending = Vec::new();
        let mut claimed = HashSet::new();

        'scan: for y in 0..dimensions.height() as i32 {
            for x in 0..dimensions.width() as i32 {
                let cell = GridCoord::new(x, y);
                if !terrain.is_hazard(cell) {
                    continue;
                }

                for neighbor in cell.neighbors() {
                    if !dimensions.contains(neighbor)
                        || terrain.is_hazard(neighbor)
                        || claimed.contains(&neighbor)
                    {
                        continue;
                    }

                    let _ = claimed.insert(neighbor);
                    pending.push(neighbor);
                    break;
                }

                if pending.len() >= self.config.growth_cap {
                    break 'scan;
                }
            }
        }

        pending
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, HazardSpread};
    use floor_is_lava_core::{
        Command, Event, GridCoord, GridDimensions, HazardMask, Terrain,
    };
    use std::time::Duration;

    struct MaskTerrain {
        mask: HazardMask,
    }

    impl MaskTerrain {
        fn new(width: u32, height: u32, hazards: &[GridCoord]) -> Self {
            let mut mask = HazardMask::new(GridDimensions::new(width, height));
            for cell in hazards {
                assert!(mask.mark(*cell));
            }
            Self { mask }
        }
    }

    impl Terrain for MaskTerrain {
        fn dimensions(&self) -> GridDimensions {
            self.mask.dimensions()
        }

        fn is_hazard(&self, cell: GridCoord) -> bool {
            self.mask.is_hazard(cell)
        }

        fn is_walkable(&self, cell: GridCoord) -> bool {
            self.dimensions().contains(cell) && !self.is_hazard(cell)
        }
    }

    fn time_advanced(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    #[test]
    fn nothing_spreads_below_the_interval() {
        let terrain = MaskTerrain::new(5, 5, &[GridCoord::new(2, 2)]);
        let mut spread = HazardSpread::default();
        let mut commands = Vec::new();

        for _ in 0..2 {
            spread.handle(&[time_advanced(966)], &terrain, &mut commands);
        }
        spread.handle(&[time_advanced(967)], &terrain, &mut commands);

        assert!(commands.is_empty(), "2.899s accumulated is below 3s cadence");
    }

    #[test]
    fn crossing_the_interval_spreads_once_and_resets() {
        let terrain = MaskTerrain::new(5, 5, &[GridCoord::new(2, 2)]);
        let mut spread = HazardSpread::default();
        let mut commands = Vec::new();

        spread.handle(&[time_advanced(3_000)], &terrain, &mut commands);
        assert_eq!(commands.len(), 1, "one batch per interval crossing");

        spread.handle(&[time_advanced(100)], &terrain, &mut commands);
        assert_eq!(commands.len(), 1, "timer restarts from zero after a step");
    }

    #[test]
    fn isolated_hazard_grows_into_its_first_free_neighbor() {
        let terrain = MaskTerrain::new(5, 5, &[GridCoord::new(2, 2)]);
        let mut spread = HazardSpread::default();
        let mut commands = Vec::new();

        spread.handle(&[time_advanced(3_000)], &terrain, &mut commands);
        assert_eq!(
            commands,
            vec![Command::MarkHazard {
                // North comes first in the fixed neighbor order.
                cells: vec![GridCoord::new(2, 1)],
            }]
        );
    }

    #[test]
    fn growth_respects_the_global_cap() {
        let hazards: Vec<GridCoord> = (0..8)
            .flat_map(|x| (0..8).map(move |y| GridCoord::new(x * 2, y * 2)))
            .collect();
        let terrain = MaskTerrain::new(16, 16, &hazards);
        let mut spread = HazardSpread::new(Config::new(Duration::from_secs(3), 10));
        let mut commands = Vec::new();

        spread.handle(&[time_advanced(3_000)], &terrain, &mut commands);
        match commands.as_slice() {
            [Command::MarkHazard { cells }] => {
                assert_eq!(cells.len(), 10, "growth bounded by the per-step cap")
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn growth_reads_the_snapshot_not_its_own_output() {
        // A lone hazard column: every proposed cell must neighbor the
        // original column, never a cell proposed in the same step.
        let hazards = [
            GridCoord::new(1, 0),
            GridCoord::new(1, 1),
            GridCoord::new(1, 2),
        ];
        let terrain = MaskTerrain::new(4, 3, &hazards);
        let mut spread = HazardSpread::default();
        let mut commands = Vec::new();

        spread.handle(&[time_advanced(3_000)], &terrain, &mut commands);
        match commands.as_slice() {
            [Command::MarkHazard { cells }] => {
                for cell in cells {
                    assert!(!terrain.is_hazard(*cell), "already hazardous: {cell:?}");
                    assert!(
                        hazards
                            .iter()
                            .any(|hazard| hazard.manhattan_distance(*cell) == 1),
                        "{cell:?} does not touch the snapshot"
                    );
                }
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn saturated_grids_emit_nothing() {
        let hazards: Vec<GridCoord> = (0..3)
            .flat_map(|x| (0..3).map(move |y| GridCoord::new(x, y)))
            .collect();
        let terrain = MaskTerrain::new(3, 3, &hazards);
        let mut spread = HazardSpread::default();
        let mut commands = Vec::new();

        spread.handle(&[time_advanced(3_000)], &terrain, &mut commands);
        assert!(commands.is_empty(), "no free neighbor remains anywhere");
    }

    #[test]
    fn zero_interval_disables_spreading() {
        let terrain = MaskTerrain::new(3, 3, &[GridCoord::new(1, 1)]);
        let mut spread = HazardSpread::new(Config::new(Duration::ZERO, 10));
        let mut commands = Vec::new();

        spread.handle(&[time_advanced(10_000)], &terrain, &mut commands);
        assert!(commands.is_empty());
    }
}
