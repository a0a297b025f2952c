#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for The Floor is Lava.
//!
//! The world owns the active grid dimensions, the immutable static
//! walkability layer parsed out of map data, and the hazard mask. All
//! mutation flows through [`apply`]; systems and adapters read state
//! exclusively through the [`query`] module.

use floor_is_lava_core::{
    Command, Event, GridDimensions, HazardMask, WELCOME_BANNER,
};
use floor_is_lava_system_terrain::{GenerationConfig, HazardGenerator};

const DEFAULT_GRID_WIDTH: u32 = 100;
const DEFAULT_GRID_HEIGHT: u32 = 100;

/// Represents the authoritative world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    dimensions: GridDimensions,
    // Dense row-major layer; true marks a cell terrain data declares
    // impassable (water and the like). Absence of an entry is walkable.
    static_blocked: Vec<bool>,
    hazard: HazardMask,
    generator: HazardGenerator,
    tick_index: u64,
}

impl World {
    /// Creates a new world with the default grid and generation tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generation_config(GenerationConfig::default())
    }

    /// Creates a new world using custom hazard generation tuning.
    #[must_use]
    pub fn with_generation_config(config: GenerationConfig) -> Self {
        let dimensions = GridDimensions::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT);
        Self {
            banner: WELCOME_BANNER,
            dimensions,
            static_blocked: vec![false; dimensions.cell_count()],
            hazard: HazardMask::new(dimensions),
            generator: HazardGenerator::new(config),
            tick_index: 0,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { width, height } => {
            world.dimensions = GridDimensions::new(width, height);
            world.static_blocked = vec![false; world.dimensions.cell_count()];
            world.hazard = HazardMask::new(world.dimensions);
            out_events.push(Event::GridConfigured { width, height });
        }
        Command::LoadStaticLayer { blocked } => {
            world.static_blocked.fill(false);
            for cell in blocked {
                if let Some(index) = world.dimensions.index_of(cell) {
                    world.static_blocked[index] = true;
                }
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::RegenerateHazard { seed } => {
            world.hazard = world.generator.generate(world.dimensions, seed);
            out_events.push(Event::HazardRegenerated {
                seed,
                hazard_count: world.hazard.hazard_count(),
            });
        }
        Command::MarkHazard { cells } => {
            let mut committed = Vec::new();
            for cell in cells {
                if world.hazard.mark(cell) {
                    committed.push(cell);
                }
            }
            if !committed.is_empty() {
                out_events.push(Event::HazardSpread { cells: committed });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use floor_is_lava_core::{GridCoord, GridDimensions, Terrain};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Authoritative dimensions of the active grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.dimensions
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of hazardous cells currently recorded in the mask.
    #[must_use]
    pub fn hazard_count(world: &World) -> usize {
        world.hazard.hazard_count()
    }

    /// Reports whether the cell is hazardous. Out-of-bounds cells are not.
    #[must_use]
    pub fn is_hazard(world: &World, cell: GridCoord) -> bool {
        world.hazard.is_hazard(cell)
    }

    /// Reports whether the cell can be traversed.
    ///
    /// False outside the grid, on hazardous cells, and on cells the static
    /// layer blocks; true otherwise, matching the permissive default of the
    /// parsed map data.
    #[must_use]
    pub fn is_walkable(world: &World, cell: GridCoord) -> bool {
        let Some(index) = world.dimensions.index_of(cell) else {
            return false;
        };

        !world.hazard.is_hazard(cell) && !world.static_blocked[index]
    }

    /// Captures a read-only terrain view combining all walkability layers.
    #[must_use]
    pub fn terrain(world: &World) -> TerrainView<'_> {
        TerrainView { world }
    }

    /// Read-only oracle over the world's terrain layers.
    #[derive(Clone, Copy, Debug)]
    pub struct TerrainView<'a> {
        world: &'a World,
    }

    impl Terrain for TerrainView<'_> {
        fn dimensions(&self) -> GridDimensions {
            dimensions(self.world)
        }

        fn is_hazard(&self, cell: GridCoord) -> bool {
            is_hazard(self.world, cell)
        }

        fn is_walkable(&self, cell: GridCoord) -> bool {
            is_walkable(self.world, cell)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, World};
    use floor_is_lava_core::{Command, Event, GridCoord, Terrain};
    use std::time::Duration;

    fn configured_world(width: u32, height: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::ConfigureGrid { width, height }, &mut events);
        assert_eq!(events, vec![Event::GridConfigured { width, height }]);
        world
    }

    #[test]
    fn configure_grid_resets_all_layers() {
        let mut world = configured_world(8, 8);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MarkHazard {
                cells: vec![GridCoord::new(2, 2)],
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::LoadStaticLayer {
                blocked: vec![GridCoord::new(3, 3)],
            },
            &mut events,
        );
        assert!(query::is_hazard(&world, GridCoord::new(2, 2)));
        assert!(!query::is_walkable(&world, GridCoord::new(3, 3)));

        apply(
            &mut world,
            Command::ConfigureGrid {
                width: 8,
                height: 8,
            },
            &mut events,
        );
        assert!(!query::is_hazard(&world, GridCoord::new(2, 2)));
        assert!(query::is_walkable(&world, GridCoord::new(3, 3)));
    }

    #[test]
    fn mark_hazard_commits_only_new_in_bounds_cells() {
        let mut world = configured_world(4, 4);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MarkHazard {
                cells: vec![GridCoord::new(1, 1)],
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::MarkHazard {
                cells: vec![
                    GridCoord::new(1, 1),
                    GridCoord::new(2, 1),
                    GridCoord::new(9, 9),
                    GridCoord::new(-1, 0),
                ],
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::HazardSpread {
                cells: vec![GridCoord::new(2, 1)],
            }]
        );
    }

    #[test]
    fn mark_hazard_with_nothing_new_emits_no_event() {
        let mut world = configured_world(4, 4);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MarkHazard {
                cells: vec![GridCoord::new(7, 7)],
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn regeneration_is_deterministic_across_worlds() {
        let mut first = configured_world(60, 40);
        let mut second = configured_world(60, 40);
        let mut events = Vec::new();

        apply(&mut first, Command::RegenerateHazard { seed: 0xAB }, &mut events);
        apply(&mut second, Command::RegenerateHazard { seed: 0xAB }, &mut events);

        let dimensions = query::dimensions(&first);
        for y in 0..dimensions.height() as i32 {
            for x in 0..dimensions.width() as i32 {
                let cell = GridCoord::new(x, y);
                assert_eq!(
                    query::is_hazard(&first, cell),
                    query::is_hazard(&second, cell),
                    "masks diverge at {cell:?}"
                );
            }
        }

        match events.as_slice() {
            [Event::HazardRegenerated { seed: a, hazard_count: first_count }, Event::HazardRegenerated { seed: b, hazard_count: second_count }] => {
                assert_eq!(a, b);
                assert_eq!(first_count, second_count);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn regeneration_replaces_the_mask_wholesale() {
        let mut world = configured_world(60, 40);
        let mut events = Vec::new();

        apply(&mut world, Command::RegenerateHazard { seed: 1 }, &mut events);
        assert!(
            query::hazard_count(&world) > 0,
            "seed 1 should produce some hazard"
        );
        let dimensions = query::dimensions(&world);
        let before: Vec<bool> = (0..dimensions.height() as i32)
            .flat_map(|y| (0..dimensions.width() as i32).map(move |x| GridCoord::new(x, y)))
            .map(|cell| query::is_hazard(&world, cell))
            .collect();

        apply(&mut world, Command::RegenerateHazard { seed: 2 }, &mut events);
        let after: Vec<bool> = (0..dimensions.height() as i32)
            .flat_map(|y| (0..dimensions.width() as i32).map(move |x| GridCoord::new(x, y)))
            .map(|cell| query::is_hazard(&world, cell))
            .collect();
        assert_ne!(before, after, "distinct seeds should reshape the mask");
    }

    #[test]
    fn walkability_merges_static_layer_and_hazard() {
        let mut world = configured_world(5, 5);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::LoadStaticLayer {
                blocked: vec![GridCoord::new(0, 0), GridCoord::new(9, 9)],
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MarkHazard {
                cells: vec![GridCoord::new(1, 0)],
            },
            &mut events,
        );

        assert!(!query::is_walkable(&world, GridCoord::new(0, 0)));
        assert!(!query::is_walkable(&world, GridCoord::new(1, 0)));
        assert!(query::is_walkable(&world, GridCoord::new(2, 0)));
        assert!(!query::is_walkable(&world, GridCoord::new(-1, 2)));
        assert!(!query::is_walkable(&world, GridCoord::new(5, 2)));
        assert!(!query::is_hazard(&world, GridCoord::new(5, 2)));
    }

    #[test]
    fn terrain_view_mirrors_queries() {
        let mut world = configured_world(3, 3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MarkHazard {
                cells: vec![GridCoord::new(1, 1)],
            },
            &mut events,
        );

        let view = query::terrain(&world);
        assert_eq!(view.dimensions(), query::dimensions(&world));
        assert!(view.is_hazard(GridCoord::new(1, 1)));
        assert!(!view.is_walkable(GridCoord::new(1, 1)));
        assert!(view.is_walkable(GridCoord::new(0, 1)));
    }

    #[test]
    fn ticks_advance_the_clock_and_emit_time() {
        let mut world = configured_world(3, 3);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            }]
        );
    }

    #[test]
    fn welcome_banner_matches_core_constant() {
        let world = World::new();
        assert_eq!(
            query::welcome_banner(&world),
            floor_is_lava_core::WELCOME_BANNER
        );
    }
}
