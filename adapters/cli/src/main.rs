#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots The Floor is Lava experience headlessly.
//!
//! The binary is the composition root: it configures the world, regenerates
//! the hazard mask from a seed, optionally drives the spreading system for a
//! number of ticks, routes between two cells, and renders the result as
//! ASCII. `--compare` mirrors the original GPS overlay that displayed the
//! Dijkstra and A* routes side by side.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use floor_is_lava_core::{Command, GridCoord, PathStrategy};
use floor_is_lava_system_navigation::{find_astar_path, find_dijkstra_path, find_path};
use floor_is_lava_system_spread::HazardSpread;
use floor_is_lava_world::{self as world, query, World};

/// Errors produced while parsing `X,Y` coordinate arguments.
#[derive(Debug, thiserror::Error)]
enum CoordParseError {
    /// The argument did not contain exactly one comma.
    #[error("expected a coordinate shaped like `X,Y`, found `{0}`")]
    Shape(String),
    /// One of the components was not a valid integer.
    #[error("invalid number `{0}` in coordinate")]
    Number(String),
}

/// Grid coordinate argument parsed from `X,Y` syntax.
#[derive(Clone, Copy, Debug)]
struct CoordArg(GridCoord);

impl FromStr for CoordArg {
    type Err = CoordParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (x, y) = raw
            .split_once(',')
            .ok_or_else(|| CoordParseError::Shape(raw.to_owned()))?;
        let x: i32 = x
            .trim()
            .parse()
            .map_err(|_| CoordParseError::Number(x.to_owned()))?;
        let y: i32 = y
            .trim()
            .parse()
            .map_err(|_| CoordParseError::Number(y.to_owned()))?;
        Ok(Self(GridCoord::new(x, y)))
    }
}

/// Routing algorithm selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Uniform-cost search.
    Dijkstra,
    /// Manhattan-heuristic search.
    Astar,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dijkstra => write!(f, "dijkstra"),
            Self::Astar => write!(f, "astar"),
        }
    }
}

impl From<Algorithm> for PathStrategy {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Dijkstra => PathStrategy::Dijkstra,
            Algorithm::Astar => PathStrategy::AStar,
        }
    }
}

/// Headless harness for the lava terrain and routing core.
#[derive(Debug, Parser)]
#[command(name = "floor-is-lava")]
struct Args {
    /// Grid width in tiles.
    #[arg(long, default_value_t = 100)]
    width: u32,

    /// Grid height in tiles.
    #[arg(long, default_value_t = 60)]
    height: u32,

    /// Generation seed; omitted means a fresh random map every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of spread ticks simulated before routing.
    #[arg(long, default_value_t = 0)]
    ticks: u32,

    /// Simulated milliseconds per spread tick.
    #[arg(long, default_value_t = 1000)]
    tick_millis: u64,

    /// Route start cell as `X,Y`.
    #[arg(long, requires = "goal")]
    start: Option<CoordArg>,

    /// Route goal cell as `X,Y`.
    #[arg(long, requires = "start")]
    goal: Option<CoordArg>,

    /// Routing algorithm.
    #[arg(long, value_enum, default_value_t = Algorithm::Astar)]
    algorithm: Algorithm,

    /// Route with both algorithms and report both results.
    #[arg(long)]
    compare: bool,

    /// Block a full-width water band at this row of the static layer.
    #[arg(long)]
    water_row: Option<i32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut world_state = World::new();
    println!("{}", query::welcome_banner(&world_state));

    let mut events = Vec::new();
    world::apply(
        &mut world_state,
        Command::ConfigureGrid {
            width: args.width,
            height: args.height,
        },
        &mut events,
    );

    if let Some(row) = args.water_row {
        world::apply(
            &mut world_state,
            Command::LoadStaticLayer {
                blocked: (0..args.width as i32)
                    .map(|x| GridCoord::new(x, row))
                    .collect(),
            },
            &mut events,
        );
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    world::apply(
        &mut world_state,
        Command::RegenerateHazard { seed },
        &mut events,
    );

    let cell_count = query::dimensions(&world_state).cell_count();
    let coverage = if cell_count == 0 {
        0.0
    } else {
        query::hazard_count(&world_state) as f64 * 100.0 / cell_count as f64
    };
    println!(
        "Generated lava map with seed {seed}: {} lava tiles ({coverage:.1}% coverage)",
        query::hazard_count(&world_state)
    );

    run_spread_ticks(&mut world_state, args.ticks, args.tick_millis);

    let (dijkstra, astar) = match (args.start, args.goal) {
        (Some(CoordArg(start)), Some(CoordArg(goal))) => {
            route(&world_state, start, goal, args.algorithm, args.compare)
        }
        _ => (Vec::new(), Vec::new()),
    };

    render(&world_state, &dijkstra, &astar, args.start, args.goal);
    Ok(())
}

fn run_spread_ticks(world_state: &mut World, ticks: u32, tick_millis: u64) {
    if ticks == 0 {
        return;
    }

    let mut spread = HazardSpread::default();
    let dt = Duration::from_millis(tick_millis);

    for _ in 0..ticks {
        let mut events = Vec::new();
        world::apply(world_state, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        spread.handle(&events, &query::terrain(world_state), &mut commands);

        let mut follow_up = Vec::new();
        for command in commands {
            world::apply(world_state, command, &mut follow_up);
        }
    }

    println!(
        "After {ticks} ticks the lava covers {} tiles",
        query::hazard_count(world_state)
    );
}

/// Runs the requested route queries and reports their outcomes.
///
/// Returns the Dijkstra and A* paths; without `--compare` only the slot for
/// the selected algorithm is populated.
fn route(
    world_state: &World,
    start: GridCoord,
    goal: GridCoord,
    algorithm: Algorithm,
    compare: bool,
) -> (Vec<GridCoord>, Vec<GridCoord>) {
    let terrain = query::terrain(world_state);

    if compare {
        let dijkstra = find_dijkstra_path(&terrain, start, goal);
        let astar = find_astar_path(&terrain, start, goal);
        report("Dijkstra", &dijkstra);
        report("A*", &astar);
        return (dijkstra, astar);
    }

    let path = find_path(&terrain, start, goal, algorithm.into());
    match algorithm {
        Algorithm::Dijkstra => {
            report("Dijkstra", &path);
            (path, Vec::new())
        }
        Algorithm::Astar => {
            report("A*", &path);
            (Vec::new(), path)
        }
    }
}

fn report(name: &str, path: &[GridCoord]) {
    if path.is_empty() {
        println!("{name}: no path found");
    } else {
        println!("{name}: path of {} tiles", path.len());
    }
}

/// Renders the grid as ASCII: `#` lava, `~` static block, `.` safe ground,
/// `d`/`a`/`o` route cells (Dijkstra only, A* only, both), `S`/`G` endpoints.
fn render(
    world_state: &World,
    dijkstra: &[GridCoord],
    astar: &[GridCoord],
    start: Option<CoordArg>,
    goal: Option<CoordArg>,
) {
    let dimensions = query::dimensions(world_state);
    let mut output = String::new();

    for y in 0..dimensions.height() as i32 {
        for x in 0..dimensions.width() as i32 {
            let cell = GridCoord::new(x, y);
            let glyph = if start.is_some_and(|CoordArg(s)| s == cell) {
                'S'
            } else if goal.is_some_and(|CoordArg(g)| g == cell) {
                'G'
            } else {
                let on_dijkstra = dijkstra.contains(&cell);
                let on_astar = astar.contains(&cell);
                if on_dijkstra && on_astar {
                    'o'
                } else if on_dijkstra {
                    'd'
                } else if on_astar {
                    'a'
                } else if query::is_hazard(world_state, cell) {
                    '#'
                } else if !query::is_walkable(world_state, cell) {
                    '~'
                } else {
                    '.'
                }
            };
            output.push(glyph);
        }
        output.push('\n');
    }

    print!("{output}");
}
