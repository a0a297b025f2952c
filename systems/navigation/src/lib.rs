#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shortest-path routing over walkable terrain.
//!
//! Both algorithms run the same uniform-cost best-first search over the
//! 4-connected grid exposed by a [`Terrain`] implementation; they differ
//! only in the priority key. Dijkstra orders the frontier by accumulated
//! cost alone, A* adds the Manhattan distance to the goal, which is
//! admissible and consistent on a uniform-cost grid and therefore preserves
//! optimality while visiting fewer cells. Unreachable goals and unwalkable
//! endpoints yield an empty path, never an error.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use floor_is_lava_core::{GridCoord, PathStrategy, Terrain};

/// Finds a shortest walkable path using uniform-cost (Dijkstra) search.
///
/// Returns the ordered cells from `start` to `goal` inclusive, or an empty
/// vector when no path exists or either endpoint is unwalkable.
#[must_use]
pub fn find_dijkstra_path<T>(terrain: &T, start: GridCoord, goal: GridCoord) -> Vec<GridCoord>
where
    T: Terrain,
{
    search(terrain, start, goal, |_| 0)
}

/// Finds a shortest walkable path using A* with a Manhattan heuristic.
///
/// Returns the ordered cells from `start` to `goal` inclusive, or an empty
/// vector when no path exists or either endpoint is unwalkable.
#[must_use]
pub fn find_astar_path<T>(terrain: &T, start: GridCoord, goal: GridCoord) -> Vec<GridCoord>
where
    T: Terrain,
{
    search(terrain, start, goal, |cell| cell.manhattan_distance(goal))
}

/// Dispatches to the requested algorithm.
#[must_use]
pub fn find_path<T>(
    terrain: &T,
    start: GridCoord,
    goal: GridCoord,
    strategy: PathStrategy,
) -> Vec<GridCoord>
where
    T: Terrain,
{
    match strategy {
        PathStrategy::Dijkstra => find_dijkstra_path(terrain, start, goal),
        PathStrategy::AStar => find_astar_path(terrain, start, goal),
    }
}

// Frontier entries order on (priority, cost, cell); the derived
// lexicographic ordering makes equal-priority pops deterministic by
// coordinate instead of heap insertion accident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    priority: u32,
    cost: u32,
    cell: GridCoord,
}

fn search<T, H>(terrain: &T, start: GridCoord, goal: GridCoord, heuristic: H) -> Vec<GridCoord>
where
    T: Terrain,
    H: Fn(GridCoord) -> u32,
{
    // Standing on or targeting an unwalkable cell is never routable.
    if !terrain.is_walkable(start) || !terrain.is_walkable(goal) {
        return Vec::new();
    }

    if start == goal {
        return vec![start];
    }

    let mut frontier = BinaryHeap::new();
    let mut best_cost: HashMap<GridCoord, u32> = HashMap::new();
    let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();

    frontier.push(Reverse(FrontierEntry {
        priority: heuristic(start),
        cost: 0,
        cell: start,
    }));
    let _ = best_cost.insert(start, 0);

    while let Some(Reverse(entry)) = frontier.pop() {
        if entry.cell == goal {
            return reconstruct(&came_from, start, goal);
        }

        // Re-pushing replaces decrease-key, so entries superseded by a
        // cheaper route must be skipped when they finally surface.
        if best_cost
            .get(&entry.cell)
            .is_some_and(|best| entry.cost > *best)
        {
            continue;
        }

        for neighbor in entry.cell.neighbors() {
            if !terrain.is_walkable(neighbor) {
                continue;
            }

            let tentative = entry.cost + 1;
            let improved = best_cost
                .get(&neighbor)
                .map_or(true, |known| tentative < *known);
            if improved {
                let _ = best_cost.insert(neighbor, tentative);
                let _ = came_from.insert(neighbor, entry.cell);
                frontier.push(Reverse(FrontierEntry {
                    priority: tentative + heuristic(neighbor),
                    cost: tentative,
                    cell: neighbor,
                }));
            }
        }
    }

    Vec::new()
}

fn reconstruct(
    came_from: &HashMap<GridCoord, GridCoord>,
    start: GridCoord,
    goal: GridCoord,
) -> Vec<GridCoord> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        let Some(previous) = came_from.get(&current) else {
            return Vec::new();
        };
        current = *previous;
        path.push(current);
    }

    path.reverse();
    path
}
