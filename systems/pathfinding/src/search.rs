//! A* search over four-connected grids.

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::grid::{PathfindableMap, TilePoint};

/// Shortest four-connected path from `from` to `to`, both included.
///
/// Costs are one per step and the heuristic is the Manhattan distance. Among
/// equally promising nodes the lowest row-major index is expanded first, so
/// the same grid always yields the same path. Returns `None` when either end
/// lies outside the grid, the goal is blocked, or no path exists.
#[must_use]
pub fn find_path(map: &impl PathfindableMap, from: TilePoint, to: TilePoint) -> Option<Vec<TilePoint>> {
    let columns = map.columns();
    let rows = map.rows();
    let start = index(columns, rows, from)?;
    let goal = index(columns, rows, to)?;
    if map.is_blocked(to) {
        return None;
    }

    let cells = usize::try_from(u64::from(columns) * u64::from(rows)).ok()?;
    let mut cost = vec![u32::MAX; cells];
    let mut came_from: Vec<Option<usize>> = vec![None; cells];
    let mut closed = vec![false; cells];
    let mut open = BinaryHeap::new();

    cost[start] = 0;
    open.push(Reverse((from.manhattan_distance(to), start)));

    while let Some(Reverse((_, current))) = open.pop() {
        if current == goal {
            return Some(rebuild(columns, &came_from, goal));
        }
        if closed[current] {
            continue;
        }
        closed[current] = true;

        let point = point_of(columns, current);
        let next_cost = cost[current].saturating_add(1);
        for neighbour in neighbours(point, columns, rows) {
            if map.is_blocked(neighbour) {
                continue;
            }
            let Some(next) = index(columns, rows, neighbour) else {
                continue;
            };
            if closed[next] || cost[next] <= next_cost {
                continue;
            }
            cost[next] = next_cost;
            came_from[next] = Some(current);
            open.push(Reverse((
                next_cost.saturating_add(neighbour.manhattan_distance(to)),
                next,
            )));
        }
    }
    None
}

fn rebuild(columns: u32, came_from: &[Option<usize>], goal: usize) -> Vec<TilePoint> {
    let mut path = vec![point_of(columns, goal)];
    let mut current = goal;
    while let Some(previous) = came_from[current] {
        path.push(point_of(columns, previous));
        current = previous;
    }
    path.reverse();
    path
}

fn neighbours(point: TilePoint, columns: u32, rows: u32) -> impl Iterator<Item = TilePoint> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(ty) = point.ty.checked_sub(1) {
        candidates[count] = Some(TilePoint::new(point.tx, ty));
        count += 1;
    }
    if point.tx + 1 < columns {
        candidates[count] = Some(TilePoint::new(point.tx + 1, point.ty));
        count += 1;
    }
    if point.ty + 1 < rows {
        candidates[count] = Some(TilePoint::new(point.tx, point.ty + 1));
        count += 1;
    }
    if let Some(tx) = point.tx.checked_sub(1) {
        candidates[count] = Some(TilePoint::new(tx, point.ty));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(columns: u32, rows: u32, point: TilePoint) -> Option<usize> {
    if point.tx >= columns || point.ty >= rows {
        return None;
    }
    let row = usize::try_from(point.ty).ok()?;
    let column = usize::try_from(point.tx).ok()?;
    row.checked_mul(usize::try_from(columns).ok()?)?
        .checked_add(column)
}

fn point_of(columns: u32, index: usize) -> TilePoint {
    let columns = u64::from(columns.max(1));
    let index = index as u64;
    TilePoint::new((index % columns) as u32, (index / columns) as u32)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct Grid {
        columns: u32,
        rows: u32,
        walls: HashSet<TilePoint>,
    }

    impl Grid {
        fn new(columns: u32, rows: u32, walls: &[(u32, u32)]) -> Self {
            Self {
                columns,
                rows,
                walls: walls.iter().map(|&(tx, ty)| TilePoint::new(tx, ty)).collect(),
            }
        }
    }

    impl PathfindableMap for Grid {
        fn columns(&self) -> u32 {
            self.columns
        }

        fn rows(&self) -> u32 {
            self.rows
        }

        fn tile_width(&self) -> u32 {
            16
        }

        fn tile_height(&self) -> u32 {
            16
        }

        fn is_blocked(&self, point: TilePoint) -> bool {
            self.walls.contains(&point)
        }
    }

    fn points(path: &[TilePoint]) -> Vec<(u32, u32)> {
        path.iter().map(|point| (point.tx, point.ty)).collect()
    }

    #[test]
    fn path_to_self_is_a_single_tile() {
        let grid = Grid::new(3, 3, &[]);
        let path = find_path(&grid, TilePoint::new(1, 1), TilePoint::new(1, 1));
        assert_eq!(path, Some(vec![TilePoint::new(1, 1)]));
    }

    #[test]
    fn path_walks_around_walls() {
        // . # .
        // . # .
        // . . .
        let grid = Grid::new(3, 3, &[(1, 0), (1, 1)]);
        let path = find_path(&grid, TilePoint::new(0, 0), TilePoint::new(2, 0)).expect("path");
        assert_eq!(
            points(&path),
            vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0)]
        );
    }

    #[test]
    fn equal_paths_resolve_identically() {
        let grid = Grid::new(4, 4, &[]);
        let first = find_path(&grid, TilePoint::new(0, 0), TilePoint::new(3, 3)).expect("path");
        let second = find_path(&grid, TilePoint::new(0, 0), TilePoint::new(3, 3)).expect("path");
        assert_eq!(first, second);
        assert_eq!(first.len(), 7);
        for pair in first.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn unreachable_or_invalid_goals_yield_none() {
        let enclosed = Grid::new(3, 3, &[(1, 0), (0, 1), (2, 1), (1, 2)]);
        assert_eq!(find_path(&enclosed, TilePoint::new(0, 0), TilePoint::new(1, 1)), None);
        assert_eq!(find_path(&enclosed, TilePoint::new(0, 0), TilePoint::new(1, 0)), None);
        assert_eq!(find_path(&enclosed, TilePoint::new(0, 0), TilePoint::new(5, 0)), None);
        assert_eq!(find_path(&enclosed, TilePoint::new(9, 9), TilePoint::new(0, 0)), None);
    }
}
