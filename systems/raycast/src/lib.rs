#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure raycasting queries against the tile grid and against damageable entities.
//!
//! Both raycasters are read-only. The grid is consulted through an
//! `is_solid` closure so callers can cast against the authoritative world or
//! against any other tile source that shares the half-open tile convention.

use gridfire_core::{CellCoord, Damageable, EntityId, Faction, Side, Vector2};

/// Result of casting a ray through the tile grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockHit {
    /// Solid tile struck by the ray, `None` when the ray reached its end.
    pub cell: Option<CellCoord>,
    /// Exact point where the ray stopped.
    pub hit_position: Vector2,
    /// Face of the tile that was struck.
    pub side: Option<Side>,
}

impl BlockHit {
    const fn miss(finish: Vector2) -> Self {
        Self {
            cell: None,
            hit_position: finish,
            side: None,
        }
    }

    /// Whether the ray struck a solid tile.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.cell.is_some()
    }
}

/// Result of casting a ray against entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityHit {
    /// Entity struck by the ray, `None` when nothing was in the way.
    pub entity: Option<EntityId>,
    /// Exact point where the ray stopped.
    pub hit_position: Vector2,
    /// Face of the entity's bounding box that was struck.
    pub side: Option<Side>,
}

impl EntityHit {
    const fn miss(finish: Vector2) -> Self {
        Self {
            entity: None,
            hit_position: finish,
            side: None,
        }
    }
}

/// Vector describing the ray that leads from `start` to `finish`.
#[must_use]
pub fn ray_direction(start: Vector2, finish: Vector2) -> Vector2 {
    start.towards(finish)
}

/// Casts `ray` from `start` and returns the first solid tile it crosses.
///
/// `ray` carries both the direction and the length of the cast. Grid lines are
/// scanned independently along each axis and the crossing closest to `start`
/// wins. When nothing solid is found the returned hit position is exactly
/// `start + ray`.
pub fn find_block_from_ray<F>(start: Vector2, ray: Vector2, is_solid: F) -> BlockHit
where
    F: Fn(CellCoord) -> bool,
{
    let miss = BlockHit::miss(start + ray);
    let across_columns = scan_columns(start, ray, &is_solid).unwrap_or(miss);
    let across_rows = scan_rows(start, ray, &is_solid).unwrap_or(miss);

    if start.distance(across_columns.hit_position) < start.distance(across_rows.hit_position) {
        across_columns
    } else {
        across_rows
    }
}

/// Casts a ray from `start` to `finish`; a miss means the two points can see each other.
pub fn find_block_between<F>(start: Vector2, finish: Vector2, is_solid: F) -> BlockHit
where
    F: Fn(CellCoord) -> bool,
{
    find_block_from_ray(start, ray_direction(start, finish), is_solid)
}

/// Casts the segment `start..finish` against the bounding boxes of `candidates`.
///
/// Only candidates belonging to `faction` that are not immune can be struck.
/// The closest crossing of a bounding box edge wins; a miss reports `finish`
/// as the hit position.
pub fn find_entity_from_ray<'a, T, I>(
    start: Vector2,
    finish: Vector2,
    faction: Faction,
    candidates: I,
) -> EntityHit
where
    T: Damageable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let ray = ray_direction(start, finish);
    let bounds = RayBounds::new(start, finish);

    let mut closest = EntityHit::miss(finish);
    let mut closest_distance = ray.magnitude();

    for candidate in candidates {
        if candidate.faction() != faction || candidate.is_immune() {
            continue;
        }

        let crossings = edge_crossings(
            start,
            ray,
            &bounds,
            candidate.top_left(),
            candidate.bottom_right(),
        );
        for (hit_position, side) in crossings {
            let distance = start.distance(hit_position);
            if distance < closest_distance {
                closest_distance = distance;
                closest = EntityHit {
                    entity: Some(candidate.id()),
                    hit_position,
                    side: Some(side),
                };
            }
        }
    }

    closest
}

fn scan_columns<F>(start: Vector2, ray: Vector2, is_solid: &F) -> Option<BlockHit>
where
    F: Fn(CellCoord) -> bool,
{
    if ray.x == 0.0 {
        return None;
    }

    let step = ray.x.signum();
    let slope = ray.y / ray.x;
    let mut offset = first_crossing(start.x, step);

    while offset.abs() <= ray.x.abs() {
        let crossing = Vector2::new(start.x + offset, start.y + slope * offset);
        let cell = CellCoord::containing(crossing);
        for candidate in [cell, cell.offset(-1, 0)] {
            if is_solid(candidate) {
                return Some(BlockHit {
                    cell: Some(candidate),
                    hit_position: crossing,
                    side: Some(Side::Vertical),
                });
            }
        }
        offset += step;
    }

    None
}

fn scan_rows<F>(start: Vector2, ray: Vector2, is_solid: &F) -> Option<BlockHit>
where
    F: Fn(CellCoord) -> bool,
{
    if ray.y == 0.0 {
        return None;
    }

    let step = ray.y.signum();
    let slope = ray.x / ray.y;
    let mut offset = first_crossing(start.y, step);

    while offset.abs() <= ray.y.abs() {
        let crossing = Vector2::new(start.x + slope * offset, start.y + offset);
        let cell = CellCoord::containing(crossing);
        for candidate in [cell, cell.offset(0, -1)] {
            if is_solid(candidate) {
                return Some(BlockHit {
                    cell: Some(candidate),
                    hit_position: crossing,
                    side: Some(Side::Horizontal),
                });
            }
        }
        offset += step;
    }

    None
}

/// Offset from `origin` to the first grid line strictly ahead in direction `step`.
fn first_crossing(origin: f64, step: f64) -> f64 {
    let fraction = origin - origin.floor();
    if fraction == 0.0 {
        step
    } else if step > 0.0 {
        step - fraction
    } else {
        step + 1.0 - fraction
    }
}

#[derive(Clone, Copy, Debug)]
struct RayBounds {
    lower: Vector2,
    upper: Vector2,
}

impl RayBounds {
    fn new(start: Vector2, finish: Vector2) -> Self {
        Self {
            lower: Vector2::new(start.x.min(finish.x), start.y.min(finish.y)),
            upper: Vector2::new(start.x.max(finish.x), start.y.max(finish.y)),
        }
    }

    fn spans_row(&self, y: f64) -> bool {
        y > self.lower.y && y < self.upper.y
    }

    fn spans_column(&self, x: f64) -> bool {
        x > self.lower.x && x < self.upper.x
    }
}

fn edge_crossings(
    start: Vector2,
    ray: Vector2,
    bounds: &RayBounds,
    top_left: Vector2,
    bottom_right: Vector2,
) -> impl Iterator<Item = (Vector2, Side)> {
    let mut crossings = [None; 4];

    // A strictly spanned row implies a non-zero vertical component.
    for (slot, edge_y) in crossings[..2]
        .iter_mut()
        .zip([top_left.y, bottom_right.y])
    {
        if bounds.spans_row(edge_y) {
            let x = start.x + (edge_y - start.y) * (ray.x / ray.y);
            if x >= top_left.x && x <= bottom_right.x {
                *slot = Some((Vector2::new(x, edge_y), Side::Horizontal));
            }
        }
    }

    for (slot, edge_x) in crossings[2..]
        .iter_mut()
        .zip([top_left.x, bottom_right.x])
    {
        if bounds.spans_column(edge_x) {
            let y = start.y + (edge_x - start.x) * (ray.y / ray.x);
            if y >= top_left.y && y <= bottom_right.y {
                *slot = Some((Vector2::new(edge_x, y), Side::Vertical));
            }
        }
    }

    crossings.into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_crossing_skips_aligned_origin() {
        assert_eq!(first_crossing(3.0, 1.0), 1.0);
        assert_eq!(first_crossing(3.0, -1.0), -1.0);
    }

    #[test]
    fn first_crossing_reaches_next_grid_line() {
        assert!((first_crossing(3.25, 1.0) - 0.75).abs() < 1e-12);
        assert!((first_crossing(3.25, -1.0) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn zero_component_axis_finds_nothing() {
        let solid = |_: CellCoord| true;
        assert!(scan_columns(Vector2::new(0.5, 0.5), Vector2::new(0.0, 4.0), &solid).is_none());
        assert!(scan_rows(Vector2::new(0.5, 0.5), Vector2::new(4.0, 0.0), &solid).is_none());
    }

    #[test]
    fn horizontal_segment_never_spans_a_row() {
        let bounds = RayBounds::new(Vector2::new(0.0, 2.0), Vector2::new(5.0, 2.0));
        assert!(!bounds.spans_row(2.0));
        assert!(bounds.spans_column(2.5));
    }
}
