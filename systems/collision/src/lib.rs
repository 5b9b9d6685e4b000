#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Swept axis-aligned collision resolution against the tile grid.
//!
//! A moving body is advanced by its momentum and every solid tile its new
//! bounding box overlaps is resolved by clamping the body flush against the
//! face it approached. Tiles touched only at a corner are resolved along the
//! axis with the larger travel distance when they are the sole overlap.

use gridfire_core::{CellCoord, Movable, Side, Vector2};

/// Shrinks the far edges of the scanned box so a body resting flush against
/// a tile does not register that tile as an overlap.
const FLUSH_TOLERANCE: f64 = 0.0001;

/// Outcome of advancing a body by one tick of momentum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Centre of the body after collisions were resolved.
    pub position: Vector2,
    /// Face struck during the move, `None` when the path was clear.
    ///
    /// [`Side::Horizontal`] means a top or bottom face stopped vertical travel;
    /// [`Side::Vertical`] means a left or right face stopped horizontal travel.
    pub side: Option<Side>,
}

/// Advances a body centred on `position` by `momentum` and resolves overlaps with solid tiles.
///
/// The returned position is rounded to three decimals so repeated moves do
/// not accumulate gaps or overlaps against walls.
pub fn resolve_motion<F>(
    position: Vector2,
    half_extents: Vector2,
    momentum: Vector2,
    is_solid: F,
) -> Resolution
where
    F: Fn(CellCoord) -> bool,
{
    let size = half_extents * 2.0;
    let old_top_left = position - half_extents;
    let mut resolved = position + momentum;
    let new_top_left = resolved - half_extents;

    let first = CellCoord::containing(new_top_left);
    let last = CellCoord::containing(
        new_top_left + size - Vector2::new(FLUSH_TOLERANCE, FLUSH_TOLERANCE),
    );
    let last_column = last.column().max(first.column());
    let last_row = last.row().max(first.row());

    let mut side = None;
    let mut overlaps = 0_u32;
    let mut overlapped = first;
    let mut corner_only = false;

    for row in first.row()..=last_row {
        for column in first.column()..=last_column {
            let cell = CellCoord::new(column, row);
            if !is_solid(cell) {
                continue;
            }

            overlaps += 1;
            overlapped = cell;
            let tile_x = f64::from(column);
            let tile_y = f64::from(row);

            if spans(tile_x, old_top_left.x, size.x) && momentum.y != 0.0 {
                side = Some(Side::Horizontal);
                resolved.y = flush_against(tile_y, half_extents.y, momentum.y);
            } else if spans(tile_y, old_top_left.y, size.y) && momentum.x != 0.0 {
                side = Some(Side::Vertical);
                resolved.x = flush_against(tile_x, half_extents.x, momentum.x);
            } else {
                corner_only = true;
            }
        }
    }

    if corner_only && overlaps == 1 {
        let travel = new_top_left - old_top_left;
        if travel.x.abs() > travel.y.abs() {
            side = Some(Side::Vertical);
            resolved.x = flush_against(f64::from(overlapped.column()), half_extents.x, momentum.x);
        } else {
            side = Some(Side::Horizontal);
            resolved.y = flush_against(f64::from(overlapped.row()), half_extents.y, momentum.y);
        }
    }

    Resolution {
        position: resolved.round_to_precision(),
        side,
    }
}

/// Moves `body` by its own momentum, resolving collisions in place.
pub fn advance<M, F>(body: &mut M, is_solid: F) -> Option<Side>
where
    M: Movable + ?Sized,
    F: Fn(CellCoord) -> bool,
{
    let resolution = resolve_motion(
        body.position(),
        body.half_extents(),
        body.momentum(),
        is_solid,
    );
    body.set_position(resolution.position);
    resolution.side
}

/// Whether the unit tile starting at `tile_start` overlaps the span `[start, start + length)`.
fn spans(tile_start: f64, start: f64, length: f64) -> bool {
    tile_start < start + length && tile_start + 1.0 > start
}

/// Centre coordinate that leaves the body's leading edge flush with the tile.
fn flush_against(tile_start: f64, half_extent: f64, velocity: f64) -> f64 {
    if velocity > 0.0 {
        tile_start - half_extent
    } else {
        tile_start + 1.0 + half_extent
    }
}
