use std::collections::HashSet;

use gridfire_core::{CellCoord, EntityId, Movable, Positioned, Side, Vector2};
use gridfire_system_collision::{advance, resolve_motion};
use proptest::prelude::*;

const HALF: Vector2 = Vector2::new(0.375, 0.375);

fn solid_cells(cells: &[(i32, i32)]) -> HashSet<CellCoord> {
    cells
        .iter()
        .map(|&(column, row)| CellCoord::new(column, row))
        .collect()
}

fn assert_close(actual: Vector2, expected: Vector2) {
    assert!(
        (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn clear_path_moves_by_full_momentum() {
    let resolution = resolve_motion(
        Vector2::new(2.5, 2.5),
        HALF,
        Vector2::new(0.2, 0.0),
        |_| false,
    );

    assert_eq!(resolution.side, None);
    assert_close(resolution.position, Vector2::new(2.7, 2.5));
}

#[test]
fn moving_right_stops_flush_against_wall() {
    let solid = solid_cells(&[(3, 2)]);
    let resolution = resolve_motion(
        Vector2::new(2.5, 2.5),
        HALF,
        Vector2::new(0.2, 0.0),
        |cell| solid.contains(&cell),
    );

    assert_eq!(resolution.side, Some(Side::Vertical));
    assert_close(resolution.position, Vector2::new(2.625, 2.5));
    assert_eq!(resolution.position.x + HALF.x, 3.0);
}

#[test]
fn moving_left_stops_flush_against_wall() {
    let solid = solid_cells(&[(1, 2)]);
    let resolution = resolve_motion(
        Vector2::new(2.5, 2.5),
        HALF,
        Vector2::new(-0.3, 0.0),
        |cell| solid.contains(&cell),
    );

    assert_eq!(resolution.side, Some(Side::Vertical));
    assert_close(resolution.position, Vector2::new(2.375, 2.5));
    assert_eq!(resolution.position.x - HALF.x, 2.0);
}

#[test]
fn falling_stops_flush_on_floor() {
    let solid = solid_cells(&[(2, 3)]);
    let resolution = resolve_motion(
        Vector2::new(2.5, 2.5),
        HALF,
        Vector2::new(0.0, 0.2),
        |cell| solid.contains(&cell),
    );

    assert_eq!(resolution.side, Some(Side::Horizontal));
    assert_close(resolution.position, Vector2::new(2.5, 2.625));
}

#[test]
fn rising_stops_flush_under_ceiling() {
    let solid = solid_cells(&[(2, 1)]);
    let resolution = resolve_motion(
        Vector2::new(2.5, 2.5),
        HALF,
        Vector2::new(0.0, -0.3),
        |cell| solid.contains(&cell),
    );

    assert_eq!(resolution.side, Some(Side::Horizontal));
    assert_close(resolution.position, Vector2::new(2.5, 2.375));
}

#[test]
fn corner_approach_resolves_along_dominant_horizontal_travel() {
    let solid = solid_cells(&[(3, 3)]);
    let resolution = resolve_motion(
        Vector2::new(2.5, 2.5),
        HALF,
        Vector2::new(0.3, 0.2),
        |cell| solid.contains(&cell),
    );

    assert_eq!(resolution.side, Some(Side::Vertical));
    assert_close(resolution.position, Vector2::new(2.625, 2.7));
}

#[test]
fn corner_approach_resolves_along_dominant_vertical_travel() {
    let solid = solid_cells(&[(3, 3)]);
    let resolution = resolve_motion(
        Vector2::new(2.5, 2.5),
        HALF,
        Vector2::new(0.2, 0.3),
        |cell| solid.contains(&cell),
    );

    assert_eq!(resolution.side, Some(Side::Horizontal));
    assert_close(resolution.position, Vector2::new(2.7, 2.625));
}

#[test]
fn inside_corner_clamps_both_axes() {
    let solid = solid_cells(&[(3, 2), (2, 3), (3, 3)]);
    let resolution = resolve_motion(
        Vector2::new(2.5, 2.5),
        HALF,
        Vector2::new(0.3, 0.3),
        |cell| solid.contains(&cell),
    );

    assert!(resolution.side.is_some());
    assert_close(resolution.position, Vector2::new(2.625, 2.625));
}

#[test]
fn resting_flush_against_wall_slides_freely() {
    let solid = solid_cells(&[(3, 2), (3, 3)]);
    let resolution = resolve_motion(
        Vector2::new(2.625, 2.5),
        HALF,
        Vector2::new(0.0, 0.1),
        |cell| solid.contains(&cell),
    );

    assert_eq!(resolution.side, None);
    assert_close(resolution.position, Vector2::new(2.625, 2.6));
}

#[derive(Debug)]
struct Body {
    position: Vector2,
    momentum: Vector2,
}

impl Positioned for Body {
    fn id(&self) -> EntityId {
        EntityId::new(1)
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn half_extents(&self) -> Vector2 {
        HALF
    }
}

impl Movable for Body {
    fn momentum(&self) -> Vector2 {
        self.momentum
    }

    fn set_momentum(&mut self, momentum: Vector2) {
        self.momentum = momentum;
    }

    fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }
}

#[test]
fn advance_writes_resolved_position_back() {
    let solid = solid_cells(&[(3, 2)]);
    let mut body = Body {
        position: Vector2::new(2.5, 2.5),
        momentum: Vector2::ZERO,
    };
    body.set_momentum(Vector2::new(0.2, 0.0));

    let first = advance(&mut body, |cell| solid.contains(&cell));
    assert_eq!(first, Some(Side::Vertical));
    assert_close(body.position, Vector2::new(2.625, 2.5));

    let second = advance(&mut body, |cell| solid.contains(&cell));
    assert_eq!(second, Some(Side::Vertical));
    assert_close(body.position, Vector2::new(2.625, 2.5));
}

proptest! {
    #[test]
    fn body_never_ends_inside_wall(
        x in 0.5_f64..4.6,
        y in -3.0_f64..3.0,
        speed in 0.01_f64..0.9,
    ) {
        let resolution = resolve_motion(
            Vector2::new(x, y),
            HALF,
            Vector2::new(speed, 0.0),
            |cell| cell.column() == 5,
        );

        prop_assert!(resolution.position.x + HALF.x <= 5.0 + 1e-9);
    }
}
