use std::collections::HashSet;

use gridfire_core::{CellCoord, Damageable, EntityId, Faction, Positioned, Side, Vector2};
use gridfire_system_raycast::{find_block_between, find_block_from_ray, find_entity_from_ray};

fn solid_cells(cells: &[(i32, i32)]) -> HashSet<CellCoord> {
    cells
        .iter()
        .map(|&(column, row)| CellCoord::new(column, row))
        .collect()
}

fn assert_close(actual: Vector2, expected: Vector2) {
    assert!(
        (actual.x - expected.x).abs() < 1e-6 && (actual.y - expected.y).abs() < 1e-6,
        "expected {expected:?}, got {actual:?}"
    );
}

#[derive(Debug)]
struct Target {
    id: EntityId,
    position: Vector2,
    half: f64,
    faction: Faction,
    immune: bool,
}

impl Target {
    fn new(id: u32, x: f64, y: f64, faction: Faction) -> Self {
        Self {
            id: EntityId::new(id),
            position: Vector2::new(x, y),
            half: 0.375,
            faction,
            immune: false,
        }
    }
}

impl Positioned for Target {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn half_extents(&self) -> Vector2 {
        Vector2::new(self.half, self.half)
    }
}

impl Damageable for Target {
    fn faction(&self) -> Faction {
        self.faction
    }

    fn is_immune(&self) -> bool {
        self.immune
    }

    fn health(&self) -> i32 {
        1
    }

    fn damage(&mut self, _amount: i32) {
        self.immune = true;
    }
}

#[test]
fn diagonal_ray_stops_at_single_tile() {
    let solid = solid_cells(&[(5, 5)]);
    let hit = find_block_from_ray(Vector2::ZERO, Vector2::new(10.0, 10.0), |cell| {
        solid.contains(&cell)
    });

    assert_eq!(hit.cell, Some(CellCoord::new(5, 5)));
    assert!(hit.side.is_some());
    assert_close(hit.hit_position, Vector2::new(5.0, 5.0));
}

#[test]
fn unobstructed_ray_reports_exact_endpoint() {
    let start = Vector2::new(1.3, 2.7);
    let ray = Vector2::new(4.1, -1.9);
    let hit = find_block_from_ray(start, ray, |_| false);

    assert_eq!(hit.cell, None);
    assert_eq!(hit.side, None);
    assert!(!hit.is_hit());
    assert_eq!(hit.hit_position, start + ray);
}

#[test]
fn rightward_ray_hits_vertical_face() {
    let solid = solid_cells(&[(4, 2)]);
    let hit = find_block_from_ray(Vector2::new(0.5, 2.5), Vector2::new(10.0, 0.0), |cell| {
        solid.contains(&cell)
    });

    assert_eq!(hit.cell, Some(CellCoord::new(4, 2)));
    assert_eq!(hit.side, Some(Side::Vertical));
    assert_close(hit.hit_position, Vector2::new(4.0, 2.5));
}

#[test]
fn leftward_ray_reports_tile_behind_grid_line() {
    let solid = solid_cells(&[(1, 2)]);
    let hit = find_block_from_ray(Vector2::new(6.5, 2.5), Vector2::new(-10.0, 0.0), |cell| {
        solid.contains(&cell)
    });

    assert_eq!(hit.cell, Some(CellCoord::new(1, 2)));
    assert_eq!(hit.side, Some(Side::Vertical));
    assert_close(hit.hit_position, Vector2::new(2.0, 2.5));
}

#[test]
fn upward_ray_hits_horizontal_face() {
    let solid = solid_cells(&[(3, -4)]);
    let hit = find_block_from_ray(Vector2::new(3.5, 0.5), Vector2::new(0.0, -8.0), |cell| {
        solid.contains(&cell)
    });

    assert_eq!(hit.cell, Some(CellCoord::new(3, -4)));
    assert_eq!(hit.side, Some(Side::Horizontal));
    assert_close(hit.hit_position, Vector2::new(3.5, -3.0));
}

#[test]
fn ray_shorter_than_gap_misses() {
    let solid = solid_cells(&[(8, 0)]);
    let start = Vector2::new(0.5, 0.5);
    let ray = Vector2::new(3.0, 0.0);
    let hit = find_block_from_ray(start, ray, |cell| solid.contains(&cell));

    assert_eq!(hit.cell, None);
    assert_eq!(hit.hit_position, start + ray);
}

#[test]
fn zero_length_ray_stays_at_origin() {
    let start = Vector2::new(2.5, 2.5);
    let hit = find_block_from_ray(start, Vector2::ZERO, |_| true);

    assert_eq!(hit.cell, None);
    assert_eq!(hit.hit_position, start);
}

#[test]
fn block_between_detects_wall_between_points() {
    let solid = solid_cells(&[(5, 0), (5, 1), (5, 2)]);
    let blocked = find_block_between(Vector2::new(1.5, 1.5), Vector2::new(9.5, 1.5), |cell| {
        solid.contains(&cell)
    });
    assert!(blocked.is_hit());

    let clear = find_block_between(Vector2::new(1.5, 4.5), Vector2::new(9.5, 4.5), |cell| {
        solid.contains(&cell)
    });
    assert!(!clear.is_hit());
}

#[test]
fn entity_on_ray_path_is_returned() {
    let targets = vec![Target::new(7, 5.0, 0.0, Faction::Hostile)];
    let hit = find_entity_from_ray(
        Vector2::new(0.0, 0.1),
        Vector2::new(10.0, 0.1),
        Faction::Hostile,
        &targets,
    );

    assert_eq!(hit.entity, Some(EntityId::new(7)));
    assert_eq!(hit.side, Some(Side::Vertical));
    assert_close(hit.hit_position, Vector2::new(4.625, 0.1));
}

#[test]
fn closest_entity_wins() {
    let targets = vec![
        Target::new(1, 8.0, 0.0, Faction::Hostile),
        Target::new(2, 3.0, 0.0, Faction::Hostile),
    ];
    let hit = find_entity_from_ray(
        Vector2::new(0.0, 0.0),
        Vector2::new(10.0, 0.2),
        Faction::Hostile,
        &targets,
    );

    assert_eq!(hit.entity, Some(EntityId::new(2)));
}

#[test]
fn vertical_ray_strikes_top_face() {
    let targets = vec![Target::new(3, 2.0, 6.0, Faction::Friendly)];
    let hit = find_entity_from_ray(
        Vector2::new(2.1, 0.0),
        Vector2::new(2.1, 10.0),
        Faction::Friendly,
        &targets,
    );

    assert_eq!(hit.entity, Some(EntityId::new(3)));
    assert_eq!(hit.side, Some(Side::Horizontal));
    assert_close(hit.hit_position, Vector2::new(2.1, 5.625));
}

#[test]
fn wrong_faction_is_never_returned() {
    let targets = vec![Target::new(1, 5.0, 0.0, Faction::Friendly)];
    let finish = Vector2::new(10.0, 0.1);
    let hit = find_entity_from_ray(Vector2::new(0.0, 0.1), finish, Faction::Hostile, &targets);

    assert_eq!(hit.entity, None);
    assert_eq!(hit.side, None);
    assert_eq!(hit.hit_position, finish);
}

#[test]
fn immune_entity_is_never_returned() {
    let mut target = Target::new(1, 5.0, 0.0, Faction::Hostile);
    target.damage(1);
    let targets = vec![target];
    let hit = find_entity_from_ray(
        Vector2::new(0.0, 0.1),
        Vector2::new(10.0, 0.1),
        Faction::Hostile,
        &targets,
    );

    assert_eq!(hit.entity, None);
}

#[test]
fn entity_beyond_segment_end_is_ignored() {
    let targets = vec![Target::new(1, 12.0, 0.0, Faction::Hostile)];
    let hit = find_entity_from_ray(
        Vector2::new(0.0, 0.1),
        Vector2::new(10.0, 0.1),
        Faction::Hostile,
        &targets,
    );

    assert_eq!(hit.entity, None);
}
