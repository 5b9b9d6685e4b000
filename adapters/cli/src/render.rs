//! ASCII rendering of a world snapshot.

use gridfire_core::{ActorKind, CellCoord, Vector2};
use gridfire_world::{query, World};

const WALL: char = '#';
const FLOOR: char = '.';
const MARKER: char = '*';
const PROJECTILE: char = 'o';

fn actor_glyph(kind: ActorKind) -> char {
    match kind {
        ActorKind::Player => '@',
        ActorKind::Sentry => 's',
        ActorKind::HeavySentry => 'H',
        ActorKind::ClusterSentry => 'c',
        ActorKind::Stalker => 'k',
    }
}

struct Canvas {
    origin: CellCoord,
    columns: usize,
    rows: Vec<Vec<char>>,
}

impl Canvas {
    fn new(min: CellCoord, max: CellCoord) -> Self {
        let span = |low: i32, high: i32| usize::try_from(high - low + 1).unwrap_or(0);
        let columns = span(min.column(), max.column());
        let rows = span(min.row(), max.row());
        Self {
            origin: min,
            columns,
            rows: vec![vec![FLOOR; columns]; rows],
        }
    }

    fn slot(&mut self, cell: CellCoord) -> Option<&mut char> {
        let column = usize::try_from(cell.column() - self.origin.column()).ok()?;
        let row = usize::try_from(cell.row() - self.origin.row()).ok()?;
        if column >= self.columns {
            return None;
        }
        self.rows.get_mut(row)?.get_mut(column)
    }

    fn draw(&mut self, position: Vector2, glyph: char) {
        if let Some(slot) = self.slot(CellCoord::containing(position)) {
            *slot = glyph;
        }
    }

    fn finish(self) -> String {
        let mut frame = String::with_capacity(self.rows.len() * (self.columns + 1));
        for row in self.rows {
            frame.extend(row);
            frame.push('\n');
        }
        frame
    }
}

/// Draws the tiles and entities inside the bounding box of the solid tiles.
///
/// Later layers win: markers over tiles, projectiles over markers and actors
/// over everything. An empty grid renders as an empty string.
#[must_use]
pub(crate) fn render_frame(world: &World) -> String {
    let grid = query::grid(world);
    let Some((min, max)) = grid.bounds() else {
        return String::new();
    };

    let mut canvas = Canvas::new(min, max);
    for row in min.row()..=max.row() {
        for column in min.column()..=max.column() {
            let cell = CellCoord::new(column, row);
            if grid.is_solid(cell) {
                if let Some(slot) = canvas.slot(cell) {
                    *slot = WALL;
                }
            }
        }
    }
    for marker in query::markers(world) {
        canvas.draw(marker.position(), MARKER);
    }
    for projectile in query::projectile_view(world).iter() {
        canvas.draw(projectile.position, PROJECTILE);
    }
    for actor in query::actor_view(world).iter() {
        canvas.draw(actor.position, actor_glyph(actor.kind));
    }
    canvas.finish()
}
