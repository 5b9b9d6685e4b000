//! Sparse, unbounded tile storage.

use std::collections::HashMap;

use gridfire_core::{CellCoord, TileId};

/// Sparse tile store keyed by column, then row.
///
/// Columns are materialized the first time a tile is written inside them.
/// Reading a tile that was never written, or that was cleared, yields `None`
/// in both cases; callers cannot tell the two apart.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    columns: HashMap<i32, HashMap<i32, TileId>>,
}

impl Grid {
    /// Creates an empty grid where every tile is passable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Content of the tile, `None` when the tile is empty.
    #[must_use]
    pub fn read(&self, cell: CellCoord) -> Option<TileId> {
        self.columns
            .get(&cell.column())
            .and_then(|rows| rows.get(&cell.row()))
            .copied()
    }

    /// Whether the tile blocks movement, rays and routes.
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.read(cell).is_some()
    }

    /// Writes or clears a single tile, returning its previous content.
    pub fn place(&mut self, cell: CellCoord, tile: Option<TileId>) -> Option<TileId> {
        match tile {
            Some(tile) => self
                .columns
                .entry(cell.column())
                .or_default()
                .insert(cell.row(), tile),
            None => self
                .columns
                .get_mut(&cell.column())
                .and_then(|rows| rows.remove(&cell.row())),
        }
    }

    /// Fills the inclusive rectangle spanned by two corners in any order.
    ///
    /// Returns the tiles whose content actually changed, column by column.
    pub fn place_box(
        &mut self,
        from: CellCoord,
        to: CellCoord,
        tile: Option<TileId>,
    ) -> Vec<CellCoord> {
        let mut changed = Vec::new();
        for column in from.column().min(to.column())..=from.column().max(to.column()) {
            for row in from.row().min(to.row())..=from.row().max(to.row()) {
                let cell = CellCoord::new(column, row);
                if self.place(cell, tile) != tile {
                    changed.push(cell);
                }
            }
        }
        changed
    }

    /// Fills the tiles of `row` between two columns, inclusive.
    pub fn place_horizontal(
        &mut self,
        row: i32,
        from_column: i32,
        to_column: i32,
        tile: Option<TileId>,
    ) -> Vec<CellCoord> {
        self.place_box(
            CellCoord::new(from_column, row),
            CellCoord::new(to_column, row),
            tile,
        )
    }

    /// Fills the tiles of `column` between two rows, inclusive.
    pub fn place_vertical(
        &mut self,
        column: i32,
        from_row: i32,
        to_row: i32,
        tile: Option<TileId>,
    ) -> Vec<CellCoord> {
        self.place_box(
            CellCoord::new(column, from_row),
            CellCoord::new(column, to_row),
            tile,
        )
    }

    /// Number of solid tiles stored in the grid.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.columns.values().map(HashMap::len).sum()
    }

    /// Smallest inclusive rectangle containing every solid tile.
    #[must_use]
    pub fn bounds(&self) -> Option<(CellCoord, CellCoord)> {
        let mut cells = self.columns.iter().flat_map(|(&column, rows)| {
            rows.keys().map(move |&row| CellCoord::new(column, row))
        });
        let first = cells.next()?;
        Some(cells.fold((first, first), |(low, high), cell| {
            (
                CellCoord::new(low.column().min(cell.column()), low.row().min(cell.row())),
                CellCoord::new(high.column().max(cell.column()), high.row().max(cell.row())),
            )
        }))
    }
}
