//! Text layouts for levels that ship with the command-line adapter.

use gridfire_core::{ActorKind, CellCoord, Command, TileId, Vector2};
use thiserror::Error;

/// Where the player spawns in the labyrinth.
pub(crate) const LABYRINTH_PLAYER_SPAWN: Vector2 = Vector2::new(2.5, 2.5);

const SOLID: char = '#';
const EMPTY: char = '.';

const LABYRINTH: &str = "
########################################
#..........#................#..........#
#......#.......#...##...#.......#...##.#
#......#.......#...##...#.......#...##.#
#..........#................#..........#
#....###########.##################....#
#....#.##........#.........##.#...#....#
#.##.#....######.####.####.#....#.#.##.#
#....######.........#.##...######.#....#
#....#......#.####.##.#..#......#.#....#
#....##.#####.#..#.#..#.#######.#.#....#
##..###.#.....##.#.####...#...#.#.##..##
#....##.#.###..#.#.#..#.###.#...#.#....#
#....##.###.####.#.#.##.##..#.#...#....#
#....#..#......#.#.#.#...#.##.#####....#
#.##.##.#.####...#.#.##.##..#.#...#.##.#
#....##.#.#..#.###.#.#...#.##.#.#.#....#
#....##.#.#.##.....#.#.###.##.#.#.#....#
#....#..#.#.########.#...#.#..###.#....#
#.##.##.#.#..........#.#.#.##.......##.#
#.##.##.#.#########.##.#.#.######.#.##.#
#....##.#.........#.##.#.#......#.#....#
#.......#.#####.###....###.####.#.#....#
#....##.#.....#.##..##..##..#.###.#....#
#.##.##.#####.#.#..####..##.#.....#.##.#
#....##.#...###.##....##..######.##....#
#....##.###..##..#.##.#.......##..#....#
#....##.####.##.#####.#######..#.##....#
##..###....#.##.#...........##.#.###..##
#....###.#.#..#.########.##..#.#.##....#
#....#...#.##.#...###..#..####.#.##....#
#....#.###.##.###.....######...#.##....#
#.##.#.#.#.##.#.#####........###.##.##.#
#....#...#..........###.##.###...##....#
#....########.############.########....#
#..........#................#..........#
#.##...#.......#...##...#.......#...##.#
#.##...#.......#...##...#.......#...##.#
#...........................#..........#
########################################
";

/// Failures raised while reading a text layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum LayoutError {
    /// The layout holds no rows at all.
    #[error("layout contains no rows")]
    Empty,
    /// A row is shorter or longer than the first one.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character other than `#` or `.` appeared in the layout.
    #[error("unexpected character {character:?} at column {column} of row {row}")]
    UnknownTile {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// Character that could not be interpreted.
        character: char,
    },
}

/// Parses a layout of `#` and `.` rows into the solid cells it describes.
///
/// Blank lines and surrounding whitespace are ignored. Rows map onto grid rows
/// starting at zero, characters onto columns.
pub(crate) fn parse_layout(text: &str) -> Result<Vec<CellCoord>, LayoutError> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let expected = rows.first().ok_or(LayoutError::Empty)?.chars().count();

    let mut solid = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != expected {
            return Err(LayoutError::RaggedRow {
                row,
                expected,
                found,
            });
        }
        for (column, character) in line.chars().enumerate() {
            match character {
                SOLID => solid.push(cell_at(column, row)),
                EMPTY => {}
                character => {
                    return Err(LayoutError::UnknownTile {
                        row,
                        column,
                        character,
                    })
                }
            }
        }
    }
    Ok(solid)
}

fn cell_at(column: usize, row: usize) -> CellCoord {
    let index = |value: usize| i32::try_from(value).unwrap_or(i32::MAX);
    CellCoord::new(index(column), index(row))
}

/// Commands that build the 40×40 labyrinth and place the player inside it.
pub(crate) fn labyrinth_commands() -> Result<Vec<Command>, LayoutError> {
    let mut commands: Vec<Command> = parse_layout(LABYRINTH)?
        .into_iter()
        .map(|cell| Command::PlaceTile {
            cell,
            tile: Some(TileId::WALL),
        })
        .collect();
    commands.push(Command::SpawnActor {
        kind: ActorKind::Player,
        position: LABYRINTH_PLAYER_SPAWN,
    });
    Ok(commands)
}
