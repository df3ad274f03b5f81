use derive_more::Display;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::cost::Cost;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Neighbours;
use crate::space::ObjectiveHeuristic;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Mazes need at least an entrance and an exit.
const MIN_EXITS: usize = 2;

pub type Coord = u32;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("({row},{col})")]
pub struct MazePosition {
    pub row: Coord,
    pub col: Coord,
}

impl MazePosition {
    #[inline(always)]
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }
    pub fn new_from_usize(row: usize, col: usize) -> Option<Self> {
        Some(Self {
            row: Coord::try_from(row).ok()?,
            col: Coord::try_from(col).ok()?,
        })
    }
}
impl State for MazePosition {}

/// The four moves, in the order they are always considered.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum MazeDirection {
    #[display("UP")]
    Up, // row--
    #[display("DOWN")]
    Down, // row++
    #[display("LEFT")]
    Left, // col--
    #[display("RIGHT")]
    Right, // col++
}
impl Action for MazeDirection {}

impl MazeDirection {
    /// Expansion order. Decides which of several equally good paths is found.
    pub const ALL: [MazeDirection; 4] = [
        MazeDirection::Up,
        MazeDirection::Down,
        MazeDirection::Left,
        MazeDirection::Right,
    ];

    /// `(Δrow, Δcol)`
    #[inline(always)]
    pub const fn delta(&self) -> (i8, i8) {
        match self {
            MazeDirection::Up => (-1, 0),
            MazeDirection::Down => (1, 0),
            MazeDirection::Left => (0, -1),
            MazeDirection::Right => (0, 1),
        }
    }
}

pub type MazeCost = u32;
impl Cost for MazeCost {}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MazeTile {
    /// Entrance/exit marker.
    #[display("0")]
    Exit = 0,
    #[display("P")]
    Path = 1,
    #[display("W")]
    Wall = 9,
}

impl MazeTile {
    #[inline(always)]
    pub const fn code(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeTileParseError {
    #[error("Invalid tile code '{0}' (expected 0, 1 or 9).")]
    InvalidTileCode(u8),
}

impl std::convert::TryFrom<u8> for MazeTile {
    type Error = MazeTileParseError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MazeTile::Exit),
            1 => Ok(MazeTile::Path),
            9 => Ok(MazeTile::Wall),
            code => Err(MazeTileParseError::InvalidTileCode(code)),
        }
    }
}

/// The board alone, without start or goal.
#[derive(Clone, PartialEq, Eq)]
pub struct MazeSpace {
    cells: Vec<Vec<MazeTile>>,
}

impl MazeSpace {
    pub fn new_from_cells(cells: Vec<Vec<MazeTile>>) -> Self {
        Self { cells }
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        match self.cells.first() {
            Some(row) => (self.cells.len(), row.len()),
            None => (0, 0),
        }
    }

    #[inline(always)]
    pub fn tile(&self, p: &MazePosition) -> Option<MazeTile> {
        self.cells
            .get(p.row as usize)
            .and_then(|row| row.get(p.col as usize))
            .copied()
    }

    /// Whether `p` is on the board and not a wall.
    ///
    /// The single rule for legal movement used by every search.
    #[inline(always)]
    pub fn is_valid_tile(&self, p: &MazePosition) -> bool {
        matches!(self.tile(p), Some(t) if t != MazeTile::Wall)
    }

    pub fn count_tiles(&self, tile: MazeTile) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|t| **t == tile).count())
            .sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[MazeTile]> {
        self.cells.iter().map(Vec::as_slice)
    }
}

impl Space<MazePosition, MazeDirection, MazeCost> for MazeSpace {
    #[inline(always)]
    fn apply(&self, s: &MazePosition, a: &MazeDirection) -> Option<MazePosition> {
        let (dr, dc) = a.delta();
        Some(MazePosition {
            row: s.row.checked_add_signed(dr as i32)?,
            col: s.col.checked_add_signed(dc as i32)?,
        })
    }

    #[inline(always)]
    fn valid(&self, s: &MazePosition) -> bool {
        self.is_valid_tile(s)
    }

    fn neighbours(&self, s: &MazePosition) -> Neighbours<MazePosition, MazeDirection> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        let mut v = Neighbours::<MazePosition, MazeDirection>::new();
        for a in MazeDirection::ALL {
            if let Some(n) = self.apply(s, &a) {
                if self.is_valid_tile(&n) {
                    v.push((n, a));
                }
            }
        }
        v
    }
}

impl std::fmt::Debug for MazeSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "MazeSpace{:?}", self.dimensions())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridMazeError {
    #[error("Grid shape {found:?} does not match the dimensions {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Maze is not escapable. Found {exits} exit tiles, but at least 2 are needed")]
    NotEscapable { exits: usize },
}

/// An immutable maze: a board plus its start and goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMaze {
    space: MazeSpace,
    start: MazePosition,
    goal: MazePosition,
}

impl GridMaze {
    /// Validates the board shape and that it has an entrance and an exit.
    ///
    /// The exit count is only a structural check. It does not prove the goal
    /// is reachable from the start.
    pub fn new(
        cells: Vec<Vec<MazeTile>>,
        dimensions: (usize, usize),
        start: MazePosition,
        goal: MazePosition,
    ) -> Result<Self, GridMazeError> {
        let (rows, cols) = dimensions;
        if cells.len() != rows {
            return Err(GridMazeError::ShapeMismatch {
                expected: dimensions,
                found: (cells.len(), cells.first().map_or(0, Vec::len)),
            });
        }
        if let Some(row) = cells.iter().find(|row| row.len() != cols) {
            return Err(GridMazeError::ShapeMismatch {
                expected: dimensions,
                found: (rows, row.len()),
            });
        }

        let space = MazeSpace::new_from_cells(cells);
        let exits = space.count_tiles(MazeTile::Exit);
        if exits < MIN_EXITS {
            return Err(GridMazeError::NotEscapable { exits });
        }

        Ok(Self { space, start, goal })
    }

    /// Builds a random instance going from the top-left to the bottom-right
    /// corner.
    ///
    /// Returns `None` when the board can't hold both corners.
    pub fn random<R: rand::Rng>(
        r: &mut R,
        rows: usize,
        cols: usize,
        wall_probability: f64,
    ) -> Option<GridMaze> {
        if rows.checked_mul(cols).is_none_or(|n| n < MIN_EXITS) {
            return None;
        }
        let start = MazePosition::new(0, 0);
        let goal = MazePosition::new_from_usize(rows - 1, cols - 1)?;

        let p = wall_probability.clamp(0.0, 1.0);
        let mut cells: Vec<Vec<MazeTile>> = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| {
                        if r.random_bool(p) {
                            MazeTile::Wall
                        } else {
                            MazeTile::Path
                        }
                    })
                    .collect()
            })
            .collect();
        cells[0][0] = MazeTile::Exit;
        cells[rows - 1][cols - 1] = MazeTile::Exit;

        GridMaze::new(cells, (rows, cols), start, goal).ok()
    }

    #[inline(always)]
    pub fn space(&self) -> &MazeSpace {
        &self.space
    }
    /// `(rows, cols)`
    #[inline(always)]
    pub fn dimensions(&self) -> (usize, usize) {
        self.space.dimensions()
    }
    #[inline(always)]
    pub fn start(&self) -> MazePosition {
        self.start
    }
    #[inline(always)]
    pub fn goal(&self) -> MazePosition {
        self.goal
    }
    #[inline(always)]
    pub fn tile(&self, p: &MazePosition) -> Option<MazeTile> {
        self.space.tile(p)
    }
    #[inline(always)]
    pub fn is_valid_tile(&self, p: &MazePosition) -> bool {
        self.space.is_valid_tile(p)
    }
    pub fn exits(&self) -> usize {
        self.space.count_tiles(MazeTile::Exit)
    }

    /// Renders the maze marking the intermediate positions of `path` with `X`.
    pub fn overlay(&self, path: &Path<MazePosition, MazeDirection, MazeCost>) -> PathOverlay<'_> {
        PathOverlay {
            maze: self,
            marked: path.states.iter().copied().collect(),
        }
    }

    fn render(
        &self,
        f: &mut std::fmt::Formatter,
        marked: &FxHashSet<MazePosition>,
    ) -> std::fmt::Result {
        for (r, row) in self.space.rows().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                let p = MazePosition::new_from_usize(r, c);
                if p == Some(self.goal) {
                    write!(f, "E")?;
                } else if p == Some(self.start) {
                    write!(f, "S")?;
                } else if p.is_some_and(|p| marked.contains(&p)) {
                    write!(f, "X")?;
                } else {
                    write!(f, "{tile}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Problem<MazeSpace, MazePosition, MazeDirection, MazeCost> for GridMaze {
    #[inline(always)]
    fn space(&self) -> &MazeSpace {
        &self.space
    }
    #[inline(always)]
    fn start(&self) -> MazePosition {
        self.start
    }
    #[inline(always)]
    fn goal(&self) -> MazePosition {
        self.goal
    }
}

impl std::fmt::Display for GridMaze {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.render(f, &FxHashSet::default())
    }
}

pub struct PathOverlay<'m> {
    maze: &'m GridMaze,
    marked: FxHashSet<MazePosition>,
}

impl std::fmt::Display for PathOverlay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.maze.render(f, &self.marked)
    }
}

#[derive(Debug, Error)]
pub enum MazeParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Start line is not in the expected 'start(r,c)' format: '{0}'")]
    InvalidStart(String),
    #[error("End line is not in the expected 'end(r,c)' format: '{0}'")]
    InvalidEnd(String),
    #[error("Invalid number '{token}' found at ({row},{col})")]
    InvalidNumber {
        token: String,
        row: usize,
        col: usize,
    },
    #[error("Invalid tile at ({row},{col}): {e}")]
    InvalidTile {
        e: MazeTileParseError,
        row: usize,
        col: usize,
    },
    #[error("Invalid maze: {0}")]
    Maze(#[from] GridMazeError),
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
    #[error("Failed loading '{p}': {e}")]
    InFile {
        p: std::path::PathBuf,
        e: Box<MazeParseError>,
    },
}

/// Parses `<prefix>(<row>,<col>)`.
fn parse_position(line: &str, prefix: &str) -> Option<MazePosition> {
    let rest = line.trim().strip_prefix(prefix)?.trim_start();
    let (inner, _) = rest.strip_prefix('(')?.split_once(')')?;
    let (row, col) = inner.split_once(',')?;

    Some(MazePosition::new(
        row.trim().parse::<Coord>().ok()?,
        col.trim().parse::<Coord>().ok()?,
    ))
}

impl std::convert::TryFrom<&str> for GridMaze {
    type Error = MazeParseError;

    /// Reads the text format,
    ///
    /// ```text
    /// start(0,0)
    /// end(0,6)
    /// 0 9 9 9 9 9 0
    /// 1 1 1 1 1 9 1
    /// 1 1 1 1 1 1 1
    /// ```
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut lines = s.lines();

        let start_line = lines.next().ok_or(MazeParseError::EmptyInput)?;
        if start_line.trim().is_empty() {
            return Err(MazeParseError::EmptyInput);
        }
        let start = parse_position(start_line, "start")
            .ok_or_else(|| MazeParseError::InvalidStart(start_line.to_string()))?;
        let end_line = lines.next().unwrap_or_default();
        let goal = parse_position(end_line, "end")
            .ok_or_else(|| MazeParseError::InvalidEnd(end_line.to_string()))?;

        let mut cells = Vec::<Vec<MazeTile>>::new();
        for line in lines.filter(|l| !l.trim().is_empty()) {
            let row = cells.len();
            let tiles = line
                .split_whitespace()
                .enumerate()
                .map(|(col, token)| {
                    let code = token
                        .parse::<u8>()
                        .map_err(|_| MazeParseError::InvalidNumber {
                            token: token.to_string(),
                            row,
                            col,
                        })?;
                    MazeTile::try_from(code)
                        .map_err(|e| MazeParseError::InvalidTile { e, row, col })
                })
                .collect::<Result<Vec<MazeTile>, MazeParseError>>()?;
            cells.push(tiles);
        }

        let dimensions = (cells.len(), cells.first().map_or(0, Vec::len));
        log::trace!("Parsed {dimensions:?} maze from {start} to {goal}");
        Ok(GridMaze::new(cells, dimensions, start, goal)?)
    }
}

impl std::convert::TryFrom<&std::path::Path> for GridMaze {
    type Error = MazeParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let s = std::fs::read_to_string(p).map_err(|e| MazeParseError::IOError {
            p: p.to_path_buf(),
            e,
        })?;
        GridMaze::try_from(s.as_str())
    }
}

impl GridMaze {
    /// Loads every maze, failing on the first one that can't be read or built.
    pub fn load_all<P: AsRef<std::path::Path>>(
        paths: &[P],
    ) -> Result<Vec<GridMaze>, MazeParseError> {
        paths
            .iter()
            .map(|p| {
                let p = p.as_ref();
                GridMaze::try_from(p).map_err(|e| match e {
                    MazeParseError::IOError { .. } => e,
                    e => MazeParseError::InFile {
                        p: p.to_path_buf(),
                        e: Box::new(e),
                    },
                })
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct MazeHeuristicManhattan;

impl ObjectiveHeuristic<MazeSpace, MazePosition, MazeDirection, MazeCost>
    for MazeHeuristicManhattan
{
    /// `|Δrow| + |Δcol|`. Never overestimates with unit moves.
    #[inline(always)]
    fn h(a: &MazePosition, b: &MazePosition) -> MazeCost {
        a.row.abs_diff(b.row).saturating_add(a.col.abs_diff(b.col))
    }
}
