use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::MazeError;

/// Kind of item detected inside a maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Enemy marker ("smol")
    Small,
    /// Dog marker
    Big,
}

impl ItemKind {
    /// Grid code written into the occupancy grid
    pub fn code(self) -> u8 {
        match self {
            ItemKind::Small => 9,
            ItemKind::Big => 7,
        }
    }
}

impl FromStr for ItemKind {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" | "smol" => Ok(ItemKind::Small),
            "big" => Ok(ItemKind::Big),
            _ => Err(MazeError::MalformedGrid(format!("Invalid item kind: {}", s))),
        }
    }
}

/// One cell of the occupancy grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
    Item(ItemKind),
}

impl Cell {
    /// Decode the numeric cell convention: 0=open, 1=wall, 7=big item, 9=small item
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Open),
            1 => Some(Cell::Wall),
            7 => Some(Cell::Item(ItemKind::Big)),
            9 => Some(Cell::Item(ItemKind::Small)),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Cell::Open => 0,
            Cell::Wall => 1,
            Cell::Item(kind) => kind.code(),
        }
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }

    pub fn is_item(self) -> bool {
        matches!(self, Cell::Item(_))
    }

    fn symbol(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Open => '.',
            Cell::Item(ItemKind::Big) => 'b',
            Cell::Item(ItemKind::Small) => 's',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '#' => Some(Cell::Wall),
            '.' | ' ' => Some(Cell::Open),
            'b' => Some(Cell::Item(ItemKind::Big)),
            's' => Some(Cell::Item(ItemKind::Small)),
            _ => None,
        }
    }
}

/// Index of a detected lattice line along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineIndex(pub usize);

/// Index of a cell interior (the midpoint between two consecutive lattice lines)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex(pub usize);

impl LineIndex {
    pub fn to_grid(self) -> usize {
        self.0 * 2
    }
}

impl CellIndex {
    pub fn to_grid(self) -> usize {
        self.0 * 2 + 1
    }
}

/// A grid row or column index, split by parity.
///
/// Even grid indices sit on lattice lines, odd ones inside cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridIndex {
    Line(LineIndex),
    Cell(CellIndex),
}

impl GridIndex {
    pub fn from_raw(index: usize) -> Self {
        if index % 2 == 0 {
            GridIndex::Line(LineIndex(index / 2))
        } else {
            GridIndex::Cell(CellIndex(index / 2))
        }
    }

    pub fn raw(self) -> usize {
        match self {
            GridIndex::Line(line) => line.to_grid(),
            GridIndex::Cell(cell) => cell.to_grid(),
        }
    }
}

/// A position in grid space (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        GridPos { row, col }
    }

    /// Manhattan distance in grid steps
    pub fn manhattan(&self, other: &GridPos) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }

    pub fn row_index(&self) -> GridIndex {
        GridIndex::from_raw(self.row)
    }

    pub fn col_index(&self) -> GridIndex {
        GridIndex::from_raw(self.col)
    }
}

impl Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for GridPos {
    type Err = MazeError;

    /// Parses "row,col"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MazeError::MalformedGrid(format!("Invalid grid position: {}", s));
        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse().map_err(|_| invalid())?;
        let col = col.trim().parse().map_err(|_| invalid())?;
        Ok(GridPos { row, col })
    }
}

/// Canonical, lossless serialization of a grid used as a cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Binary wall/open occupancy grid with item markers.
/// Dimensions are always odd: `rows = 2*J+1`, `cols = 2*K+1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl OccupancyGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Create the closed lattice for `cell_rows x cell_cols` cells: every even
    /// row and column is wall, every cell interior is open
    pub fn walled(cell_rows: usize, cell_cols: usize) -> Self {
        let rows = cell_rows * 2 + 1;
        let cols = cell_cols * 2 + 1;
        let mut cells = vec![Cell::Open; rows * cols];
        for row in 0..rows {
            for col in 0..cols {
                if row % 2 == 0 || col % 2 == 0 {
                    cells[row * cols + col] = Cell::Wall;
                }
            }
        }
        OccupancyGrid { rows, cols, cells }
    }

    /// Build a grid from rows of numeric codes (0/1/7/9)
    pub fn from_codes(codes: &[Vec<u8>]) -> Result<Self, MazeError> {
        let rows = codes.len();
        let cols = codes.first().map(|r| r.len()).unwrap_or(0);
        check_dimensions(rows, cols)?;

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in codes.iter().enumerate() {
            if line.len() != cols {
                return Err(MazeError::MalformedGrid(format!(
                    "Row {} has {} columns, expected {}",
                    row,
                    line.len(),
                    cols
                )));
            }
            for (col, &code) in line.iter().enumerate() {
                let cell = Cell::from_code(code).ok_or_else(|| {
                    MazeError::MalformedGrid(format!("Unknown cell code {} at ({}, {})", code, row, col))
                })?;
                cells.push(cell);
            }
        }

        Ok(OccupancyGrid { rows, cols, cells })
    }

    /// Rows of numeric codes, the inverse of `from_codes`
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.row * self.cols + pos.col
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Get cell at position, None if out of bounds
    pub fn get(&self, pos: GridPos) -> Option<Cell> {
        if self.contains(pos) {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    /// Out of bounds is treated as wall
    pub fn is_wall(&self, pos: GridPos) -> bool {
        self.get(pos).map_or(true, Cell::is_wall)
    }

    /// Set cell at position. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: GridPos, cell: Cell) {
        if self.contains(pos) {
            let id = self.index(pos);
            self.cells[id] = cell;
        }
    }

    /// Non-wall neighbors in up, down, left, right order
    pub fn open_neighbors(&self, pos: GridPos) -> Vec<GridPos> {
        let mut nearby = Vec::with_capacity(4);
        if pos.row > 0 {
            nearby.push(GridPos::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.rows {
            nearby.push(GridPos::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            nearby.push(GridPos::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.cols {
            nearby.push(GridPos::new(pos.row, pos.col + 1));
        }
        nearby.retain(|p| !self.is_wall(*p));
        nearby
    }

    /// Iterate every position with its cell, row-major
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(id, &cell)| (GridPos::new(id / cols, id % cols), cell))
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut key = String::with_capacity(self.cells.len() + self.rows + 16);
        key.push_str(&format!("{}x{}:", self.rows, self.cols));
        for (row, line) in self.cells.chunks(self.cols).enumerate() {
            if row > 0 {
                key.push('/');
            }
            for cell in line {
                key.push(char::from(b'0' + cell.code()));
            }
        }
        Fingerprint(key)
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), MazeError> {
    if rows == 0 || cols == 0 {
        return Err(MazeError::MalformedGrid("Grid is empty".to_string()));
    }
    if rows % 2 == 0 || cols % 2 == 0 {
        return Err(MazeError::MalformedGrid(format!(
            "Grid dimensions must be odd, got {}x{}",
            rows, cols
        )));
    }
    Ok(())
}

impl Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.cells.chunks(self.cols) {
            for cell in line {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for OccupancyGrid {
    type Err = MazeError;

    /// Parse the ASCII form: `#` wall, `.` open, `b` big item, `s` small item
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        let rows = lines.len();
        let cols = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        check_dimensions(rows, cols)?;

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(MazeError::MalformedGrid(format!(
                    "Row {} has {} columns, expected {}",
                    row,
                    line.chars().count(),
                    cols
                )));
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::from_symbol(ch).ok_or_else(|| {
                    MazeError::MalformedGrid(format!("Unknown cell '{}' at ({}, {})", ch, row, col))
                })?;
                cells.push(cell);
            }
        }

        Ok(OccupancyGrid { rows, cols, cells })
    }
}
