pub const GRID_ROWS: usize = 100;
pub const GRID_COLS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Convert to Excel-style cell reference (A1, B5, etc.)
    pub fn to_reference(&self) -> String {
        let col_letter = Self::col_to_letter(self.col);
        format!("{}{}", col_letter, self.row + 1)
    }

    fn col_to_letter(col: usize) -> String {
        let mut result = String::new();
        let mut n = col;
        loop {
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        result
    }
}

/// A rectangular block of cells spanned by two corners.
///
/// The anchor is where the drag started, the cursor is the cell the pointer
/// last entered. Either corner may be the top-left one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: CellPosition,
    pub cursor: CellPosition,
}

impl Selection {
    pub fn between(anchor: CellPosition, cursor: CellPosition) -> Self {
        Self { anchor, cursor }
    }

    pub fn top_left(&self) -> CellPosition {
        CellPosition::new(
            self.anchor.row.min(self.cursor.row),
            self.anchor.col.min(self.cursor.col),
        )
    }

    pub fn bottom_right(&self) -> CellPosition {
        CellPosition::new(
            self.anchor.row.max(self.cursor.row),
            self.anchor.col.max(self.cursor.col),
        )
    }

    /// Inclusive row span
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.top_left().row..=self.bottom_right().row
    }

    /// Inclusive column span
    pub fn cols(&self) -> std::ops::RangeInclusive<usize> {
        self.top_left().col..=self.bottom_right().col
    }

    pub fn width(&self) -> usize {
        self.anchor.col.abs_diff(self.cursor.col) + 1
    }

    pub fn height(&self) -> usize {
        self.anchor.row.abs_diff(self.cursor.row) + 1
    }

    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, cell: CellPosition) -> bool {
        self.rows().contains(&cell.row) && self.cols().contains(&cell.col)
    }

    /// `C3:F5`, or a single reference when only one cell is selected
    pub fn range_label(&self) -> String {
        let start = self.top_left().to_reference();
        if self.cell_count() == 1 {
            start
        } else {
            format!("{}:{}", start, self.bottom_right().to_reference())
        }
    }
}

#[cfg(test)]
impl Selection {
    pub fn single(cell: CellPosition) -> Self {
        Self::between(cell, cell)
    }

    /// Every cell of the rectangle in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellPosition> + use<> {
        let cols = self.cols();
        self.rows()
            .flat_map(move |row| cols.clone().map(move |col| CellPosition::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_use_spreadsheet_letters() {
        assert_eq!(CellPosition::new(0, 0).to_reference(), "A1");
        assert_eq!(CellPosition::new(4, 25).to_reference(), "Z5");
        assert_eq!(CellPosition::new(11, 27).to_reference(), "AB12");
        assert_eq!(CellPosition::new(99, 99).to_reference(), "CV100");
    }

    #[test]
    fn rectangle_is_exhaustive() {
        let sel = Selection::between(CellPosition::new(2, 2), CellPosition::new(4, 5));
        assert_eq!(sel.height(), 3);
        assert_eq!(sel.width(), 4);
        assert_eq!(sel.cell_count(), 12);

        let cells: Vec<_> = sel.cells().collect();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells.first(), Some(&CellPosition::new(2, 2)));
        assert_eq!(cells.last(), Some(&CellPosition::new(4, 5)));
        assert!(cells.iter().all(|c| (2..=4).contains(&c.row) && (2..=5).contains(&c.col)));
    }

    #[test]
    fn corners_are_normalised_in_any_drag_direction() {
        let sel = Selection::between(CellPosition::new(9, 1), CellPosition::new(3, 6));
        assert_eq!(sel.top_left(), CellPosition::new(3, 1));
        assert_eq!(sel.bottom_right(), CellPosition::new(9, 6));
        assert_eq!(sel.cell_count(), 7 * 6);
        assert!(sel.contains(CellPosition::new(5, 4)));
        assert!(!sel.contains(CellPosition::new(2, 4)));
        assert!(!sel.contains(CellPosition::new(5, 7)));
    }

    #[test]
    fn every_grid_cell_agrees_with_contains() {
        let sel = Selection::between(CellPosition::new(40, 70), CellPosition::new(35, 60));
        let inside = (0..GRID_ROWS)
            .flat_map(|r| (0..GRID_COLS).map(move |c| CellPosition::new(r, c)))
            .filter(|&c| sel.contains(c))
            .count();
        assert_eq!(inside, sel.cell_count());
        assert_eq!(inside, sel.cells().count());
    }

    #[test]
    fn range_label() {
        assert_eq!(Selection::single(CellPosition::new(0, 0)).range_label(), "A1");
        let sel = Selection::between(CellPosition::new(4, 5), CellPosition::new(2, 2));
        assert_eq!(sel.range_label(), "C3:F5");
    }
}
