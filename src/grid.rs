//! Tile grid arithmetic.
//!
//! The grid is recomputed from the available area on every frame, so a
//! terminal resize reflows the tiles. The same `Grid` is used to draw tiles
//! and to hit-test mouse clicks, which keeps both in agreement.

use ratatui::layout::Rect;

/// Keyboard movement between tiles.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    pub columns: usize,
    pub rows: usize,
    pub count: usize,
    pub tile_width: u16,
    pub tile_height: u16,
}

impl Grid {
    /// Lay out `count` tiles of `tile_width x tile_height` cells in `width` columns.
    ///
    /// There is always at least one column, even when `width` is narrower
    /// than a tile.
    pub fn new(width: u16, count: usize, tile_width: u16, tile_height: u16) -> Self {
        let tile_width = tile_width.max(1);
        let tile_height = tile_height.max(1);
        let columns = usize::from(width / tile_width).max(1);
        Self {
            columns,
            rows: count.div_ceil(columns),
            count,
            tile_width,
            tile_height,
        }
    }

    /// `(row, column)` of the tile at `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    pub fn index_at(&self, row: usize, col: usize) -> Option<usize> {
        if col >= self.columns {
            return None;
        }
        let index = row * self.columns + col;
        (index < self.count).then_some(index)
    }

    /// Number of whole tile rows that fit in `height`.
    pub fn visible_rows(&self, height: u16) -> usize {
        usize::from(height / self.tile_height).max(1)
    }

    /// First row to draw so that `selected_row` stays on screen, centred when possible.
    pub fn first_visible_row(&self, selected_row: usize, visible_rows: usize) -> usize {
        if visible_rows == 0 || self.rows <= visible_rows {
            return 0;
        }
        selected_row
            .saturating_sub(visible_rows / 2)
            .min(self.rows - visible_rows)
    }

    /// Screen rectangle of the tile at `index`, or `None` when it is scrolled out
    /// of `area` or only partially visible.
    pub fn tile_rect(&self, area: Rect, first_row: usize, index: usize) -> Option<Rect> {
        if index >= self.count {
            return None;
        }
        let (row, col) = self.cell(index);
        let visible_row = row.checked_sub(first_row)?;

        let y = usize::from(area.y) + visible_row * usize::from(self.tile_height);
        if y + usize::from(self.tile_height) > usize::from(area.bottom()) {
            return None;
        }
        let x = usize::from(area.x) + col * usize::from(self.tile_width);
        if x >= usize::from(area.right()) {
            return None;
        }
        let width = self.tile_width.min(area.right() - x as u16);

        Some(Rect {
            x: x as u16,
            y: y as u16,
            width,
            height: self.tile_height,
        })
    }

    /// Index of the tile under the cell `(x, y)`, if any.
    pub fn tile_at(&self, area: Rect, first_row: usize, x: u16, y: u16) -> Option<usize> {
        if x < area.x || y < area.y || x >= area.right() || y >= area.bottom() {
            return None;
        }
        let col = usize::from((x - area.x) / self.tile_width);
        let row = first_row + usize::from((y - area.y) / self.tile_height);
        let index = self.index_at(row, col)?;
        self.tile_rect(area, first_row, index).map(|_| index)
    }

    /// Move from `position` by one tile.
    ///
    /// Left/right walk the list and wrap around. Up/down move one row and stay
    /// put at the edges, except that moving down onto a short last row lands on
    /// its final tile.
    pub fn step(&self, position: usize, step: Step) -> usize {
        if self.count == 0 {
            return 0;
        }
        let position = position.min(self.count - 1);
        match step {
            Step::Left => {
                if position == 0 {
                    self.count - 1
                } else {
                    position - 1
                }
            }
            Step::Right => (position + 1) % self.count,
            Step::Up => position.checked_sub(self.columns).unwrap_or(position),
            Step::Down => {
                if position + self.columns < self.count {
                    position + self.columns
                } else if self.cell(position).0 + 1 < self.rows {
                    self.count - 1
                } else {
                    position
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(width: u16, height: u16) -> Rect {
        Rect {
            x: 2,
            y: 3,
            width,
            height,
        }
    }

    #[test]
    fn columns_follow_available_width() {
        assert_eq!(Grid::new(100, 10, 24, 12).columns, 4);
        assert_eq!(Grid::new(48, 10, 24, 12).columns, 2);
        assert_eq!(Grid::new(47, 10, 24, 12).columns, 1);
        // never zero, even when narrower than one tile
        assert_eq!(Grid::new(5, 10, 24, 12).columns, 1);
    }

    #[test]
    fn rows_round_up_for_partial_last_row() {
        let g = Grid::new(72, 7, 24, 12);
        assert_eq!(g.columns, 3);
        assert_eq!(g.rows, 3);
        assert_eq!(Grid::new(72, 0, 24, 12).rows, 0);
    }

    #[test]
    fn cell_and_index_at_agree() {
        let g = Grid::new(72, 7, 24, 12);
        for i in 0..7 {
            let (r, c) = g.cell(i);
            assert_eq!(g.index_at(r, c), Some(i));
        }
        assert_eq!(g.index_at(2, 1), None);
        assert_eq!(g.index_at(0, 3), None);
    }

    #[test]
    fn resize_reflows_positions() {
        let wide = Grid::new(96, 8, 24, 12);
        let narrow = Grid::new(48, 8, 24, 12);
        assert_eq!(wide.cell(5), (1, 1));
        assert_eq!(narrow.cell(5), (2, 1));
    }

    #[test]
    fn first_visible_row_keeps_selection_centered_and_in_range() {
        let g = Grid::new(24, 20, 24, 12);
        assert_eq!(g.first_visible_row(0, 4), 0);
        assert_eq!(g.first_visible_row(10, 4), 8);
        assert_eq!(g.first_visible_row(19, 4), 16);
        assert_eq!(Grid::new(24, 3, 24, 12).first_visible_row(2, 4), 0);
    }

    #[test]
    fn tile_rect_places_tiles_and_hides_scrolled_ones() {
        let g = Grid::new(48, 6, 24, 10);
        let a = area(48, 20);
        assert_eq!(
            g.tile_rect(a, 0, 3),
            Some(Rect {
                x: 26,
                y: 13,
                width: 24,
                height: 10
            })
        );
        // third row does not fit in 20 rows of height
        assert_eq!(g.tile_rect(a, 0, 4), None);
        // scrolled past
        assert_eq!(g.tile_rect(a, 1, 0), None);
        assert_eq!(g.tile_rect(a, 1, 4).map(|r| r.y), Some(13));
    }

    #[test]
    fn tile_at_hit_tests_clicks() {
        let g = Grid::new(48, 3, 24, 10);
        let a = area(48, 20);
        assert_eq!(g.tile_at(a, 0, 2, 3), Some(0));
        assert_eq!(g.tile_at(a, 0, 30, 5), Some(1));
        assert_eq!(g.tile_at(a, 0, 10, 15), Some(2));
        // empty slot next to the last tile
        assert_eq!(g.tile_at(a, 0, 30, 15), None);
        // outside the area
        assert_eq!(g.tile_at(a, 0, 0, 0), None);
    }

    #[test]
    fn step_moves_between_tiles() {
        let g = Grid::new(72, 7, 24, 12);
        assert_eq!(g.step(0, Step::Left), 6);
        assert_eq!(g.step(6, Step::Right), 0);
        assert_eq!(g.step(1, Step::Up), 1);
        assert_eq!(g.step(4, Step::Up), 1);
        assert_eq!(g.step(1, Step::Down), 4);
        // onto the short last row
        assert_eq!(g.step(5, Step::Down), 6);
        // already on the last row
        assert_eq!(g.step(6, Step::Down), 6);
        assert_eq!(Grid::new(72, 0, 24, 12).step(3, Step::Right), 0);
    }
}
