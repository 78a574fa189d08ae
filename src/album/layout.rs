//! Grid geometry: where each entry sits and how far the grid may scroll.
//!
//! Positions are computed in "grid space" (origin at the top of the first
//! row). Screen coordinates add the header height and the scroll offset.

use crate::config::Configuration;
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: i32,
    pub cell_width: i32,
    pub cell_height: i32,
    pub separation: i32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub header_height: i32,
    pub screen_height: i32,
}

impl GridLayout {
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_config(cfg: &Configuration) -> Self {
        Self::new(
            cfg.screen_width(),
            cfg.screen_height(),
            cfg.grid.columns as i32,
            cfg.grid.header_height as i32,
        )
    }

    /// Cells are half of a `columns`-way split of the screen in each axis;
    /// the gap between cells is a quarter of the cell width.
    pub fn new(screen_width: i32, screen_height: i32, columns: i32, header_height: i32) -> Self {
        let columns = columns.max(1);
        let cell_width = (screen_width / columns / 2).max(1);
        let cell_height = (screen_height / columns / 2).max(1);
        let separation = cell_width / 4;
        let span = columns * (cell_width + separation) - separation;
        Self {
            columns,
            cell_width,
            cell_height,
            separation,
            origin_x: (screen_width - span) / 2,
            origin_y: separation / 2,
            header_height,
            screen_height,
        }
    }

    /// Distance between the tops of consecutive rows (and lefts of columns).
    pub const fn pitch(&self) -> i32 {
        self.cell_width + self.separation
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn position_for(&self, index: usize) -> Point {
        let index = index as i32;
        let col = index % self.columns;
        let row = index / self.columns;
        Point::new(
            self.origin_x + col * self.pitch(),
            self.origin_y + row * self.pitch(),
        )
    }

    pub const fn row_of(&self, index: usize) -> i32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let index = index as i32;
        index / self.columns
    }

    pub const fn rows(&self, count: usize) -> i32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let count = count as i32;
        (count + self.columns - 1) / self.columns
    }

    /// Rows that fit completely below the header.
    pub fn visible_rows(&self) -> i32 {
        ((self.screen_height - self.header_height) / self.pitch()).max(1)
    }

    /// Lowest allowed scroll offset; never above zero.
    pub fn scroll_floor(&self, count: usize) -> i32 {
        -((self.rows(count) - self.visible_rows()).max(0) * self.pitch())
    }

    pub fn clamp_scroll(&self, scroll: i32, count: usize) -> i32 {
        scroll.clamp(self.scroll_floor(count), 0)
    }

    /// First row whose top is at or below the header for this scroll.
    pub fn first_visible_row(&self, scroll: i32) -> i32 {
        let pitch = self.pitch();
        (-scroll + pitch - 1).div_euclid(pitch).max(0)
    }

    pub fn row_is_visible(&self, row: i32, scroll: i32) -> bool {
        let first = self.first_visible_row(scroll);
        row >= first && row < first + self.visible_rows()
    }

    /// Smallest scroll change that brings `row` fully into view, clamped.
    pub fn scroll_to_show(&self, row: i32, scroll: i32, count: usize) -> i32 {
        let first = self.first_visible_row(scroll);
        let visible = self.visible_rows();
        let wanted = if row < first {
            -row * self.pitch()
        } else if row >= first + visible {
            -(row - visible + 1) * self.pitch()
        } else {
            scroll
        };
        self.clamp_scroll(wanted, count)
    }

    /// On-screen rectangle of the large (TV) image of the cell at `position`.
    pub const fn cell_rect(&self, position: Point, scroll: i32) -> Rect {
        Rect::new(
            position.x,
            self.header_height + position.y + scroll,
            self.cell_width,
            self.cell_height,
        )
    }

    /// Inset rectangle of the small (DRC) image, overlapping the lower right.
    pub const fn inset_rect(&self, position: Point, scroll: i32) -> Rect {
        Rect::new(
            position.x + self.cell_width / 2,
            self.header_height + position.y + scroll + self.cell_width / 2,
            self.cell_width / 2,
            self.cell_height / 2,
        )
    }

    /// Hit area of a whole cell: the large image plus the overhanging inset.
    pub const fn hit_rect(&self, position: Point, scroll: i32) -> Rect {
        let cell = self.cell_rect(position, scroll);
        let inset = self.inset_rect(position, scroll);
        let bottom = if inset.bottom() > cell.bottom() {
            inset.bottom()
        } else {
            cell.bottom()
        };
        Rect::new(cell.x, cell.y, cell.w, bottom - cell.y)
    }

    /// Index of the cell under `p`, ignoring the header band.
    pub fn hit_test(&self, p: Point, scroll: i32, count: usize) -> Option<usize> {
        if p.y < self.header_height {
            return None;
        }
        (0..count).find(|&i| self.hit_rect(self.position_for(i), scroll).contains_inclusive(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(1920, 1080, 4, 256)
    }

    #[test]
    fn default_cell_metrics() {
        let l = layout();
        assert_eq!((l.cell_width, l.cell_height, l.separation), (240, 135, 60));
        assert_eq!(l.pitch(), 300);
        assert_eq!(l.origin_x, (1920 - 1140) / 2);
        assert_eq!(l.visible_rows(), 2);
    }

    #[test]
    fn positions_are_row_major() {
        let l = layout();
        let p0 = l.position_for(0);
        assert_eq!(l.position_for(1), Point::new(p0.x + 300, p0.y));
        assert_eq!(l.position_for(4), Point::new(p0.x, p0.y + 300));
        assert_eq!(l.row_of(7), 1);
        assert_eq!(l.rows(0), 0);
        assert_eq!(l.rows(5), 2);
    }

    #[test]
    fn scroll_clamp_range() {
        let l = layout();
        // 3 rows, 2 visible: one row of travel.
        assert_eq!(l.scroll_floor(12), -300);
        assert_eq!(l.scroll_floor(3), 0);
        assert_eq!(l.scroll_floor(0), 0);
        for delta in [-10_000, -301, -150, 0, 42, 10_000] {
            let s = l.clamp_scroll(delta, 12);
            assert!((-300..=0).contains(&s));
        }
    }

    #[test]
    fn scroll_to_show_moves_minimally() {
        let l = layout();
        let count = 20; // 5 rows
        assert_eq!(l.scroll_to_show(0, 0, count), 0);
        assert_eq!(l.scroll_to_show(2, 0, count), -300);
        assert_eq!(l.scroll_to_show(4, 0, count), -900);
        assert_eq!(l.scroll_to_show(1, -900, count), -300);
        assert!(l.row_is_visible(3, -600));
        assert!(!l.row_is_visible(1, -600));
    }

    #[test]
    fn hit_test_finds_cells() {
        let l = layout();
        let r = l.cell_rect(l.position_for(5), 0);
        assert_eq!(l.hit_test(r.center(), 0, 8), Some(5));
        assert_eq!(l.hit_test(r.center(), 0, 5), None);
        assert_eq!(l.hit_test(Point::new(r.x, 10), 0, 8), None);
    }
}
