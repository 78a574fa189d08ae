//! Cursor, scroll and menu-mode state for the grid.

use tracing::debug;

use crate::album::Album;
use crate::config::CancelBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Browsing,
    SelectingForDelete,
    ViewingSingle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Result of the select (X) action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored,
    EnteredSelection,
    /// At least one entry is selected; ask before deleting.
    ConfirmDelete,
}

/// Result of the activate (A / tap) action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Ignored,
    OpenSingle(usize),
    Toggled(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuStateChange {
    pub from: MenuState,
    pub to: MenuState,
}

#[derive(Debug)]
pub struct Navigator {
    state: MenuState,
    cursor: usize,
    scroll: i32,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub const fn new() -> Self {
        Self {
            state: MenuState::Browsing,
            cursor: 0,
            scroll: 0,
        }
    }

    pub const fn state(&self) -> MenuState {
        self.state
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn scroll(&self) -> i32 {
        self.scroll
    }

    /// Move the cursor one cell. Returns `true` when it moved.
    pub fn move_cursor(&mut self, dir: Direction, album: &Album) -> bool {
        let count = album.len();
        if count == 0 || self.state == MenuState::ViewingSingle {
            return false;
        }
        let layout = album.layout();
        #[allow(clippy::cast_sign_loss)]
        let cols = layout.columns as usize;
        let c = self.cursor;
        let target = match dir {
            Direction::Up if c >= cols => Some(c - cols),
            Direction::Down if c + cols < count => Some(c + cols),
            Direction::Left if c % cols != 0 => Some(c - 1),
            Direction::Right if c % cols != cols - 1 && c + 1 < count => Some(c + 1),
            _ => None,
        };
        let Some(target) = target else {
            return false;
        };
        self.cursor = target;
        if matches!(dir, Direction::Up | Direction::Down) {
            self.scroll = layout.scroll_to_show(layout.row_of(target), self.scroll, count);
        }
        true
    }

    /// Focus a cell directly, e.g. after a tap.
    pub fn focus(&mut self, index: usize, album: &Album) {
        if index < album.len() {
            self.cursor = index;
        }
    }

    pub fn select_action(&mut self, album: &Album) -> SelectOutcome {
        match self.state {
            MenuState::Browsing if !album.is_empty() => {
                self.goto(MenuState::SelectingForDelete);
                SelectOutcome::EnteredSelection
            }
            MenuState::SelectingForDelete if album.selected_count() > 0 => {
                SelectOutcome::ConfirmDelete
            }
            _ => SelectOutcome::Ignored,
        }
    }

    pub fn activate(&mut self, album: &mut Album) -> Activation {
        if album.is_empty() {
            return Activation::Ignored;
        }
        match self.state {
            MenuState::Browsing => {
                self.goto(MenuState::ViewingSingle);
                Activation::OpenSingle(self.cursor)
            }
            MenuState::SelectingForDelete => {
                album.toggle(self.cursor);
                Activation::Toggled(self.cursor)
            }
            MenuState::ViewingSingle => Activation::Ignored,
        }
    }

    /// Return to browsing, dropping every selection.
    pub fn back(&mut self, album: &mut Album) -> Option<MenuStateChange> {
        album.clear_selection();
        self.goto(MenuState::Browsing)
    }

    /// Scroll by a pointer drag delta and pull the cursor onto a visible row.
    pub fn scroll_by(&mut self, dy: i32, album: &Album) {
        let layout = album.layout();
        let count = album.len();
        self.scroll = layout.clamp_scroll(self.scroll.saturating_add(dy), count);
        if count == 0 {
            return;
        }
        let row = layout.row_of(self.cursor);
        if layout.row_is_visible(row, self.scroll) {
            return;
        }
        let first = layout.first_visible_row(self.scroll);
        let last = first + layout.visible_rows() - 1;
        let target_row = row.clamp(first, last);
        #[allow(clippy::cast_sign_loss)]
        let cols = layout.columns as usize;
        #[allow(clippy::cast_sign_loss)]
        let candidate = target_row as usize * cols + self.cursor % cols;
        self.cursor = candidate.min(count - 1);
    }

    /// Outcome of confirming the delete dialog.
    pub fn after_delete(&mut self, album: &Album) {
        let layout = album.layout();
        self.cursor = 0;
        self.scroll = layout.scroll_to_show(layout.row_of(0), self.scroll, album.len());
        self.goto(MenuState::Browsing);
    }

    pub fn cancel_delete(&mut self, behavior: CancelBehavior, album: &mut Album) {
        match behavior {
            CancelBehavior::KeepSelection => {}
            CancelBehavior::ClearSelection => {
                self.back(album);
            }
        }
    }

    pub fn close_single(&mut self) -> Option<MenuStateChange> {
        if self.state == MenuState::ViewingSingle {
            self.goto(MenuState::Browsing)
        } else {
            None
        }
    }

    /// Forget the old collection after a rescan.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn goto(&mut self, to: MenuState) -> Option<MenuStateChange> {
        if self.state == to {
            return None;
        }
        let change = MenuStateChange {
            from: self.state,
            to,
        };
        debug!(from = ?change.from, to = ?change.to, "menu state change");
        self.state = to;
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::album::{GridLayout, ImagePairEntry};

    fn album(n: usize) -> Album {
        let entries = (0..n)
            .map(|i| {
                ImagePairEntry::new(Some(PathBuf::from(format!("/x/{i}_TV.png"))), None).unwrap()
            })
            .collect();
        Album::with_entries(GridLayout::new(1920, 1080, 4, 256), entries)
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let a = album(6);
        let mut nav = Navigator::new();
        let moves = [
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Right,
            Direction::Right,
            Direction::Right,
            Direction::Down,
            Direction::Down,
            Direction::Left,
            Direction::Down,
        ];
        for m in moves {
            nav.move_cursor(m, &a);
            assert!(nav.cursor() < a.len());
        }
    }

    #[test]
    fn right_stops_at_row_end_and_last_entry() {
        let a = album(6);
        let mut nav = Navigator::new();
        for _ in 0..10 {
            nav.move_cursor(Direction::Right, &a);
        }
        assert_eq!(nav.cursor(), 3);
        // 3 + 4 is past the last entry.
        assert!(!nav.move_cursor(Direction::Down, &a));
        let mut nav = Navigator::new();
        nav.move_cursor(Direction::Down, &a);
        assert_eq!(nav.cursor(), 4);
        nav.move_cursor(Direction::Right, &a);
        nav.move_cursor(Direction::Right, &a);
        assert_eq!(nav.cursor(), 5);
    }

    #[test]
    fn empty_album_is_inert() {
        let mut a = album(0);
        let mut nav = Navigator::new();
        assert!(!nav.move_cursor(Direction::Down, &a));
        assert_eq!(nav.activate(&mut a), Activation::Ignored);
        assert_eq!(nav.select_action(&a), SelectOutcome::Ignored);
        assert_eq!(nav.state(), MenuState::Browsing);
    }

    #[test]
    fn select_flow() {
        let mut a = album(3);
        let mut nav = Navigator::new();
        assert_eq!(nav.select_action(&a), SelectOutcome::EnteredSelection);
        assert_eq!(nav.select_action(&a), SelectOutcome::Ignored);
        assert_eq!(nav.activate(&mut a), Activation::Toggled(0));
        assert_eq!(nav.select_action(&a), SelectOutcome::ConfirmDelete);
        nav.back(&mut a);
        assert_eq!(nav.state(), MenuState::Browsing);
        assert_eq!(a.selected_count(), 0);
    }

    #[test]
    fn directions_ignored_in_single_view() {
        let mut a = album(8);
        let mut nav = Navigator::new();
        assert_eq!(nav.activate(&mut a), Activation::OpenSingle(0));
        assert!(!nav.move_cursor(Direction::Right, &a));
        assert!(nav.close_single().is_some());
        assert!(nav.move_cursor(Direction::Right, &a));
    }

    #[test]
    fn down_scrolls_to_keep_cursor_visible() {
        let a = album(20);
        let mut nav = Navigator::new();
        nav.move_cursor(Direction::Down, &a);
        assert_eq!(nav.scroll(), 0);
        nav.move_cursor(Direction::Down, &a);
        assert_eq!(nav.scroll(), -300);
        nav.move_cursor(Direction::Down, &a);
        nav.move_cursor(Direction::Down, &a);
        assert_eq!(nav.cursor(), 16);
        assert_eq!(nav.scroll(), -900);
        nav.move_cursor(Direction::Down, &a);
        assert_eq!(nav.scroll(), -900);
    }

    #[test]
    fn drag_scroll_clamps_and_pulls_cursor() {
        let a = album(20);
        let mut nav = Navigator::new();
        nav.move_cursor(Direction::Right, &a);
        nav.scroll_by(-10_000, &a);
        assert_eq!(nav.scroll(), -900);
        assert_eq!(nav.cursor(), 13);
        nav.scroll_by(10_000, &a);
        assert_eq!(nav.scroll(), 0);
        assert_eq!(nav.cursor(), 5);
    }

    #[test]
    fn cancel_behaviours() {
        let mut a = album(3);
        let mut nav = Navigator::new();
        nav.select_action(&a);
        nav.activate(&mut a);
        nav.cancel_delete(CancelBehavior::KeepSelection, &mut a);
        assert_eq!(nav.state(), MenuState::SelectingForDelete);
        assert_eq!(a.selected_count(), 1);
        nav.cancel_delete(CancelBehavior::ClearSelection, &mut a);
        assert_eq!(nav.state(), MenuState::Browsing);
        assert_eq!(a.selected_count(), 0);
    }
}
