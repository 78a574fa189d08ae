//! The screenshot collection shown in the grid.

pub mod entry;
pub mod layout;
pub mod scan;

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

pub use entry::{ImagePairEntry, Variant};
pub use layout::GridLayout;

#[derive(Debug, Clone)]
pub struct Album {
    entries: Vec<ImagePairEntry>,
    layout: GridLayout,
}

impl Album {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            entries: Vec::new(),
            layout,
        }
    }

    pub fn with_entries(layout: GridLayout, entries: Vec<ImagePairEntry>) -> Self {
        let mut album = Self::new(layout);
        album.replace(entries);
        album
    }

    /// Swap in a freshly scanned collection.
    pub fn replace(&mut self, entries: Vec<ImagePairEntry>) {
        self.entries = entries;
        self.relayout();
    }

    pub fn entries(&self) -> &[ImagePairEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ImagePairEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(e) => {
                e.selected = !e.selected;
                true
            }
            None => false,
        }
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|e| e.selected).count()
    }

    pub fn clear_selection(&mut self) {
        for e in &mut self.entries {
            e.selected = false;
        }
    }

    /// Remove every selected entry and delete its files.
    ///
    /// File removal is best effort; the entry disappears either way. Returns
    /// the paths whose derived resources should be released.
    pub fn delete_selected(&mut self) -> Vec<PathBuf> {
        let (doomed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|e| e.selected);
        self.entries = kept;
        self.relayout();

        let mut released = Vec::new();
        for entry in &doomed {
            for path in entry.paths() {
                if let Err(err) = fs::remove_file(path) {
                    debug!(path = %path.display(), %err, "screenshot delete failed");
                }
                released.push(path.to_path_buf());
            }
        }
        info!(
            removed = doomed.len(),
            remaining = self.entries.len(),
            "deleted selected screenshots"
        );
        released
    }

    fn relayout(&mut self) {
        for (i, e) in self.entries.iter_mut().enumerate() {
            e.position = self.layout.position_for(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ImagePairEntry {
        ImagePairEntry::new(Some(PathBuf::from(format!("/nonexistent/{name}_TV.png"))), None)
            .unwrap()
    }

    #[test]
    fn delete_keeps_grid_dense() {
        let layout = GridLayout::new(1920, 1080, 4, 256);
        let mut album =
            Album::with_entries(layout, (0..9).map(|i| entry(&i.to_string())).collect());
        album.toggle(1);
        album.toggle(4);
        let released = album.delete_selected();
        assert_eq!(released.len(), 2);
        assert_eq!(album.len(), 7);
        for (i, e) in album.entries().iter().enumerate() {
            assert_eq!(e.position, layout.position_for(i));
            assert!(!e.selected);
        }
    }

    #[test]
    fn toggle_out_of_range_is_ignored() {
        let mut album = Album::new(GridLayout::new(1920, 1080, 4, 256));
        assert!(!album.toggle(0));
        assert_eq!(album.selected_count(), 0);
    }
}
