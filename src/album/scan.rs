//! Recursive discovery of `_TV` / `_DRC` screenshots and pairing by base name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::album::entry::{ImagePairEntry, Variant};
use crate::config::PairingStrategy;

const EXTENSIONS: [&str; 3] = ["jpg", "png", "bmp"];

/// Classify a file name by its case-sensitive `_TV.ext` / `_DRC.ext` suffix.
pub fn classify(file_name: &str) -> Option<Variant> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if !EXTENSIONS.contains(&ext) {
        return None;
    }
    [Variant::Tv, Variant::Drc]
        .into_iter()
        .find(|v| stem.ends_with(v.marker()) && stem.len() > v.marker().len())
}

/// Key under which the two halves of a pair are grouped.
pub fn base_name(file_name: &str, strategy: PairingStrategy) -> Option<&str> {
    let cut = match strategy {
        PairingStrategy::LastUnderscore => file_name.rfind('_')?,
        PairingStrategy::LastDot => file_name.rfind('.')?,
    };
    Some(&file_name[..cut])
}

#[derive(Default)]
struct Group {
    tv: Option<PathBuf>,
    drc: Option<PathBuf>,
}

/// Walk `root` and return one entry per base name, sorted by that name.
///
/// A missing or non-directory root yields an empty list. `progress`, when
/// given, tracks the number of distinct entries found so far.
pub fn scan_pairs(
    root: &Path,
    strategy: PairingStrategy,
    progress: Option<&AtomicUsize>,
) -> Vec<ImagePairEntry> {
    if !root.is_dir() {
        warn!(root = %root.display(), "screenshot root missing or not a directory");
        return Vec::new();
    }

    // Groups are keyed by directory as well, so equal names in different
    // folders stay separate.
    let mut groups: BTreeMap<(PathBuf, String), Group> = BTreeMap::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(variant) = classify(name) else {
            continue;
        };
        let Some(base) = base_name(name, strategy) else {
            continue;
        };
        let dir = entry
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let group = groups.entry((dir, base.to_string())).or_default();
        let slot = match variant {
            Variant::Tv => &mut group.tv,
            Variant::Drc => &mut group.drc,
        };
        if let Some(previous) = slot.replace(entry.path().to_path_buf()) {
            debug!(path = %previous.display(), "duplicate half replaced");
        }
        if let Some(counter) = progress {
            counter.store(groups.len(), Ordering::Relaxed);
        }
    }

    let mut entries: Vec<(String, ImagePairEntry)> = groups
        .into_iter()
        .filter_map(|((_, base), g)| ImagePairEntry::new(g.tv, g.drc).map(|e| (base, e)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let entries: Vec<_> = entries.into_iter().map(|(_, e)| e).collect();
    info!(root = %root.display(), count = entries.len(), "screenshot scan complete");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_sensitive() {
        assert_eq!(classify("a_TV.png"), Some(Variant::Tv));
        assert_eq!(classify("a_DRC.jpg"), Some(Variant::Drc));
        assert_eq!(classify("a_tv.png"), None);
        assert_eq!(classify("a_TV.PNG"), None);
        assert_eq!(classify("a_TV.gif"), None);
        assert_eq!(classify("_TV.png"), None);
        assert_eq!(classify("notes.txt"), None);
    }

    #[test]
    fn base_name_strategies() {
        assert_eq!(
            base_name("game_2024_TV.png", PairingStrategy::LastUnderscore),
            Some("game_2024")
        );
        assert_eq!(
            base_name("game_2024_TV.png", PairingStrategy::LastDot),
            Some("game_2024_TV")
        );
    }
}
