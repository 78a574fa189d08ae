use std::fs;
use std::path::Path;

use photo_album::album::scan::scan_pairs;
use photo_album::config::PairingStrategy;

fn touch(dir: &Path, name: &str) {
    if let Some(parent) = dir.join(name).parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(dir.join(name), b"not really an image").unwrap();
}

#[test]
fn pairs_tv_and_drc_halves() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "A_TV.png");
    touch(dir.path(), "A_DRC.png");
    touch(dir.path(), "B_TV.jpg");

    let entries = scan_pairs(dir.path(), PairingStrategy::LastUnderscore, None);
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_pair());
    assert_eq!(entries[0].tv(), Some(dir.path().join("A_TV.png").as_path()));
    assert_eq!(entries[0].drc(), Some(dir.path().join("A_DRC.png").as_path()));
    assert_eq!(entries[1].tv(), Some(dir.path().join("B_TV.jpg").as_path()));
    assert!(entries[1].drc().is_none());
}

#[test]
fn ignores_unrelated_and_wrong_case_files() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "C_tv.png");
    touch(dir.path(), "D_TV.gif");
    touch(dir.path(), "E_DRC.bmp");
    let entries = scan_pairs(dir.path(), PairingStrategy::LastUnderscore, None);
    assert_eq!(entries.len(), 1);
    assert!(entries[0].tv().is_none());
}

#[test]
fn recurses_and_sorts_by_base() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "2024/zeta_TV.png");
    touch(dir.path(), "2023/alpha_DRC.png");
    touch(dir.path(), "mid_TV.png");
    let entries = scan_pairs(dir.path(), PairingStrategy::LastUnderscore, None);
    let names: Vec<_> = entries
        .iter()
        .map(|e| e.paths().next().unwrap().file_name().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["alpha_DRC.png", "mid_TV.png", "zeta_TV.png"]);
}

#[test]
fn last_dot_keeps_every_file_separate() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "A_TV.png");
    touch(dir.path(), "A_DRC.png");
    let entries = scan_pairs(dir.path(), PairingStrategy::LastDot, None);
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| !e.is_pair()));
}

#[test]
fn missing_root_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let entries = scan_pairs(&dir.path().join("absent"), PairingStrategy::LastUnderscore, None);
    assert!(entries.is_empty());

    touch(dir.path(), "file_TV.png");
    let entries = scan_pairs(&dir.path().join("file_TV.png"), PairingStrategy::LastUnderscore, None);
    assert!(entries.is_empty());
}
