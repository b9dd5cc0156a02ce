/// Shared file list for the panes
///
/// Panes show images that share a filename across their directories. The
/// list is built from a non-recursive scan filtered to image extensions.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::Result;

/// Extensions shown in the file list (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// How the shared list is derived from the pane directories
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    /// Reference pane's directory drives the list
    #[default]
    Reference,
    /// Only names present in every chosen directory
    Intersection,
}

pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Sorted image filenames directly inside `dir`
pub fn list_images(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_image_name(&name) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// File list for a set of pane directories (`None` = not chosen yet)
///
/// `Reference` uses pane 0, or the first pane with a directory while pane 0
/// has none.
pub fn shared_filenames(dirs: &[Option<&Path>], mode: ListingMode) -> Result<Vec<String>> {
    let mut chosen = dirs.iter().flatten();

    match mode {
        ListingMode::Reference => match chosen.next() {
            Some(dir) => list_images(dir),
            None => Ok(Vec::new()),
        },
        ListingMode::Intersection => {
            let mut common: Option<BTreeSet<String>> = None;
            for dir in chosen {
                let names: BTreeSet<String> = list_images(dir)?.into_iter().collect();
                common = Some(match common {
                    Some(acc) => acc.intersection(&names).cloned().collect(),
                    None => names,
                });
            }
            Ok(common.map(|set| set.into_iter().collect()).unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn test_is_image_name() {
        assert!(is_image_name("a.png"));
        assert!(is_image_name("B.JPG"));
        assert!(is_image_name("c.Jpeg"));
        assert!(is_image_name("d.bmp"));
        assert!(is_image_name("e.gif"));
        assert!(!is_image_name("f.tiff"));
        assert!(!is_image_name("notes.txt"));
        assert!(!is_image_name("png"));
    }

    #[test]
    fn test_list_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["b.png", "a.JPG", "readme.md", "c.gif"]);
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), &["deep.png"]);

        let names = list_images(dir.path()).unwrap();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.gif"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_images(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn test_reference_mode_follows_first_directory() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(first.path(), &["x.png", "y.png"]);
        touch(second.path(), &["y.png", "z.png"]);

        let dirs = [None, Some(first.path()), Some(second.path())];
        let names = shared_filenames(&dirs, ListingMode::Reference).unwrap();
        assert_eq!(names, vec!["x.png", "y.png"]);

        assert!(shared_filenames(&[None, None], ListingMode::Reference).unwrap().is_empty());
    }

    #[test]
    fn test_intersection_mode() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(first.path(), &["x.png", "y.png", "w.bmp"]);
        touch(second.path(), &["y.png", "z.png", "w.bmp"]);

        let dirs = [Some(first.path()), None, Some(second.path())];
        let names = shared_filenames(&dirs, ListingMode::Intersection).unwrap();
        assert_eq!(names, vec!["w.bmp", "y.png"]);
    }
}
