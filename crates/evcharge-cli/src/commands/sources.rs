//! Expansion of file, directory and glob arguments into image paths.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;
use tracing::debug;

use evcharge_core::models::config::DiscoveryConfig;

/// Resolve inputs to a de-duplicated, canonical list of image files.
///
/// Directories are walked recursively (files first, then subdirectories, each
/// sorted case-insensitively). Explicit files must carry an image extension.
pub fn collect_images(inputs: &[String], discovery: &DiscoveryConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for input in inputs {
        if is_pattern(input) {
            let mut matched = 0usize;
            for entry in glob(input)?.filter_map(|r| r.ok()) {
                matched += 1;
                if entry.is_dir() {
                    walk(&entry, discovery, &mut found)?;
                } else if discovery.is_image(&entry) {
                    found.push(entry);
                }
            }
            debug!("Pattern {} matched {} paths", input, matched);
            continue;
        }

        let path = PathBuf::from(input);
        if !path.exists() {
            anyhow::bail!("Input not found: {}", path.display());
        }
        if path.is_dir() {
            walk(&path, discovery, &mut found)?;
        } else if discovery.is_image(&path) {
            found.push(path);
        } else {
            anyhow::bail!("Not an image file: {}", path.display());
        }
    }

    let mut seen = HashSet::new();
    let mut images = Vec::with_capacity(found.len());
    for path in found {
        let canonical = path.canonicalize()?;
        if seen.insert(canonical.clone()) {
            images.push(canonical);
        }
    }
    Ok(images)
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn walk(dir: &Path, discovery: &DiscoveryConfig, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        } else if discovery.is_image(&path) {
            files.push(path);
        }
    }

    files.sort_by_key(|p| sort_key(p));
    dirs.sort_by_key(|p| sort_key(p));

    out.extend(files);
    for sub in dirs {
        walk(&sub, discovery, out)?;
    }
    Ok(())
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        let root = root.canonicalize().unwrap();
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(&root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_directory_walk_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.PNG"));
        touch(&root.join("A.jpg"));
        touch(&root.join("notes.txt"));
        touch(&root.join("sub").join("c.png"));
        touch(&root.join("Another").join("d.jpeg"));

        let images = collect_images(
            &[root.to_string_lossy().to_string()],
            &DiscoveryConfig::default(),
        )
        .unwrap();

        assert_eq!(
            names(&images, root),
            vec!["A.jpg", "b.PNG", "Another/d.jpeg", "sub/c.png"]
        );
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("shot.png");
        touch(&file);

        let input = file.to_string_lossy().to_string();
        let images = collect_images(
            &[input.clone(), dir.path().to_string_lossy().to_string(), input],
            &DiscoveryConfig::default(),
        )
        .unwrap();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_glob_pattern() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("one.png"));
        touch(&dir.path().join("two.png"));
        touch(&dir.path().join("three.txt"));

        let pattern = dir.path().join("*").to_string_lossy().to_string();
        let images = collect_images(&[pattern], &DiscoveryConfig::default()).unwrap();
        assert_eq!(names(&images, dir.path()), vec!["one.png", "two.png"]);
    }

    #[test]
    fn test_rejects_missing_and_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        touch(&text);

        let missing = dir.path().join("missing.png").to_string_lossy().to_string();
        assert!(collect_images(&[missing], &DiscoveryConfig::default()).is_err());

        let err = collect_images(
            &[text.to_string_lossy().to_string()],
            &DiscoveryConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Not an image"));
    }
}
