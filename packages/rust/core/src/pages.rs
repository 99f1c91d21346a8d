//! Page discovery: the standalone markdown pages shown in the site menu.

use std::path::Path;

use tracing::{debug, instrument};

use docsite_shared::{DocsiteError, PageDescriptor, Result};

/// List markdown pages directly inside `pages_dir`.
///
/// A file counts as a page when its extension (with the leading dot, e.g.
/// `.md`) is in `extensions`. The page name is the file stem. A missing
/// directory yields no pages.
#[instrument(skip_all, fields(dir = %pages_dir.display()))]
pub fn discover_pages(pages_dir: &Path, extensions: &[String]) -> Result<Vec<PageDescriptor>> {
    let entries = match std::fs::read_dir(pages_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("pages directory not found, no pages");
            return Ok(Vec::new());
        }
        Err(e) => return Err(DocsiteError::io(pages_dir, e)),
    };

    let mut pages = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| DocsiteError::io(pages_dir, e))?;
        let path = entry.path();

        let file_type = entry.file_type().map_err(|e| DocsiteError::io(&path, e))?;
        if !file_type.is_file() {
            continue;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !extensions.iter().any(|allowed| allowed.strip_prefix('.') == Some(ext)) {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        pages.push(PageDescriptor {
            name: name.to_string(),
            path: Some(path.clone()),
        });
    }

    pages.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = pages.len(), "pages discovered");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "# page\n").expect("write page");
    }

    #[test]
    fn lists_markdown_pages_by_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(dir.path(), "usage.md");
        touch(dir.path(), "index.md");
        touch(dir.path(), "getting-started.markdown");
        touch(dir.path(), "notes.txt");
        std::fs::create_dir(dir.path().join("drafts.md")).expect("mkdir");

        let pages = discover_pages(dir.path(), &[".md".into(), ".markdown".into()])
            .expect("discover");
        let names: Vec<_> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["getting-started", "index", "usage"]);
        assert_eq!(pages[2].path.as_deref(), Some(dir.path().join("usage.md").as_path()));
    }

    #[test]
    fn missing_directory_has_no_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pages = discover_pages(&dir.path().join("nope"), &[".md".into()]).expect("discover");
        assert!(pages.is_empty());
    }
}
