//! Files under the media root.

use std::path::Path;

use stockroom_api::ServiceError;

use crate::StoreResult;

/// Write `bytes` to the media-relative path `rel`, replacing any existing file.
pub(crate) fn write(root: &Path, rel: &str, bytes: &[u8]) -> StoreResult<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(ServiceError::from_db("create media dir"))?;
    }
    std::fs::write(&path, bytes).map_err(ServiceError::from_db("write media file"))?;
    tracing::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Remove a stored file. A file that is already gone is not an error.
pub(crate) fn remove(root: &Path, rel: &str) {
    let path = root.join(rel);
    match std::fs::remove_file(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("remove {}: {e}", path.display()),
    }
}

/// A file written inside a transaction. [`Staged::discard`] takes it back
/// when the transaction does not commit.
#[derive(Debug)]
pub(crate) struct Staged {
    rel: String,
    fresh: bool,
}

impl Staged {
    pub(crate) fn write(root: &Path, rel: &str, bytes: &[u8]) -> StoreResult<Self> {
        let fresh = !root.join(rel).exists();
        write(root, rel, bytes)?;
        Ok(Self {
            rel: rel.to_string(),
            fresh,
        })
    }

    /// Remove the file unless it replaced one that was already there.
    pub(crate) fn discard(self, root: &Path) {
        if self.fresh {
            remove(root, &self.rel);
        }
    }
}

/// `rel` if free, otherwise the first of `name_1.ext`, `name_2.ext`, ...
pub(crate) fn available_path(root: &Path, rel: &str) -> String {
    if !root.join(rel).exists() {
        return rel.to_string();
    }
    let (dir, file) = match rel.rsplit_once('/') {
        Some((dir, file)) => (format!("{dir}/"), file),
        None => (String::new(), rel),
    };
    let (stem, ext) = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
        _ => (file, String::new()),
    };
    (1..)
        .map(|n| format!("{dir}{stem}_{n}{ext}"))
        .find(|candidate| !root.join(candidate).exists())
        .unwrap_or_else(|| rel.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_path_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        assert_eq!(available_path(root, "a/quote.pdf"), "a/quote.pdf");

        write(root, "a/quote.pdf", b"1").unwrap();
        assert_eq!(available_path(root, "a/quote.pdf"), "a/quote_1.pdf");

        write(root, "a/quote_1.pdf", b"2").unwrap();
        assert_eq!(available_path(root, "a/quote.pdf"), "a/quote_2.pdf");

        write(root, "README", b"3").unwrap();
        assert_eq!(available_path(root, "README"), "README_1");
    }

    #[test]
    fn test_discard_only_removes_new_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let staged = Staged::write(root, "img/new.png", b"new").unwrap();
        assert!(root.join("img/new.png").exists());
        staged.discard(root);
        assert!(!root.join("img/new.png").exists());

        write(root, "img/old.png", b"old").unwrap();
        let staged = Staged::write(root, "img/old.png", b"replacement").unwrap();
        staged.discard(root);
        assert!(root.join("img/old.png").exists());
    }

    #[test]
    fn test_remove_missing_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        remove(dir.path(), "nothing/here.png");
    }
}
