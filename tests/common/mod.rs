//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::{fs, io, path::Path};
use tempfile::TempDir;

#[allow(dead_code)]
pub const HELLO: &str = "/2011/05/01/hello";
#[allow(dead_code)]
pub const ABOUT: &str = "/about";

#[allow(dead_code)]
pub fn copy_dir_all(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> io::Result<()> {
    fs::create_dir_all(&dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        if ty.is_dir() {
            copy_dir_all(entry.path(), dst.as_ref().join(entry.file_name()))?;
        } else {
            fs::copy(entry.path(), dst.as_ref().join(entry.file_name()))?;
        }
    }
    Ok(())
}

/// Copies the fixture site `tests/<name>` into a fresh temporary directory.
///
/// `site_1` holds, for [`HELLO`], a `.txt`, an `.html` and (under `blog/`) a `.md` comment; for
/// [`ABOUT`] two whole-file YAML comments using the legacy `comment` field; plus one file with
/// malformed metadata and one without a `post_id`.
#[allow(dead_code)]
pub fn generate_test_root(name: &str) -> io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let content_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join(name);
    tracing::debug!("Copying content from {:?}", content_root);
    copy_dir_all(&content_root, temp_dir.path())?;
    Ok(temp_dir)
}

/// Writes `text` to `root/rel`, creating parent directories.
#[allow(dead_code)]
pub fn write_file(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// A front-matter comment file for `post_id` with the given author and body.
#[allow(dead_code)]
pub fn comment_file(post_id: &str, name: &str, body: &str) -> String {
    format!("---\npost_id: {post_id}\nname: {name}\n---\n{body}")
}
