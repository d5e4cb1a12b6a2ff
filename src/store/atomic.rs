//! Atomic file replacement.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::Result;

/// Write `data` to `path` so readers see either the old or the new content.
///
/// The data goes to a uniquely named temp file in the same directory, which
/// is then renamed over the destination. The temp file is removed if the
/// write or rename fails.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, data).and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
}
