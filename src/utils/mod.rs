use std::path::{Path, PathBuf};

use crate::domain::AppError;

/// Upper bound on ` (N)` candidates tried before giving up.
pub const MAX_COLLISION_CANDIDATES: u32 = 9999;

/// Return `path` if nothing exists there, otherwise the first free
/// `name (N).ext` next to it.
///
/// `None` once [`MAX_COLLISION_CANDIDATES`] candidates are all taken.
pub fn unique_output_path(path: &Path) -> Option<PathBuf> {
    free_output_path(path, MAX_COLLISION_CANDIDATES)
}

fn free_output_path(path: &Path, max_candidates: u32) -> Option<PathBuf> {
    if !path.exists() {
        return Some(path.to_path_buf());
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    let candidate = |n: u32| {
        let name = match &extension {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        parent.join(name)
    };

    let free = (1..=max_candidates).map(candidate).find(|next| !next.exists());
    if free.is_none() {
        tracing::warn!(path = %path.display(), max_candidates, "no free output name found");
    }
    free
}

/// Split the free-text argument field into separate arguments using shell
/// quoting rules, so `title="My Song"` stays one argument.
pub fn split_extra_args(raw: &str) -> Result<Vec<String>, AppError> {
    shell_words::split(raw).map_err(|e| {
        AppError::InvalidInput(format!("Could not parse custom arguments: {}", e))
    })
}

/// Directory downloads are written to.
pub fn downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}
