//! Locating the external transcoder and downloader binaries.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::domain::AppError;

pub const FFMPEG: &str = "ffmpeg";
pub const YT_DLP: &str = "yt-dlp";

/// Name of the directory, under the system temp dir, holding bundled tools.
const BUNDLED_DIR_NAME: &str = "ConvertlyFileConverter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub yt_dlp: PathBuf,
}

/// Resolve both tools, failing on the first one that cannot be found.
pub fn provision(config: &AppConfig) -> Result<ToolPaths, AppError> {
    let bundled = bundled_dir();
    let tools = ToolPaths {
        ffmpeg: resolve_tool(FFMPEG, config.ffmpeg_path.as_deref(), &bundled)?,
        yt_dlp: resolve_tool(YT_DLP, config.yt_dlp_path.as_deref(), &bundled)?,
    };
    tracing::info!(
        ffmpeg = %tools.ffmpeg.display(),
        yt_dlp = %tools.yt_dlp.display(),
        "tools ready"
    );
    Ok(tools)
}

/// Directory bundled tool binaries are extracted to.
pub fn bundled_dir() -> PathBuf {
    std::env::temp_dir().join(BUNDLED_DIR_NAME)
}

/// Platform file name of a tool.
pub fn executable_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{tool}.exe")
    } else {
        tool.to_string()
    }
}

/// Lookup order: configured override, previously extracted copy in
/// `bundled_dir`, then `PATH`.
pub fn resolve_tool(
    tool: &str,
    override_path: Option<&Path>,
    bundled_dir: &Path,
) -> Result<PathBuf, AppError> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(AppError::ToolNotFound {
            tool: tool.to_string(),
            detail: format!("configured path {} does not exist", path.display()),
        });
    }

    let bundled = bundled_dir.join(executable_name(tool));
    if bundled.is_file() {
        tracing::debug!(tool, path = %bundled.display(), "using bundled copy");
        return Ok(bundled);
    }

    which::which(tool).map_err(|e| AppError::ToolNotFound {
        tool: tool.to_string(),
        detail: format!("not bundled and not on PATH ({})", e),
    })
}
