use std::ffi::OsString;
use std::path::{Path, PathBuf};

use url::Url;

use super::error::AppError;
use super::preset::{AudioFormat, DownloadPreset};
use crate::utils::unique_output_path;

/// Filename template handed to the downloader; it fills in title and extension.
pub const DOWNLOAD_NAME_TEMPLATE: &str = "%(title)s.%(ext)s";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Convert,
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Running,
    Completed,
    Failed,
}

impl JobPhase {
    pub fn is_running(self) -> bool {
        self == JobPhase::Running
    }
}

/// A local file conversion through the transcoder.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: AudioFormat,
    pub extra_args: Vec<String>,
}

impl ConversionRequest {
    /// Output goes next to the input with the extension swapped; an existing
    /// file at that location gets a ` (N)` suffix instead of being overwritten.
    pub fn new(input: PathBuf, format: AudioFormat, extra_args: Vec<String>) -> Result<Self, AppError> {
        let target = input.with_extension(format.extension());
        let output = unique_output_path(&target).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Could not find a free output file name next to {}.",
                target.display()
            ))
        })?;
        Ok(Self {
            input,
            output,
            format,
            extra_args,
        })
    }

    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-i".into(), self.input.clone().into_os_string()];
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(self.output.clone().into_os_string());
        args
    }
}

/// A video download through the downloader.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: Url,
    pub preset: DownloadPreset,
    pub output_template: PathBuf,
    pub extra_args: Vec<String>,
}

impl DownloadRequest {
    pub fn new(url: Url, preset: DownloadPreset, downloads_dir: &Path, extra_args: Vec<String>) -> Self {
        Self {
            url,
            preset,
            output_template: downloads_dir.join(DOWNLOAD_NAME_TEMPLATE),
            extra_args,
        }
    }

    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.preset.args().iter().map(OsString::from).collect();
        args.push("-o".into());
        args.push(self.output_template.clone().into_os_string());
        // One progress update per line instead of carriage-return redraws
        args.push("--newline".into());
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(self.url.as_str().into());
        args
    }

    pub fn downloads_dir(&self) -> &Path {
        self.output_template.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Exit status of one external tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl ProcessOutcome {
    pub fn from_code(exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            success: exit_code == Some(0),
        }
    }
}

impl From<std::process::ExitStatus> for ProcessOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self::from_code(status.code())
    }
}
