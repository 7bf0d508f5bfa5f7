use std::path::{Path, PathBuf};

use futures::{stream::BoxStream, StreamExt};
use url::Url;

use crate::{
    domain::{AppError, AudioFormat, ConversionRequest, DownloadPreset, DownloadRequest, JobKind, ProcessOutcome},
    process::{CommandSpec, ProcessEvent, ProcessRunner},
    tools::ToolPaths,
    utils::split_extra_args,
};

#[derive(Debug, Clone)]
pub enum JobEvent {
    Progress(u8),
    Finished(Result<JobReport, AppError>),
}

/// How a job ended, for the result notification.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub kind: JobKind,
    pub outcome: ProcessOutcome,
    /// Output file for conversions, target folder for downloads.
    pub destination: PathBuf,
}

#[derive(Clone)]
pub struct JobCoordinator {
    runner: ProcessRunner,
    tools: ToolPaths,
    downloads_dir: PathBuf,
}

impl JobCoordinator {
    pub fn new(runner: ProcessRunner, tools: ToolPaths, downloads_dir: PathBuf) -> Self {
        Self {
            runner,
            tools,
            downloads_dir,
        }
    }

    pub fn prepare_conversion(
        &self,
        input: &str,
        format: Option<AudioFormat>,
        extra_args: &str,
    ) -> Result<ConversionRequest, AppError> {
        let input = input.trim();
        if input.is_empty() || !Path::new(input).is_file() {
            return Err(AppError::InvalidInput(
                "Please enter or drop a valid local file.".to_string(),
            ));
        }
        let format = format.ok_or_else(|| {
            AppError::InvalidInput("Please select an output format.".to_string())
        })?;

        let extra_args = split_extra_args(extra_args)?;

        ConversionRequest::new(PathBuf::from(input), format, extra_args)
    }

    pub fn prepare_download(
        &self,
        url: &str,
        preset: Option<DownloadPreset>,
        extra_args: &str,
    ) -> Result<DownloadRequest, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::InvalidInput("Please enter a video URL.".to_string()));
        }
        let url = Url::parse(url)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| AppError::InvalidInput("Please enter a valid http(s) URL.".to_string()))?;
        let preset = preset.ok_or_else(|| {
            AppError::InvalidInput("Please select a download format.".to_string())
        })?;

        let extra_args = split_extra_args(extra_args)?;

        Ok(DownloadRequest::new(url, preset, &self.downloads_dir, extra_args))
    }

    pub async fn choose_input_file(&self) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_title("Choose a file to convert")
            .pick_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    pub fn conversion_stream(&self, request: ConversionRequest) -> BoxStream<'static, JobEvent> {
        tracing::info!(
            input = %request.input.display(),
            output = %request.output.display(),
            format = %request.format,
            "starting conversion"
        );
        let spec = CommandSpec {
            program: self.tools.ffmpeg.clone(),
            args: request.args(),
            parse_progress: false,
        };
        job_events(&self.runner, spec, JobKind::Convert, request.output)
    }

    pub fn download_stream(&self, request: DownloadRequest) -> BoxStream<'static, JobEvent> {
        tracing::info!(url = %request.url, preset = %request.preset, "starting download");
        let destination = request.downloads_dir().to_path_buf();
        let spec = CommandSpec {
            program: self.tools.yt_dlp.clone(),
            args: request.args(),
            parse_progress: true,
        };
        job_events(&self.runner, spec, JobKind::Download, destination)
    }
}

fn job_events(
    runner: &ProcessRunner,
    spec: CommandSpec,
    kind: JobKind,
    destination: PathBuf,
) -> BoxStream<'static, JobEvent> {
    runner
        .run(spec)
        .filter_map(move |event| {
            let mapped = match event {
                ProcessEvent::Line(_) => None,
                ProcessEvent::Progress(pct) => Some(JobEvent::Progress(pct)),
                ProcessEvent::Exited(outcome) => Some(JobEvent::Finished(Ok(JobReport {
                    kind,
                    outcome,
                    destination: destination.clone(),
                }))),
                ProcessEvent::Failed(e) => Some(JobEvent::Finished(Err(e))),
            };
            futures::future::ready(mapped)
        })
        .boxed()
}
