use std::path::PathBuf;

use futures::stream::BoxStream;
use futures::StreamExt;
use iced::{event, window, Event, Subscription, Task};

use crate::application::{JobCoordinator, JobEvent, JobReport};
use crate::domain::{AppError, JobKind, JobPhase};
use crate::process::ProcessRunner;
use crate::tools::ToolPaths;
use crate::ui::{ConverterView, Notice, ViewMessage};

pub struct ConverterApp {
    view: ConverterView,
    coordinator: JobCoordinator,
}

impl ConverterApp {
    pub fn new(tools: ToolPaths, downloads_dir: PathBuf) -> Self {
        let coordinator = JobCoordinator::new(ProcessRunner::new(), tools, downloads_dir);

        Self {
            view: ConverterView::default(),
            coordinator,
        }
    }

    /// Validate the form and build the job's event stream.
    ///
    /// A job whose button is already busy is refused without touching state.
    fn begin_job(&mut self, kind: JobKind) -> JobStart {
        if self.view.phase(kind).is_running() {
            tracing::debug!(?kind, "job already running, ignoring request");
            return JobStart::Busy;
        }

        let stream = match kind {
            JobKind::Convert => self
                .coordinator
                .prepare_conversion(&self.view.input, self.view.output_format, &self.view.custom_args)
                .map(|request| {
                    self.view.status_message = format!("Converting to {}...", request.output.display());
                    self.coordinator.conversion_stream(request)
                }),
            JobKind::Download => self
                .coordinator
                .prepare_download(&self.view.input, self.view.download_preset, &self.view.custom_args)
                .map(|request| {
                    self.view.status_message = format!("Starting download: {}", request.url);
                    self.coordinator.download_stream(request)
                }),
        };

        match stream {
            Ok(stream) => {
                self.view.set_phase(kind, JobPhase::Running);
                if kind == JobKind::Download {
                    self.view.download_progress = 0.0;
                }
                JobStart::Started(stream)
            }
            Err(e) => {
                tracing::info!(?kind, error = %e, "request rejected");
                JobStart::Invalid(e)
            }
        }
    }

    fn finish_job(&mut self, kind: JobKind, result: &Result<JobReport, AppError>) {
        let phase = match result {
            Ok(report) if report.outcome.success => JobPhase::Completed,
            _ => JobPhase::Failed,
        };
        self.view.set_phase(kind, phase);
        if kind == JobKind::Download {
            self.view.download_progress = 0.0;
        }
        if !self.view.any_running() {
            self.view.status_message = "Ready".to_string();
        }
    }
}

enum JobStart {
    Busy,
    Invalid(AppError),
    Started(BoxStream<'static, JobEvent>),
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(ViewMessage),
    /// Result of the "Browse..." file picker
    InputFileChosen(Option<PathBuf>),
    FileDropped(PathBuf),
    Job(JobKind, JobEvent),
    NoticeClosed,
}

pub fn update(app: &mut ConverterApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            let kind = match ui_msg {
                ViewMessage::ConvertPressed => JobKind::Convert,
                ViewMessage::DownloadPressed => JobKind::Download,
                ViewMessage::BrowsePressed => {
                    let coordinator = app.coordinator.clone();
                    return Task::perform(
                        async move { coordinator.choose_input_file().await },
                        Message::InputFileChosen,
                    );
                }
                _ => return Task::none(),
            };

            match app.begin_job(kind) {
                JobStart::Busy => {}
                JobStart::Invalid(e) => return notify(Notice::for_error(&e)),
                JobStart::Started(stream) => {
                    // Runs on the background executor; results come back as messages
                    return Task::stream(stream.map(move |event| Message::Job(kind, event)));
                }
            }
        }
        Message::InputFileChosen(Some(path)) | Message::FileDropped(path) => {
            app.view.input = path.display().to_string();
        }
        Message::InputFileChosen(None) => {}
        Message::Job(JobKind::Download, JobEvent::Progress(pct)) => {
            app.view.download_progress = f32::from(pct);
            app.view.status_message = format!("Downloading: {}%", pct);
        }
        // Conversions run without progress parsing
        Message::Job(JobKind::Convert, JobEvent::Progress(_)) => {}
        Message::Job(kind, JobEvent::Finished(result)) => {
            app.finish_job(kind, &result);
            let notice = match &result {
                Ok(report) => Notice::for_report(report),
                Err(e) => Notice::for_error(e),
            };
            return notify(notice);
        }
        Message::NoticeClosed => {}
    }
    Task::none()
}

pub fn view(app: &ConverterApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

/// Files dropped anywhere on the window fill the input field.
pub fn subscription(_app: &ConverterApp) -> Subscription<Message> {
    event::listen_with(|event, _status, _window| match event {
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        _ => None,
    })
}

fn notify(notice: Notice) -> Task<Message> {
    Task::perform(notice.show(), |_| Message::NoticeClosed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProcessOutcome;
    use std::fs;

    fn test_app(downloads: &std::path::Path) -> ConverterApp {
        ConverterApp::new(
            ToolPaths {
                ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
                yt_dlp: PathBuf::from("/nonexistent/yt-dlp"),
            },
            downloads.to_path_buf(),
        )
    }

    #[test]
    fn test_missing_input_blocks_job() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        assert!(matches!(app.begin_job(JobKind::Convert), JobStart::Invalid(_)));
        assert!(matches!(app.begin_job(JobKind::Download), JobStart::Invalid(_)));
        assert_eq!(app.view.phase(JobKind::Convert), JobPhase::Idle);
        assert_eq!(app.view.phase(JobKind::Download), JobPhase::Idle);
    }

    #[test]
    fn test_second_press_is_rejected_while_running() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.wav");
        fs::write(&input, b"").unwrap();
        let mut app = test_app(dir.path());
        app.view.input = input.display().to_string();

        assert!(matches!(app.begin_job(JobKind::Convert), JobStart::Started(_)));
        assert!(app.view.phase(JobKind::Convert).is_running());
        let status = app.view.status_message.clone();

        assert!(matches!(app.begin_job(JobKind::Convert), JobStart::Busy));
        assert_eq!(app.view.status_message, status);
    }

    #[test]
    fn test_finished_job_frees_the_button() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.view.set_phase(JobKind::Download, JobPhase::Running);
        app.view.download_progress = 55.0;

        let report = JobReport {
            kind: JobKind::Download,
            outcome: ProcessOutcome::from_code(Some(1)),
            destination: dir.path().to_path_buf(),
        };
        app.finish_job(JobKind::Download, &Ok(report));

        assert_eq!(app.view.phase(JobKind::Download), JobPhase::Failed);
        assert_eq!(app.view.download_progress, 0.0);
        assert_eq!(app.view.status_message, "Ready");
    }

    #[test]
    fn test_status_kept_while_other_job_runs() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.view.set_phase(JobKind::Convert, JobPhase::Running);
        app.view.set_phase(JobKind::Download, JobPhase::Running);
        app.view.status_message = "Downloading: 12%".to_string();

        let report = JobReport {
            kind: JobKind::Convert,
            outcome: ProcessOutcome::from_code(Some(0)),
            destination: dir.path().join("talk.mp3"),
        };
        app.finish_job(JobKind::Convert, &Ok(report));

        assert_eq!(app.view.phase(JobKind::Convert), JobPhase::Completed);
        assert!(app.view.phase(JobKind::Download).is_running());
        assert_eq!(app.view.status_message, "Downloading: 12%");
    }

    #[test]
    fn test_conversion_progress_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.view.status_message = "Converting to talk.mp3...".to_string();

        let _ = update(&mut app, Message::Job(JobKind::Convert, JobEvent::Progress(50)));
        assert_eq!(app.view.download_progress, 0.0);
        assert_eq!(app.view.status_message, "Converting to talk.mp3...");
    }

    #[test]
    fn test_progress_and_drop_messages_update_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());

        let _ = update(&mut app, Message::Job(JobKind::Download, JobEvent::Progress(43)));
        assert_eq!(app.view.download_progress, 43.0);
        assert_eq!(app.view.status_message, "Downloading: 43%");

        let dropped = dir.path().join("dropped.mkv");
        let _ = update(&mut app, Message::FileDropped(dropped.clone()));
        assert_eq!(app.view.input, dropped.display().to_string());
    }
}
