use rfd::{AsyncMessageDialog, MessageButtons, MessageDialog, MessageLevel};

use crate::application::JobReport;
use crate::domain::{AppError, JobKind};

/// A message box shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl From<NoticeLevel> for MessageLevel {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => MessageLevel::Info,
            NoticeLevel::Warning => MessageLevel::Warning,
            NoticeLevel::Error => MessageLevel::Error,
        }
    }
}

impl Notice {
    pub fn for_report(report: &JobReport) -> Self {
        if report.outcome.success {
            let body = match report.kind {
                JobKind::Convert => format!(
                    "Conversion finished successfully!\n\nSaved to {}",
                    report.destination.display()
                ),
                JobKind::Download => format!(
                    "Download finished successfully!\n\nFiles saved to {}",
                    report.destination.display()
                ),
            };
            return Self {
                level: NoticeLevel::Info,
                title: "Success".to_string(),
                body,
            };
        }

        let tool = match report.kind {
            JobKind::Convert => "FFmpeg",
            JobKind::Download => "yt-dlp",
        };
        let body = match report.outcome.exit_code {
            Some(code) => format!("{} exited with code {}.", tool, code),
            None => format!("{} was terminated before it finished.", tool),
        };
        Self {
            level: NoticeLevel::Warning,
            title: "Warning".to_string(),
            body,
        }
    }

    pub fn for_error(error: &AppError) -> Self {
        if error.is_validation() {
            Self {
                level: NoticeLevel::Info,
                title: "Convertly".to_string(),
                body: error.to_string(),
            }
        } else {
            Self {
                level: NoticeLevel::Error,
                title: "Error".to_string(),
                body: format!("Error: {}", error),
            }
        }
    }

    pub async fn show(self) {
        AsyncMessageDialog::new()
            .set_level(self.level.into())
            .set_title(&self.title)
            .set_description(&self.body)
            .set_buttons(MessageButtons::Ok)
            .show()
            .await;
    }

    /// Blocking variant for use before the event loop exists.
    pub fn show_blocking(&self) {
        MessageDialog::new()
            .set_level(self.level.into())
            .set_title(&self.title)
            .set_description(&self.body)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
