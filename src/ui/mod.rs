pub mod notice;

use iced::{
    font,
    widget::{button, column, pick_list, progress_bar, row, text, text_input, Space},
    Element, Font, Length,
};

use crate::domain::{AudioFormat, DownloadPreset, JobKind, JobPhase};

pub use notice::{Notice, NoticeLevel};

const SECTION_FONT: Font = Font {
    weight: font::Weight::Bold,
    ..Font::DEFAULT
};

/// Main view state
pub struct ConverterView {
    pub input: String,
    pub custom_args: String,
    pub output_format: Option<AudioFormat>,
    pub download_preset: Option<DownloadPreset>,
    pub status_message: String,
    pub convert_phase: JobPhase,
    pub download_phase: JobPhase,
    /// Download progress (0.0 to 100.0)
    pub download_progress: f32,
}

impl Default for ConverterView {
    fn default() -> Self {
        Self {
            input: String::new(),
            custom_args: String::new(),
            output_format: Some(AudioFormat::default()),
            download_preset: Some(DownloadPreset::default()),
            status_message: "Ready".to_string(),
            convert_phase: JobPhase::Idle,
            download_phase: JobPhase::Idle,
            download_progress: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ViewMessage {
    InputChanged(String),
    CustomArgsChanged(String),
    OutputFormatSelected(AudioFormat),
    DownloadPresetSelected(DownloadPreset),
    BrowsePressed,
    ConvertPressed,
    DownloadPressed,
}

impl ConverterView {
    pub fn phase(&self, kind: JobKind) -> JobPhase {
        match kind {
            JobKind::Convert => self.convert_phase,
            JobKind::Download => self.download_phase,
        }
    }

    pub fn set_phase(&mut self, kind: JobKind, phase: JobPhase) {
        match kind {
            JobKind::Convert => self.convert_phase = phase,
            JobKind::Download => self.download_phase = phase,
        }
    }

    pub fn any_running(&self) -> bool {
        self.convert_phase.is_running() || self.download_phase.is_running()
    }

    pub fn update(&mut self, message: ViewMessage) {
        match message {
            ViewMessage::InputChanged(value) => {
                self.input = value;
            }
            ViewMessage::CustomArgsChanged(value) => {
                self.custom_args = value;
            }
            ViewMessage::OutputFormatSelected(format) => {
                self.output_format = Some(format);
            }
            ViewMessage::DownloadPresetSelected(preset) => {
                self.download_preset = Some(preset);
            }
            ViewMessage::BrowsePressed
            | ViewMessage::ConvertPressed
            | ViewMessage::DownloadPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, ViewMessage> {
        let converting = self.convert_phase.is_running();
        let downloading = self.download_phase.is_running();

        let convert_label = if converting { "Converting..." } else { "Convert Local File" };
        let download_label = if downloading { "Downloading..." } else { "Download" };

        column![
            text("Input file path or video URL (drag & drop supported):").size(14),
            row![
                text_input("Path to a local file or a video URL...", &self.input)
                    .on_input(ViewMessage::InputChanged)
                    .padding(8),
                button("Browse...")
                    .on_press(ViewMessage::BrowsePressed)
                    .padding([8, 16]),
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(10.0)),
            text("Local File Conversion (FFmpeg)").size(15).font(SECTION_FONT),
            row![
                text("Output format:").size(14).width(Length::Fixed(110.0)),
                pick_list(
                    AudioFormat::ALL,
                    self.output_format,
                    ViewMessage::OutputFormatSelected
                )
                .width(Length::Fixed(120.0)),
                Space::new().width(Length::Fill),
                button(convert_label)
                    .on_press_maybe((!converting).then_some(ViewMessage::ConvertPressed))
                    .width(Length::Fixed(220.0))
                    .padding([8, 16]),
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(10.0)),
            text("Video Download (yt-dlp)").size(15).font(SECTION_FONT),
            row![
                text("Download as:").size(14).width(Length::Fixed(110.0)),
                pick_list(
                    DownloadPreset::ALL,
                    self.download_preset,
                    ViewMessage::DownloadPresetSelected
                )
                .width(Length::Fixed(300.0)),
                Space::new().width(Length::Fill),
                button(download_label)
                    .on_press_maybe((!downloading).then_some(ViewMessage::DownloadPressed))
                    .width(Length::Fixed(220.0))
                    .padding([8, 16]),
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(10.0)),
            text("Custom arguments (optional):").size(14),
            text_input("Extra arguments passed to the tool as-is", &self.custom_args)
                .on_input(ViewMessage::CustomArgsChanged)
                .padding(8),
            Space::new().height(Length::Fixed(10.0)),
            progress_bar(0.0..=100.0, self.download_progress),
            text(&self.status_message).size(14),
        ]
        .padding(20)
        .spacing(8)
        .into()
    }
}
