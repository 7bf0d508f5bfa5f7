use std::fmt;

/// Arguments used when a preset label is not recognized.
#[cfg(test)]
pub const FALLBACK_DOWNLOAD_ARGS: &[&str] = &["-f", "best"];

/// Target container/codec for a local conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Flac,
    Aac,
    Ogg,
    M4a,
    Opus,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 7] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Flac,
        AudioFormat::Aac,
        AudioFormat::Ogg,
        AudioFormat::M4a,
        AudioFormat::Opus,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::Aac => "aac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::M4a => "m4a",
            AudioFormat::Opus => "opus",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Download quality/format choice offered for the downloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadPreset {
    BestVideoAudioMp4,
    BestVideoOnlyMp4,
    BestAudioMp3,
    HighestResolutionMp4,
    Mp4720p,
    Mp4480p,
    Mp4360p,
    WebmBest,
    MkvBest,
    AudioM4a,
    AudioWav,
    AudioOpus,
}

/// Label and argument fragment for every preset, in menu order.
const PRESET_TABLE: &[(DownloadPreset, &str, &[&str])] = &[
    (
        DownloadPreset::BestVideoAudioMp4,
        "Best quality video + audio (MP4)",
        &["-f", "bestvideo+bestaudio/best", "--merge-output-format", "mp4"],
    ),
    (
        DownloadPreset::BestVideoOnlyMp4,
        "Best video only (MP4)",
        &["-f", "bestvideo", "--merge-output-format", "mp4"],
    ),
    (
        DownloadPreset::BestAudioMp3,
        "Best audio only (MP3)",
        &["-x", "--audio-format", "mp3"],
    ),
    (
        DownloadPreset::HighestResolutionMp4,
        "Highest resolution (MP4)",
        &["-f", "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"],
    ),
    (
        DownloadPreset::Mp4720p,
        "720p (MP4)",
        &[
            "-f",
            "bestvideo[height<=720]+bestaudio/best[height<=720]",
            "--merge-output-format",
            "mp4",
        ],
    ),
    (
        DownloadPreset::Mp4480p,
        "480p (MP4)",
        &[
            "-f",
            "bestvideo[height<=480]+bestaudio/best[height<=480]",
            "--merge-output-format",
            "mp4",
        ],
    ),
    (
        DownloadPreset::Mp4360p,
        "360p (MP4)",
        &[
            "-f",
            "bestvideo[height<=360]+bestaudio/best[height<=360]",
            "--merge-output-format",
            "mp4",
        ],
    ),
    (
        DownloadPreset::WebmBest,
        "WEBM best",
        &["-f", "bestvideo[ext=webm]+bestaudio[ext=webm]/best[ext=webm]/best"],
    ),
    (
        DownloadPreset::MkvBest,
        "MKV best",
        &["-f", "bestvideo+bestaudio", "--merge-output-format", "mkv"],
    ),
    (
        DownloadPreset::AudioM4a,
        "Audio only (M4A)",
        &["-x", "--audio-format", "m4a"],
    ),
    (
        DownloadPreset::AudioWav,
        "Audio only (WAV)",
        &["-x", "--audio-format", "wav"],
    ),
    (
        DownloadPreset::AudioOpus,
        "Audio only (OPUS)",
        &["-x", "--audio-format", "opus"],
    ),
];

impl DownloadPreset {
    pub const ALL: [DownloadPreset; 12] = [
        DownloadPreset::BestVideoAudioMp4,
        DownloadPreset::BestVideoOnlyMp4,
        DownloadPreset::BestAudioMp3,
        DownloadPreset::HighestResolutionMp4,
        DownloadPreset::Mp4720p,
        DownloadPreset::Mp4480p,
        DownloadPreset::Mp4360p,
        DownloadPreset::WebmBest,
        DownloadPreset::MkvBest,
        DownloadPreset::AudioM4a,
        DownloadPreset::AudioWav,
        DownloadPreset::AudioOpus,
    ];

    fn entry(self) -> &'static (DownloadPreset, &'static str, &'static [&'static str]) {
        // Table rows follow declaration order.
        &PRESET_TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.entry().1
    }

    pub fn args(self) -> &'static [&'static str] {
        self.entry().2
    }

    #[cfg(test)]
    pub fn from_label(label: &str) -> Option<Self> {
        PRESET_TABLE
            .iter()
            .find(|(_, l, _)| *l == label)
            .map(|(preset, _, _)| *preset)
    }
}

impl Default for DownloadPreset {
    fn default() -> Self {
        DownloadPreset::BestAudioMp3
    }
}

impl fmt::Display for DownloadPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Argument fragment for a display label, falling back to `-f best`.
#[cfg(test)]
pub fn download_preset_args(label: &str) -> &'static [&'static str] {
    DownloadPreset::from_label(label)
        .map(DownloadPreset::args)
        .unwrap_or(FALLBACK_DOWNLOAD_ARGS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_has_a_table_entry() {
        assert_eq!(PRESET_TABLE.len(), DownloadPreset::ALL.len());
        for (index, preset) in DownloadPreset::ALL.into_iter().enumerate() {
            assert_eq!(PRESET_TABLE[index].0, preset);
            assert_eq!(DownloadPreset::from_label(preset.label()), Some(preset));
        }
    }

    #[test]
    fn test_preset_fragments() {
        let cases: &[(&str, &[&str])] = &[
            (
                "Best quality video + audio (MP4)",
                &["-f", "bestvideo+bestaudio/best", "--merge-output-format", "mp4"],
            ),
            (
                "Best video only (MP4)",
                &["-f", "bestvideo", "--merge-output-format", "mp4"],
            ),
            ("Best audio only (MP3)", &["-x", "--audio-format", "mp3"]),
            (
                "Highest resolution (MP4)",
                &["-f", "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"],
            ),
            (
                "720p (MP4)",
                &[
                    "-f",
                    "bestvideo[height<=720]+bestaudio/best[height<=720]",
                    "--merge-output-format",
                    "mp4",
                ],
            ),
            (
                "480p (MP4)",
                &[
                    "-f",
                    "bestvideo[height<=480]+bestaudio/best[height<=480]",
                    "--merge-output-format",
                    "mp4",
                ],
            ),
            (
                "360p (MP4)",
                &[
                    "-f",
                    "bestvideo[height<=360]+bestaudio/best[height<=360]",
                    "--merge-output-format",
                    "mp4",
                ],
            ),
            (
                "WEBM best",
                &["-f", "bestvideo[ext=webm]+bestaudio[ext=webm]/best[ext=webm]/best"],
            ),
            (
                "MKV best",
                &["-f", "bestvideo+bestaudio", "--merge-output-format", "mkv"],
            ),
            ("Audio only (M4A)", &["-x", "--audio-format", "m4a"]),
            ("Audio only (WAV)", &["-x", "--audio-format", "wav"]),
            ("Audio only (OPUS)", &["-x", "--audio-format", "opus"]),
        ];

        for (label, expected) in cases {
            assert_eq!(download_preset_args(label), *expected, "label: {label}");
        }
    }

    #[test]
    fn test_unknown_label_falls_back_to_best() {
        assert_eq!(download_preset_args("4K HDR (AV1)"), &["-f", "best"]);
        assert_eq!(download_preset_args(""), &["-f", "best"]);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AudioFormat::default().extension(), "mp3");
        assert_eq!(DownloadPreset::default().label(), "Best audio only (MP3)");
    }
}
