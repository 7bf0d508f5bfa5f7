/// Prefix the downloader puts on progress lines.
const DOWNLOAD_MARKER: &str = "[download]";
/// Separates the percentage from the size estimate on a progress line.
const SIZE_SEPARATOR: &str = " of ";

/// Extract the completion percentage from one downloader output line.
///
/// Lines look like `[download]  42.5% of ~ 10.00MiB at 1.20MiB/s ETA 00:05`.
/// The last `%`-terminated token between the marker and ` of ` is rounded
/// half away from zero and clamped to `0..=100`. Anything else yields `None`.
pub fn parse_download_progress(line: &str) -> Option<u8> {
    let (_, after_marker) = line.split_once(DOWNLOAD_MARKER)?;
    let head = after_marker
        .split_once(SIZE_SEPARATOR)
        .map_or(after_marker, |(head, _)| head);

    let token = head
        .split_whitespace()
        .rev()
        .find(|token| token.ends_with('%'))?;

    let value: f64 = token.trim_end_matches('%').parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(value.round().clamp(0.0, 100.0) as u8)
}
