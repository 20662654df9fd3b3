//! URL helpers for watch pages: time-offset stripping, video id extraction,
//! thumbnail derivation and playback links.

use once_cell::sync::Lazy;
use regex::Regex;

/// Query parameter carrying a playback offset.
const TIME_PARAM: &str = "t";

static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?(?:[^#\s]*&)?v=|youtu\.be/)([^&\n?#]+)")
        .expect("video id pattern is valid")
});

/// Removes every `t` parameter, whether written `?t=` or `&t=`.
///
/// Parameters start at the first `?` or `&`; after that both characters
/// separate pairs, so a stray second `?` or a query-less `&t=` is caught too.
/// The remaining parameters keep their order and separators, and the
/// fragment is preserved.
pub fn strip_time_offset(url: &str) -> String {
    let (before_fragment, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };

    let Some(idx) = before_fragment.find(['?', '&']) else {
        return url.to_string();
    };
    let base = &before_fragment[..idx];
    let lead = &before_fragment[idx..idx + 1];
    let params = &before_fragment[idx + 1..];

    let mut pairs: Vec<(&str, &str)> = Vec::new();
    let mut sep = lead;
    let mut start = 0;
    for (i, c) in params.char_indices() {
        if c == '?' || c == '&' {
            pairs.push((sep, &params[start..i]));
            sep = &params[i..i + 1];
            start = i + 1;
        }
    }
    pairs.push((sep, &params[start..]));

    let mut out = String::with_capacity(url.len());
    out.push_str(base);
    let mut first = true;
    for (sep, pair) in pairs {
        let name = pair.split('=').next().unwrap_or("");
        if pair.is_empty() || name == TIME_PARAM {
            continue;
        }
        out.push_str(if first { lead } else { sep });
        out.push_str(pair);
        first = false;
    }
    out.push_str(fragment);
    out
}

/// Extracts the video id from a long-form watch URL or a short link.
///
/// Returns an empty string when neither shape matches.
pub fn extract_video_id(url: &str) -> String {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Full-size thumbnail for a video, or empty when the id is unknown.
pub fn thumbnail_url(video_id: &str) -> String {
    if video_id.is_empty() {
        String::new()
    } else {
        format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
    }
}

/// Lower-resolution thumbnail shown when the full-size one is missing.
pub fn fallback_thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id)
}

/// Link that starts playback at `time` seconds.
pub fn playback_url(url: &str, time: u64) -> String {
    let (before_fragment, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let separator = if before_fragment.contains('?') { '&' } else { '?' };
    format!("{}{}t={}s{}", before_fragment, separator, time, fragment)
}

/// Formats seconds as `H:MM:SS` from one hour up, `M:SS` below.
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
