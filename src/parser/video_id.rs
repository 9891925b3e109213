use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn is_video_id(candidate: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Invalid regex"))
        .is_match(candidate)
}

/// Extracts the 11-character video id from a watch, short-link, embed or
/// shorts URL, or accepts a bare id.
#[must_use]
pub fn extract_video_id(video_url: &str) -> Option<String> {
    let trimmed = video_url.trim();
    if is_video_id(trimmed) {
        return Some(trimmed.to_string());
    }

    let url = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{trimmed}")))
        .ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let candidate = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            let from_query = url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned());

            from_query.or_else(|| {
                let mut segments = url.path_segments()?;
                match segments.next()? {
                    "embed" | "shorts" | "live" | "v" => segments.next().map(str::to_string),
                    _ => None,
                }
            })
        }
        _ => None,
    }?;

    is_video_id(&candidate).then_some(candidate)
}

/// Placeholder ids mark records whose video is not published yet; they are
/// never sent to the metadata source.
#[must_use]
pub fn is_placeholder(video_id: &str, video_url: &str, placeholders: &[String]) -> bool {
    let mut chars = video_id.chars();
    let uniform = chars
        .next()
        .is_some_and(|first| chars.all(|c| c.eq_ignore_ascii_case(&first)));

    uniform
        || placeholders.iter().any(|placeholder| {
            video_id.eq_ignore_ascii_case(placeholder)
                || video_url
                    .to_ascii_lowercase()
                    .contains(&placeholder.to_ascii_lowercase())
        })
}
