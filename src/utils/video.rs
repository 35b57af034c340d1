//! YouTube links: video ids, chapter deep links, embeds and thumbnails.
//!
//! Every function here is total. Malformed input falls back to `0`, `""` or
//! the input itself instead of returning an error.

use url::Url;

/// Parse a chapter label (`mm:ss` or `h:mm:ss`) into seconds.
///
/// Components are not range-checked, so `"99:99"` is `6039`. Any component
/// that is not a non-negative integer, or any other number of components,
/// gives `0`. An empty component counts as zero.
pub fn timestamp_to_seconds(label: &str) -> u64 {
    let parts: Option<Vec<u64>> = label.split(':').map(parse_component).collect();
    match parts.as_deref() {
        Some([m, s]) => m.saturating_mul(60).saturating_add(*s),
        Some([h, m, s]) => h
            .saturating_mul(3600)
            .saturating_add(m.saturating_mul(60))
            .saturating_add(*s),
        _ => 0,
    }
}

fn parse_component(part: &str) -> Option<u64> {
    let part = part.trim();
    if part.is_empty() {
        return Some(0);
    }
    part.parse().ok()
}

/// Set the `t` query parameter of `video_url` to `"<seconds>s"`.
///
/// An existing `t` is overwritten in place and later duplicates dropped.
/// A string that is not an absolute URL is returned unchanged.
pub fn timestamp_url(video_url: &str, label: &str) -> String {
    let Ok(mut url) = Url::parse(video_url) else {
        return video_url.to_string();
    };
    let value = format!("{}s", timestamp_to_seconds(label));
    set_query_param(&mut url, "t", &value);
    url.to_string()
}

/// Value of the `v` query parameter, or `""`.
pub fn youtube_video_id(video_url: &str) -> String {
    Url::parse(video_url)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

/// `https://www.youtube.com/embed/<id>`, or `None` without a video id.
pub fn embed_url(video_url: &str) -> Option<String> {
    non_empty(youtube_video_id(video_url)).map(|id| format!("https://www.youtube.com/embed/{id}"))
}

/// Thumbnail image of a given size (`maxresdefault`, `hqdefault`, ...).
pub fn thumbnail_url(video_url: &str, size: &str) -> Option<String> {
    non_empty(youtube_video_id(video_url))
        .map(|id| format!("https://i.ytimg.com/vi/{id}/{size}.jpg"))
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Replace the first `key` pair with `value` (appending when absent).
pub(crate) fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(k, v)| {
            if k != key {
                Some((k.into_owned(), v.into_owned()))
            } else if !replaced {
                replaced = true;
                Some((k.into_owned(), value.to_string()))
            } else {
                None
            }
        })
        .collect();

    let mut query = url.query_pairs_mut();
    query.clear();
    for (k, v) in &pairs {
        query.append_pair(k, v);
    }
    if !replaced {
        query.append_pair(key, value);
    }
}
