//! Conversion of backend search responses into normalized video results.

use chrono::{DateTime, Utc};
use serde_json::Value;
use url::Url;

use super::error::{EngineError, EngineResult};
use super::format::{format_length, humanize_number};
use super::types::{RawItem, ValidatedVideo, VideoResult};

/// Result template for video records.
pub const VIDEO_TEMPLATE: &str = "videos.html";

/// Thumbnail quality used for result previews.
const THUMBNAIL_QUALITY: &str = "sddefault";

/// Outcome of normalizing one response body.
#[derive(Debug, Default)]
pub struct Normalized {
    /// Converted videos, in response order.
    pub results: Vec<VideoResult>,
    /// Items that claimed to be videos but could not be converted.
    pub failures: Vec<EngineError>,
}

/// Normalize a raw response body fetched from `base_url`.
///
/// # Errors
/// Returns an error if the body is not a JSON array. Per-item problems are
/// reported in [`Normalized::failures`] instead.
pub fn normalize_response(body: &str, base_url: &str) -> EngineResult<Normalized> {
    let items: Vec<Value> = serde_json::from_str(body)?;
    Ok(normalize_items(items, base_url))
}

/// Normalize already-decoded response items.
#[must_use]
pub fn normalize_items(items: Vec<Value>, base_url: &str) -> Normalized {
    let mut normalized = Normalized::default();

    for item in items {
        match normalize_item(item, base_url) {
            Ok(Some(result)) => normalized.results.push(result),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Skipping Invidious item: {e}");
                normalized.failures.push(e);
            }
        }
    }

    normalized
}

/// Normalize a single item. Returns `Ok(None)` for items that are skipped.
///
/// # Errors
/// Returns a malformed-item error for a video missing required data.
pub fn normalize_item(item: Value, base_url: &str) -> EngineResult<Option<VideoResult>> {
    let is_video = item.get("type").and_then(Value::as_str) == Some("video");
    let video_id = item
        .get("videoId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if !is_video || video_id.is_empty() {
        return Ok(None);
    }

    let raw: RawItem =
        serde_json::from_value(item).map_err(|e| EngineError::malformed(&video_id, e.to_string()))?;

    match raw.validate()? {
        Some(video) => to_result(video, base_url).map(Some),
        None => Ok(None),
    }
}

fn to_result(video: ValidatedVideo, base_url: &str) -> EngineResult<VideoResult> {
    let published_date = DateTime::<Utc>::from_timestamp(video.published, 0).ok_or_else(|| {
        EngineError::malformed(
            &video.video_id,
            format!("published timestamp {} out of range", video.published),
        )
    })?;

    let thumbnail = resolve_thumbnail(video.thumbnail_url(THUMBNAIL_QUALITY), base_url);

    Ok(VideoResult {
        url: format!("{base_url}/watch?v={}", video.video_id),
        iframe_src: format!("{base_url}/embed/{}", video.video_id),
        title: video.title,
        content: video.description,
        author: video.author,
        length: format_length(video.length_seconds),
        views: humanize_number(video.view_count),
        published_date,
        thumbnail,
        template: VIDEO_TEMPLATE.to_string(),
    })
}

/// Make a thumbnail URL absolute. Some instances return instance-relative paths.
fn resolve_thumbnail(thumbnail: Option<&str>, base_url: &str) -> String {
    match thumbnail {
        Some(url) if !url.is_empty() && !has_network_location(url) => format!("{base_url}{url}"),
        Some(url) => url.to_string(),
        None => String::new(),
    }
}

fn has_network_location(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    Url::parse(url).is_ok_and(|u| u.host().is_some())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const BASE: &str = "https://inv.example";

    fn without(mut item: Value, key: &str) -> Value {
        if let Some(object) = item.as_object_mut() {
            object.remove(key);
        }
        item
    }

    fn video(id: &str) -> Value {
        json!({
            "type": "video",
            "videoId": id,
            "title": format!("Video {id}"),
            "description": "A description",
            "author": "Someone",
            "viewCount": 1_500_000,
            "lengthSeconds": 185,
            "published": 0,
            "videoThumbnails": []
        })
    }

    #[test]
    fn test_reference_item() {
        let result = normalize_item(video("abc123"), BASE).unwrap().unwrap();

        assert_eq!(result.length, "03:05");
        assert_eq!(result.views, "1.5M");
        assert_eq!(result.thumbnail, "");
        assert!(result.url.ends_with("/watch?v=abc123"));
        assert_eq!(result.url, "https://inv.example/watch?v=abc123");
        assert_eq!(result.iframe_src, "https://inv.example/embed/abc123");
        assert_eq!(result.published_date.timestamp(), 0);
        assert_eq!(result.title, "Video abc123");
        assert_eq!(result.content, "A description");
        assert_eq!(result.author.as_deref(), Some("Someone"));
        assert_eq!(result.template, VIDEO_TEMPLATE);
    }

    #[test]
    fn test_relative_thumbnail_resolved() {
        let mut item = video("abc123");
        item["videoThumbnails"] = json!([
            {"quality": "maxres", "url": "/vi/abc123/maxres.jpg"},
            {"quality": "sddefault", "url": "/vi/abc123/sddefault.jpg"}
        ]);
        let result = normalize_item(item, BASE).unwrap().unwrap();
        assert_eq!(result.thumbnail, "https://inv.example/vi/abc123/sddefault.jpg");
    }

    #[test]
    fn test_absolute_thumbnail_kept() {
        let mut item = video("abc123");
        item["videoThumbnails"] = json!([
            {"quality": "sddefault", "url": "https://i.ytimg.com/vi/abc123/sddefault.jpg"}
        ]);
        let result = normalize_item(item, BASE).unwrap().unwrap();
        assert_eq!(result.thumbnail, "https://i.ytimg.com/vi/abc123/sddefault.jpg");

        assert_eq!(
            resolve_thumbnail(Some("//cdn.example/t.jpg"), BASE),
            "//cdn.example/t.jpg"
        );
    }

    #[test]
    fn test_published_timestamp() {
        let mut item = video("abc123");
        item["published"] = json!(1_700_000_000);
        let result = normalize_item(item, BASE).unwrap().unwrap();
        assert_eq!(result.published_date.to_rfc3339(), "2023-11-14T22:13:20+00:00");

        let item = without(video("abc123"), "published");
        let result = normalize_item(item, BASE).unwrap().unwrap();
        assert_eq!(result.published_date.timestamp(), 0);
    }

    #[test]
    fn test_long_video_length() {
        let mut item = video("abc123");
        item["lengthSeconds"] = json!(3725);
        let result = normalize_item(item, BASE).unwrap().unwrap();
        assert_eq!(result.length, "01:02:05");
    }

    #[test]
    fn test_non_video_skipped() {
        let playlist = json!({"type": "playlist", "title": "Mix", "playlistId": "PL1"});
        assert!(normalize_item(playlist, BASE).unwrap().is_none());

        let channel = json!({"type": "channel", "author": "Someone", "authorId": "UC1"});
        assert!(normalize_item(channel, BASE).unwrap().is_none());

        let untyped = json!({"videoId": "abc"});
        assert!(normalize_item(untyped, BASE).unwrap().is_none());

        let no_id = json!({"type": "video", "lengthSeconds": 10, "viewCount": 1});
        assert!(normalize_item(no_id, BASE).unwrap().is_none());
    }

    #[test]
    fn test_missing_view_count_is_item_error() {
        let broken = without(video("broken"), "viewCount");

        let body = json!([video("first"), broken, {"type": "playlist"}, video("last")]).to_string();
        let normalized = normalize_response(&body, BASE).unwrap();

        let urls: Vec<&str> = normalized.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://inv.example/watch?v=first",
                "https://inv.example/watch?v=last"
            ]
        );
        assert_eq!(normalized.failures.len(), 1);
        assert!(normalized.failures[0].is_item_level());
        assert!(normalized.failures[0].to_string().contains("broken"));
    }

    #[test]
    fn test_missing_length_is_item_error() {
        let broken = without(video("broken"), "lengthSeconds");
        let err = normalize_item(broken, BASE).unwrap_err();
        assert!(err.to_string().contains("lengthSeconds"));
    }

    #[test]
    fn test_numeric_title_still_converts() {
        let item = json!({
            "type": "video", "videoId": "abc", "title": 12345,
            "viewCount": 10, "lengthSeconds": 10
        });
        let result = normalize_item(item, BASE).unwrap().unwrap();
        assert_eq!(result.title, "");
        assert_eq!(result.url, "https://inv.example/watch?v=abc");

        let mut item = video("abc");
        item["author"] = json!({"name": "Someone"});
        let result = normalize_item(item, BASE).unwrap().unwrap();
        assert_eq!(result.author, None);
    }

    #[test]
    fn test_wrong_field_type_is_item_error() {
        let mut broken = video("broken");
        broken["viewCount"] = json!("lots");
        assert!(normalize_item(broken, BASE).unwrap_err().is_item_level());
    }

    #[test]
    fn test_non_array_body_rejected() {
        assert!(matches!(
            normalize_response(r#"{"error": "nope"}"#, BASE),
            Err(EngineError::InvalidPayload(_))
        ));
        assert!(normalize_response("[]", BASE).unwrap().results.is_empty());
    }
}
