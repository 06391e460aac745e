//! Core types for Invidious requests and results.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::{EngineError, EngineResult};

/// Sentinel language meaning "no language preference".
pub const ALL_LANGUAGES: &str = "all";

/// A generic search request handed over by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The search query string, not yet encoded.
    pub query: String,
    /// 1-based page number.
    #[serde(default = "default_pageno")]
    pub pageno: u32,
    /// Time range filter.
    #[serde(default)]
    pub time_range: TimeRange,
    /// Language tag (e.g., "en-US"), or "all".
    #[serde(default = "default_language")]
    pub language: String,
}

impl SearchRequest {
    /// Create a first-page request with no filters.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            pageno: default_pageno(),
            time_range: TimeRange::None,
            language: default_language(),
        }
    }

    /// Set the page number.
    #[must_use]
    pub const fn with_page(mut self, pageno: u32) -> Self {
        self.pageno = pageno;
        self
    }

    /// Set the time range.
    #[must_use]
    pub const fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Set the language tag.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

const fn default_pageno() -> u32 {
    1
}

fn default_language() -> String {
    ALL_LANGUAGES.to_string()
}

/// Time range filter for search results.
///
/// Unknown strings convert to [`TimeRange::None`] instead of failing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TimeRange {
    /// No filter.
    #[default]
    None,
    /// Past day.
    Day,
    /// Past week.
    Week,
    /// Past month.
    Month,
    /// Past year.
    Year,
}

impl TimeRange {
    /// Value of the backend's `date` parameter, if any.
    #[must_use]
    pub const fn date_param(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Day => Some("today"),
            Self::Week => Some("week"),
            Self::Month => Some("month"),
            Self::Year => Some("year"),
        }
    }
}

impl From<&str> for TimeRange {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            "year" => Self::Year,
            _ => Self::None,
        }
    }
}

impl From<String> for TimeRange {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// A request ready for the host's transport layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    /// Absolute URL to fetch with GET.
    pub target_url: String,
    /// Origin chosen for this request; reused when normalizing the response.
    pub chosen_base_url: String,
}

/// Deserialize an optional field, mapping a value of the wrong type to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A thumbnail entry as sent by the backend.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawThumbnail {
    /// Quality label (e.g., "sddefault").
    #[serde(default, deserialize_with = "lenient")]
    pub quality: Option<String>,
    /// Absolute or instance-relative URL.
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// One element of the backend's search response array.
///
/// Only `viewCount` and `lengthSeconds` are strictly typed; any other field
/// of the wrong type reads as absent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// Content type discriminator ("video", "playlist", "channel", ...).
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    /// Video identifier.
    #[serde(default, deserialize_with = "lenient")]
    pub video_id: Option<String>,
    /// Title.
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Description.
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Uploader name.
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    /// View count.
    pub view_count: Option<u64>,
    /// Duration in seconds.
    pub length_seconds: Option<u64>,
    /// Publish time as a Unix timestamp in seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub published: Option<i64>,
    /// Available thumbnails, in backend order.
    #[serde(default, deserialize_with = "lenient")]
    pub video_thumbnails: Option<Vec<RawThumbnail>>,
}

impl RawItem {
    /// Whether the item is a video with a usable id.
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.kind.as_deref() == Some("video") && self.video_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Validate a raw item.
    ///
    /// Returns `Ok(None)` for items that are skipped (not a video, no id).
    ///
    /// # Errors
    /// Returns a malformed-item error if a video lacks `lengthSeconds` or `viewCount`.
    pub fn validate(self) -> EngineResult<Option<ValidatedVideo>> {
        if !self.is_video() {
            return Ok(None);
        }
        let video_id = self.video_id.unwrap_or_default();

        let Some(length_seconds) = self.length_seconds else {
            return Err(EngineError::malformed(video_id, "missing lengthSeconds"));
        };
        let Some(view_count) = self.view_count else {
            return Err(EngineError::malformed(video_id, "missing viewCount"));
        };

        Ok(Some(ValidatedVideo {
            video_id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            author: self.author,
            view_count,
            length_seconds,
            published: self.published.unwrap_or(0),
            thumbnails: self.video_thumbnails.unwrap_or_default(),
        }))
    }
}

/// A video item whose required fields are known to be present.
#[derive(Clone, Debug)]
pub struct ValidatedVideo {
    /// Video identifier (non-empty).
    pub video_id: String,
    /// Title, empty if absent.
    pub title: String,
    /// Description, empty if absent.
    pub description: String,
    /// Uploader name.
    pub author: Option<String>,
    /// View count.
    pub view_count: u64,
    /// Duration in seconds.
    pub length_seconds: u64,
    /// Publish timestamp, 0 if absent.
    pub published: i64,
    /// Available thumbnails.
    pub thumbnails: Vec<RawThumbnail>,
}

impl ValidatedVideo {
    /// URL of the first thumbnail with the given quality, if any.
    #[must_use]
    pub fn thumbnail_url(&self, quality: &str) -> Option<&str> {
        self.thumbnails
            .iter()
            .find(|t| t.quality.as_deref() == Some(quality))
            .and_then(|t| t.url.as_deref())
    }
}

/// Normalized video result in the aggregator's schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    /// Watch page URL.
    pub url: String,
    /// Video title.
    pub title: String,
    /// Video description.
    pub content: String,
    /// Uploader name.
    pub author: Option<String>,
    /// Duration as `MM:SS` or `HH:MM:SS`.
    pub length: String,
    /// Abbreviated view count (e.g., "1.5M").
    pub views: String,
    /// Publish time.
    pub published_date: DateTime<Utc>,
    /// Embed URL.
    pub iframe_src: String,
    /// Absolute thumbnail URL, empty if none.
    pub thumbnail: String,
    /// Result template used by the host to render this record.
    pub template: String,
}
