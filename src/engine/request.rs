//! Search URL construction.

use url::form_urlencoded;

use super::selector::InstanceSelector;
use super::types::{ResolvedRequest, SearchRequest, ALL_LANGUAGES};

/// Backend search endpoint, relative to an instance origin.
const SEARCH_PATH: &str = "/api/v1/search";

/// Build the backend request for a search, choosing the instance that serves it.
#[must_use]
pub fn build_request(request: &SearchRequest, selector: &InstanceSelector) -> ResolvedRequest {
    let chosen_base_url = selector.select().to_string();
    let target_url = search_url(&chosen_base_url, request);

    tracing::debug!("Invidious instance {chosen_base_url} -> {target_url}");

    ResolvedRequest {
        target_url,
        chosen_base_url,
    }
}

/// Compose the search URL against a given origin.
#[must_use]
pub fn search_url(base_url: &str, request: &SearchRequest) -> String {
    let pageno = request.pageno.max(1);
    let mut url = format!(
        "{base_url}{SEARCH_PATH}?q={}&page={pageno}",
        encode(&request.query)
    );

    if let Some(date) = request.time_range.date_param() {
        url.push_str("&date=");
        url.push_str(date);
    }

    if let Some(region) = region_subtag(&request.language) {
        url.push_str("&range=");
        url.push_str(&encode(region));
    }

    url
}

/// Region part of a `lang-REGION` tag. `None` for "all" or tags without exactly one hyphen.
#[must_use]
pub fn region_subtag(language: &str) -> Option<&str> {
    if language == ALL_LANGUAGES {
        return None;
    }
    let mut parts = language.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(region), None) => Some(region),
        _ => None,
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
