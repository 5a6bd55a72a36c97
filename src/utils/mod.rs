//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Join a relative endpoint path onto the API base URL.
///
/// The base is expected to end with a slash; a leading slash on `path` is
/// ignored so the base's own path prefix is kept.
pub fn endpoint(base: &Url, path: &str) -> Result<Url> {
    Ok(base.join(path.trim_start_matches('/'))?)
}

/// Append a path segment, percent-encoding it.
pub fn with_segment(mut url: Url, segment: &str) -> Url {
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    url
}

/// Left-pad an activity number with zeros to two characters.
pub fn pad_activity_number(number: &str) -> String {
    format!("{number:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let base = Url::parse("http://localhost:8080/api/").unwrap();
        assert_eq!(
            endpoint(&base, "/workloads/checklist").unwrap().as_str(),
            "http://localhost:8080/api/workloads/checklist"
        );
    }

    #[test]
    fn test_with_segment_encodes() {
        let base = Url::parse("http://localhost:8080/api/visiting-lecturers").unwrap();
        assert_eq!(
            with_segment(base, "99 01/X").as_str(),
            "http://localhost:8080/api/visiting-lecturers/99%2001%2FX"
        );
    }

    #[test]
    fn test_pad_activity_number() {
        assert_eq!(pad_activity_number("1"), "01");
        assert_eq!(pad_activity_number("01"), "01");
        assert_eq!(pad_activity_number("123"), "123");
    }
}
