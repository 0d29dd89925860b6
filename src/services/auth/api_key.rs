//! `Authorization: ApiKey <token>` extraction - core logic.
//!
//! This module is intentionally "core-only": it does not know about Axum
//! middleware, the credential store or logging. It reads one header and either
//! returns the key or tells the caller why it could not.

use std::collections::HashMap;

use axum::http::{HeaderMap, header};

/// Scheme token that must prefix the key.
pub const API_KEY_SCHEME: &str = "ApiKey";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApiKeyError {
    #[error("no authorization header included")]
    NoAuthHeader,
    #[error("malformed authorization header")]
    MalformedHeader,
}

/// Read-only, case-insensitive access to request headers by name.
///
/// Values are handed over as raw bytes; deciding whether they are usable text
/// is the extractor's job, not the adapter's.
pub trait HeaderSource {
    // Returns the (first) value of `name`, or `None` if the header is absent.
    fn header(&self, name: &str) -> Option<&[u8]>;
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.get(name).map(|v| v.as_bytes())
    }
}

/// Exact name first; among names differing only in case, the
/// lexicographically smallest wins so the result never depends on hash order.
impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.get(name)
            .or_else(|| {
                self.iter()
                    .filter(|(k, _)| k.eq_ignore_ascii_case(name))
                    .min_by(|(a, _), (b, _)| a.cmp(b))
                    .map(|(_, v)| v)
            })
            .map(|v| v.as_bytes())
    }
}

impl<T: HeaderSource + ?Sized> HeaderSource for &T {
    fn header(&self, name: &str) -> Option<&[u8]> {
        (**self).header(name)
    }
}

// Visible ASCII plus space and tab, same as `HeaderValue::to_str`.
fn is_header_text(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| b == b'\t' || (b' '..=b'~').contains(&b))
}

/// Extracts the API key from `Authorization: ApiKey <token>`.
///
/// - absent or empty header => `NoAuthHeader`
/// - bytes outside visible ASCII, fewer than two fields, or a scheme other
///   than exactly `ApiKey` => `MalformedHeader`
/// - fields after the token are ignored
pub fn extract_api_key<H>(headers: &H) -> Result<String, ApiKeyError>
where
    H: HeaderSource + ?Sized,
{
    let raw = headers
        .header(header::AUTHORIZATION.as_str())
        .filter(|v| !v.is_empty())
        .ok_or(ApiKeyError::NoAuthHeader)?;

    if !is_header_text(raw) {
        return Err(ApiKeyError::MalformedHeader);
    }
    let value = std::str::from_utf8(raw).map_err(|_| ApiKeyError::MalformedHeader)?;

    let mut fields = value.split_whitespace();
    let (Some(scheme), Some(key)) = (fields.next(), fields.next()) else {
        return Err(ApiKeyError::MalformedHeader);
    };

    if scheme != API_KEY_SCHEME {
        return Err(ApiKeyError::MalformedHeader);
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(auth: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(auth) = auth {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        }
        headers
    }

    #[test]
    fn test_extract_api_key_cases() {
        let cases: [(&str, Option<&str>, Result<&str, ApiKeyError>); 5] = [
            (
                "missing authorization header",
                None,
                Err(ApiKeyError::NoAuthHeader),
            ),
            (
                "wrong scheme",
                Some("Bearer sometoken"),
                Err(ApiKeyError::MalformedHeader),
            ),
            (
                "only scheme provided",
                Some("ApiKey"),
                Err(ApiKeyError::MalformedHeader),
            ),
            ("valid header", Some("ApiKey validtoken"), Ok("validtoken")),
            (
                "valid header with extra parts",
                Some("ApiKey validtoken extra"),
                Ok("validtoken"),
            ),
        ];

        for (name, auth, expected) in cases {
            let got = extract_api_key(&headers_with(auth));
            assert_eq!(got, expected.map(str::to_string), "case: {name}");
        }
    }

    #[test]
    fn test_empty_header_counts_as_missing() {
        assert_eq!(
            extract_api_key(&headers_with(Some(""))),
            Err(ApiKeyError::NoAuthHeader)
        );
    }

    #[test]
    fn test_single_field_is_malformed() {
        for auth in ["ApiKey", "Bearer", "validtoken", "   "] {
            assert_eq!(
                extract_api_key(&headers_with(Some(auth))),
                Err(ApiKeyError::MalformedHeader),
                "value: {auth:?}"
            );
        }
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        for auth in ["apikey token", "APIKEY token", "Apikey token", "Bearer ApiKey token"] {
            assert_eq!(
                extract_api_key(&headers_with(Some(auth))),
                Err(ApiKeyError::MalformedHeader),
                "value: {auth:?}"
            );
        }
    }

    #[test]
    fn test_fields_split_on_any_whitespace() {
        let headers = headers_with(Some("ApiKey \t  k-123   extra"));
        assert_eq!(extract_api_key(&headers).as_deref(), Ok("k-123"));
    }

    #[test]
    fn test_header_name_lookup_is_case_insensitive() {
        let mut map = HashMap::new();
        map.insert("authorization".to_string(), "ApiKey lower".to_string());
        assert_eq!(extract_api_key(&map).as_deref(), Ok("lower"));

        let mut map = HashMap::new();
        map.insert("AUTHORIZATION".to_string(), "ApiKey upper".to_string());
        assert_eq!(extract_api_key(&map).as_deref(), Ok("upper"));

        assert_eq!(
            extract_api_key(&HashMap::<String, String>::new()),
            Err(ApiKeyError::NoAuthHeader)
        );
    }

    #[test]
    fn test_first_value_wins_for_repeated_header() {
        let mut headers = HeaderMap::new();
        headers.append(header::AUTHORIZATION, HeaderValue::from_static("ApiKey first"));
        headers.append(header::AUTHORIZATION, HeaderValue::from_static("ApiKey second"));
        assert_eq!(extract_api_key(&headers).as_deref(), Ok("first"));
    }

    #[test]
    fn test_non_ascii_bytes_are_malformed() {
        let values: [&[u8]; 3] = [b"ApiKey k\xe9y", b"ApiKey k\xffy", b"\xe9ApiKey key"];
        for raw in values {
            let mut headers = HeaderMap::new();
            headers.insert(header::AUTHORIZATION, HeaderValue::from_bytes(raw).unwrap());
            assert_eq!(
                extract_api_key(&headers),
                Err(ApiKeyError::MalformedHeader),
                "value: {raw:?}"
            );
        }

        let mut map = HashMap::new();
        map.insert("Authorization".to_string(), "ApiKey kéy".to_string());
        assert_eq!(extract_api_key(&map), Err(ApiKeyError::MalformedHeader));
    }

    #[test]
    fn test_key_is_exact_substring_of_header() {
        let value = "ApiKey\tk_9.Z-~!  extra";
        let key = extract_api_key(&headers_with(Some(value))).unwrap();
        assert_eq!(key, "k_9.Z-~!");
        assert!(value.contains(key.as_str()));
    }

    #[test]
    fn test_map_lookup_is_deterministic() {
        let mut map = HashMap::new();
        map.insert("Authorization".to_string(), "ApiKey mixed".to_string());
        map.insert("authorization".to_string(), "ApiKey exact".to_string());
        map.insert("AUTHORIZATION".to_string(), "ApiKey upper".to_string());
        assert_eq!(extract_api_key(&map).as_deref(), Ok("exact"));

        map.remove("authorization");
        // "AUTHORIZATION" < "Authorization"
        for _ in 0..16 {
            assert_eq!(extract_api_key(&map).as_deref(), Ok("upper"));
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let headers = headers_with(Some("ApiKey validtoken extra"));
        let first = extract_api_key(&headers);
        let second = extract_api_key(&headers);
        assert_eq!(first, second);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ApiKeyError::NoAuthHeader.to_string(),
            "no authorization header included"
        );
        assert_eq!(
            ApiKeyError::MalformedHeader.to_string(),
            "malformed authorization header"
        );
    }
}
