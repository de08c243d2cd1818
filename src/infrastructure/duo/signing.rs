//! Duo request signing (canonical request + HMAC-SHA512, signature v2)

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha512;

use crate::domain::Credentials;

type HmacSha512 = Hmac<Sha512>;

/// Everything except `A-Z a-z 0-9 - _ . ~` is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a key or value the way the API canonicalizes it.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Canonical parameter string: sorted by key, `k=v` joined with `&`.
///
/// The same string is used as query string (GET) and form body (POST).
pub fn canonical_params(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.cmp(&b.1)));
    sorted
        .into_iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// The newline-joined string that gets signed.
pub fn canonicalize(date: &str, method: &str, host: &str, path: &str, params: &str) -> String {
    [
        date.to_string(),
        method.to_uppercase(),
        host.to_lowercase(),
        path.to_string(),
        params.to_string(),
    ]
    .join("\n")
}

/// `Date` header value, RFC 2822 with the `-0000` zone the API expects.
pub fn request_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S -0000").to_string()
}

/// `Authorization` header value for one request.
pub fn authorization(
    credentials: &Credentials,
    date: &str,
    method: &str,
    path: &str,
    params: &str,
) -> String {
    let canon = canonicalize(date, method, &credentials.api_host, path, params);
    let mut mac = HmacSha512::new_from_slice(credentials.secret_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(canon.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    let basic = BASE64.encode(format!("{}:{}", credentials.integration_key, signature));
    format!("Basic {basic}")
}
