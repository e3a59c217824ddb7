use rand::{distributions::Alphanumeric, thread_rng, Rng};
use url::Url;

pub const SHORT_CODE_LENGTH: usize = 6;

// random [A-Za-z0-9] code, uniqueness is left to the store
pub fn generate_short_code() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_CODE_LENGTH)
        .map(char::from)
        .collect()
}

// parses the long url, only absolute http(s) urls with a host pass.
// the serialized form is what gets stored: tabs and newlines are stripped and
// non-ascii is percent/punycode encoded, so it is always a valid Location value
pub fn parse_url(url: &str) -> Option<Url> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let parsed = Url::parse(url).ok()?;
    if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() {
        Some(parsed)
    } else {
        None
    }
}

pub fn valid_short_code(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
