use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use url::Url;

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(r"(?i)https?://\S+").expect("valid URL pattern");
}

/// Fragments that make a link suspicious when found anywhere in it.
pub const SUSPICIOUS_URL_PATTERNS: &[&str] = &[
    ".tk", ".ml", ".ga", "bit.ly", "tinyurl", "goo.gl", "@", "login", "verify", "secure",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedLink {
    pub url: String,
    pub host: Option<String>,
    pub is_suspicious: bool,
}

/// All `http://` / `https://` links in the text, up to the next whitespace.
pub fn extract_urls(text: &str) -> Vec<&str> {
    URL_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

pub fn is_suspicious_url(url: &str) -> bool {
    let url_lower = url.to_lowercase();
    SUSPICIOUS_URL_PATTERNS
        .iter()
        .any(|pattern| url_lower.contains(pattern))
}

pub fn has_urls(text: &str) -> bool {
    URL_REGEX.is_match(text)
}

pub fn has_suspicious_url(text: &str) -> bool {
    extract_urls(text).into_iter().any(is_suspicious_url)
}

/// Extracted links with their hosts, for reporting.
pub fn analyze_links(text: &str) -> Vec<ExtractedLink> {
    extract_urls(text)
        .into_iter()
        .map(|url| ExtractedLink {
            url: url.to_string(),
            host: extract_host(url),
            is_suspicious: is_suspicious_url(url),
        })
        .collect()
}

fn extract_host(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) => parsed.host_str().map(|host| host.to_string()),
        Err(e) => {
            log::debug!("Could not parse link {}: {}", url, e);
            None
        }
    }
}
