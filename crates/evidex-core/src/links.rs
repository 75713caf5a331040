//! Link rules shared by the formatter and the citation validator.

use url::Url;

const SEARCH_ENGINE_HOSTS: &[&str] = &[
    "google",
    "bing",
    "duckduckgo",
    "yahoo",
    "baidu",
    "yandex",
];

const SEARCH_PARAMS: &[&str] = &["q", "query", "p", "text", "wd"];

/// Parse an http(s) URL with a host. Hosts come back percent-decoded and
/// lowercased.
fn parse_http(url: &str) -> Option<Url> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.host_str().filter(|h| !h.is_empty())?;
    Some(parsed)
}

pub fn is_http_url(url: &str) -> bool {
    parse_http(url).is_some()
}

fn is_search_engine_host(host: &str) -> bool {
    host.split('.')
        .any(|label| SEARCH_ENGINE_HOSTS.contains(&label))
}

/// A general-purpose search-engine results page, e.g.
/// `https://www.google.com/search?q=apixaban`. These never count as a
/// source, whatever the query.
pub fn is_disallowed_url(url: &str) -> bool {
    let Some(parsed) = parse_http(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    if !is_search_engine_host(&host.to_ascii_lowercase()) {
        return false;
    }
    let path = parsed.path().to_ascii_lowercase();
    let search_path = path.starts_with("/search")
        || path.starts_with("/scholar")
        || path.starts_with("/html");
    let search_param = parsed
        .query_pairs()
        .any(|(key, _)| SEARCH_PARAMS.iter().any(|p| key.eq_ignore_ascii_case(p)));
    search_path || search_param
}
