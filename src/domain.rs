/// Effective domain resolution for Tab Sorter
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Multi-part public suffixes that keep a third label
///
/// A fixed approximation of the Public Suffix List, covering the common
/// cases rather than every registry.
const MULTI_PART_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "gov.uk", "ac.uk", "com.au", "net.au", "org.au", "co.jp",
];

static IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").expect("valid IPv4 pattern"));

/// Resolve the effective domain of a URL, the key tabs are grouped and sorted by
///
/// Algorithm:
/// 1. Parse the URL; if that fails, fall back to the lowercased raw string.
///    URLs without a host (`about:blank`) resolve to the empty string
/// 2. Lowercase the hostname
/// 3. IPv4 addresses and `localhost` are returned as-is
/// 4. Strip a leading `www.`
/// 5. Hosts under a known multi-part suffix keep their last 3 labels
/// 6. Everything else keeps its last 2 labels
///
/// Examples:
/// - https://mail.google.com → google.com
/// - https://www.bbc.co.uk/news → bbc.co.uk
/// - http://192.168.1.1:8080/x → 192.168.1.1
/// - not a url → not a url
pub fn effective_domain(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_lowercase();
    };
    let host = parsed.host_str().unwrap_or("").to_lowercase();

    if host == "localhost" || IPV4.is_match(&host) {
        return host;
    }

    let host = host.strip_prefix("www.").unwrap_or(&host);
    let labels: Vec<&str> = host.split('.').collect();

    let keep = if MULTI_PART_SUFFIXES
        .iter()
        .any(|suffix| host.strip_suffix(suffix).is_some_and(|rest| rest.ends_with('.')))
    {
        3
    } else {
        2
    };

    if labels.len() <= keep {
        host.to_string()
    } else {
        labels[labels.len() - keep..].join(".")
    }
}
