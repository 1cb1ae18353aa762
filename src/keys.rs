//! Key Building Module
//!
//! The single place where prefixes are built and turned into scan patterns.
//! Every public operation goes through these two functions, so a prefix
//! never carries a wildcard and a pattern always carries exactly one.

/// Wildcard understood by the store's key-matching scan.
pub const WILDCARD: char = '*';

/// Separator placed between a namespace and its sub-prefix.
pub const KEY_SEPARATOR: char = ':';

// == Build Prefix ==
/// Joins a cache-key namespace and an optional sub-prefix.
///
/// The result never ends with a wildcard; trailing `*` on either part is
/// dropped. An empty or missing sub-prefix yields the bare namespace, and a
/// namespace that already ends with the separator is not given a second one.
///
/// ```
/// use cache_admin::keys::build_prefix;
///
/// assert_eq!(build_prefix("orders", Some("eu")), "orders:eu");
/// assert_eq!(build_prefix("orders", None), "orders");
/// assert_eq!(build_prefix("orders:", Some("eu*")), "orders:eu");
/// ```
pub fn build_prefix(namespace: &str, sub_prefix: Option<&str>) -> String {
    let namespace = strip_wildcards(namespace);

    let sub_prefix = match sub_prefix.map(strip_wildcards) {
        Some(sub) if !sub.is_empty() => sub,
        _ => return namespace.to_string(),
    };

    let mut prefix = String::with_capacity(namespace.len() + sub_prefix.len() + 1);
    prefix.push_str(namespace);
    if !namespace.is_empty() && !namespace.ends_with(KEY_SEPARATOR) {
        prefix.push(KEY_SEPARATOR);
    }
    prefix.push_str(sub_prefix);
    prefix
}

// == Search Pattern ==
/// Turns a prefix into the pattern handed to the store's scan.
///
/// Reuses a trailing wildcard when one is already present, otherwise
/// appends exactly one. Applying it twice gives the same pattern.
pub fn search_pattern(prefix_or_pattern: &str) -> String {
    if prefix_or_pattern.ends_with(WILDCARD) {
        return prefix_or_pattern.to_string();
    }

    let mut pattern = String::with_capacity(prefix_or_pattern.len() + 1);
    pattern.push_str(prefix_or_pattern);
    pattern.push(WILDCARD);
    pattern
}

fn strip_wildcards(part: &str) -> &str {
    part.trim_end_matches(WILDCARD)
}
