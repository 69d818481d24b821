//! Target-domain matching rules
//!
//! Pure functions deciding whether an anchor's href points at the target
//! domain and whether its rel attribute marks the link nofollow.

/// Tests whether an href value references the target domain
///
/// The href matches when, after stripping an optional `http://` or
/// `https://` scheme and an optional `www.` prefix (both case-insensitive),
/// the remainder starts with the target domain. Dots in the domain are
/// literal and the comparison is case-insensitive. No boundary is required
/// after the domain, matching the first-match scan this rule came from.
pub fn href_matches_target(href: &str, target_domain: &str) -> bool {
    if target_domain.is_empty() {
        return false;
    }

    let href = href.trim().to_ascii_lowercase();
    let target = target_domain.to_ascii_lowercase();

    let rest = href
        .strip_prefix("https://")
        .or_else(|| href.strip_prefix("http://"))
        .unwrap_or(&href);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    rest.starts_with(&target)
}

/// Tests whether a rel attribute value contains a nofollow token
///
/// Tokens are whitespace-separated and compared case-insensitively.
pub fn rel_is_nofollow(rel: Option<&str>) -> bool {
    rel.map(|value| {
        value
            .split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("nofollow"))
    })
    .unwrap_or(false)
}
