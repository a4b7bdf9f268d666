//! Slug derivation for blog titles.
//!
//! Slugs are lowercase ASCII letters, digits and single hyphens, at most
//! [`SLUG_MAX_LEN`] characters long.

pub const SLUG_MAX_LEN: usize = 50;

const FALLBACK_SLUG: &str = "blog";

/// Length of the longest suffix `with_suffix` can append (`-4294967295`).
const MAX_SUFFIX_LEN: usize = 11;

/// Derives the base slug for a title. Never returns an empty string.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_hyphen = true;
        }
    }

    let slug = truncate(&slug, SLUG_MAX_LEN);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `base` with a numeric suffix, shortened so the result fits in [`SLUG_MAX_LEN`].
pub fn with_suffix(base: &str, n: u32) -> String {
    let suffix = format!("-{}", n);
    let room = SLUG_MAX_LEN.saturating_sub(suffix.len());
    let head = truncate(base, room);
    if head.is_empty() {
        format!("{}{}", FALLBACK_SLUG, suffix)
    } else {
        format!("{}{}", head, suffix)
    }
}

/// Leading part shared by `base` and every `with_suffix(base, n)`.
///
/// Suffixed candidates shorten `base` to stay within [`SLUG_MAX_LEN`], so a
/// lookup for taken slugs has to match on this prefix rather than on `base`.
pub fn candidate_prefix(base: &str) -> String {
    truncate(base, SLUG_MAX_LEN - MAX_SUFFIX_LEN)
}

/// Picks the first free candidate given the slugs already in use that share `base`.
pub fn next_available(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = with_suffix(base, n);
        if !taken.iter().any(|s| *s == candidate) {
            return candidate;
        }
        n += 1;
    }
}

pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= SLUG_MAX_LEN
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

// Slugs are pure ASCII, so byte slicing is safe here.
fn truncate(slug: &str, max: usize) -> String {
    let cut = if slug.len() > max { &slug[..max] } else { slug };
    cut.trim_end_matches('-').to_string()
}
