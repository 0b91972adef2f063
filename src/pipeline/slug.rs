//! URL slug derivation
//!
//! Turns page URLs into filesystem- and object-key-safe names. Derivation is
//! deterministic; URLs whose slugs would collide within one job are
//! disambiguated with a short hash of the full URL.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Longest slug emitted before falling back to a hashed form
const MAX_SLUG_LEN: usize = 200;

/// Hex characters of the URL hash used for disambiguation
const HASH_LEN: usize = 12;

fn short_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(digest)[..HASH_LEN].to_string()
}

/// Derives a deterministic slug for a URL
///
/// The scheme is stripped and every character outside `[A-Za-z0-9._-]` is
/// replaced with `_`. URLs that would exceed the length cap collapse to
/// `<domain>_<hash>` so the name stays meaningful but bounded.
pub fn slug_for_url(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let cleaned: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.len() > MAX_SLUG_LEN {
        let domain = cleaned.split('_').next().unwrap_or("page");
        format!("{}_{}", domain, short_hash(url))
    } else if cleaned.is_empty() {
        format!("page_{}", short_hash(url))
    } else {
        cleaned
    }
}

/// Derives slugs for a job's URL set, guaranteeing uniqueness
///
/// The first URL to produce a given slug keeps it; later colliding URLs get
/// the slug with a short hash of their full URL appended. Identical URLs
/// hash identically, so a counter disambiguates any remaining collisions.
/// Output order matches input order.
pub fn unique_slugs<'a>(urls: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.map(|url| {
        let base = slug_for_url(url);
        let mut slug = if seen.contains(&base) {
            format!("{}_{}", base, short_hash(url))
        } else {
            base
        };
        if seen.contains(&slug) {
            let stem = slug;
            let mut counter = 2;
            loop {
                let candidate = format!("{}_{}", stem, counter);
                if !seen.contains(&candidate) {
                    slug = candidate;
                    break;
                }
                counter += 1;
            }
        }
        seen.insert(slug.clone());
        slug
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_is_deterministic() {
        let url = "https://example.com/docs/intro?lang=en";
        assert_eq!(slug_for_url(url), slug_for_url(url));
        assert_eq!(slug_for_url(url), "example.com_docs_intro_lang_en");
    }

    #[test]
    fn test_slug_strips_scheme() {
        assert_eq!(slug_for_url("https://example.com/a"), "example.com_a");
        assert_eq!(slug_for_url("http://example.com/a"), "example.com_a");
    }

    #[test]
    fn test_long_url_collapses_to_domain_and_hash() {
        let long_path = "x".repeat(300);
        let url = format!("https://example.com/{}", long_path);
        let slug = slug_for_url(&url);

        assert!(slug.starts_with("example.com_"));
        assert!(slug.len() <= MAX_SLUG_LEN);
        // Same URL, same hash
        assert_eq!(slug, slug_for_url(&url));
    }

    #[test]
    fn test_colliding_urls_are_disambiguated() {
        // '?' and '#' both clean to '_', so these collide on the base slug
        let urls = vec!["https://example.com/a?b", "https://example.com/a#b"];
        let slugs = unique_slugs(urls.iter().copied());

        assert_eq!(slugs.len(), 2);
        assert_ne!(slugs[0], slugs[1]);
        assert_eq!(slugs[0], "example.com_a_b");
        assert!(slugs[1].starts_with("example.com_a_b_"));
    }

    #[test]
    fn test_repeated_url_still_yields_unique_slugs() {
        // Identical URLs hash identically; the counter must take over
        let urls = vec![
            "https://example.com/a",
            "https://example.com/a",
            "https://example.com/a",
        ];
        let slugs = unique_slugs(urls.iter().copied());

        let unique: HashSet<_> = slugs.iter().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(slugs[0], "example.com_a");
        assert!(slugs[1].starts_with("example.com_a_"));
        assert!(slugs[2].ends_with("_2"));
    }

    #[test]
    fn test_distinct_urls_keep_distinct_slugs() {
        let urls = vec![
            "https://example.com/",
            "https://example.com/page1",
            "https://example.com/page2",
        ];
        let slugs = unique_slugs(urls.iter().copied());
        let unique: HashSet<_> = slugs.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}
