//! Cache-busting query names.

use rand::Rng;

use crate::config::{CACHE_BUST_CHARSET, CACHE_BUST_LABEL_LEN};

/// Returns `<random-label>.<domain>`.
///
/// Every call draws a fresh label, so resolvers between us and the
/// authoritative server cannot have the name cached. A trailing dot on
/// `domain` is dropped.
pub fn cache_busted_name(domain: &str) -> String {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    format!("{}.{}", random_label(CACHE_BUST_LABEL_LEN), domain)
}

/// Random lowercase alphanumeric label of `len` characters.
pub fn random_label(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CACHE_BUST_CHARSET[rng.random_range(0..CACHE_BUST_CHARSET.len())] as char)
        .collect()
}
