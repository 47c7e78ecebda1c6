//! Deterministic identifiers for feed items and synthesized audio.

/// Characters of normalized speech text that feed the audio cache key.
pub const AUDIO_KEY_PREFIX_CHARS: usize = 100;

/// 32-bit rolling hash (`h = h * 31 + unit`) over the UTF-16 code units of `s`.
pub fn stable_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    })
}

pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn hash_base36(s: &str) -> String {
    to_base36(i64::from(stable_hash(s)).unsigned_abs())
}

/// Stable id for a feed item, derived from its canonical link.
pub fn article_id_for_link(link: &str) -> String {
    format!("rss_{}", hash_base36(link))
}

/// Audio cache key: hash of the first [`AUDIO_KEY_PREFIX_CHARS`] characters
/// plus the total character count. Texts sharing that prefix and length
/// collide.
pub fn audio_cache_key(normalized_text: &str) -> String {
    let prefix: String = normalized_text.chars().take(AUDIO_KEY_PREFIX_CHARS).collect();
    let len = normalized_text.chars().count();
    format!("tts_{}_{}", hash_base36(&prefix), len)
}
