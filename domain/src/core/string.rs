//! String helpers shared by the domain and its adapters.

/// Shorten `s` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts characters rather than bytes so multi-byte text is never split.
pub fn excerpt(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Generate a random-looking document id from a seed source.
///
/// Ids are 20 characters drawn from `[A-Za-z0-9]`, the same shape as
/// auto-generated document ids in the store.
pub fn document_id_from(mut next: impl FnMut() -> u32) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    (0..20)
        .map(|_| ALPHABET[(next() as usize) % ALPHABET.len()] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("hello", 10), "hello");
    }

    #[test]
    fn test_excerpt_cuts_with_ellipsis() {
        assert_eq!(excerpt("hello world", 8), "hello...");
    }

    #[test]
    fn test_excerpt_multibyte() {
        assert_eq!(excerpt("日本語テキスト", 5), "日本...");
    }

    #[test]
    fn test_document_id_shape() {
        let mut n = 0u32;
        let id = document_id_from(|| {
            n += 7;
            n
        });
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
