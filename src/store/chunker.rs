//! Fixed-window text chunking with overlap

/// Split text into overlapping chunks of `chunk_size` characters,
/// advancing by `chunk_size - overlap` each step.
///
/// Windows are measured in characters, not bytes, so multi-byte UTF-8
/// content never splits mid-character. Empty windows after trimming are
/// skipped. `overlap` must be smaller than `chunk_size`; config validation
/// enforces that before a chunker is ever built.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = chunk_text("hello world", 800, 150);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_chunks_overlap() {
        let text = "abcdefghij";
        let chunks = chunk_text(text, 4, 2);
        assert_eq!(chunks[0], "abcd");
        assert_eq!(chunks[1], "cdef");
        // Every pair of adjacent chunks shares the overlap region
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().skip(2).collect();
            assert!(pair[1].starts_with(&tail));
        }
    }

    #[test]
    fn test_whitespace_only_windows_skipped() {
        let text = format!("abcd{}wxyz", " ".repeat(20));
        let chunks = chunk_text(&text, 4, 0);
        assert!(chunks.iter().all(|c| !c.trim().is_empty()));
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let text = "héllo wörld 🎉".repeat(10);
        let chunks = chunk_text(&text, 7, 3);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", 800, 150).is_empty());
        assert!(chunk_text("   \n  ", 800, 150).is_empty());
    }
}
