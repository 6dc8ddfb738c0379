/// Transcript chunking for bounded-size classifier requests.
///
/// Boundaries are measured in characters, not bytes, so multi-byte
/// transcripts never split inside a code point.
///
/// Splits prefer the last space inside the window so words stay intact;
/// an unbroken run longer than the limit degrades to a hard split.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    assert!(max_chars > 0, "max_chars must be greater than 0");

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + max_chars).min(chars.len());
        let split = chars[start..end]
            .iter()
            .rposition(|c| *c == ' ')
            .map(|pos| start + pos)
            // A space at the window start would yield an empty chunk;
            // fall through to a hard split instead.
            .filter(|&pos| pos > start)
            .unwrap_or(end);

        chunks.push(chars[start..split].iter().collect());
        start = split;
    }

    chunks
}
