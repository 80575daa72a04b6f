/// Decode a dataset payload as UTF-8, falling back to Latin-1 when the bytes
/// are not valid UTF-8. The fallback maps every byte to its corresponding
/// code point, so it never fails and never drops input.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
