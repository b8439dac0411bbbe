/// Count words in canonical text: trim, then split on whitespace runs.
/// Empty or whitespace-only text counts as zero.
pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}
