/// Derives the coarse product family from a description: the first
/// whitespace-delimited token, kept only when it is longer than `min_len`
/// characters. Short tokens are usually articles or prepositions.
pub fn derive_department(description: Option<&str>, min_len: usize) -> Option<String> {
    let token = description?.split_whitespace().next()?;
    if token.chars().count() > min_len {
        Some(token.to_string())
    } else {
        None
    }
}
