/// Case-insensitive substring match of `query` against an author's name or
/// email. Partial matches count, so short queries can over-match.
pub fn matches(author_name: &str, author_email: &str, query: &str) -> bool {
    let query = query.to_lowercase();
    author_name.to_lowercase().contains(&query) || author_email.to_lowercase().contains(&query)
}
