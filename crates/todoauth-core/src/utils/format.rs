/// Number of leading token characters kept when logging a token
const TOKEN_PREFIX_LEN: usize = 6;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Show only the start of a bearer token in logs
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "<empty>".to_string();
    }
    if token.chars().count() <= TOKEN_PREFIX_LEN {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
    format!("{}***", prefix)
}
