//! Log sanitization utilities for masking sensitive data.
//!
//! Usernames are public handles but still identify people, so logs only
//! carry a short prefix.

/// Mask a username for safe logging.
///
/// Shows only the first 3 characters followed by asterisks.
///
/// # Examples
/// ```ignore
/// assert_eq!(mask_username("johndoe"), "joh***");
/// assert_eq!(mask_username("ab"), "ab***");
/// ```
pub fn mask_username(username: &str) -> String {
    let visible: String = username.chars().take(3).collect();
    format!("{}***", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_username() {
        assert_eq!(mask_username("johndoe"), "joh***");
        assert_eq!(mask_username("ab"), "ab***");
        assert_eq!(mask_username("a"), "a***");
    }

    #[test]
    fn test_mask_username_multibyte() {
        assert_eq!(mask_username("zoë_writes"), "zoë***");
        assert_eq!(mask_username(""), "***");
    }
}
