//! Password policy.
//!
//! Enforces the minimum requirements for a vault password before anything
//! is encrypted with it.

use crate::error::ValidationError;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// At least one of these must appear in the password.
pub const SPECIAL_CHARACTERS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', ',', '.', '?', '"', ':', '{', '}', '|', '<',
    '>',
];

/// Check whether a password satisfies the policy.
///
/// # Requirements
///
/// - At least 6 characters (Unicode scalar values, no normalization)
/// - At least one character from [`SPECIAL_CHARACTERS`]
///
/// There is no upper bound.
///
/// # Examples
///
/// ```
/// use lockbox_core::crypto::is_valid;
///
/// assert!(is_valid("abc123!"));
/// assert!(!is_valid("abc123"));
/// assert!(!is_valid("a!b"));
/// ```
pub fn is_valid(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| SPECIAL_CHARACTERS.contains(&c))
}

/// Validate a password, returning the policy violation as an error.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if is_valid(password) {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passwords() {
        assert!(is_valid("abc123!"));
        assert!(is_valid("!!!!!!"));
        assert!(is_valid("long password with a colon: inside"));
        assert!(is_valid("quote\"d pass"));
    }

    #[test]
    fn test_too_short() {
        assert!(!is_valid("ab!"));
        assert!(!is_valid("abcd!"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_exactly_min_length() {
        let exactly_6 = "abcde#";
        assert_eq!(exactly_6.chars().count(), 6);
        assert!(is_valid(exactly_6));
    }

    #[test]
    fn test_missing_special_character() {
        assert!(!is_valid("abcdefgh"));
        assert!(!is_valid("password123"));
        // Characters outside the fixed set do not count
        assert!(!is_valid("under_score-dash+plus"));
        assert!(!is_valid("semi;colon[]"));
    }

    #[test]
    fn test_every_special_character_accepted() {
        for c in SPECIAL_CHARACTERS {
            let candidate = format!("abcde{}", c);
            assert!(is_valid(&candidate), "expected {:?} to satisfy policy", c);
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 5 characters, 10 bytes: still too short
        assert!(!is_valid("ééé!é"));
        assert!(is_valid("éééé!é"));
    }

    #[test]
    fn test_matches_definition_for_generated_inputs() {
        let alphabet: Vec<char> = "aZ9 _-!@#.?".chars().collect();
        for len in 0..8 {
            for seed in 0..alphabet.len() {
                let candidate: String = (0..len)
                    .map(|i| alphabet[(seed + i * 3) % alphabet.len()])
                    .collect();
                let expected = candidate.chars().count() >= 6
                    && candidate.chars().any(|c| SPECIAL_CHARACTERS.contains(&c));
                assert_eq!(is_valid(&candidate), expected, "{:?}", candidate);
            }
        }
    }

    #[test]
    fn test_validate_password_error() {
        assert_eq!(
            validate_password("weak"),
            Err(ValidationError::WeakPassword)
        );
        assert!(validate_password("str0ng!").is_ok());
    }
}
