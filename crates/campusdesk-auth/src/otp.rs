//! Numeric one-time codes for password reset.
//!
//! A new code overwrites the previous one, so only the latest code ever
//! matches. Codes do not expire and attempts are not counted.

use rand::Rng;

pub const OTP_LENGTH: usize = 6;

pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:0width$}", width = OTP_LENGTH)
}

/// Exact comparison against the stored code. A missing code never matches.
pub fn otp_matches(stored: Option<&str>, candidate: &str) -> bool {
    match stored {
        Some(stored) if !stored.is_empty() => stored == candidate,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_otp();
            assert_eq!(code.len(), OTP_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_exact_match_only() {
        assert!(otp_matches(Some("012345"), "012345"));
        assert!(!otp_matches(Some("012345"), "12345"));
        assert!(!otp_matches(Some("012345"), " 012345"));
        assert!(!otp_matches(Some("012345"), "012346"));
    }

    #[test]
    fn test_missing_code_never_matches() {
        assert!(!otp_matches(None, ""));
        assert!(!otp_matches(Some(""), ""));
        assert!(!otp_matches(None, "000000"));
    }
}
