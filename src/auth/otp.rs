//! One-time codes for phone verification.
//!
//! Codes are four random digits drawn with `rand`'s thread RNG. They guard a
//! low-value sign-up step only and are not meant to resist a determined
//! attacker.

use rand::Rng;
use time::{Duration, OffsetDateTime};

pub const OTP_TTL: Duration = Duration::minutes(5);

pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

pub fn otp_expiry(now: OffsetDateTime) -> OffsetDateTime {
    now + OTP_TTL
}

/// Representations a stored contact number may have for the same phone:
/// as sent, with the `+91` prefix, and digits only.
pub fn contact_candidates(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let mut out = vec![raw.to_string(), format!("+91{raw}")];
    if !digits.is_empty() && !out.contains(&digits) {
        out.push(digits);
    }
    out
}

/// E.164 form of an Indian mobile number, or `None` if it is not one.
pub fn to_e164_india(contact_no: &str) -> Option<String> {
    let digits: String = contact_no.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => Some(format!("+91{digits}")),
        12 if digits.starts_with("91") => Some(format!("+{digits}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_four_digits() {
        for _ in 0..200 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 4);
            let n: u32 = otp.parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[test]
    fn expiry_is_five_minutes_out() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(otp_expiry(now) - now, Duration::minutes(5));
    }

    #[test]
    fn candidates_cover_prefix_and_digits() {
        let c = contact_candidates(" 98765-43210 ");
        assert_eq!(c, vec!["98765-43210", "+9198765-43210", "9876543210"]);

        let c = contact_candidates("9876543210");
        assert_eq!(c, vec!["9876543210", "+919876543210"]);
    }

    #[test]
    fn e164_india() {
        assert_eq!(to_e164_india("9876543210").as_deref(), Some("+919876543210"));
        assert_eq!(to_e164_india("+91 98765 43210").as_deref(), Some("+919876543210"));
        assert_eq!(to_e164_india("919876543210").as_deref(), Some("+919876543210"));
        assert_eq!(to_e164_india("12345"), None);
        assert_eq!(to_e164_india("449876543210"), None);
    }
}
