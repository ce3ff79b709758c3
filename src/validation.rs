//! Input validation: id path parameters, email addresses and password
//! strength. Email and password checks accumulate one detail message per
//! violated rule so the client sees the full list, never just the first
//! problem.

use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

lazy_static! {
    static ref POSITIVE_INT_RE: Regex = Regex::new(r"^\d+$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Symbols accepted by the password strength check.
const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Domains of known disposable/temporary mail providers.
const DISPOSABLE_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "dispostable.com",
    "fakeinbox.com",
    "getnada.com",
    "guerrillamail.com",
    "mailinator.com",
    "maildrop.cc",
    "sharklasers.com",
    "tempmail.com",
    "temp-mail.org",
    "throwawaymail.com",
    "trashmail.com",
    "yopmail.com",
];

/// True iff the input is entirely decimal digits: no sign, no whitespace,
/// non-empty.
pub fn is_positive_integer(value: &str) -> bool {
    POSITIVE_INT_RE.is_match(value)
}

/// Parses an `:id` path parameter, rejecting anything that is not a plain
/// positive integer with a 400 and an explanatory detail.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    let invalid = || {
        ApiError::validation(
            "The provided ID is not valid.",
            vec!["The ID must be a positive integer without spaces or special characters.".into()],
        )
    };
    if !is_positive_integer(raw) {
        return Err(invalid());
    }
    raw.parse::<i64>().map_err(|_| invalid())
}

fn check_email_format(email: &str, details: &mut Vec<String>) {
    if !EMAIL_RE.is_match(email) {
        details.push("The email address is not in a valid format.".into());
    }
}

fn check_disposable_domain(email: &str, details: &mut Vec<String>) {
    let domain = email
        .split('@')
        .nth(1)
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let disposable = DISPOSABLE_DOMAINS
        .iter()
        .any(|d| domain == *d || domain.ends_with(&format!(".{d}")));
    if disposable {
        details.push("Disposable or temporary email addresses are not allowed.".into());
    }
}

/// Confirms the domain exists and can receive mail. A DNS failure is treated
/// as bad input, not an internal error; lookups are never retried.
async fn check_mx_records(email: &str, details: &mut Vec<String>) {
    let domain = match email.split('@').nth(1) {
        Some(d) if !d.is_empty() => d,
        _ => {
            details.push("The email domain is invalid or does not exist.".into());
            return;
        }
    };

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
    match resolver.mx_lookup(domain).await {
        Ok(records) if records.iter().next().is_some() => {}
        Ok(_) => {
            details.push("The email domain exists but cannot receive emails.".into());
        }
        Err(_) => {
            details.push("The email domain is invalid or does not exist.".into());
        }
    }
}

/// Validates an email address: general format, disposable-provider rejection
/// and an MX-record lookup on the domain. All three checks run regardless of
/// earlier failures. On success the email is returned trimmed and
/// lower-cased.
pub async fn validate_email(email: &str) -> Result<String, ApiError> {
    let mut details = Vec::new();

    check_email_format(email, &mut details);
    check_disposable_domain(email, &mut details);
    check_mx_records(email, &mut details).await;

    if !details.is_empty() {
        return Err(ApiError::validation("Invalid email.", details));
    }

    Ok(email.trim().to_lowercase())
}

/// Validates password strength: minimum length, lowercase, uppercase, digit
/// and symbol. Every rule is evaluated unconditionally and contributes one
/// detail message when violated. Hashing is the caller's job.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let mut details = Vec::new();

    if password.len() < 8 {
        details.push("The password must be at least 8 characters long.".into());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        details.push("The password must contain at least one lowercase letter.".into());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        details.push("The password must contain at least one uppercase letter.".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        details.push("The password must contain at least one digit.".into());
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        details.push("The password must contain at least one symbol.".into());
    }

    if !details.is_empty() {
        return Err(ApiError::validation("Invalid password.", details));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_details(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation { details, .. } => details,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn positive_integer_accepts_digits_only() {
        assert!(is_positive_integer("1"));
        assert!(is_positive_integer("42"));
        assert!(is_positive_integer("007"));
    }

    #[test]
    fn positive_integer_rejects_everything_else() {
        assert!(!is_positive_integer(""));
        assert!(!is_positive_integer("-1"));
        assert!(!is_positive_integer("+1"));
        assert!(!is_positive_integer(" 1"));
        assert!(!is_positive_integer("1 "));
        assert!(!is_positive_integer("1.5"));
        assert!(!is_positive_integer("abc"));
    }

    #[test]
    fn parse_id_round_trips_valid_ids() {
        assert_eq!(parse_id("12").unwrap(), 12);
    }

    #[test]
    fn parse_id_rejects_garbage_with_400() {
        let err = parse_id("12abc").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn valid_password_passes_all_rules() {
        assert!(validate_password("Abcd123!").is_ok());
    }

    #[test]
    fn each_violated_rule_adds_one_detail() {
        // Violates all five rules at once
        let details = validation_details(validate_password("").unwrap_err());
        assert_eq!(details.len(), 5);

        // Long enough and lowercase, missing uppercase, digit and symbol
        let details = validation_details(validate_password("abcdefgh").unwrap_err());
        assert_eq!(details.len(), 3);

        // Missing only the symbol
        let details = validation_details(validate_password("Abcdefg1").unwrap_err());
        assert_eq!(details.len(), 1);
        assert!(details[0].contains("symbol"));
    }

    #[test]
    fn symbol_rule_accepts_the_fixed_set_only() {
        assert!(validate_password("Abcdef1!").is_ok());
        assert!(validate_password("Abcdef1?").is_ok());
        // Underscore is not in the allowed symbol set
        assert!(validate_password("Abcdef1_").is_err());
    }

    #[test]
    fn email_format_check_flags_malformed_addresses() {
        for bad in ["", "plainaddress", "a@b", "a @b.com", "a@b .com"] {
            let mut details = Vec::new();
            check_email_format(bad, &mut details);
            assert_eq!(details.len(), 1, "expected failure for {bad:?}");
        }

        let mut details = Vec::new();
        check_email_format("user@example.com", &mut details);
        assert!(details.is_empty());
    }

    #[test]
    fn disposable_domains_are_rejected() {
        let mut details = Vec::new();
        check_disposable_domain("someone@mailinator.com", &mut details);
        assert_eq!(details.len(), 1);

        let mut details = Vec::new();
        check_disposable_domain("someone@MAIL.YOPMAIL.COM", &mut details);
        assert_eq!(details.len(), 1);

        let mut details = Vec::new();
        check_disposable_domain("someone@example.com", &mut details);
        assert!(details.is_empty());
    }
}
