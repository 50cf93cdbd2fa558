//! Synchronous checks on form fields. These never reach the backend.

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validity of one form field, `None` until the user has touched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldCheck(Option<bool>);

impl FieldCheck {
    pub fn checked(valid: bool) -> Self {
        Self(Some(valid))
    }

    pub fn is_valid(&self) -> bool {
        self.0 == Some(true)
    }

    /// True only after a failed check; untouched fields show no error.
    pub fn is_failed(&self) -> bool {
        self.0 == Some(false)
    }

    /// `message` after a failed check, otherwise empty.
    pub fn error_text(&self, message: impl Into<String>) -> String {
        if self.is_failed() {
            message.into()
        } else {
            String::new()
        }
    }
}

pub fn validate_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_LEN
}

/// Accepts `local@domain.tld`, with no whitespace anywhere.
pub fn validate_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(!validate_name(""));
        assert!(!validate_name("  a "));
        assert!(validate_name("Al"));
    }

    #[test]
    fn emails() {
        assert!(validate_email("asha@example.in"));
        assert!(validate_email(" asha@mail.example.in "));
        for bad in ["", "asha", "@example.in", "asha@", "asha@example", "a b@c.in", "a@b@c.in", "a@.in", "a@b."] {
            assert!(!validate_email(bad), "{bad:?} accepted");
        }
    }

    #[test]
    fn passwords() {
        assert!(!validate_password("12345"));
        assert!(validate_password("123456"));
    }

    #[test]
    fn untouched_field_is_neither_valid_nor_failed() {
        let field = FieldCheck::default();
        assert!(!field.is_valid());
        assert!(!field.is_failed());
        assert!(FieldCheck::checked(false).is_failed());
        assert_eq!(field.error_text("bad"), "");
        assert_eq!(FieldCheck::checked(false).error_text("bad"), "bad");
    }
}
