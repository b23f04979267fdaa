//! Client-side form checks, run before any request is sent.

use std::fmt;

use thiserror::Error;

use crate::model::{Credentials, Registration};

/// Minimum password length for sign-up.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Form field that a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Title,
    Description,
    Category,
    Level,
    Duration,
    ContactEmail,
    Thumbnail,
    Requirements,
    Requirement(usize),
    Sections,
    SectionTitle(usize),
}

/// Inline validation message for a single field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn required(field: FormField, label: &str) -> Self {
        Self::new(field, format!("{label} is required"))
    }
}

/// Look up the message for `field`, if any.
#[must_use]
pub fn message_for(errors: &[FieldError], field: FormField) -> Option<&str> {
    errors
        .iter()
        .find(|err| err.field == field)
        .map(|err| err.message.as_str())
}

/// Loose shape check: `local@domain.tld` without whitespace.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

//
// ─── PASSWORD STRENGTH ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordCriterion {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordCriterion {
    pub const ALL: [PasswordCriterion; 5] = [
        Self::MinLength,
        Self::Uppercase,
        Self::Lowercase,
        Self::Digit,
        Self::Special,
    ];

    fn is_met(self, password: &str) -> bool {
        match self {
            Self::MinLength => password.chars().count() >= MIN_PASSWORD_LEN,
            Self::Uppercase => password.chars().any(char::is_uppercase),
            Self::Lowercase => password.chars().any(char::is_lowercase),
            Self::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Self::Special => password
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        }
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::MinLength => "at least 8 characters",
            Self::Uppercase => "an uppercase letter",
            Self::Lowercase => "a lowercase letter",
            Self::Digit => "a number",
            Self::Special => "a special character",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLabel {
    Weak,
    Fair,
    Good,
    Strong,
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
        };
        f.write_str(label)
    }
}

/// Result of the five-factor password check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    missing: Vec<PasswordCriterion>,
}

#[must_use]
pub fn check_password(password: &str) -> PasswordStrength {
    let missing = PasswordCriterion::ALL
        .into_iter()
        .filter(|criterion| !criterion.is_met(password))
        .collect();
    PasswordStrength { missing }
}

impl PasswordStrength {
    #[must_use]
    pub fn missing(&self) -> &[PasswordCriterion] {
        &self.missing
    }

    /// Number of satisfied criteria, `0..=5`.
    #[must_use]
    pub fn score(&self) -> u8 {
        let met = PasswordCriterion::ALL.len() - self.missing.len();
        u8::try_from(met).unwrap_or(0)
    }

    /// Strong only when every criterion holds.
    #[must_use]
    pub fn is_strong(&self) -> bool {
        self.missing.is_empty()
    }

    #[must_use]
    pub fn label(&self) -> StrengthLabel {
        match self.score() {
            5 => StrengthLabel::Strong,
            4 => StrengthLabel::Good,
            3 => StrengthLabel::Fair,
            _ => StrengthLabel::Weak,
        }
    }

    /// Rejection message naming every missing criterion, or `None` if strong.
    #[must_use]
    pub fn rejection_message(&self) -> Option<String> {
        if self.is_strong() {
            return None;
        }
        let parts: Vec<&str> = self.missing.iter().map(|c| c.describe()).collect();
        Some(format!("Password must contain {}", join_human(&parts)))
    }
}

fn join_human(parts: &[&str]) -> String {
    match parts {
        [] => String::new(),
        [one] => (*one).to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

//
// ─── AUTH FORMS ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Sign-in only checks that both fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns one `FieldError` per empty field.
    pub fn validate(&self) -> Result<Credentials, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FieldError::required(FormField::Email, "Email"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::required(FormField::Password, "Password"));
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// # Errors
    ///
    /// Returns one `FieldError` per invalid field.
    pub fn validate(&self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::required(FormField::Name, "Name"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::required(FormField::Email, "Email"));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new(
                FormField::Email,
                "Enter a valid email address",
            ));
        }

        if self.password.is_empty() {
            errors.push(FieldError::required(FormField::Password, "Password"));
        } else if let Some(message) = check_password(&self.password).rejection_message() {
            errors.push(FieldError::new(FormField::Password, message));
        }

        if self.confirm_password != self.password {
            errors.push(FieldError::new(
                FormField::ConfirmPassword,
                "Passwords do not match",
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Registration {
            name: self.name.trim().to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("maker@example.com"));
        assert!(is_valid_email(" a.b+c@sub.example.org "));
        assert!(!is_valid_email("maker@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("maker@.com"));
        assert!(!is_valid_email("ma ker@example.com"));
        assert!(!is_valid_email("maker@example."));
    }

    #[test]
    fn strong_password_meets_all_five() {
        let strength = check_password("Str0ng!pass");
        assert!(strength.is_strong());
        assert_eq!(strength.score(), 5);
        assert_eq!(strength.label(), StrengthLabel::Strong);
        assert_eq!(strength.rejection_message(), None);
    }

    #[test]
    fn each_missing_criterion_is_named() {
        let cases = [
            ("Sh0rt!", PasswordCriterion::MinLength),
            ("lower0case!", PasswordCriterion::Uppercase),
            ("UPPER0CASE!", PasswordCriterion::Lowercase),
            ("NoDigits!!", PasswordCriterion::Digit),
            ("NoSpecial0", PasswordCriterion::Special),
        ];
        for (password, criterion) in cases {
            let strength = check_password(password);
            assert!(!strength.is_strong(), "{password} should be rejected");
            assert_eq!(strength.missing(), &[criterion], "{password}");
            let message = strength.rejection_message().unwrap();
            assert!(message.contains(criterion.describe()), "{message}");
        }
    }

    #[test]
    fn rejection_lists_multiple_criteria() {
        let message = check_password("abc").rejection_message().unwrap();
        assert_eq!(
            message,
            "Password must contain at least 8 characters, an uppercase letter, a number and a special character"
        );
        assert_eq!(check_password("abc").label(), StrengthLabel::Weak);
    }

    #[test]
    fn sign_in_checks_only_emptiness() {
        let form = SignInForm {
            email: "not-an-email".into(),
            password: "x".into(),
        };
        assert!(form.validate().is_ok());

        let errors = SignInForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(message_for(&errors, FormField::Email), Some("Email is required"));
    }

    #[test]
    fn sign_up_reports_every_field() {
        let form = SignUpForm {
            name: " ".into(),
            email: "nope".into(),
            password: "weakpass".into(),
            confirm_password: "other".into(),
        };
        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                FormField::Name,
                FormField::Email,
                FormField::Password,
                FormField::ConfirmPassword
            ]
        );
    }

    #[test]
    fn sign_up_trims_name_and_email() {
        let form = SignUpForm {
            name: "  Ada ".into(),
            email: " ada@example.com ".into(),
            password: "Str0ng!pass".into(),
            confirm_password: "Str0ng!pass".into(),
        };
        let registration = form.validate().unwrap();
        assert_eq!(registration.name, "Ada");
        assert_eq!(registration.email, "ada@example.com");
    }
}
