use validator::ValidateEmail;

/// A syntactically valid email address. Must be instantiated with
/// `SubscriberEmail::parse`; the field is private so the check can't be
/// bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        let email = email.trim().to_string();
        match ValidateEmail::validate_email(&email) {
            true => Ok(Self(email)),
            false => Err("Enter a valid email address.".to_string()),
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str { &self.0 }
}
