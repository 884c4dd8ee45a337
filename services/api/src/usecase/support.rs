use std::sync::LazyLock;

use regex::Regex;

use crate::domain::repository::AssistantPort;
use crate::error::ApiError;

/// Messages about being locked out never reach the model; they get the
/// canned admin-contact answer immediately.
static ACCESS_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)lock|locking|locked|blocked|restrict|restricted|access denied|cant access|can't access|unable to access",
    )
    .expect("access-keyword pattern is valid")
});

pub const ADMIN_CONTACTS: &str = "If your account is locked or you need admin assistance, you can contact admin through:\n\
Email: admin@teamsync.example\n\
Phone: +1 555 0138\n\n\
Our admin team is available during business hours and will assist you as soon as possible.";

pub struct SupportUseCase<A: AssistantPort> {
    pub assistant: A,
}

impl<A: AssistantPort> SupportUseCase<A> {
    pub async fn execute(&self, message: &str) -> Result<String, ApiError> {
        if ACCESS_KEYWORDS.is_match(message) {
            return Ok(ADMIN_CONTACTS.to_owned());
        }
        self.assistant.complete(message).await
    }
}
