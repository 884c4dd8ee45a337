use teamsync_auth_types::token::issue_access_token;
use teamsync_domain::user::Role;

use crate::domain::repository::UserRepository;
use crate::error::ApiError;
use crate::password::verify_password;

pub struct LoginInput {
    pub email: Option<String>,
    pub company_id: Option<String>,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub role: Role,
    pub full_name: String,
    pub company_id: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let identifier = input
            .email
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(input
                .company_id
                .as_deref()
                .filter(|s| !s.trim().is_empty()));
        let Some(identifier) = identifier else {
            return Err(ApiError::Validation(
                "Please enter CompanyID/Email and Password.".into(),
            ));
        };
        if input.password.is_empty() {
            return Err(ApiError::Validation(
                "Please enter CompanyID/Email and Password.".into(),
            ));
        }

        // Unknown identifier and wrong password collapse into one generic
        // error; neither account existence nor which part was wrong leaks.
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        // Locked wins over the password check: a locked account answers 403
        // whatever the password, the one deliberate existence leak.
        if user.locked {
            return Err(ApiError::AccountLocked);
        }

        if !verify_password(&user.password_hash, &input.password) {
            return Err(ApiError::InvalidCredentials);
        }

        let (token, _exp) = issue_access_token(user.id, user.role, &self.jwt_secret)
            .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("issue session claim")))?;

        Ok(LoginOutput {
            token,
            role: user.role,
            full_name: user.full_name,
            company_id: user.company_id,
        })
    }
}
