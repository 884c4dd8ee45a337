use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use teamsync_domain::user::{Gender, Role};
use teamsync_domain::validate::{
    MIN_SIGNUP_AGE, age_on, validate_company_id, validate_contact_number,
};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::password::hash_password;

pub struct SignupInput {
    pub full_name: String,
    pub company_id: String,
    pub dob: NaiveDate,
    pub email: String,
    pub gender: Gender,
    pub role: Role,
    pub password: String,
    pub contact_number: String,
}

pub struct SignupUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> SignupUseCase<R> {
    pub async fn execute(&self, input: SignupInput) -> Result<(), ApiError> {
        // 1. All fields present and non-blank.
        if input.full_name.trim().is_empty()
            || input.company_id.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
            || input.contact_number.trim().is_empty()
        {
            return Err(ApiError::Validation("Please fill all fields".into()));
        }

        // 2. Company ID shape.
        if !validate_company_id(&input.company_id) {
            return Err(ApiError::Validation(
                "CompanyID must be TS followed by 5 digits.".into(),
            ));
        }

        // 3. Age, counting completed years against today.
        let today = Utc::now().date_naive();
        if age_on(input.dob, today) < MIN_SIGNUP_AGE {
            return Err(ApiError::Validation(
                "You must be at least 18 years old to sign up.".into(),
            ));
        }

        // 4. Contact number shape.
        if !validate_contact_number(&input.contact_number) {
            return Err(ApiError::Validation(
                "Contact number must have exactly 10 digits.".into(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User {
            id: Uuid::now_v7(),
            full_name: input.full_name,
            company_id: input.company_id,
            email: input.email,
            dob: input.dob,
            gender: input.gender,
            role: input.role,
            password_hash,
            contact_number: input.contact_number,
            locked: false,
            created_at: Utc::now(),
        };

        // Uniqueness of email and company ID is decided by the insert itself.
        self.users.create(&user).await
    }
}
