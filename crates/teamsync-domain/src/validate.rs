//! Signup field validation rules.

use chrono::{Datelike, NaiveDate};

/// Minimum age (in completed years) required to sign up.
pub const MIN_SIGNUP_AGE: i32 = 18;

/// A company ID is `TS` followed by exactly five ASCII digits.
pub fn validate_company_id(company_id: &str) -> bool {
    let Some(digits) = company_id.strip_prefix("TS") else {
        return false;
    };
    digits.len() == 5 && digits.bytes().all(|b| b.is_ascii_digit())
}

/// A contact number is exactly ten ASCII digits.
pub fn validate_contact_number(contact_number: &str) -> bool {
    contact_number.len() == 10 && contact_number.bytes().all(|b| b.is_ascii_digit())
}

/// Completed years between `dob` and `today`.
///
/// The year difference is decremented when the birthday (month/day) has
/// not yet occurred in `today`'s year, so someone turning 18 on `today`
/// is already 18 while one day earlier they are 17.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}
