pub mod admin;
pub mod login;
pub mod password_reset;
pub mod profile;
pub mod signup;
pub mod support;
