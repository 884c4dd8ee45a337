pub mod assistant;
pub mod db;
pub mod mailer;
pub mod outbox;
