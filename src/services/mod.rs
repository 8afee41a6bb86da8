//! Seams to the hosted services: the survey record store and the mail sender.

pub mod mailer;
pub mod survey_store;
