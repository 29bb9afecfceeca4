//! Data model shared by the scorer, the batch comparator and the driver.

mod person;

pub use person::{
    email_local_part, is_placeholder_email, phone_digits, MatchCandidate, PersonRecord, RecordId,
};
