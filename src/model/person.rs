//! Person record and match candidate types.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque, stable identifier owned by the external record store.
///
/// WordPress exports carry numeric user ids, other directories use
/// strings; both compare and hash by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl RecordId {
    /// Parse an id typed on the command line: integers become `Int`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Int)
    }
}

/// One candidate identity.
///
/// All string fields may be empty. Dumps frequently carry `null` for
/// missing values; those deserialize to empty strings, and numeric phones
/// deserialize to their digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(alias = "ID", alias = "user_id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: String,
    #[serde(default, alias = "name", deserialize_with = "lenient_text")]
    pub display_name: String,
    #[serde(default, alias = "user_email", deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(default, alias = "phone_number", deserialize_with = "lenient_text")]
    pub phone: String,
}

/// Strings pass through, numbers keep their JSON text, anything else
/// (`null`, booleans, nested values) becomes empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

impl PersonRecord {
    /// Create a record with only an id; fill the rest with the `with_*` setters.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            first_name: String::new(),
            last_name: String::new(),
            display_name: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// First and last name joined by a single space, untrimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The email if it can be used as a matching signal.
    #[must_use]
    pub fn authoritative_email(&self) -> Option<&str> {
        let email = self.email.trim();
        (!email.is_empty() && !is_placeholder_email(email)).then_some(email)
    }

    /// Short label used in logs and reports.
    #[must_use]
    pub fn label(&self) -> String {
        let full = self.full_name();
        let name = full.trim();
        if !name.is_empty() {
            format!("{name} (#{})", self.id)
        } else if !self.display_name.trim().is_empty() {
            format!("{} (#{})", self.display_name.trim(), self.id)
        } else {
            format!("#{}", self.id)
        }
    }
}

/// Whether an email is a synthetic address that must never count as a signal.
///
/// The upstream identity system writes `*.spoofed` addresses and
/// `user@placeholder.<domain>` addresses for accounts with no real email.
#[must_use]
pub fn is_placeholder_email(email: &str) -> bool {
    let email = email.trim().to_lowercase();
    if email.ends_with(".spoofed") {
        return true;
    }
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.starts_with("placeholder.") || domain.contains(".placeholder."))
}

/// Everything before the last `@`, or the whole string if there is none.
#[must_use]
pub fn email_local_part(email: &str) -> &str {
    email.rsplit_once('@').map_or(email, |(local, _)| local)
}

/// Strip every non-digit character from a phone number.
#[must_use]
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// A scored pair that met the threshold.
///
/// Created by the pair scorer and handed straight to the caller; never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Confidence 0-100
    pub confidence: u8,
    /// Signals that fired, in evaluation order
    pub reasons: Vec<String>,
    pub source: PersonRecord,
    pub candidate: PersonRecord,
}

impl MatchCandidate {
    /// Key identifying the pair independent of scoring.
    #[must_use]
    pub fn pair_key(&self) -> (RecordId, RecordId) {
        (self.source.id.clone(), self.candidate.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_email_patterns() {
        assert!(is_placeholder_email("x@placeholder.uga.edu"));
        assert!(is_placeholder_email("jdoe@uga.edu.spoofed"));
        assert!(is_placeholder_email("  JDOE@Placeholder.UGA.EDU "));
        assert!(!is_placeholder_email("rsmith@uga.edu"));
        assert!(!is_placeholder_email("placeholder@uga.edu"));
        assert!(!is_placeholder_email(""));
    }

    #[test]
    fn test_authoritative_email() {
        let rec = PersonRecord::new(1).with_email(" rsmith@uga.edu ");
        assert_eq!(rec.authoritative_email(), Some("rsmith@uga.edu"));

        let rec = PersonRecord::new(2).with_email("x@placeholder.uga.edu");
        assert_eq!(rec.authoritative_email(), None);

        assert_eq!(PersonRecord::new(3).authoritative_email(), None);
    }

    #[test]
    fn test_phone_digits() {
        assert_eq!(phone_digits("(706) 555-1212"), "7065551212");
        assert_eq!(phone_digits("706.555.1212 ext. 4"), "70655512124");
        assert_eq!(phone_digits("n/a"), "");
    }

    #[test]
    fn test_email_local_part() {
        assert_eq!(email_local_part("rsmith@uga.edu"), "rsmith");
        assert_eq!(email_local_part("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_record_deserialize_wordpress_export() {
        let json = r#"{"ID": 42, "first_name": "Ann", "last_name": null,
                       "user_email": "ann@uga.edu", "phone_number": "555"}"#;
        let rec: PersonRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(rec.id, RecordId::Int(42));
        assert_eq!(rec.first_name, "Ann");
        assert_eq!(rec.last_name, "");
        assert_eq!(rec.email, "ann@uga.edu");
        assert_eq!(rec.phone, "555");
        assert_eq!(rec.display_name, "");
    }

    #[test]
    fn test_record_deserialize_numeric_and_odd_fields() {
        let json = r#"{"id": 9, "first_name": "Ann", "phone": 7065551212,
                       "user_email": 12345, "last_name": false, "name": ["x"]}"#;
        let rec: PersonRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(rec.phone, "7065551212");
        assert_eq!(rec.email, "12345");
        assert_eq!(rec.last_name, "");
        assert_eq!(rec.display_name, "");
        assert_eq!(phone_digits(&rec.phone), "7065551212");
    }

    #[test]
    fn test_record_id_string_and_display() {
        let rec: PersonRecord =
            serde_json::from_str(r#"{"id": "emp-7"}"#).expect("valid record");
        assert_eq!(rec.id, RecordId::Text("emp-7".to_string()));
        assert_eq!(rec.id.to_string(), "emp-7");
        assert_eq!(RecordId::parse_lenient(" 12 "), RecordId::Int(12));
        assert_eq!(RecordId::parse_lenient("abc"), RecordId::from("abc"));
    }

    #[test]
    fn test_label() {
        let rec = PersonRecord::new(5).with_name("Jane", "Doe");
        assert_eq!(rec.label(), "Jane Doe (#5)");
        let rec = PersonRecord::new(6).with_display_name("J. Doe");
        assert_eq!(rec.label(), "J. Doe (#6)");
        assert_eq!(PersonRecord::new(7).label(), "#7");
    }
}
