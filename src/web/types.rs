//! The structs received by the `web` module and their validation.
//! Includes the parsing implementations and tests for those.

use lazy_regex::regex_is_match;
use serde::Deserialize;
use serde_json::Value;

use crate::store::NewWaitlistEntry;

/// Origin channel recorded with every entry created through this service.
pub const SIGNUP_SOURCE: &str = "website";

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable Signup
/// A Signup that can be Deserialized but can have missing or invalid fields.
/// Fields are kept as raw JSON values: a field of the wrong type is a validation
/// failure, not a malformed body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeserSignup {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub email: Option<Value>,
    pub company: Option<Value>,
}

/// Validated Signup
/// A Signup with all the fields validated and normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub first_name: String,
    pub last_name: String,
    pub email: ValidEmail,
    pub company: Option<String>,
}

impl TryFrom<DeserSignup> for ValidSignup {
    type Error = DataParsingError;

    fn try_from(deser: DeserSignup) -> Result<Self, Self::Error> {
        let (Some(first_name), Some(last_name), Some(email)) = (
            truthy(deser.first_name),
            truthy(deser.last_name),
            truthy(deser.email),
        ) else {
            return Err(DataParsingError::MissingRequiredFields);
        };

        // Only a string can be a valid email.
        let Value::String(email) = email else {
            return Err(DataParsingError::EmailInvalid);
        };

        Ok(ValidSignup {
            first_name: into_text(first_name),
            last_name: into_text(last_name),
            email: ValidEmail::parse(email)?,
            company: truthy(deser.company).map(into_text),
        })
    }
}

impl ValidSignup {
    pub fn into_entry(self) -> NewWaitlistEntry {
        NewWaitlistEntry {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email.0,
            company: self.company,
            source: SIGNUP_SOURCE.to_string(),
        }
    }
}

/// Validated, lowercased email in `local@domain.tld` shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"i, value) {
            Ok(ValidEmail(value.to_lowercase()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

/// `null`, `false`, `0` and `""` count as absent, everything else as present.
fn truthy(value: Option<Value>) -> Option<Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Strings are kept verbatim, other values as their JSON text.
fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("missing one of the required fields: firstName, lastName, email")]
    MissingRequiredFields,
    #[error("email invalid")]
    EmailInvalid,
}
