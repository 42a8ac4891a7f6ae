use folio_models::contact::ContactSubmissionFields;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

/// Body of a contact form submission. Fields that are missing, empty or not a
/// string are rejected after parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiContactSubmission {
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub message: Option<String>,
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Field::deserialize(deserializer)? {
        Field::Text(text) => Some(text),
        Field::Other(_) => None,
    })
}

impl From<ApiContactSubmission> for ContactSubmissionFields {
    fn from(value: ApiContactSubmission) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactSuccess {
    pub success: bool,
    pub message: &'static str,
}
