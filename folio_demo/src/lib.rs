//! Fixed data shared by tests across the workspace.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use folio_models::{contact::SocialLink, email_address::EmailAddressWithName};

pub mod contact;

pub static NOW: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(2024, 11, 5, 14, 30, 0).unwrap());

pub const OWNER_NAME: &str = "Jane Doe";

pub static OWNER: LazyLock<EmailAddressWithName> =
    LazyLock::new(|| "Jane Doe <jane@example.com>".parse().unwrap());

pub static FROM: LazyLock<EmailAddressWithName> =
    LazyLock::new(|| "Jane Doe Portfolio <noreply@example.com>".parse().unwrap());

pub const CTA_URL: &str = "https://jane.example.com/";

pub static SOCIALS: LazyLock<Vec<SocialLink>> = LazyLock::new(|| {
    vec![
        SocialLink {
            name: "GitHub".into(),
            url: "https://github.com/jane-doe".into(),
        },
        SocialLink {
            name: "LinkedIn".into(),
            url: "https://www.linkedin.com/in/jane-doe".into(),
        },
    ]
});
