use std::sync::LazyLock;

use folio_models::contact::{ContactSubmission, ContactSubmissionFields, DraftedReply};

use crate::OWNER_NAME;

pub static ANA: LazyLock<ContactSubmission> = LazyLock::new(|| submission(&ANA_FIELDS));

pub static ANA_FIELDS: LazyLock<ContactSubmissionFields> =
    LazyLock::new(|| ContactSubmissionFields {
        name: Some("Ana".into()),
        email: Some("ana@x.com".into()),
        subject: Some("Hi".into()),
        message: Some("Hello there".into()),
    });

/// A submission with markup and line breaks in every field.
pub static BOB: LazyLock<ContactSubmission> = LazyLock::new(|| {
    submission(&ContactSubmissionFields {
        name: Some("Bob <b>Builder</b>".into()),
        email: Some("bob@example.com".into()),
        subject: Some("Question about \"Folio\" & co".into()),
        message: Some("First line\nSecond line <script>alert(1)</script>".into()),
    })
});

/// A submission whose email address cannot be parsed as a mailbox.
pub static CAROL: LazyLock<ContactSubmission> = LazyLock::new(|| {
    submission(&ContactSubmissionFields {
        name: Some("Carol".into()),
        email: Some("carol at example dot com".into()),
        subject: Some("Hello".into()),
        message: Some("Please get back to me.".into()),
    })
});

pub static ANA_AI_REPLY: LazyLock<DraftedReply> = LazyLock::new(|| DraftedReply {
    greeting: "Hi Ana,".into(),
    response: "Thanks for saying hello! I'm glad you stopped by and will be in touch soon.".into(),
    closing: format!("Best,\n{OWNER_NAME}"),
});

pub static ANA_FALLBACK_REPLY: LazyLock<DraftedReply> = LazyLock::new(|| DraftedReply {
    greeting: "Hello Ana,".into(),
    response: "Thank you for reaching out regarding \"Hi\". I have received your message and \
               will get back to you as soon as possible."
        .into(),
    closing: format!("Best regards,\n{OWNER_NAME}"),
});

fn submission(fields: &ContactSubmissionFields) -> ContactSubmission {
    ContactSubmission::validate(fields.clone()).unwrap()
}
