use std::{error::Error as _, io};

use folio_email_contracts::{EmailError, EmailErrorKind};

pub(crate) fn smtp_error(err: lettre::transport::smtp::Error) -> EmailError {
    let kind = smtp_error_kind(&err);
    EmailError::new(kind, err)
}

fn smtp_error_kind(err: &lettre::transport::smtp::Error) -> EmailErrorKind {
    if let Some(kind) = io_error_kind(err).and_then(io_kind) {
        return kind;
    }

    if let Some(code) = err.status().and_then(|code| code.to_string().parse().ok()) {
        return response_code(code);
    }

    if err.is_client() && err.to_string().to_lowercase().contains("authentication") {
        return EmailErrorKind::AuthenticationFailed;
    }

    if err.is_permanent() {
        EmailErrorKind::ServerError
    } else if err.is_transient() {
        EmailErrorKind::ClientError
    } else {
        EmailErrorKind::Unknown
    }
}

/// Find the innermost I/O error in the source chain.
fn io_error_kind(err: &lettre::transport::smtp::Error) -> Option<io::ErrorKind> {
    let mut source = err.source();
    let mut kind = None;
    while let Some(err) = source {
        if let Some(err) = err.downcast_ref::<io::Error>() {
            kind = Some(err.kind());
        }
        source = err.source();
    }
    kind
}

fn io_kind(kind: io::ErrorKind) -> Option<EmailErrorKind> {
    match kind {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable => Some(EmailErrorKind::ConnectionRefused),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Some(EmailErrorKind::TimedOut),
        _ => None,
    }
}

fn response_code(code: u16) -> EmailErrorKind {
    match code {
        530 | 534 | 535 => EmailErrorKind::AuthenticationFailed,
        500..=599 => EmailErrorKind::ServerError,
        400..=499 => EmailErrorKind::ClientError,
        _ => EmailErrorKind::Unknown,
    }
}
