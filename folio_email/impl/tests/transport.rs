use std::time::Duration;

use folio_email_contracts::{
    transport::{SmtpCredentials, TransportConfig},
    ContentType, Email, EmailErrorKind, EmailService, EmailTransport,
};
use folio_email_impl::{EmailServiceConfig, EmailServiceImpl};
use folio_testing::smtp::{Credentials, FakeSmtpServer};
use folio_utils::assert_matches;

#[tokio::test]
async fn connect_and_send() {
    // Arrange
    let server = FakeSmtpServer::spawn(server_credentials()).await.unwrap();
    let sut = email_service();
    let config = smtp_config(server.addr.port(), "secret");

    // Act
    let transport = sut.connect(&config).await.unwrap();
    transport
        .send(Email {
            recipient: "Visitor <visitor@example.com>".parse().unwrap(),
            subject: "Re: Hello".into(),
            body: "<p>Thanks for your message!</p>".into(),
            content_type: ContentType::Html,
            reply_to: Some("owner@example.com".parse().unwrap()),
        })
        .await
        .unwrap();

    // Assert
    let received = server.mailbox.received();
    assert_eq!(received.len(), 1);
    let mail = &received[0];
    assert_eq!(mail.from, "noreply@example.com");
    assert_eq!(mail.to, ["visitor@example.com"]);
    assert!(mail.data.contains("Subject: Re: Hello"));
    assert!(mail.data.contains("Reply-To: owner@example.com"));
    assert!(mail.data.contains("Content-Type: text/html"));
    assert!(mail.data.contains("<p>Thanks for your message!</p>"));
}

#[tokio::test]
async fn connect_does_not_send() {
    // Arrange
    let server = FakeSmtpServer::spawn(server_credentials()).await.unwrap();
    let sut = email_service();
    let config = smtp_config(server.addr.port(), "secret");

    // Act
    let result = sut.connect(&config).await;

    // Assert
    assert!(result.is_ok());
    assert!(server.mailbox.received().is_empty());
}

#[tokio::test]
async fn connect_wrong_password() {
    // Arrange
    let server = FakeSmtpServer::spawn(server_credentials()).await.unwrap();
    let sut = email_service();
    let config = smtp_config(server.addr.port(), "wrong");

    // Act
    let result = sut.connect(&config).await;

    // Assert
    assert_matches!(result, Err(err) if err.kind == EmailErrorKind::AuthenticationFailed);
}

#[tokio::test]
async fn connect_refused() {
    // Arrange
    let port = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let sut = email_service();
    let config = smtp_config(port, "secret");

    // Act
    let result = sut.connect(&config).await;

    // Assert
    assert_matches!(result, Err(err) if err.kind == EmailErrorKind::ConnectionRefused);
}

fn email_service() -> EmailServiceImpl {
    EmailServiceImpl::new(EmailServiceConfig {
        from: "Folio <noreply@example.com>".parse().unwrap(),
        timeout: Duration::from_secs(5),
    })
}

fn server_credentials() -> Credentials {
    Credentials {
        user: "mailer".into(),
        password: "secret".into(),
    }
}

fn smtp_config(port: u16, password: &str) -> TransportConfig {
    TransportConfig::Smtp {
        host: "127.0.0.1".into(),
        port,
        secure: false,
        credentials: SmtpCredentials {
            user: "mailer".into(),
            password: password.to_owned().into(),
        },
    }
}
