use std::{
    net::{IpAddr, SocketAddr},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use tracing::{info, warn};

/// The only account accepted by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMail {
    pub from: String,
    pub to: Vec<String>,
    /// The raw message, with dot-stuffing removed.
    pub data: String,
}

/// Messages accepted by a server, in the order they were received.
#[derive(Debug, Clone, Default)]
pub struct Mailbox(Arc<Mutex<Vec<ReceivedMail>>>);

impl Mailbox {
    pub fn received(&self) -> Vec<ReceivedMail> {
        self.0.lock().map(|mails| mails.clone()).unwrap_or_default()
    }

    fn push(&self, mail: ReceivedMail) {
        if let Ok(mut mails) = self.0.lock() {
            mails.push(mail);
        }
    }
}

pub async fn start_server(host: IpAddr, port: u16, credentials: Credentials) -> anyhow::Result<()> {
    info!("Starting smtp testing server on {host}:{port}");
    info!("Credentials: {:?} / {:?}", credentials.user, credentials.password);
    info!("Only AUTH PLAIN is supported, STARTTLS is not offered");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    serve(listener, credentials.into(), Mailbox::default(), Default::default()).await
}

/// Handle to an in-process smtp server.
#[derive(Debug, Clone)]
pub struct FakeSmtpServer {
    pub addr: SocketAddr,
    pub mailbox: Mailbox,
    connections: Arc<AtomicUsize>,
}

impl FakeSmtpServer {
    /// Start a server on a random local port.
    pub async fn spawn(credentials: Credentials) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let mailbox = Mailbox::default();
        let connections = Arc::new(AtomicUsize::new(0));
        tokio::spawn(serve(
            listener,
            credentials.into(),
            mailbox.clone(),
            Arc::clone(&connections),
        ));
        Ok(Self {
            addr,
            mailbox,
            connections,
        })
    }

    /// Number of connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn serve(
    listener: TcpListener,
    credentials: Arc<Credentials>,
    mailbox: Mailbox,
    connections: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        connections.fetch_add(1, Ordering::SeqCst);
        let credentials = Arc::clone(&credentials);
        let mailbox = mailbox.clone();
        tokio::spawn(async move {
            if let Err(err) = handle(stream, &credentials, &mailbox).await {
                warn!(%peer, "smtp session failed: {err}");
            }
        });
    }
}

async fn handle(
    stream: TcpStream,
    credentials: &Credentials,
    mailbox: &Mailbox,
) -> anyhow::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    write.write_all(b"220 folio-testing ESMTP\r\n").await?;

    let mut authenticated = false;
    let mut from = None;
    let mut to = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let command = line.to_ascii_uppercase();

        let reply = if command.starts_with("EHLO") {
            "250-folio-testing\r\n250 AUTH PLAIN"
        } else if command.starts_with("HELO") {
            "250 folio-testing"
        } else if command.starts_with("AUTH PLAIN") {
            let mut response = line["AUTH PLAIN".len()..].trim().to_owned();
            if response.is_empty() {
                write.write_all(b"334 \r\n").await?;
                response = lines.next_line().await?.unwrap_or_default();
            }
            authenticated = check_plain(&response, credentials);
            if authenticated {
                "235 2.7.0 Authentication successful"
            } else {
                "535 5.7.8 Authentication credentials invalid"
            }
        } else if command.starts_with("AUTH") {
            "504 5.5.4 Unrecognized authentication type"
        } else if command.starts_with("MAIL FROM:") {
            if authenticated {
                from = Some(address(&line));
                to.clear();
                "250 2.1.0 Ok"
            } else {
                "530 5.7.0 Authentication required"
            }
        } else if command.starts_with("RCPT TO:") {
            to.push(address(&line));
            "250 2.1.5 Ok"
        } else if command == "DATA" {
            write.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n").await?;
            let mut data = Vec::new();
            while let Some(line) = lines.next_line().await? {
                if line == "." {
                    break;
                }
                data.push(line.strip_prefix('.').map(str::to_owned).unwrap_or(line));
            }
            let mail = ReceivedMail {
                from: from.take().unwrap_or_default(),
                to: std::mem::take(&mut to),
                data: data.join("\r\n"),
            };
            info!(from = %mail.from, to = ?mail.to, "received mail");
            mailbox.push(mail);
            "250 2.0.0 Ok: queued"
        } else if command == "QUIT" {
            write.write_all(b"221 2.0.0 Bye\r\n").await?;
            break;
        } else {
            "250 2.0.0 Ok"
        };

        write.write_all(format!("{reply}\r\n").as_bytes()).await?;
    }

    Ok(())
}

fn check_plain(response: &str, credentials: &Credentials) -> bool {
    let Ok(decoded) = STANDARD.decode(response.trim()) else {
        return false;
    };
    let mut parts = decoded.split(|&b| b == 0).skip(1);
    parts.next() == Some(credentials.user.as_bytes())
        && parts.next() == Some(credentials.password.as_bytes())
}

fn address(line: &str) -> String {
    let start = line.find('<').map_or(0, |i| i + 1);
    let end = line.rfind('>').unwrap_or(line.len());
    line.get(start..end).unwrap_or_default().to_owned()
}
