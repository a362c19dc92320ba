//! Single-instance coordination.
//!
//! The first process to start becomes the primary: it listens on a loopback
//! port and records that port in `instance.lock`. Later launches find the
//! port, hand their arguments over as one JSON line and exit once the
//! primary acknowledges it. A lock file whose port does not acknowledge is
//! stale and taken over.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::runtime::Runtime;

/// Name of the lock file inside the application's config directory.
pub const LOCK_FILE_NAME: &str = "instance.lock";

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
const READ_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("Instance lock file {path}: {source}")]
    LockFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Instance socket error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid second-instance message: {0}")]
    Message(#[from] serde_json::Error),
    #[error("Instance on port {0} did not acknowledge the hand-off")]
    Unacknowledged(u16),
}

/// Reply the primary sends for every message it accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HandOffAck {
    ok: bool,
}

/// What a later launch tells the primary instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondInstanceMessage {
    /// Raw command-line arguments of the later launch, program name excluded
    pub args: Vec<String>,
    /// `--new-window` was passed
    #[serde(default)]
    pub new_window: bool,
    /// `--url <URL>` or `--url=<URL>` was passed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SecondInstanceMessage {
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut message = Self::default();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "--new-window" {
                message.new_window = true;
            } else if arg == "--url" {
                message.url = iter.next().cloned();
            } else if let Some(url) = arg.strip_prefix("--url=") {
                message.url = Some(url.to_string());
            }
        }

        message.args = args;
        message
    }
}

/// Outcome of [`InstanceLock::acquire`].
#[derive(Debug)]
pub enum InstanceLock {
    /// This process owns the lock and must serve later launches.
    Primary(PrimaryInstance),
    /// Another process owns the lock and has received our message.
    Secondary,
}

impl InstanceLock {
    /// Become the primary instance, or hand `message` to the existing one.
    pub fn acquire(dir: &Path, message: &SecondInstanceMessage) -> Result<Self, InstanceError> {
        let lock_path = dir.join(LOCK_FILE_NAME);

        if try_hand_off(&lock_path, message) {
            return Ok(InstanceLock::Secondary);
        }
        if let Err(source) = fs::remove_file(&lock_path)
            && source.kind() != io::ErrorKind::NotFound
        {
            return Err(InstanceError::LockFile {
                path: lock_path,
                source,
            });
        }

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        let port = listener.local_addr()?.port();

        fs::create_dir_all(dir).map_err(|source| InstanceError::LockFile {
            path: dir.to_path_buf(),
            source,
        })?;
        let written = match OpenOptions::new().write(true).create_new(true).open(&lock_path) {
            Ok(mut file) => file.write_all(port.to_string().as_bytes()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                // Another launch created the lock between our check and now
                if try_hand_off(&lock_path, message) {
                    return Ok(InstanceLock::Secondary);
                }
                log::warn!("Instance lock was recreated but does not answer, overwriting");
                fs::write(&lock_path, port.to_string())
            }
            Err(e) => Err(e),
        };
        written.map_err(|source| InstanceError::LockFile {
            path: lock_path.clone(),
            source,
        })?;
        log::info!("Primary instance listening on port {}", port);

        Ok(InstanceLock::Primary(PrimaryInstance {
            listener,
            lock_path,
            port,
        }))
    }
}

/// The listening side held by the primary instance. Dropping it releases
/// the lock file.
#[derive(Debug)]
pub struct PrimaryInstance {
    listener: TcpListener,
    lock_path: PathBuf,
    port: u16,
}

impl PrimaryInstance {
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Accept hand-offs on `runtime`, calling `on_message` for each one.
    ///
    /// Connections are handled one at a time; each must deliver its line
    /// within a couple of seconds.
    pub fn serve<F>(&self, runtime: &Runtime, mut on_message: F) -> Result<(), InstanceError>
    where
        F: FnMut(SecondInstanceMessage) + Send + 'static,
    {
        let listener = self.listener.try_clone()?;
        listener.set_nonblocking(true)?;

        runtime.spawn(async move {
            let listener = match tokio::net::TcpListener::from_std(listener) {
                Ok(listener) => listener,
                Err(e) => {
                    log::error!("Failed to start second-instance listener: {}", e);
                    return;
                }
            };

            loop {
                let (stream, peer) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        log::warn!("Second-instance accept failed: {}", e);
                        continue;
                    }
                };
                match tokio::time::timeout(READ_TIMEOUT, read_message(stream)).await {
                    Ok(Ok(Some(message))) => on_message(message),
                    Ok(Ok(None)) => log::debug!("Empty second-instance connection from {}", peer),
                    Ok(Err(e)) => log::warn!("Bad second-instance message from {}: {}", peer, e),
                    Err(_) => log::warn!("Second-instance connection from {} timed out", peer),
                }
            }
        });
        Ok(())
    }
}

impl Drop for PrimaryInstance {
    fn drop(&mut self) {
        // Leave the file alone if another primary has since taken it over
        if read_port(&self.lock_path) == Some(self.port)
            && let Err(e) = fs::remove_file(&self.lock_path)
        {
            log::warn!("Failed to remove instance lock {:?}: {}", self.lock_path, e);
        }
    }
}

fn read_port(lock_path: &Path) -> Option<u16> {
    fs::read_to_string(lock_path).ok()?.trim().parse().ok()
}

/// Hand `message` to the instance recorded in `lock_path`, if it answers.
fn try_hand_off(lock_path: &Path, message: &SecondInstanceMessage) -> bool {
    let Some(port) = read_port(lock_path) else {
        return false;
    };
    match hand_off(port, message) {
        Ok(()) => {
            log::info!("Handed launch over to primary instance on port {}", port);
            true
        }
        Err(e) => {
            log::info!("Stale instance lock (port {}): {}", port, e);
            false
        }
    }
}

fn hand_off(port: u16, message: &SecondInstanceMessage) -> Result<(), InstanceError> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let mut stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    stream.write_all(line.as_bytes())?;
    stream.flush()?;

    let mut reply = String::new();
    io::BufReader::new(stream).read_line(&mut reply)?;
    match serde_json::from_str::<HandOffAck>(reply.trim()) {
        Ok(HandOffAck { ok: true }) => Ok(()),
        _ => Err(InstanceError::Unacknowledged(port)),
    }
}

async fn read_message(
    stream: tokio::net::TcpStream,
) -> Result<Option<SecondInstanceMessage>, InstanceError> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let message = serde_json::from_str(line)?;

    let mut ack = serde_json::to_string(&HandOffAck { ok: true })?;
    ack.push('\n');
    let stream = reader.get_mut();
    stream.write_all(ack.as_bytes()).await?;
    stream.flush().await?;
    Ok(Some(message))
}
