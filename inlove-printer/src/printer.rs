//! Printer adapters for sending label data
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Device files (USB printers exposed as `/dev/usb/lp0` and similar)

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;

    /// Send the same job `copies` times
    async fn print_copies(&self, data: &[u8], copies: u32) -> PrintResult<()> {
        if copies == 0 {
            return Err(PrintError::InvalidConfig("copies must be > 0".to_string()));
        }
        for _ in 0..copies {
            self.print(data).await?;
        }
        Ok(())
    }
}

/// Network printer (raw TCP)
///
/// Most thermal label printers accept raw jobs on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        Self::from_addr(&format!("{}:{}", host, port))
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    ///
    /// A bare IP uses [`DEFAULT_PORT`].
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let parsed: SocketAddr = match addr.parse() {
            Ok(a) => a,
            Err(_) => format!("{}:{}", addr, DEFAULT_PORT)
                .parse()
                .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?,
        };

        Ok(Self {
            addr: parsed,
            timeout: Duration::from_secs(5),
        })
    }

    /// Like [`from_addr`](Self::from_addr), but also accepts host names
    /// (e.g., "etiquetas.local:9100"), resolved through the system resolver
    pub async fn lookup(addr: &str) -> PrintResult<Self> {
        if let Ok(printer) = Self::from_addr(addr) {
            return Ok(printer);
        }

        let has_port = addr
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        let target = if has_port {
            addr.to_string()
        } else {
            format!("{}:{}", addr, DEFAULT_PORT)
        };

        let resolved = tokio::net::lookup_host(&target)
            .await
            .map_err(|e| PrintError::InvalidConfig(format!("Cannot resolve {}: {}", addr, e)))?
            .next()
            .ok_or_else(|| PrintError::InvalidConfig(format!("No address for {}", addr)))?;
        info!(host = %addr, addr = %resolved, "Printer host resolved");

        Ok(Self {
            addr: resolved,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        stream.write_all(data).await?;
        stream.flush().await?;

        info!("Label job sent");
        Ok(())
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

/// Printer exposed as a device file
#[derive(Debug, Clone)]
pub struct DevicePrinter {
    path: PathBuf,
}

impl DevicePrinter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Printer for DevicePrinter {
    #[instrument(skip(data), fields(path = %self.path.display(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn is_online(&self) -> bool {
        tokio::fs::metadata(&self.path).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_from_addr() {
        let p = NetworkPrinter::from_addr("192.168.1.100:9101").unwrap();
        assert_eq!(p.addr().port(), 9101);

        let p = NetworkPrinter::from_addr("192.168.1.100").unwrap();
        assert_eq!(p.addr().port(), DEFAULT_PORT);

        assert!(matches!(
            NetworkPrinter::from_addr("not an address"),
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_host_name() {
        let p = NetworkPrinter::lookup("localhost:9101").await.unwrap();
        assert_eq!(p.addr().port(), 9101);
        assert!(p.addr().ip().is_loopback());

        let p = NetworkPrinter::lookup("localhost").await.unwrap();
        assert_eq!(p.addr().port(), DEFAULT_PORT);

        let p = NetworkPrinter::lookup("10.0.0.7").await.unwrap();
        assert_eq!(p.addr().to_string(), "10.0.0.7:9100");

        assert!(matches!(
            NetworkPrinter::lookup("no such printer").await,
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_network_print_sends_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let printer = NetworkPrinter::from_addr(&addr.to_string()).unwrap();
        printer.print(b"\x1B@label").await.unwrap();

        assert_eq!(server.await.unwrap(), b"\x1B@label".to_vec());
    }

    #[tokio::test]
    async fn test_print_copies_rejects_zero() {
        let printer = NetworkPrinter::from_addr("127.0.0.1:9").unwrap();
        assert!(matches!(
            printer.print_copies(b"x", 0).await,
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_device_printer_appends() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let printer = DevicePrinter::new(file.path());
        assert!(printer.is_online().await);

        printer.print_copies(b"ab", 2).await.unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), b"abab".to_vec());
    }
}
