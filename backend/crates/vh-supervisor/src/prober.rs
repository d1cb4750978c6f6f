//! Readiness probing for the game server's UDP port.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

const UDP_SOCKET_TABLES: [&str; 2] = ["/proc/net/udp", "/proc/net/udp6"];
/// `st` column value of an unconnected (bound, listening) UDP socket
const UDP_UNCONNECTED_STATE: &str = "07";

/// Answers "is something bound to this port" with a single, bounded check.
///
/// The supervisor owns the retry loop and the overall deadline.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, port: u16) -> bool;
}

/// Looks for a bound UDP socket in the kernel socket tables.
///
/// Reads `/proc/net/udp{,6}`; where those do not exist, falls back to
/// `ss -lnu`.
pub struct UdpPortProber {
    timeout: Duration,
}

impl UdpPortProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn check(&self, port: u16) -> io::Result<bool> {
        let mut read_any_table = false;

        for table in UDP_SOCKET_TABLES {
            match tokio::fs::read_to_string(table).await {
                Ok(contents) => {
                    read_any_table = true;
                    if socket_table_has_port(&contents, port) {
                        return Ok(true);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }

        if read_any_table {
            return Ok(false);
        }

        let output = Command::new("ss")
            .arg("-lnu")
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(ss_output_has_port(
            &String::from_utf8_lossy(&output.stdout),
            port,
        ))
    }
}

#[async_trait]
impl Prober for UdpPortProber {
    async fn probe(&self, port: u16) -> bool {
        match tokio::time::timeout(self.timeout, self.check(port)).await {
            Ok(Ok(listening)) => listening,
            Ok(Err(e)) => {
                debug!("Probe of UDP port {port} failed: {e}");
                false
            }
            Err(_) => {
                debug!(
                    "Probe of UDP port {port} timed out after {}ms",
                    self.timeout.as_millis()
                );
                false
            }
        }
    }
}

/// Scan a `/proc/net/udp`-format table for an unconnected socket bound to `port`.
pub fn socket_table_has_port(contents: &str, port: u16) -> bool {
    contents.lines().skip(1).any(|line| {
        let mut columns = line.split_whitespace();
        let local_address = columns.nth(1);
        let state = columns.nth(1);

        match (local_address, state) {
            (Some(local), Some(state)) if state == UDP_UNCONNECTED_STATE => local
                .rsplit_once(':')
                .and_then(|(_, hex)| u16::from_str_radix(hex, 16).ok())
                .is_some_and(|bound| bound == port),
            _ => false,
        }
    })
}

/// Scan `ss -lnu` output for a local address ending in `:port`.
pub fn ss_output_has_port(output: &str, port: u16) -> bool {
    output.lines().skip(1).any(|line| {
        line.split_whitespace()
            .nth(3)
            .and_then(|local| local.rsplit_once(':'))
            .and_then(|(_, bound)| bound.parse::<u16>().ok())
            .is_some_and(|bound| bound == port)
    })
}
