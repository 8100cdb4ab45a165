//! Datagram transports.
//!
//! [`Transport`] is the seam between the session's retry logic and the
//! network. [`UdpTransport`] is the real implementation; tests substitute
//! doubles that script replies or inject faults.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{ClientError, ClientResult};

/// One request/one reply datagram channel to a single peer.
pub trait Transport {
    /// Send one datagram to the peer.
    fn send(&mut self, payload: &[u8]) -> io::Result<()>;

    /// Block until one datagram arrives or the receive timeout expires.
    ///
    /// Returns the number of bytes written to `buf`. Datagrams larger than
    /// `buf` are truncated. A timeout is reported as an error for which
    /// [`is_timeout`] returns true.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Check whether an I/O error is a receive timeout.
///
/// Unix reports an expired socket timeout as `WouldBlock`, Windows as `TimedOut`.
pub fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// UDP socket bound to an ephemeral local port, sending to a fixed target.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpTransport {
    /// Resolve the target and open a socket with the configured read timeout.
    pub fn open(config: &SessionConfig) -> ClientResult<Self> {
        let target_name = format!("{}:{}", config.host, config.port);
        let transport_error = |context: &str, source: io::Error| ClientError::Transport {
            context: format!("{context} {target_name}"),
            source,
        };

        let target = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|e| transport_error("resolve", e))?
            .next()
            .ok_or_else(|| {
                transport_error(
                    "resolve",
                    io::Error::new(io::ErrorKind::NotFound, "no address found"),
                )
            })?;

        let local = if target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(local).map_err(|e| transport_error("bind for", e))?;
        socket
            .set_read_timeout(Some(config.timeout))
            .map_err(|e| transport_error("configure timeout for", e))?;

        debug!(peer = %target, timeout = ?config.timeout, "UDP socket opened");
        Ok(UdpTransport { socket, target })
    }

    /// Get the resolved controller address.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Get the local address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, payload: &[u8]) -> io::Result<()> {
        self.socket.send_to(payload, self.target).map(|_| ())
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.socket.recv_from(buf).map(|(len, _)| len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_is_timeout() {
        assert!(is_timeout(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_timeout(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_timeout(&io::Error::from(io::ErrorKind::ConnectionRefused)));
    }

    #[test]
    fn test_open_resolves_target() {
        let transport = UdpTransport::open(&SessionConfig::new("127.0.0.1", 10000)).unwrap();
        assert_eq!(transport.target(), "127.0.0.1:10000".parse().unwrap());
        assert!(transport.local_addr().unwrap().port() != 0);
    }

    #[test]
    fn test_recv_times_out() {
        let config = SessionConfig::new("127.0.0.1", 9).with_timeout(Duration::from_millis(20));
        let mut transport = UdpTransport::open(&config).unwrap();
        let mut buf = [0u8; 16];
        let err = transport.recv(&mut buf).unwrap_err();
        assert!(is_timeout(&err));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = SessionConfig::new("127.0.0.1", 10000).with_timeout(Duration::ZERO);
        let err = UdpTransport::open(&config).unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }
}
