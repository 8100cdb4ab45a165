//! Command/response sessions.
//!
//! A session sends one command at a time and waits for its reply. UDP gives
//! no delivery guarantee, so a command whose reply does not arrive within the
//! timeout is sent again, up to [`MAX_ATTEMPTS`] datagrams in total. Other
//! socket errors fail the command immediately.

use std::io;

use dragonfly_protocol::{decode_reply, encode_command, Command, MAX_DATAGRAM_SIZE};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{is_timeout, Transport, UdpTransport};

/// Number of times a command is sent before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

/// A scoped connection to one controller.
///
/// The transport is acquired when the session is created and released by
/// [`close`](Session::close) or on drop, whichever happens first. Commands
/// sent after that fail with [`ClientError::NotConnected`].
#[derive(Debug)]
pub struct Session<T: Transport = UdpTransport> {
    transport: Option<T>,
}

impl Session<UdpTransport> {
    /// Open a UDP session to the configured controller.
    pub fn open(config: &SessionConfig) -> ClientResult<Self> {
        let transport = UdpTransport::open(config)?;
        debug!(peer = %transport.target(), "session opened");
        Ok(Session::with_transport(transport))
    }
}

impl<T: Transport> Session<T> {
    /// Create a session over an already opened transport.
    pub fn with_transport(transport: T) -> Self {
        Session {
            transport: Some(transport),
        }
    }

    /// Check whether the session can still send commands.
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a command and return its trimmed reply.
    pub fn send(&mut self, command: &Command) -> ClientResult<String> {
        self.send_command(&command.to_command_string())
    }

    /// Send command text as-is and return the trimmed reply.
    ///
    /// The reply may be empty. On timeout the full send-and-wait is repeated;
    /// after [`MAX_ATTEMPTS`] timeouts the call fails with
    /// [`ClientError::Timeout`] naming `command`.
    pub fn send_command(&mut self, command: &str) -> ClientResult<String> {
        let transport = self.transport.as_mut().ok_or(ClientError::NotConnected)?;
        let payload = encode_command(command);
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];

        for attempt in 1..=MAX_ATTEMPTS {
            debug!(command, attempt, "sending command");
            match exchange(transport, &payload, &mut buf) {
                Ok(len) => {
                    let reply = decode_reply(&buf[..len]);
                    debug!(command, bytes = len, reply = %reply, "reply received");
                    return Ok(reply);
                }
                Err(err) if is_timeout(&err) => {
                    warn!(
                        command,
                        attempt,
                        max_attempts = MAX_ATTEMPTS,
                        "no reply before timeout"
                    );
                }
                Err(source) => {
                    return Err(ClientError::Transport {
                        context: command.to_string(),
                        source,
                    });
                }
            }
        }

        Err(ClientError::Timeout {
            command: command.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Release the transport. Calling this more than once has no further effect.
    pub fn close(&mut self) {
        if let Some(transport) = self.transport.take() {
            drop(transport);
            debug!("session closed");
        }
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// One physical round trip.
fn exchange<T: Transport>(transport: &mut T, payload: &[u8], buf: &mut [u8]) -> io::Result<usize> {
    transport.send(payload)?;
    transport.recv(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Transport double that plays back scripted receive results.
    struct ScriptedTransport {
        replies: VecDeque<io::Result<Vec<u8>>>,
        sent: Rc<RefCell<Vec<String>>>,
        drops: Rc<Cell<u32>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<io::Result<Vec<u8>>>) -> Self {
            ScriptedTransport {
                replies: replies.into(),
                sent: Rc::new(RefCell::new(Vec::new())),
                drops: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&mut self, payload: &[u8]) -> io::Result<()> {
            self.sent
                .borrow_mut()
                .push(String::from_utf8_lossy(payload).to_string());
            Ok(())
        }

        fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.replies.pop_front() {
                Some(Ok(data)) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                Some(Err(err)) => Err(err),
                None => Err(io::ErrorKind::WouldBlock.into()),
            }
        }
    }

    impl Drop for ScriptedTransport {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn timeout() -> io::Result<Vec<u8>> {
        Err(io::ErrorKind::WouldBlock.into())
    }

    #[test]
    fn test_send_returns_trimmed_reply() {
        let transport = ScriptedTransport::new(vec![Ok(b" !relio rldgrd 0 1 1#\r\n".to_vec())]);
        let sent = transport.sent.clone();
        let mut session = Session::with_transport(transport);

        let reply = session.send(&Command::RelayStatus { relay: 1 }).unwrap();
        assert_eq!(reply, "!relio rldgrd 0 1 1#");
        assert_eq!(*sent.borrow(), vec!["!relio rldgrd 0 1#".to_string()]);
    }

    #[test]
    fn test_empty_reply_is_not_an_error() {
        let mut session = Session::with_transport(ScriptedTransport::new(vec![Ok(Vec::new())]));
        assert_eq!(session.send_command("!seletek version#").unwrap(), "");
    }

    #[test]
    fn test_timeout_after_three_attempts() {
        let transport = ScriptedTransport::new(vec![
            timeout(),
            timeout(),
            timeout(),
            Ok(b"late".to_vec()),
        ]);
        let sent = transport.sent.clone();
        let mut session = Session::with_transport(transport);

        let err = session.send(&Command::Version).unwrap_err();
        match err {
            ClientError::Timeout { command, attempts } => {
                assert_eq!(command, "!seletek version#");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(sent.borrow().len(), 3);
        assert!(sent.borrow().iter().all(|c| c == "!seletek version#"));
    }

    #[test]
    fn test_timeout_message_names_command() {
        let mut session = Session::with_transport(ScriptedTransport::new(Vec::new()));
        let err = session.send_command("!seletek version#").unwrap_err();
        assert_eq!(
            err.to_string(),
            "command '!seletek version#' timed out after 3 attempts"
        );
    }

    #[test]
    fn test_reply_after_retry() {
        let transport = ScriptedTransport::new(vec![
            timeout(),
            Err(io::ErrorKind::TimedOut.into()),
            Ok(b"ok#".to_vec()),
        ]);
        let sent = transport.sent.clone();
        let mut session = Session::with_transport(transport);

        assert_eq!(session.send_command("!relio rlchg 2 0 1#").unwrap(), "ok#");
        assert_eq!(sent.borrow().len(), 3);
    }

    #[test]
    fn test_transport_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![
            Err(io::ErrorKind::ConnectionRefused.into()),
            Ok(b"never read".to_vec()),
        ]);
        let sent = transport.sent.clone();
        let mut session = Session::with_transport(transport);

        let err = session.send_command("!relio getreldata 0#").unwrap_err();
        match err {
            ClientError::Transport { context, source } => {
                assert_eq!(context, "!relio getreldata 0#");
                assert_eq!(source.kind(), io::ErrorKind::ConnectionRefused);
            }
            other => panic!("expected transport error, got {:?}", other),
        }
        assert_eq!(sent.borrow().len(), 1);
    }

    #[test]
    fn test_oversized_reply_is_truncated() {
        let big = vec![b'x'; MAX_DATAGRAM_SIZE + 100];
        let mut session = Session::with_transport(ScriptedTransport::new(vec![Ok(big)]));
        let reply = session.send_command("!relio getsendata 0#").unwrap();
        assert_eq!(reply.len(), MAX_DATAGRAM_SIZE);
    }

    #[test]
    fn test_send_after_close_is_not_connected() {
        let mut session = Session::with_transport(ScriptedTransport::new(vec![Ok(b"x".to_vec())]));
        session.close();
        assert!(!session.is_open());
        assert!(matches!(
            session.send(&Command::Version),
            Err(ClientError::NotConnected)
        ));
    }

    #[test]
    fn test_close_releases_once() {
        let transport = ScriptedTransport::new(Vec::new());
        let drops = transport.drops.clone();
        let mut session = Session::with_transport(transport);
        assert!(session.is_open());

        session.close();
        assert_eq!(drops.get(), 1);
        session.close();
        drop(session);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_drop_releases_once() {
        let transport = ScriptedTransport::new(vec![timeout(), timeout(), timeout()]);
        let drops = transport.drops.clone();
        {
            let mut session = Session::with_transport(transport);
            assert!(session.send(&Command::Version).is_err());
            assert_eq!(drops.get(), 0);
        }
        assert_eq!(drops.get(), 1);
    }
}
