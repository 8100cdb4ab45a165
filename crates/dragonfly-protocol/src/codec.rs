//! Datagram framing for the Dragonfly protocol.
//!
//! Framing is minimal: a command is its ASCII text followed by `#`, sent as a
//! single datagram. A reply is a single datagram of at most
//! [`MAX_DATAGRAM_SIZE`] bytes which is decoded as text and trimmed.

/// Terminator appended to every command.
pub const COMMAND_TERMINATOR: char = '#';

/// Largest reply the client will read. Longer datagrams are truncated.
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Separator between fields of a reply.
pub const FIELD_SEPARATOR: char = ',';

/// Separator between a field label and its value (e.g. `ch:Door`).
pub const NAME_SEPARATOR: char = ':';

/// Append the terminator to a command body.
pub fn terminate(body: &str) -> String {
    let mut text = String::with_capacity(body.len() + 1);
    text.push_str(body);
    text.push(COMMAND_TERMINATOR);
    text
}

/// Encode command text for transmission.
///
/// The text is sent as-is; callers pass the full command including its terminator.
pub fn encode_command(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decode a received datagram into reply text.
///
/// Invalid UTF-8 is replaced rather than rejected, and surrounding whitespace
/// is stripped. An empty result means the device sent no data.
pub fn decode_reply(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim().to_string()
}

/// Join a data reply and a status token into one composite record.
pub fn compose_record(data: &str, status: &str) -> String {
    let mut record = String::with_capacity(data.len() + status.len() + 1);
    record.push_str(data);
    record.push(FIELD_SEPARATOR);
    record.push_str(status);
    record
}
