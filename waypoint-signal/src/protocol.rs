//! The line-oriented signaling protocol.
//!
//! One command per transport message, UTF-8 text, `KEYWORD:<rest>`. The
//! payload after the colon is never interpreted; address identifiers and
//! negotiation payloads are opaque to the service. Parsing fails closed:
//! anything that is not exactly a known keyword followed by a colon is
//! ignored without a reply on the wire.

use std::fmt;

/// An inbound command from a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `HOSTING:<addr>` - declare intent to host at an address identifier.
    Hosting(String),
    /// `CONNECT:<addr>` - declare intent to join a host at an identifier.
    Connect(String),
    /// `POST_SDP:<payload>` - opaque negotiation payload to relay.
    PostSdp(String),
    /// `SUCCESS:` - the peer reports negotiation completed out-of-band.
    Success,
    /// `ECHO:<data>` - diagnostic loop-back.
    Echo(String),
}

impl Command {
    /// Parse one message into a command.
    ///
    /// Returns `None` for anything unrecognized or malformed; the caller
    /// drops such messages without a state change.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        let (keyword, rest) = line.split_once(':')?;

        match keyword {
            "HOSTING" => Some(Command::Hosting(rest.to_string())),
            "CONNECT" => Some(Command::Connect(rest.to_string())),
            "POST_SDP" => Some(Command::PostSdp(rest.to_string())),
            // Anything after the colon on SUCCESS is ignored.
            "SUCCESS" => Some(Command::Success),
            "ECHO" => Some(Command::Echo(rest.to_string())),
            _ => None,
        }
    }
}

/// An outbound frame from the service to a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// `GET_SDP:` - cue the host to produce and post its offer.
    GetSdp,
    /// `POST_SDP:<payload>` - a relayed negotiation payload, verbatim.
    PostSdp(String),
    /// `ECHO:<data>` - diagnostic loop-back reply.
    Echo(String),
}

impl Frame {
    /// Encode the frame for the wire.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::GetSdp => write!(f, "GET_SDP:"),
            Frame::PostSdp(payload) => write!(f, "POST_SDP:{}", payload),
            Frame::Echo(data) => write!(f, "ECHO:{}", data),
        }
    }
}
