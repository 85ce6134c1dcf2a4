//! The FIAP upload client
//!
//! One [`Client::post`] call is one blocking request/response cycle: open a
//! connection, stream the request, scan the status line, drain, close. The
//! request is written field by field through a `core::fmt::Write` adapter
//! over the transport, so no part of it is ever staged in a buffer.

use core::fmt;

use super::error::Error;
use super::wire::{self, Fragment};
use crate::network::{Close, Connect, Connection, Read, Status};
use crate::time::Calendar;

/// Default number of empty availability polls tolerated while waiting for
/// the response status line.
pub const DEFAULT_RESPONSE_BUDGET: u32 = 500_000;

/// Where uploads go: server coordinates plus the identifier prefix shared by
/// every point.
///
/// Set once at client construction and immutable for the client's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    /// Server host name or address, also sent in the `Host` header
    pub host: &'a str,
    /// URL path of the FIAP storage endpoint
    pub path: &'a str,
    /// Server TCP port
    pub port: u16,
    /// Prefix prepended to every point's `suffix` to form its identifier
    pub id_prefix: &'a str,
}

/// One timestamped reading.
///
/// The full point identifier is the target's prefix followed by `suffix`;
/// the pair must form a valid FIAP point id, which is not validated here.
/// `value` is inserted into the XML verbatim — the caller formats it and
/// must not include characters that need XML escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPoint<'a> {
    /// Identifier fragment appended to the configured prefix
    pub suffix: &'a str,
    /// Measurement value, already rendered as text
    pub value: &'a str,
    /// Absolute instant of the reading, in seconds since the Unix epoch
    pub time: i64,
}

/// Scans the response status line one byte at a time.
///
/// The status code sits strictly between the first and second space of
/// `HTTP/1.1 NNN ...`. The second space or any newline completes the scan;
/// nothing past the status line is ever inspected.
#[derive(Debug)]
struct StatusScanner {
    spaces: u8,
    code: u16,
    complete: bool,
}

impl StatusScanner {
    fn new() -> Self {
        Self {
            spaces: 0,
            code: 0,
            complete: false,
        }
    }

    /// Feeds one byte, returning true once the status code is classified.
    fn feed(&mut self, byte: u8) -> bool {
        if self.complete {
            return true;
        }
        if self.spaces == 1 && byte.is_ascii_digit() {
            // A malformed line can carry arbitrarily many digits; stop
            // accumulating before the counter can overflow
            if self.code <= 999 {
                self.code = self.code * 10 + u16::from(byte - b'0');
            }
            return false;
        }
        if byte == b' ' {
            self.spaces += 1;
        }
        if self.spaces >= 2 || byte == b'\n' {
            self.complete = true;
        }
        self.complete
    }
}

/// Adapts a transport connection to `core::fmt::Write` so literals and
/// formatted fields stream straight to the socket. Short writes are
/// continued; a zero-length write or transport error surfaces as
/// `fmt::Error`.
struct TransportWriter<'c, C: Connection> {
    conn: &'c mut C,
}

impl<C: Connection> fmt::Write for TransportWriter<'_, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s.as_bytes();
        while !rest.is_empty() {
            match self.conn.write(rest) {
                Ok(0) | Err(_) => return Err(fmt::Error),
                Ok(n) => rest = &rest[n..],
            }
        }
        Ok(())
    }
}

/// An IEEE1888 upload client.
///
/// Generic over the transport connector and the calendar collaborator. Each
/// [`post`](Client::post) opens one connection, owns it exclusively for the
/// duration of the call, and closes it on every exit path. Single-threaded
/// use is assumed; nothing here locks.
pub struct Client<'a, N: Connect, Z: Calendar> {
    network: N,
    target: Target<'a>,
    calendar: Z,
    response_budget: u32,
}

impl<N: Connect, Z: Calendar> fmt::Debug for Client<'_, N, Z> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("target", &self.target)
            .field("response_budget", &self.response_budget)
            .finish_non_exhaustive()
    }
}

impl<'a, N: Connect, Z: Calendar> Client<'a, N, Z> {
    /// Creates a client for `target` with [`DEFAULT_RESPONSE_BUDGET`].
    pub fn new(network: N, target: Target<'a>, calendar: Z) -> Self {
        Self {
            network,
            target,
            calendar,
            response_budget: DEFAULT_RESPONSE_BUDGET,
        }
    }

    /// Sets how many empty availability polls are tolerated while waiting
    /// for the status line before the call gives up with
    /// [`Error::ResponseTimeout`].
    pub fn set_response_budget(&mut self, polls: u32) {
        self.response_budget = polls;
    }

    /// Uploads `points` in one blocking request/response cycle.
    ///
    /// Returns `Ok(())` only for a 200 status. On a connect failure nothing
    /// is ever written; on every other path the request has been streamed
    /// and the response drained as far as the server allowed. The connection
    /// is closed before returning, whatever the outcome.
    pub fn post(&mut self, points: &[DataPoint<'_>]) -> Result<(), Error> {
        let mut conn = self
            .network
            .connect(self.target.host, self.target.port)
            .map_err(|_| Error::ConnectionFailed)?;

        let result = self.exchange(&mut conn, points);

        // Discard whatever the server sent past the status line, then
        // release the connection on every path.
        let mut byte = [0u8; 1];
        while conn.connected() && conn.available() {
            if matches!(conn.read(&mut byte), Ok(0) | Err(_)) {
                break;
            }
        }
        let _ = conn.close();
        result
    }

    fn exchange<C: Connection>(
        &self,
        conn: &mut C,
        points: &[DataPoint<'_>],
    ) -> Result<(), Error> {
        let content_length =
            wire::body_length(self.target.id_prefix, self.calendar.utc_offset(), points);
        {
            let mut out = TransportWriter { conn };
            write_header(&mut out, &self.target, content_length)
                .and_then(|()| {
                    wire::write_body(&mut out, self.target.id_prefix, &self.calendar, points)
                })
                .map_err(|_| Error::ConnectionFailed)?;
        }
        conn.flush().map_err(|_| Error::ConnectionFailed)?;
        self.read_status(conn)
    }

    fn read_status<C: Connection>(&self, conn: &mut C) -> Result<(), Error> {
        let mut scanner = StatusScanner::new();
        let mut idle_polls: u32 = 0;
        let mut byte = [0u8; 1];
        while conn.connected() {
            if conn.available() {
                match conn.read(&mut byte) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if scanner.feed(byte[0]) {
                            break;
                        }
                    }
                }
            } else {
                idle_polls += 1;
                if idle_polls >= self.response_budget {
                    return Err(Error::ResponseTimeout);
                }
            }
        }
        if !scanner.complete {
            // Disconnected mid status line
            return Err(Error::HttpError);
        }
        if scanner.code == 200 {
            Ok(())
        } else {
            Err(Error::HttpError)
        }
    }
}

/// Writes the request line and header block, ending with the blank line that
/// separates it from the body.
fn write_header<W: fmt::Write>(
    out: &mut W,
    target: &Target<'_>,
    content_length: usize,
) -> fmt::Result {
    out.write_str(Fragment::RequestPrefix.as_str())?;
    out.write_str(target.path)?;
    out.write_str(Fragment::RequestSuffix.as_str())?;
    out.write_str(Fragment::ContentType.as_str())?;
    out.write_str(Fragment::UserAgent.as_str())?;
    out.write_str(Fragment::HostPrefix.as_str())?;
    out.write_str(target.host)?;
    out.write_str(Fragment::Crlf.as_str())?;
    out.write_str(Fragment::SoapAction.as_str())?;
    out.write_str(Fragment::ContentLengthPrefix.as_str())?;
    write!(out, "{content_length}")?;
    out.write_str(Fragment::HeaderEnd.as_str())
}
