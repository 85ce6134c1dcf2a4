//! Upload outcome codes

/// The failure modes of a single upload call.
///
/// This is a closed set; every `post` produces either `Ok(())` or exactly
/// one of these codes. Nothing is retried internally — retry policy, if any,
/// belongs to the caller. Name resolution failures are not distinguished
/// from other connect failures: the connector's error type is opaque to the
/// client, so they surface as [`Error::ConnectionFailed`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The transport failed to connect, or a socket I/O error interrupted
    /// the request.
    ConnectionFailed,
    /// The server answered with a status other than 200, or disconnected
    /// before a complete status line was received.
    HttpError,
    /// The response poll budget elapsed before any status line arrived.
    ResponseTimeout,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ConnectionFailed => defmt::write!(f, "ConnectionFailed"),
            Error::HttpError => defmt::write!(f, "HttpError"),
            Error::ResponseTimeout => defmt::write!(f, "ResponseTimeout"),
        }
    }
}
