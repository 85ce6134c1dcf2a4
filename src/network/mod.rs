//! A transport abstraction layer for embedded systems
//!
//! This module defines the capability set the upload client needs from a
//! byte-stream transport: connect, ordered write, read, a non-blocking
//! availability query, a liveness query, and close. The client is fully
//! generic over these traits and never names a concrete TCP stack; anything
//! from a `std::net::TcpStream` wrapper to a W5500 driver can implement
//! them.

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for transport implementations
pub mod error;

/// Re-exports of the transport traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Status, Write};
}

pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Non-blocking inspection of a connection's receive side.
pub trait Status {
    /// Whether at least one received byte is waiting to be read
    fn available(&mut self) -> bool;
    /// Whether the remote end is still connected
    fn connected(&mut self) -> bool;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous byte-stream connection
pub trait Connection: Read + Write + Status + Close {}

/// A synchronous connector (client side of a transport)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `host:port`
    fn connect(&mut self, host: &str, port: u16) -> Result<Self::Connection, Self::Error>;
}
