//! # libfiap - IEEE1888 upload client
//!
//! A client library for pushing timestamped sensor readings to an IEEE1888
//! (FIAP) storage server over the SOAP/XML `dataRQ` request. It is written
//! for severely memory-constrained devices and supports `no_std`
//! environments: the request is never assembled in RAM. Instead the exact
//! content length is computed up front and the message is streamed to the
//! transport fragment by fragment.
//!
//! ## Features
//!
//! - **Streaming upload**: HTTP header and SOAP body are written
//!   incrementally from immutable literal fragments and caller-supplied
//!   field values, with peak RAM usage independent of the batch size
//! - **Exact length estimation**: `Content-Length` is computed before any
//!   byte is sent, byte-for-byte equal to what the serializer emits
//! - **Transport agnostic**: generic over a small trait set; any TCP stack
//!   that can connect, read, write, and report availability will do
//! - **Bounded response wait**: a configurable poll budget prevents hangs on
//!   servers that accept the request but never reply
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libfiap = "0.1.0"
//! ```
//!
//! ### Posting readings
//!
//! ```rust,no_run
//! use libfiap::time::FixedOffset;
//! use libfiap::upload::client::{Client, DataPoint, Target};
//! # use libfiap::network::{Close, Connect, Connection, Read, Status, Write};
//! # struct MockConnection;
//! # impl Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Status for MockConnection {
//! #     fn available(&mut self) -> bool { false }
//! #     fn connected(&mut self) -> bool { false }
//! # }
//! # impl Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Connection for MockConnection {}
//! # struct MockNetwork;
//! # impl Connect for MockNetwork {
//! #     type Connection = MockConnection;
//! #     type Error = ();
//! #     fn connect(&mut self, _host: &str, _port: u16) -> Result<Self::Connection, Self::Error> {
//! #         Ok(MockConnection)
//! #     }
//! # }
//!
//! let target = Target {
//!     host: "fiap.example.org",
//!     path: "/axis2/services/FIAPStorage",
//!     port: 80,
//!     id_prefix: "http://example.org/house/",
//! };
//! let mut client = Client::new(MockNetwork, target, FixedOffset::new(9, 0));
//!
//! let points = [
//!     DataPoint { suffix: "temperature", value: "23.5", time: 1_314_322_080 },
//!     DataPoint { suffix: "humidity", value: "61", time: 1_314_322_080 },
//! ];
//!
//! // client.post(&points)?;
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, AVR, etc.)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Transport abstraction layer the upload client is generic over.
///
/// Contains the byte-stream connection traits (read, write, availability,
/// close) plus the connector trait used to open one connection per upload.
pub mod network;

/// Calendar time handling for timestamp attributes.
///
/// Converts absolute instants into local calendar fields and renders them in
/// the fixed-width form the wire format requires.
pub mod time;

/// The IEEE1888 (FIAP) data upload implementation.
///
/// Length estimation, request streaming, and response classification for the
/// `dataRQ` write request.
pub mod upload;
