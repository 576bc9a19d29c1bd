#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

//! The _dhcpv6-wire_ library is a standalone codec for the option area of
//! DHCPv6 messages, designed for bare-metal, real-time systems that
//! provide an allocator, as well as for hosted network stacks.
//!
//! # Table of contents
//!
//! This crate is split into two parts:
//!
//! * the [wire](wire/index.html) module, which decodes option buffers into
//!   typed representations and emits them back, bit-exact;
//! * the [time](time/index.html) module, which provides the calendar time
//!   type used by link-layer-plus-time identifiers.
//!
//! # The wire layers
//!
//! The option area is a sequence of TLV records: a 16-bit type code, a 16-bit
//! length, and exactly that many octets of body. Every record is decoded into
//! a variant of [wire::Dhcpv6Repr]; records whose type code is not known to
//! this crate are kept verbatim as opaque options, so that a buffer that
//! decodes successfully always re-encodes to the very same octets.
//!
//! ```rust
//! use dhcpv6_wire::wire::{emit_options, parse_options, Dhcpv6Repr};
//!
//! let bytes = [
//!     0x00, 0x01, 0x00, 0x0e, 0x00, 0x01, 0x00, 0x01, 0x1d, 0xcd, 0x65, 0x00,
//!     0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
//! ];
//! let options = parse_options(&bytes).unwrap();
//! assert!(matches!(options[0], Dhcpv6Repr::ClientId(_)));
//! assert_eq!(
//!     options[0].to_string(),
//!     "client-ID hwaddr/time type 1 time 500000000 aa:bb:cc:dd:ee:ff"
//! );
//! assert_eq!(emit_options(&options).unwrap(), bytes);
//! ```
//!
//! # Minimum Supported Rust Version (MSRV)
//!
//! This crate is guaranteed to compile on stable Rust 1.77 and up with any valid set of features.

extern crate alloc;

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("You must enable at most one of the following features: defmt, log");

#[macro_use]
mod macros;

pub mod time;
pub mod wire;
