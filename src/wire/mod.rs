/*! Low-level option area parsing and emission.

The `wire` module deals with the option area of DHCPv6 messages. It provides
two levels of functionality.

 * First, it provides functions to walk the option area as a sequence of raw
   TLV records and to emit raw records into a buffer, without looking at
   what the records carry. These are [Dhcpv6OptionIter] and
   [Dhcpv6OptionWriter].
 * Second, it provides a compact, high-level representation of every option
   this crate recognizes, and of the DHCP Unique Identifiers carried inside
   the client and server identifier options. These are [Dhcpv6Repr] and
   [Duid], together with [parse_options] and [emit_options], which convert
   whole option areas from and to owned representations.

An important part of this functionality is to be able to pass every option
area that was successfully decoded back to the wire unchanged: options with
a type code this crate does not recognize decode into
[Dhcpv6Repr::Opaque], which keeps the body verbatim.

The enclosing message header (message type and transaction ID) is not
handled here; callers slice the option area out of a message and pass it in.
*/

use core::fmt;

mod dhcpv6;
mod dhcpv6duid;
mod dhcpv6option;

pub use self::dhcpv6::{
    emit_options, iter_options, options_len, parse_options, Dhcpv6Option, Dhcpv6OptionIter,
    Dhcpv6OptionWriter, MessageType as Dhcpv6MessageType, OptionType as Dhcpv6OptionType,
    StatusCode as Dhcpv6StatusCode, MAX_ENCAPSULATION_DEPTH as DHCPV6_MAX_ENCAPSULATION_DEPTH,
};

pub use self::dhcpv6duid::{
    Duid, DuidType, DUID_EPOCH_UNIX_SECS, HARDWARE_TYPE_ETHERNET, MAX_DUID_LEN,
};

pub use self::dhcpv6option::{
    Authentication as Dhcpv6Authentication, IaAddress as Dhcpv6IaAddress, IaNa as Dhcpv6IaNa,
    IaTa as Dhcpv6IaTa, Repr as Dhcpv6Repr, StatusRepr as Dhcpv6StatusRepr,
    VendorClass as Dhcpv6VendorClass, VendorOpts as Dhcpv6VendorOpts,
    VendorSubOption as Dhcpv6VendorSubOption,
};

pub(crate) mod field {
    pub type Field = ::core::ops::Range<usize>;
    pub type Rest = ::core::ops::RangeFrom<usize>;
}

/// The reason a recognized option body could not be decoded or laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Malformed {
    /// The body is shorter, longer, or otherwise sized differently than
    /// its layout allows.
    Length,
    /// The DUID carried in the body failed to decode.
    Identifier,
    /// A field holds a value the layout cannot represent.
    Value,
    /// An encapsulated option failed to decode, or options are nested too deeply.
    Encapsulated,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Malformed::Length => write!(f, "bad length"),
            Malformed::Identifier => write!(f, "malformed identifier"),
            Malformed::Value => write!(f, "bad field value"),
            Malformed::Encapsulated => write!(f, "malformed encapsulated option"),
        }
    }
}

/// Parsing or emitting an option area failed.
///
/// Offsets are byte offsets of the offending option header within the buffer
/// handed to the decoder (or, when emitting, within the output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// Fewer than four octets remain, but the buffer is not exhausted.
    TruncatedHeader { offset: usize },
    /// The declared body length exceeds the octets remaining after the header.
    TruncatedBody {
        offset: usize,
        kind: dhcpv6::OptionType,
        len: usize,
        available: usize,
    },
    /// A DUID is shorter than its type requires, or longer than [MAX_DUID_LEN].
    MalformedIdentifier,
    /// The body of a recognized option violates its layout.
    MalformedOption {
        offset: usize,
        kind: dhcpv6::OptionType,
        reason: Malformed,
    },
    /// An option body exceeds what the 16-bit length field can express.
    OptionTooLarge {
        kind: dhcpv6::OptionType,
        len: usize,
    },
    /// The output buffer is too small for the options being emitted.
    Exhausted,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TruncatedHeader { offset } => {
                write!(f, "truncated option header at offset {offset}")
            }
            Error::TruncatedBody {
                offset,
                kind,
                len,
                available,
            } => write!(
                f,
                "truncated {kind} body at offset {offset}: length {len}, {available} available"
            ),
            Error::MalformedIdentifier => write!(f, "malformed DUID"),
            Error::MalformedOption {
                offset,
                kind,
                reason,
            } => write!(f, "malformed {kind} at offset {offset}: {reason}"),
            Error::OptionTooLarge { kind, len } => {
                write!(f, "{kind} body of {len} octets exceeds 65535")
            }
            Error::Exhausted => write!(f, "buffer space exhausted"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// Renders octets as colon-separated lowercase hex pairs, e.g. `aa:bb:cc`.
pub(crate) struct HexBytes<'a>(pub &'a [u8]);

impl<'a> fmt::Display for HexBytes<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, ":")?;
            }
            write!(f, "{octet:02x}")?;
        }
        Ok(())
    }
}
