// See https://datatracker.ietf.org/doc/html/rfc8415 for the DHCPv6 specification.

use alloc::vec::Vec;
use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;

use super::dhcpv6option::Repr;
use super::{Error, Result};

/// How deeply option lists may be encapsulated inside other options
/// (IA_NA inside the option area, IA Address inside IA_NA, and so on).
pub const MAX_ENCAPSULATION_DEPTH: usize = 8;

enum_with_unknown! {
    /// The possible message types of a DHCP packet.
    pub enum MessageType(u8) {
        Solicit = 1,
        Advertise = 2,
        Request = 3,
        Confirm = 4,
        Renew = 5,
        Rebind = 6,
        Reply = 7,
        Release = 8,
        Decline = 9,
        Reconfigure = 10,
        InformationRequest = 11,
        RelayForw = 12,
        RelayRepl = 13,
        LeaseQuery = 14,
        LeaseQueryReply = 15,
        LeaseQueryDone = 16,
        LeaseQueryData = 17,
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Solicit => write!(f, "solicit"),
            Self::Advertise => write!(f, "advertise"),
            Self::Request => write!(f, "request"),
            Self::Confirm => write!(f, "confirm"),
            Self::Renew => write!(f, "renew"),
            Self::Rebind => write!(f, "rebind"),
            Self::Reply => write!(f, "reply"),
            Self::Release => write!(f, "release"),
            Self::Decline => write!(f, "decline"),
            Self::Reconfigure => write!(f, "reconfigure"),
            Self::InformationRequest => write!(f, "information-request"),
            Self::RelayForw => write!(f, "relay-forw"),
            Self::RelayRepl => write!(f, "relay-repl"),
            Self::LeaseQuery => write!(f, "lease-query"),
            Self::LeaseQueryReply => write!(f, "lease-query-reply"),
            Self::LeaseQueryDone => write!(f, "lease-query-done"),
            Self::LeaseQueryData => write!(f, "lease-query-data"),
            Self::Unknown(a) => write!(f, "unknown({a})"),
        }
    }
}

enum_with_unknown! {
    /// The type code of a DHCPv6 option.
    ///
    /// Any 16-bit value is a legal type code; values this crate has no
    /// layout for are kept as `Unknown` and their options decode as opaque.
    pub enum OptionType(u16) {
        ClientId = 1,
        ServerId = 2,
        IaNa = 3,
        IaTa = 4,
        IaAddr = 5,
        Oro = 6,
        Preference = 7,
        ElapsedTime = 8,
        RelayMsg = 9,
        Auth = 11,
        Unicast = 12,
        StatusCode = 13,
        RapidCommit = 14,
        UserClass = 15,
        VendorClass = 16,
        VendorOpts = 17,
        InterfaceId = 18,
        ReconfMsg = 19,
        ReconfAccept = 20,
        DnsServers = 23,
        DomainList = 24,
    }
}

impl OptionType {
    /// The canonical name of the option type, or `"Unknown"` for type codes
    /// without one.
    pub const fn name(&self) -> &'static str {
        match *self {
            Self::ClientId => "Client Identifier",
            Self::ServerId => "Server Identifier",
            Self::IaNa => "Identity Association for Non-temporary Addresses",
            Self::IaTa => "Identity Association for Temporary Addresses",
            Self::IaAddr => "Identity Association Address",
            Self::Oro => "Option Request",
            Self::Preference => "Preference",
            Self::ElapsedTime => "Elapsed Time",
            Self::RelayMsg => "Relay Message",
            Self::Auth => "Authentication",
            Self::Unicast => "Server Unicast",
            Self::StatusCode => "Status Code",
            Self::RapidCommit => "Rapid Commit",
            Self::UserClass => "User Class",
            Self::VendorClass => "Vendor Class",
            Self::VendorOpts => "Vendor-specific Information",
            Self::InterfaceId => "Interface-ID",
            Self::ReconfMsg => "Reconfigure Message",
            Self::ReconfAccept => "Reconfigure Accept",
            Self::DnsServers => "DNS Server",
            Self::DomainList => "DNS Search List",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name(), u16::from(*self))
    }
}

enum_with_unknown! {
    pub enum StatusCode(u16) {
        Success = 0,
        UnspecFail = 1,
        NoAddrsAvail = 2,
        NoBinding = 3,
        NotOnLink = 4,
        UseMulticast = 5,
        NoPrefixAvail = 6
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Success => write!(f, "success"),
            Self::UnspecFail => write!(f, "unspec-fail"),
            Self::NoAddrsAvail => write!(f, "no-addrs-avail"),
            Self::NoBinding => write!(f, "no-binding"),
            Self::NotOnLink => write!(f, "not-on-link"),
            Self::UseMulticast => write!(f, "use-multicast"),
            Self::NoPrefixAvail => write!(f, "no-prefix-avail"),
            Self::Unknown(a) => write!(f, "unknown({a})"),
        }
    }
}

// The format of DHCP options is:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |          option-code          |           option-len          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                          option-data                          |
// |                      (option-len octets)                      |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// option-len counts the option-data octets only. Options are scoped by
// encapsulation: IA_NA and IA_TA carry their IA Address options, and IA
// Address carries its own, all in this same format.
pub(crate) mod field {
    #![allow(non_snake_case)]
    #![allow(unused)]

    use crate::wire::field::*;

    pub const CODE: Field = 0..2;
    pub const LEN: Field = 2..4;
    pub const DATA: Rest = 4..;

    pub const HEADER_LEN: usize = DATA.start;
}

/// A representation of a single DHCP option, as found on the wire.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dhcpv6Option<'a> {
    pub kind: OptionType,
    pub data: &'a [u8],
}

/// An iterator over the raw options in an option area.
///
/// Yields each option together with the offset of its header. Iteration
/// ends after the first error, since a bad length field leaves no reliable
/// position to resume from.
#[derive(Debug, Clone)]
pub struct Dhcpv6OptionIter<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Dhcpv6OptionIter<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    fn fail(&mut self, err: Error) -> Option<Result<(usize, Dhcpv6Option<'a>)>> {
        self.offset = self.buffer.len();
        Some(Err(err))
    }
}

impl<'a> Iterator for Dhcpv6OptionIter<'a> {
    type Item = Result<(usize, Dhcpv6Option<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let buffer: &'a [u8] = self.buffer;
        let offset = self.offset;
        let buf = &buffer[offset..];
        if buf.is_empty() {
            return None;
        }
        if buf.len() < field::HEADER_LEN {
            return self.fail(Error::TruncatedHeader { offset });
        }

        let kind = OptionType::from(NetworkEndian::read_u16(&buf[field::CODE]));
        let len = NetworkEndian::read_u16(&buf[field::LEN]) as usize;
        let data = &buf[field::DATA];
        if data.len() < len {
            return self.fail(Error::TruncatedBody {
                offset,
                kind,
                len,
                available: data.len(),
            });
        }

        self.offset += field::HEADER_LEN + len;
        Some(Ok((
            offset,
            Dhcpv6Option {
                kind,
                data: &data[..len],
            },
        )))
    }
}

/// Walk the raw options of an option area without decoding their bodies.
#[inline]
pub fn iter_options(buffer: &[u8]) -> Dhcpv6OptionIter<'_> {
    Dhcpv6OptionIter::new(buffer)
}

/// Decode a whole option area into typed options, in wire order.
///
/// Either every option decodes or the call fails; there is no partial result.
pub fn parse_options(buffer: &[u8]) -> Result<Vec<Repr>> {
    parse_encapsulated(buffer, 0)
}

pub(crate) fn parse_encapsulated(buffer: &[u8], depth: usize) -> Result<Vec<Repr>> {
    let mut options = Vec::new();
    for item in iter_options(buffer) {
        let (offset, option) = item.map_err(|err| {
            net_debug!("DHCPv6 option area invalid: {}", err);
            err
        })?;

        let repr = Repr::parse_at_depth(&option, depth).map_err(|reason| {
            let err = Error::MalformedOption {
                offset,
                kind: option.kind,
                reason,
            };
            net_debug!("DHCPv6 option area invalid: {}", err);
            err
        })?;

        net_trace!(
            "DHCPv6 parsed {} at offset {} (depth {})",
            option.kind,
            offset,
            depth
        );
        options.push(repr);
    }
    Ok(options)
}

/// The number of octets [emit_options] produces for `options`.
pub fn options_len(options: &[Repr]) -> usize {
    options.iter().map(Repr::buffer_len).sum()
}

/// Encode typed options into a freshly allocated option area, in order.
pub fn emit_options(options: &[Repr]) -> Result<Vec<u8>> {
    let mut buffer = alloc::vec![0; options_len(options)];
    let mut writer = Dhcpv6OptionWriter::new(&mut buffer);
    for repr in options {
        writer.emit_repr(repr)?;
    }
    Ok(buffer)
}

/// A buffer for DHCP options.
#[derive(Debug)]
pub struct Dhcpv6OptionWriter<'a> {
    /// The part of the underlying buffer not yet written to.
    buffer: &'a mut [u8],
    /// How many octets have been written so far.
    offset: usize,
}

impl<'a> Dhcpv6OptionWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// The number of octets emitted so far.
    pub fn len(&self) -> usize {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset == 0
    }

    /// Emit a [`Dhcpv6Option`] into a [`Dhcpv6OptionWriter`].
    pub fn emit(&mut self, option: Dhcpv6Option<'_>) -> Result<()> {
        let data = self.take(option.kind, option.data.len())?;
        data.copy_from_slice(option.data);
        Ok(())
    }

    /// Emit a typed option, its header length matching the body exactly.
    pub fn emit_repr(&mut self, repr: &Repr) -> Result<()> {
        let kind = repr.kind();
        let offset = self.offset;
        let data = self.take(kind, repr.data_len())?;
        repr.emit_data(data).map_err(|reason| {
            let err = Error::MalformedOption {
                offset,
                kind,
                reason,
            };
            net_debug!("DHCPv6 cannot emit option: {}", err);
            err
        })
    }

    /// Write an option header and hand out the `len` octets of body after it.
    fn take(&mut self, kind: OptionType, len: usize) -> Result<&'a mut [u8]> {
        if len > u16::MAX as usize {
            return Err(Error::OptionTooLarge { kind, len });
        }

        let total_len = field::HEADER_LEN + len;
        if self.buffer.len() < total_len {
            return Err(Error::Exhausted);
        }

        let (buf, rest) = core::mem::take(&mut self.buffer).split_at_mut(total_len);
        self.buffer = rest;
        self.offset += total_len;

        NetworkEndian::write_u16(&mut buf[field::CODE], kind.into());
        NetworkEndian::write_u16(&mut buf[field::LEN], len as u16);
        Ok(&mut buf[field::DATA])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::wire::dhcpv6duid::{Duid, DuidType};
    use crate::wire::Malformed;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    static CLIENT_ID_BYTES: [u8; 18] = [
        0x00, 0x01, 0x00, 0x0e, 0x00, 0x01, 0x00, 0x01, 0x1d, 0xcd, 0x65, 0x00, 0xaa, 0xbb, 0xcc,
        0xdd, 0xee, 0xff,
    ];

    static SERVER_ID_BYTES: [u8; 18] = [
        0x00, 0x02, 0x00, 0x0e, 0x00, 0x01, 0x00, 0x01, 0x1d, 0xcd, 0x65, 0x00, 0xaa, 0xbb, 0xcc,
        0xdd, 0xee, 0xff,
    ];

    #[test]
    fn test_option_type_names() {
        let names: &[(u16, &str)] = &[
            (0, "Unknown (0)"),
            (1, "Client Identifier (1)"),
            (2, "Server Identifier (2)"),
            (3, "Identity Association for Non-temporary Addresses (3)"),
            (4, "Identity Association for Temporary Addresses (4)"),
            (5, "Identity Association Address (5)"),
            (6, "Option Request (6)"),
            (7, "Preference (7)"),
            (8, "Elapsed Time (8)"),
            (9, "Relay Message (9)"),
            (10, "Unknown (10)"),
            (11, "Authentication (11)"),
            (12, "Server Unicast (12)"),
            (13, "Status Code (13)"),
            (14, "Rapid Commit (14)"),
            (15, "User Class (15)"),
            (16, "Vendor Class (16)"),
            (17, "Vendor-specific Information (17)"),
            (18, "Interface-ID (18)"),
            (19, "Reconfigure Message (19)"),
            (20, "Reconfigure Accept (20)"),
            (21, "Unknown (21)"),
            (23, "DNS Server (23)"),
            (24, "DNS Search List (24)"),
            (25, "Unknown (25)"),
            (65535, "Unknown (65535)"),
        ];
        for &(code, name) in names {
            assert_eq!(OptionType::from(code).to_string(), name);
        }
    }

    #[test]
    fn test_option_type_naming_is_total() {
        for code in 0..=u16::MAX {
            let kind = OptionType::from(code);
            assert_eq!(u16::from(kind), code);
            assert!(kind.to_string().ends_with(&format!(" ({code})")));
        }
    }

    #[test]
    fn test_parse_client_id() {
        let options = parse_options(&CLIENT_ID_BYTES).unwrap();
        assert_eq!(options.len(), 1);
        let Repr::ClientId(duid) = &options[0] else {
            panic!("expected a client identifier, got {:?}", options[0]);
        };
        assert_eq!(options[0].kind(), OptionType::ClientId);
        assert_eq!(duid.duid_type(), DuidType::LinkLayerTime);
        let Duid::LinkLayerTime {
            hardware_type,
            link_layer_addr,
            ..
        } = duid
        else {
            panic!("expected a link-layer-plus-time DUID, got {duid:?}");
        };
        assert_eq!(*hardware_type, 1);
        assert_eq!(duid.time_field(), Some(500000000));
        assert_eq!(&link_layer_addr[..], &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(
            options[0].to_string(),
            "client-ID hwaddr/time type 1 time 500000000 aa:bb:cc:dd:ee:ff"
        );
        assert_eq!(emit_options(&options).unwrap(), &CLIENT_ID_BYTES[..]);
    }

    #[test]
    fn test_parse_server_id() {
        let options = parse_options(&SERVER_ID_BYTES).unwrap();
        assert_eq!(options.len(), 1);
        assert!(matches!(options[0], Repr::ServerId(_)));
        assert_eq!(options[0].kind(), OptionType::ServerId);
        assert_eq!(
            options[0].to_string(),
            "server-ID hwaddr/time type 1 time 500000000 aa:bb:cc:dd:ee:ff"
        );
        assert_eq!(emit_options(&options).unwrap(), &SERVER_ID_BYTES[..]);
    }

    #[test]
    fn test_parse_multiple_in_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CLIENT_ID_BYTES);
        bytes.extend_from_slice(&SERVER_ID_BYTES);

        let options = parse_options(&bytes).unwrap();
        assert_eq!(options.len(), 2);
        assert!(matches!(options[0], Repr::ClientId(_)));
        assert!(matches!(options[1], Repr::ServerId(_)));
        assert_eq!(emit_options(&options).unwrap(), bytes);
    }

    #[test]
    fn test_parse_duplicates_preserved() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CLIENT_ID_BYTES);
        bytes.extend_from_slice(&CLIENT_ID_BYTES);

        let options = parse_options(&bytes).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0], options[1]);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_options(&[]).unwrap(), Vec::new());
        assert_eq!(emit_options(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_truncated_header() {
        assert_eq!(
            parse_options(&[0x00, 0x01, 0x00]),
            Err(Error::TruncatedHeader { offset: 0 })
        );

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CLIENT_ID_BYTES);
        bytes.extend_from_slice(&[0x00, 0x02]);
        assert_eq!(
            parse_options(&bytes),
            Err(Error::TruncatedHeader { offset: 18 })
        );
    }

    #[test]
    fn test_truncated_body() {
        let bytes = [0x00, 0x63, 0x00, 0x0a, 1, 2, 3, 4, 5];
        assert_eq!(
            parse_options(&bytes),
            Err(Error::TruncatedBody {
                offset: 0,
                kind: OptionType::Unknown(99),
                len: 10,
                available: 5,
            })
        );
    }

    #[test]
    fn test_malformed_client_id() {
        // A link-layer-plus-time DUID needs at least 8 octets.
        let bytes = [0x00, 0x01, 0x00, 0x05, 0x00, 0x01, 0x00, 0x01, 0x1d];
        assert_eq!(
            parse_options(&bytes),
            Err(Error::MalformedOption {
                offset: 0,
                kind: OptionType::ClientId,
                reason: Malformed::Identifier,
            })
        );

        let bytes = [0x00, 0x02, 0x00, 0x01, 0x00];
        assert_eq!(
            parse_options(&bytes),
            Err(Error::MalformedOption {
                offset: 0,
                kind: OptionType::ServerId,
                reason: Malformed::Identifier,
            })
        );
    }

    #[test]
    fn test_error_aborts_whole_parse() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CLIENT_ID_BYTES);
        // Preference must be exactly one octet long.
        bytes.extend_from_slice(&[0x00, 0x07, 0x00, 0x02, 0xff, 0xff]);
        assert_eq!(
            parse_options(&bytes),
            Err(Error::MalformedOption {
                offset: 18,
                kind: OptionType::Preference,
                reason: Malformed::Length,
            })
        );
    }

    #[test]
    fn test_unknown_passthrough() {
        let bytes = [0x00, 0x63, 0x00, 0x04, 0xde, 0xad, 0xbe, 0xef];
        let options = parse_options(&bytes).unwrap();
        assert_eq!(
            options,
            vec![Repr::Opaque {
                kind: OptionType::Unknown(99),
                data: vec![0xde, 0xad, 0xbe, 0xef],
            }]
        );
        assert_eq!(options[0].to_string(), "opaque type 99 de:ad:be:ef");
        assert_eq!(emit_options(&options).unwrap(), bytes);
    }

    #[test]
    fn test_unknown_passthrough_random() {
        let mut rng = StdRng::seed_from_u64(0x6d6f6f);
        for _ in 0..256 {
            let code = loop {
                let code: u16 = rng.gen();
                if let OptionType::Unknown(_) = OptionType::from(code) {
                    break code;
                }
            };
            let len = rng.gen_range(0..300);
            let mut bytes = vec![0; 4 + len];
            NetworkEndian::write_u16(&mut bytes[0..2], code);
            NetworkEndian::write_u16(&mut bytes[2..4], len as u16);
            rng.fill(&mut bytes[4..]);

            let options = parse_options(&bytes).unwrap();
            assert_eq!(options.len(), 1);
            match &options[0] {
                Repr::Opaque { kind, data } => {
                    assert_eq!(u16::from(*kind), code);
                    assert_eq!(&data[..], &bytes[4..]);
                }
                other => panic!("expected an opaque option, got {other:?}"),
            }
            assert_eq!(emit_options(&options).unwrap(), bytes);
        }
    }

    #[test]
    fn test_iter_options() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CLIENT_ID_BYTES);
        bytes.extend_from_slice(&[0x00, 0x0e, 0x00, 0x00]);

        let mut iter = iter_options(&bytes);
        let (offset, option) = iter.next().unwrap().unwrap();
        assert_eq!(offset, 0);
        assert_eq!(option.kind, OptionType::ClientId);
        assert_eq!(option.data, &CLIENT_ID_BYTES[4..]);
        let (offset, option) = iter.next().unwrap().unwrap();
        assert_eq!(offset, 18);
        assert_eq!(option.kind, OptionType::RapidCommit);
        assert!(option.data.is_empty());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_iter_options_stops_after_error() {
        let mut iter = iter_options(&[0x00, 0x01, 0x00]);
        assert_eq!(
            iter.next(),
            Some(Err(Error::TruncatedHeader { offset: 0 }))
        );
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_writer_raw_options() {
        let mut buffer = [0u8; 18];
        let mut writer = Dhcpv6OptionWriter::new(&mut buffer);
        writer
            .emit(Dhcpv6Option {
                kind: OptionType::ClientId,
                data: &CLIENT_ID_BYTES[4..],
            })
            .unwrap();
        assert_eq!(writer.len(), 18);
        assert_eq!(
            writer.emit(Dhcpv6Option {
                kind: OptionType::RapidCommit,
                data: &[],
            }),
            Err(Error::Exhausted)
        );
        assert_eq!(buffer, CLIENT_ID_BYTES);
    }

    #[test]
    fn test_option_too_large() {
        let options = [Repr::Opaque {
            kind: OptionType::Unknown(99),
            data: vec![0; 65536],
        }];
        assert_eq!(
            emit_options(&options),
            Err(Error::OptionTooLarge {
                kind: OptionType::Unknown(99),
                len: 65536,
            })
        );

        let options = [Repr::Opaque {
            kind: OptionType::Unknown(99),
            data: vec![0; 65535],
        }];
        assert_eq!(emit_options(&options).unwrap().len(), 65539);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::TruncatedHeader { offset: 3 }.to_string(),
            "truncated option header at offset 3"
        );
        assert_eq!(
            Error::MalformedOption {
                offset: 0,
                kind: OptionType::ClientId,
                reason: Malformed::Identifier,
            }
            .to_string(),
            "malformed Client Identifier (1) at offset 0: malformed identifier"
        );
    }
}
