use alloc::string::String;
use alloc::vec::Vec;
use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;
use core::net::Ipv6Addr;

use super::dhcpv6::{
    iter_options, options_len, parse_encapsulated, Dhcpv6OptionWriter, MessageType, OptionType,
    StatusCode, MAX_ENCAPSULATION_DEPTH,
};
use super::dhcpv6duid::Duid;
use super::{HexBytes, Malformed};
use crate::time::Duration;

type Result<T> = core::result::Result<T, Malformed>;

/// The longest label of a domain name.
const MAX_LABEL_LEN: usize = 63;

mod field {
    #![allow(non_snake_case)]
    #![allow(unused)]

    use crate::wire::field::*;

    pub const ADDR_LEN: usize = 16;

    // IA_NA: IAID, T1, T2, IA_NA-options.
    pub const IA_NA_IAID: Field = 0..4;
    pub const IA_NA_T1: Field = 4..8;
    pub const IA_NA_T2: Field = 8..12;
    pub const IA_NA_OPTIONS: Rest = 12..;

    // IA_TA: IAID, IA_TA-options.
    pub const IA_TA_IAID: Field = 0..4;
    pub const IA_TA_OPTIONS: Rest = 4..;

    // IA Address: IPv6-address, preferred-lifetime, valid-lifetime, IAaddr-options.
    pub const IA_ADDR_ADDR: Field = 0..16;
    pub const IA_ADDR_PREFERRED: Field = 16..20;
    pub const IA_ADDR_VALID: Field = 20..24;
    pub const IA_ADDR_OPTIONS: Rest = 24..;

    // Authentication: protocol, algorithm, RDM, replay detection, auth information.
    pub const AUTH_PROTOCOL: usize = 0;
    pub const AUTH_ALGORITHM: usize = 1;
    pub const AUTH_RDM: usize = 2;
    pub const AUTH_REPLAY: Field = 3..11;
    pub const AUTH_INFO: Rest = 11..;

    // Status Code: status-code, status-message.
    pub const STATUS_CODE: Field = 0..2;
    pub const STATUS_MSG: Rest = 2..;

    // Vendor Class and Vendor-specific Information: enterprise-number, then data.
    pub const ENTERPRISE_NUMBER: Field = 0..4;
    pub const VENDOR_DATA: Rest = 4..;

    // Each item of User Class and Vendor Class data is a length-prefixed blob.
    pub const ITEM_LEN: Field = 0..2;
    pub const ITEM_DATA: Rest = 2..;
}

/// A high-level representation of a DHCPv6 option.
///
/// Every option type known to [OptionType] has its own variant; all others
/// decode into [Repr::Opaque]. `Opaque` holds unrecognized type codes only;
/// emitting one built with a recognized code fails with [Malformed::Value].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Repr {
    ClientId(Duid),
    ServerId(Duid),
    IaNa(IaNa),
    IaTa(IaTa),
    IaAddress(IaAddress),
    /// Requested option codes.
    OptionRequest(Vec<OptionType>),
    Preference(u8),
    /// Time since the client began the exchange, in hundredths of a second.
    ElapsedTime(u16),
    /// An encapsulated DHCP message, header included.
    RelayMessage(Vec<u8>),
    Authentication(Authentication),
    ServerUnicast(Ipv6Addr),
    StatusCode(StatusRepr),
    RapidCommit,
    UserClass(Vec<Vec<u8>>),
    VendorClass(VendorClass),
    VendorOpts(VendorOpts),
    InterfaceId(Vec<u8>),
    ReconfigureMessage(MessageType),
    ReconfigureAccept,
    DnsServers(Vec<Ipv6Addr>),
    /// Domain names in dotted form, without a trailing dot. The root is `""`.
    DomainList(Vec<String>),
    Opaque { kind: OptionType, data: Vec<u8> },
}

impl Repr {
    /// Parse the body of a raw option into its typed representation.
    pub fn parse(option: &super::Dhcpv6Option<'_>) -> Result<Repr> {
        Self::parse_at_depth(option, 0)
    }

    pub(crate) fn parse_at_depth(option: &super::Dhcpv6Option<'_>, depth: usize) -> Result<Repr> {
        let data = option.data;
        let repr = match (option.kind, data.len()) {
            (OptionType::ClientId, _) => Repr::ClientId(parse_duid(data)?),
            (OptionType::ServerId, _) => Repr::ServerId(parse_duid(data)?),
            (OptionType::IaNa, _) => Repr::IaNa(IaNa::parse(data, depth)?),
            (OptionType::IaTa, _) => Repr::IaTa(IaTa::parse(data, depth)?),
            (OptionType::IaAddr, _) => Repr::IaAddress(IaAddress::parse(data, depth)?),
            (OptionType::Oro, len) if len % 2 == 0 => Repr::OptionRequest(
                data.chunks_exact(2)
                    .map(|chunk| OptionType::from(NetworkEndian::read_u16(chunk)))
                    .collect(),
            ),
            (OptionType::Preference, 1) => Repr::Preference(data[0]),
            (OptionType::ElapsedTime, 2) => Repr::ElapsedTime(NetworkEndian::read_u16(data)),
            (OptionType::RelayMsg, _) => Repr::RelayMessage(data.to_vec()),
            (OptionType::Auth, _) => Repr::Authentication(Authentication::parse(data)?),
            (OptionType::Unicast, field::ADDR_LEN) => Repr::ServerUnicast(read_addr(data)),
            (OptionType::StatusCode, _) => Repr::StatusCode(StatusRepr::parse(data)?),
            (OptionType::RapidCommit, 0) => Repr::RapidCommit,
            (OptionType::UserClass, _) => Repr::UserClass(parse_items(data)?),
            (OptionType::VendorClass, _) => Repr::VendorClass(VendorClass::parse(data)?),
            (OptionType::VendorOpts, _) => Repr::VendorOpts(VendorOpts::parse(data)?),
            (OptionType::InterfaceId, _) => Repr::InterfaceId(data.to_vec()),
            (OptionType::ReconfMsg, 1) => Repr::ReconfigureMessage(MessageType::from(data[0])),
            (OptionType::ReconfAccept, 0) => Repr::ReconfigureAccept,
            (OptionType::DnsServers, len) if len % field::ADDR_LEN == 0 => Repr::DnsServers(
                data.chunks_exact(field::ADDR_LEN).map(read_addr).collect(),
            ),
            (OptionType::DomainList, _) => Repr::DomainList(parse_domain_list(data)?),
            (OptionType::Unknown(_), _) => Repr::Opaque {
                kind: option.kind,
                data: data.to_vec(),
            },
            (_, _) => return Err(Malformed::Length),
        };
        Ok(repr)
    }

    /// The type code this option is emitted with.
    pub fn kind(&self) -> OptionType {
        match self {
            Repr::ClientId(_) => OptionType::ClientId,
            Repr::ServerId(_) => OptionType::ServerId,
            Repr::IaNa(_) => OptionType::IaNa,
            Repr::IaTa(_) => OptionType::IaTa,
            Repr::IaAddress(_) => OptionType::IaAddr,
            Repr::OptionRequest(_) => OptionType::Oro,
            Repr::Preference(_) => OptionType::Preference,
            Repr::ElapsedTime(_) => OptionType::ElapsedTime,
            Repr::RelayMessage(_) => OptionType::RelayMsg,
            Repr::Authentication(_) => OptionType::Auth,
            Repr::ServerUnicast(_) => OptionType::Unicast,
            Repr::StatusCode(_) => OptionType::StatusCode,
            Repr::RapidCommit => OptionType::RapidCommit,
            Repr::UserClass(_) => OptionType::UserClass,
            Repr::VendorClass(_) => OptionType::VendorClass,
            Repr::VendorOpts(_) => OptionType::VendorOpts,
            Repr::InterfaceId(_) => OptionType::InterfaceId,
            Repr::ReconfigureMessage(_) => OptionType::ReconfMsg,
            Repr::ReconfigureAccept => OptionType::ReconfAccept,
            Repr::DnsServers(_) => OptionType::DnsServers,
            Repr::DomainList(_) => OptionType::DomainList,
            Repr::Opaque { kind, .. } => *kind,
        }
    }

    /// Return the length of the option body.
    pub fn data_len(&self) -> usize {
        match self {
            Repr::ClientId(duid) | Repr::ServerId(duid) => duid.buffer_len(),
            Repr::IaNa(ia) => ia.data_len(),
            Repr::IaTa(ia) => ia.data_len(),
            Repr::IaAddress(addr) => addr.data_len(),
            Repr::OptionRequest(codes) => codes.len() * 2,
            Repr::Preference(_) | Repr::ReconfigureMessage(_) => 1,
            Repr::ElapsedTime(_) => 2,
            Repr::RelayMessage(data) | Repr::InterfaceId(data) => data.len(),
            Repr::Authentication(auth) => auth.data_len(),
            Repr::ServerUnicast(_) => field::ADDR_LEN,
            Repr::StatusCode(status) => status.data_len(),
            Repr::RapidCommit | Repr::ReconfigureAccept => 0,
            Repr::UserClass(items) => items_len(items),
            Repr::VendorClass(class) => class.data_len(),
            Repr::VendorOpts(opts) => opts.data_len(),
            Repr::DnsServers(addrs) => addrs.len() * field::ADDR_LEN,
            Repr::DomainList(names) => names.iter().map(|name| domain_name_len(name)).sum(),
            Repr::Opaque { data, .. } => data.len(),
        }
    }

    /// Return the length of the option, header included.
    pub fn buffer_len(&self) -> usize {
        super::dhcpv6::field::HEADER_LEN + self.data_len()
    }

    /// Emit the option body into `data`, which must be exactly `data_len()` octets long.
    pub(crate) fn emit_data(&self, data: &mut [u8]) -> Result<()> {
        match self {
            Repr::ClientId(duid) | Repr::ServerId(duid) => {
                duid.emit(data).map_err(|_| Malformed::Value)?
            }
            Repr::IaNa(ia) => ia.emit(data)?,
            Repr::IaTa(ia) => ia.emit(data)?,
            Repr::IaAddress(addr) => addr.emit(data)?,
            Repr::OptionRequest(codes) => {
                for (chunk, code) in data.chunks_exact_mut(2).zip(codes) {
                    NetworkEndian::write_u16(chunk, (*code).into());
                }
            }
            Repr::Preference(pref) => data[0] = *pref,
            Repr::ElapsedTime(elapsed) => NetworkEndian::write_u16(data, *elapsed),
            Repr::RelayMessage(msg) | Repr::InterfaceId(msg) => data.copy_from_slice(msg),
            Repr::Authentication(auth) => auth.emit(data),
            Repr::ServerUnicast(addr) => data.copy_from_slice(&addr.octets()),
            Repr::StatusCode(status) => status.emit(data),
            Repr::RapidCommit | Repr::ReconfigureAccept => {}
            Repr::UserClass(items) => emit_items(items, data)?,
            Repr::VendorClass(class) => class.emit(data)?,
            Repr::VendorOpts(opts) => opts.emit(data)?,
            Repr::ReconfigureMessage(msg_type) => data[0] = (*msg_type).into(),
            Repr::DnsServers(addrs) => {
                for (chunk, addr) in data.chunks_exact_mut(field::ADDR_LEN).zip(addrs) {
                    chunk.copy_from_slice(&addr.octets());
                }
            }
            Repr::DomainList(names) => {
                let mut data = data;
                for name in names {
                    let len = domain_name_len(name);
                    let (head, rest) = core::mem::take(&mut data).split_at_mut(len);
                    emit_domain_name(name, head)?;
                    data = rest;
                }
            }
            Repr::Opaque {
                kind: OptionType::Unknown(_),
                data: body,
            } => data.copy_from_slice(body),
            Repr::Opaque { kind, .. } => {
                net_debug!("DHCPv6 opaque option has a recognized type {}", kind);
                return Err(Malformed::Value);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Repr::ClientId(duid) => write!(f, "client-ID {duid}"),
            Repr::ServerId(duid) => write!(f, "server-ID {duid}"),
            Repr::IaNa(ia) => write!(f, "{ia}"),
            Repr::IaTa(ia) => write!(f, "{ia}"),
            Repr::IaAddress(addr) => write!(f, "{addr}"),
            Repr::OptionRequest(codes) => {
                write!(f, "option-request")?;
                for code in codes {
                    write!(f, " {}", u16::from(*code))?;
                }
                Ok(())
            }
            Repr::Preference(pref) => write!(f, "preference {pref}"),
            Repr::ElapsedTime(elapsed) => write!(
                f,
                "elapsed-time {}",
                Duration::from_millis(u64::from(*elapsed) * 10)
            ),
            Repr::RelayMessage(msg) => write!(f, "relay-message {}", HexBytes(msg)),
            Repr::Authentication(auth) => write!(f, "{auth}"),
            Repr::ServerUnicast(addr) => write!(f, "server-unicast {addr}"),
            Repr::StatusCode(status) => write!(f, "{status}"),
            Repr::RapidCommit => write!(f, "rapid-commit"),
            Repr::UserClass(items) => {
                write!(f, "user-class")?;
                for item in items {
                    write!(f, " {}", HexBytes(item))?;
                }
                Ok(())
            }
            Repr::VendorClass(class) => write!(f, "{class}"),
            Repr::VendorOpts(opts) => write!(f, "{opts}"),
            Repr::InterfaceId(id) => write!(f, "interface-id {}", HexBytes(id)),
            Repr::ReconfigureMessage(msg_type) => write!(f, "reconfigure-message {msg_type}"),
            Repr::ReconfigureAccept => write!(f, "reconfigure-accept"),
            Repr::DnsServers(addrs) => {
                write!(f, "dns-server")?;
                for addr in addrs {
                    write!(f, " {addr}")?;
                }
                Ok(())
            }
            Repr::DomainList(names) => {
                write!(f, "dns-search-list")?;
                for name in names {
                    match name.as_str() {
                        "" => write!(f, " .")?,
                        name => write!(f, " {name}")?,
                    }
                }
                Ok(())
            }
            Repr::Opaque { kind, data } => {
                write!(f, "opaque type {}", u16::from(*kind))?;
                if !data.is_empty() {
                    write!(f, " {}", HexBytes(data))?;
                }
                Ok(())
            }
        }
    }
}

fn parse_duid(data: &[u8]) -> Result<Duid> {
    Duid::parse(data).map_err(|err| {
        net_debug!("DHCPv6 bad DUID: {}", err);
        Malformed::Identifier
    })
}

fn read_addr(data: &[u8]) -> Ipv6Addr {
    let mut octets = [0; field::ADDR_LEN];
    octets.copy_from_slice(&data[..field::ADDR_LEN]);
    Ipv6Addr::from(octets)
}

fn parse_nested(data: &[u8], depth: usize) -> Result<Vec<Repr>> {
    if depth >= MAX_ENCAPSULATION_DEPTH {
        net_debug!("DHCPv6 options nested deeper than {}", MAX_ENCAPSULATION_DEPTH);
        return Err(Malformed::Encapsulated);
    }
    parse_encapsulated(data, depth + 1).map_err(|_| Malformed::Encapsulated)
}

fn emit_nested(options: &[Repr], data: &mut [u8]) -> Result<()> {
    let mut writer = Dhcpv6OptionWriter::new(data);
    for repr in options {
        writer.emit_repr(repr).map_err(|_| Malformed::Encapsulated)?;
    }
    Ok(())
}

fn parse_items(mut data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut items = Vec::new();
    while !data.is_empty() {
        if data.len() < field::ITEM_DATA.start {
            return Err(Malformed::Length);
        }
        let len = NetworkEndian::read_u16(&data[field::ITEM_LEN]) as usize;
        let rest = &data[field::ITEM_DATA];
        if rest.len() < len {
            return Err(Malformed::Length);
        }
        items.push(rest[..len].to_vec());
        data = &rest[len..];
    }
    Ok(items)
}

fn items_len(items: &[Vec<u8>]) -> usize {
    items
        .iter()
        .map(|item| field::ITEM_DATA.start + item.len())
        .sum()
}

fn emit_items(items: &[Vec<u8>], mut data: &mut [u8]) -> Result<()> {
    for item in items {
        if item.len() > u16::MAX as usize {
            return Err(Malformed::Value);
        }
        let (buf, rest) =
            core::mem::take(&mut data).split_at_mut(field::ITEM_DATA.start + item.len());
        NetworkEndian::write_u16(&mut buf[field::ITEM_LEN], item.len() as u16);
        buf[field::ITEM_DATA].copy_from_slice(item);
        data = rest;
    }
    Ok(())
}

// Domain names are sequences of labels, each prefixed by its length and
// the whole terminated by the zero-length root label (RFC 1035, section
// 3.1). Compression is not allowed in DHCPv6 (RFC 8415, section 10).
fn parse_domain_list(mut data: &[u8]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    while !data.is_empty() {
        let mut name = String::new();
        loop {
            let (&len, rest) = data.split_first().ok_or(Malformed::Length)?;
            let len = len as usize;
            data = rest;
            if len == 0 {
                break;
            }
            if len > MAX_LABEL_LEN {
                return Err(Malformed::Value);
            }
            if data.len() < len {
                return Err(Malformed::Length);
            }
            let label = core::str::from_utf8(&data[..len]).map_err(|_| Malformed::Value)?;
            if label.contains('.') {
                return Err(Malformed::Value);
            }
            if !name.is_empty() {
                name.push('.');
            }
            name.push_str(label);
            data = &data[len..];
        }
        names.push(name);
    }
    Ok(names)
}

fn domain_name_len(name: &str) -> usize {
    if name.is_empty() {
        1
    } else {
        name.len() + 2
    }
}

fn emit_domain_name(name: &str, mut data: &mut [u8]) -> Result<()> {
    if !name.is_empty() {
        for label in name.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(Malformed::Value);
            }
            let (buf, rest) = core::mem::take(&mut data).split_at_mut(1 + label.len());
            buf[0] = label.len() as u8;
            buf[1..].copy_from_slice(label.as_bytes());
            data = rest;
        }
    }
    data[0] = 0;
    Ok(())
}

/// An Identity Association for Non-temporary Addresses.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct IaNa {
    /// Unique identifier for this IA_NA.
    pub iaid: u32,
    /// Seconds until the client contacts the assigning server to renew.
    pub t1: u32,
    /// Seconds until the client contacts any server to rebind.
    pub t2: u32,
    /// Encapsulated options, usually IA Address and Status Code.
    pub options: Vec<Repr>,
}

impl IaNa {
    pub fn parse(data: &[u8], depth: usize) -> Result<Self> {
        if data.len() < field::IA_NA_OPTIONS.start {
            return Err(Malformed::Length);
        }
        Ok(Self {
            iaid: NetworkEndian::read_u32(&data[field::IA_NA_IAID]),
            t1: NetworkEndian::read_u32(&data[field::IA_NA_T1]),
            t2: NetworkEndian::read_u32(&data[field::IA_NA_T2]),
            options: parse_nested(&data[field::IA_NA_OPTIONS], depth)?,
        })
    }

    pub fn data_len(&self) -> usize {
        field::IA_NA_OPTIONS.start + options_len(&self.options)
    }

    pub fn emit(&self, data: &mut [u8]) -> Result<()> {
        NetworkEndian::write_u32(&mut data[field::IA_NA_IAID], self.iaid);
        NetworkEndian::write_u32(&mut data[field::IA_NA_T1], self.t1);
        NetworkEndian::write_u32(&mut data[field::IA_NA_T2], self.t2);
        emit_nested(&self.options, &mut data[field::IA_NA_OPTIONS])
    }

    /// The IA Address options carried by this IA_NA.
    pub fn addresses(&self) -> impl Iterator<Item = &IaAddress> + '_ {
        addresses(&self.options)
    }

    /// The Status Code option carried by this IA_NA, if any.
    pub fn status(&self) -> Option<&StatusRepr> {
        status(&self.options)
    }
}

impl fmt::Display for IaNa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ia-na iaid {} t1 {} t2 {}", self.iaid, self.t1, self.t2)?;
        fmt_nested(f, &self.options)
    }
}

/// An Identity Association for Temporary Addresses.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct IaTa {
    /// Unique identifier for this IA_TA.
    pub iaid: u32,
    /// Encapsulated options, usually IA Address and Status Code.
    pub options: Vec<Repr>,
}

impl IaTa {
    pub fn parse(data: &[u8], depth: usize) -> Result<Self> {
        if data.len() < field::IA_TA_OPTIONS.start {
            return Err(Malformed::Length);
        }
        Ok(Self {
            iaid: NetworkEndian::read_u32(&data[field::IA_TA_IAID]),
            options: parse_nested(&data[field::IA_TA_OPTIONS], depth)?,
        })
    }

    pub fn data_len(&self) -> usize {
        field::IA_TA_OPTIONS.start + options_len(&self.options)
    }

    pub fn emit(&self, data: &mut [u8]) -> Result<()> {
        NetworkEndian::write_u32(&mut data[field::IA_TA_IAID], self.iaid);
        emit_nested(&self.options, &mut data[field::IA_TA_OPTIONS])
    }

    /// The IA Address options carried by this IA_TA.
    pub fn addresses(&self) -> impl Iterator<Item = &IaAddress> + '_ {
        addresses(&self.options)
    }

    /// The Status Code option carried by this IA_TA, if any.
    pub fn status(&self) -> Option<&StatusRepr> {
        status(&self.options)
    }
}

impl fmt::Display for IaTa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ia-ta iaid {}", self.iaid)?;
        fmt_nested(f, &self.options)
    }
}

/// An address associated with an IA_NA or IA_TA.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct IaAddress {
    pub addr: Ipv6Addr,
    pub preferred_lifetime: u32,
    pub valid_lifetime: u32,
    /// Encapsulated options, usually a Status Code.
    pub options: Vec<Repr>,
}

impl IaAddress {
    pub fn parse(data: &[u8], depth: usize) -> Result<Self> {
        if data.len() < field::IA_ADDR_OPTIONS.start {
            return Err(Malformed::Length);
        }
        Ok(Self {
            addr: read_addr(&data[field::IA_ADDR_ADDR]),
            preferred_lifetime: NetworkEndian::read_u32(&data[field::IA_ADDR_PREFERRED]),
            valid_lifetime: NetworkEndian::read_u32(&data[field::IA_ADDR_VALID]),
            options: parse_nested(&data[field::IA_ADDR_OPTIONS], depth)?,
        })
    }

    pub fn data_len(&self) -> usize {
        field::IA_ADDR_OPTIONS.start + options_len(&self.options)
    }

    pub fn emit(&self, data: &mut [u8]) -> Result<()> {
        data[field::IA_ADDR_ADDR].copy_from_slice(&self.addr.octets());
        NetworkEndian::write_u32(&mut data[field::IA_ADDR_PREFERRED], self.preferred_lifetime);
        NetworkEndian::write_u32(&mut data[field::IA_ADDR_VALID], self.valid_lifetime);
        emit_nested(&self.options, &mut data[field::IA_ADDR_OPTIONS])
    }
}

impl fmt::Display for IaAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ia-addr {} preferred {} valid {}",
            self.addr, self.preferred_lifetime, self.valid_lifetime
        )?;
        fmt_nested(f, &self.options)
    }
}

fn addresses(options: &[Repr]) -> impl Iterator<Item = &IaAddress> + '_ {
    options.iter().filter_map(|option| match option {
        Repr::IaAddress(addr) => Some(addr),
        _ => None,
    })
}

fn status(options: &[Repr]) -> Option<&StatusRepr> {
    options.iter().find_map(|option| match option {
        Repr::StatusCode(status) => Some(status),
        _ => None,
    })
}

fn fmt_nested(f: &mut fmt::Formatter, options: &[Repr]) -> fmt::Result {
    for option in options {
        write!(f, " [{option}]")?;
    }
    Ok(())
}

/// The contents of an Authentication option.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Authentication {
    pub protocol: u8,
    pub algorithm: u8,
    /// Replay detection method.
    pub rdm: u8,
    pub replay_detection: u64,
    pub auth_info: Vec<u8>,
}

impl Authentication {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < field::AUTH_INFO.start {
            return Err(Malformed::Length);
        }
        Ok(Self {
            protocol: data[field::AUTH_PROTOCOL],
            algorithm: data[field::AUTH_ALGORITHM],
            rdm: data[field::AUTH_RDM],
            replay_detection: NetworkEndian::read_u64(&data[field::AUTH_REPLAY]),
            auth_info: data[field::AUTH_INFO].to_vec(),
        })
    }

    pub fn data_len(&self) -> usize {
        field::AUTH_INFO.start + self.auth_info.len()
    }

    pub fn emit(&self, data: &mut [u8]) {
        data[field::AUTH_PROTOCOL] = self.protocol;
        data[field::AUTH_ALGORITHM] = self.algorithm;
        data[field::AUTH_RDM] = self.rdm;
        NetworkEndian::write_u64(&mut data[field::AUTH_REPLAY], self.replay_detection);
        data[field::AUTH_INFO].copy_from_slice(&self.auth_info);
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "authentication protocol {} algorithm {} rdm {} replay-detection {:#018x}",
            self.protocol, self.algorithm, self.rdm, self.replay_detection
        )?;
        if !self.auth_info.is_empty() {
            write!(f, " info {}", HexBytes(&self.auth_info))?;
        }
        Ok(())
    }
}

/// The contents of a Status Code option.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StatusRepr {
    pub status_code: StatusCode,
    pub status_message: String,
}

impl StatusRepr {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < field::STATUS_MSG.start {
            return Err(Malformed::Length);
        }
        let status_message =
            core::str::from_utf8(&data[field::STATUS_MSG]).map_err(|_| Malformed::Value)?;
        Ok(Self {
            status_code: StatusCode::from(NetworkEndian::read_u16(&data[field::STATUS_CODE])),
            status_message: String::from(status_message),
        })
    }

    pub fn data_len(&self) -> usize {
        field::STATUS_MSG.start + self.status_message.len()
    }

    pub fn emit(&self, data: &mut [u8]) {
        NetworkEndian::write_u16(&mut data[field::STATUS_CODE], self.status_code.into());
        data[field::STATUS_MSG].copy_from_slice(self.status_message.as_bytes());
    }
}

impl fmt::Display for StatusRepr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "status-code {} msg '{}'",
            self.status_code, self.status_message
        )
    }
}

/// The contents of a Vendor Class option.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VendorClass {
    pub enterprise_number: u32,
    pub data: Vec<Vec<u8>>,
}

impl VendorClass {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < field::VENDOR_DATA.start {
            return Err(Malformed::Length);
        }
        Ok(Self {
            enterprise_number: NetworkEndian::read_u32(&data[field::ENTERPRISE_NUMBER]),
            data: parse_items(&data[field::VENDOR_DATA])?,
        })
    }

    pub fn data_len(&self) -> usize {
        field::VENDOR_DATA.start + items_len(&self.data)
    }

    pub fn emit(&self, data: &mut [u8]) -> Result<()> {
        NetworkEndian::write_u32(&mut data[field::ENTERPRISE_NUMBER], self.enterprise_number);
        emit_items(&self.data, &mut data[field::VENDOR_DATA])
    }
}

impl fmt::Display for VendorClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "vendor-class enterprise {}", self.enterprise_number)?;
        for item in self.data.iter() {
            write!(f, " {}", HexBytes(item))?;
        }
        Ok(())
    }
}

/// One option inside a Vendor-specific Information option. Codes are
/// scoped by the enterprise number, not by [OptionType].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VendorSubOption {
    pub code: u16,
    pub data: Vec<u8>,
}

/// The contents of a Vendor-specific Information option.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VendorOpts {
    pub enterprise_number: u32,
    pub options: Vec<VendorSubOption>,
}

impl VendorOpts {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < field::VENDOR_DATA.start {
            return Err(Malformed::Length);
        }
        let options = iter_options(&data[field::VENDOR_DATA])
            .map(|item| {
                item.map(|(_, option)| VendorSubOption {
                    code: option.kind.into(),
                    data: option.data.to_vec(),
                })
                .map_err(|_| Malformed::Length)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            enterprise_number: NetworkEndian::read_u32(&data[field::ENTERPRISE_NUMBER]),
            options,
        })
    }

    pub fn data_len(&self) -> usize {
        field::VENDOR_DATA.start
            + self
                .options
                .iter()
                .map(|option| super::dhcpv6::field::HEADER_LEN + option.data.len())
                .sum::<usize>()
    }

    pub fn emit(&self, data: &mut [u8]) -> Result<()> {
        NetworkEndian::write_u32(&mut data[field::ENTERPRISE_NUMBER], self.enterprise_number);
        let mut writer = Dhcpv6OptionWriter::new(&mut data[field::VENDOR_DATA]);
        for option in self.options.iter() {
            writer
                .emit(super::Dhcpv6Option {
                    kind: OptionType::from(option.code),
                    data: &option.data,
                })
                .map_err(|_| Malformed::Value)?;
        }
        Ok(())
    }
}

impl fmt::Display for VendorOpts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "vendor-opts enterprise {}", self.enterprise_number)?;
        for option in self.options.iter() {
            write!(f, " {}={}", option.code, HexBytes(&option.data))?;
        }
        Ok(())
    }
}
