// See https://datatracker.ietf.org/doc/html/rfc8415#section-11 for DUIDs,
// and https://datatracker.ietf.org/doc/html/rfc6355 for DUID-UUID.

use byteorder::{ByteOrder, NetworkEndian};
use core::fmt;
use heapless::Vec;

use super::{Error, HexBytes, Result};
use crate::time::Instant;

/// The longest DUID body allowed, not counting its 2-octet type code.
pub const MAX_DUID_LEN: usize = 128;

/// 2000-01-01T00:00:00Z, the origin of the DUID-LLT time field, in Unix seconds.
pub const DUID_EPOCH_UNIX_SECS: i64 = 946_684_800;

/// The IANA hardware type for Ethernet.
pub const HARDWARE_TYPE_ETHERNET: u16 = 1;

enum_with_unknown! {
    /// The type code heading every DUID.
    pub enum DuidType(u16) {
        LinkLayerTime = 1,
        Enterprise = 2,
        LinkLayer = 3,
        Uuid = 4,
    }
}

impl fmt::Display for DuidType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::LinkLayerTime => write!(f, "hwaddr/time"),
            Self::Enterprise => write!(f, "enterprise"),
            Self::LinkLayer => write!(f, "hwaddr"),
            Self::Uuid => write!(f, "uuid"),
            Self::Unknown(a) => write!(f, "unknown({a})"),
        }
    }
}

// A DUID has no length of its own: it fills whatever the enclosing option
// body leaves, and its last field takes up the rest.
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         DUID-Type (1)         |    hardware type (16 bits)    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                        time (32 bits)                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// .                                                               .
// .             link-layer address (variable length)              .
// .                                                               .
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// DUID-EN is the type (2), a 32-bit enterprise number and an identifier;
// DUID-LL is the type (3), a hardware type and a link-layer address;
// DUID-UUID is the type (4) and a 128-bit UUID.
mod field {
    #![allow(non_snake_case)]
    #![allow(unused)]

    use crate::wire::field::*;

    pub const TYPE: Field = 0..2;
    pub const BODY: Rest = 2..;

    pub const LLT_HW_TYPE: Field = 2..4;
    pub const LLT_TIME: Field = 4..8;
    pub const LLT_ADDR: Rest = 8..;

    pub const EN_NUMBER: Field = 2..6;
    pub const EN_IDENTIFIER: Rest = 6..;

    pub const LL_HW_TYPE: Field = 2..4;
    pub const LL_ADDR: Rest = 4..;

    pub const UUID: Field = 2..18;
}

/// A DHCP Unique Identifier.
///
/// The time of a link-layer-plus-time DUID is kept with second precision
/// only; emitting truncates any sub-second part, and parsing never
/// produces one.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Duid {
    /// DUID-LLT: link-layer address plus the time it was generated.
    LinkLayerTime {
        hardware_type: u16,
        time: Instant,
        link_layer_addr: Vec<u8, MAX_DUID_LEN>,
    },
    /// DUID-EN: assigned by a vendor, based on its enterprise number.
    Enterprise {
        enterprise_number: u32,
        identifier: Vec<u8, MAX_DUID_LEN>,
    },
    /// DUID-LL: link-layer address.
    LinkLayer {
        hardware_type: u16,
        link_layer_addr: Vec<u8, MAX_DUID_LEN>,
    },
    /// DUID-UUID.
    Uuid { uuid: [u8; 16] },
    /// A DUID type without a known layout, kept verbatim.
    Unknown {
        kind: u16,
        data: Vec<u8, MAX_DUID_LEN>,
    },
}

impl Duid {
    /// Parse a DUID filling all of `data`.
    pub fn parse(data: &[u8]) -> Result<Duid> {
        if data.len() < field::BODY.start || data.len() - field::BODY.start > MAX_DUID_LEN {
            return Err(Error::MalformedIdentifier);
        }

        let kind = NetworkEndian::read_u16(&data[field::TYPE]);
        let duid = match (DuidType::from(kind), data.len()) {
            (DuidType::LinkLayerTime, len) if len >= field::LLT_ADDR.start => {
                let secs = NetworkEndian::read_u32(&data[field::LLT_TIME]);
                Duid::LinkLayerTime {
                    hardware_type: NetworkEndian::read_u16(&data[field::LLT_HW_TYPE]),
                    time: Instant::from_secs(DUID_EPOCH_UNIX_SECS + i64::from(secs)),
                    link_layer_addr: octets(&data[field::LLT_ADDR])?,
                }
            }
            (DuidType::Enterprise, len) if len >= field::EN_IDENTIFIER.start => {
                Duid::Enterprise {
                    enterprise_number: NetworkEndian::read_u32(&data[field::EN_NUMBER]),
                    identifier: octets(&data[field::EN_IDENTIFIER])?,
                }
            }
            (DuidType::LinkLayer, len) if len >= field::LL_ADDR.start => Duid::LinkLayer {
                hardware_type: NetworkEndian::read_u16(&data[field::LL_HW_TYPE]),
                link_layer_addr: octets(&data[field::LL_ADDR])?,
            },
            (DuidType::Uuid, len) if len == field::UUID.end => {
                let mut uuid = [0; 16];
                uuid.copy_from_slice(&data[field::UUID]);
                Duid::Uuid { uuid }
            }
            (DuidType::Unknown(kind), _) => Duid::Unknown {
                kind,
                data: octets(&data[field::BODY])?,
            },
            (kind, len) => {
                net_debug!("DHCPv6 DUID of type {} is {} octets long", kind, len);
                return Err(Error::MalformedIdentifier);
            }
        };
        Ok(duid)
    }

    /// Build a DUID-LLT for a link-layer address, stamped with `time`.
    pub fn link_layer_time(hardware_type: u16, time: Instant, addr: &[u8]) -> Result<Duid> {
        if addr.len() > MAX_DUID_LEN - (field::LLT_ADDR.start - field::BODY.start) {
            return Err(Error::MalformedIdentifier);
        }
        Ok(Duid::LinkLayerTime {
            hardware_type,
            time,
            link_layer_addr: octets(addr)?,
        })
    }

    /// Build a DUID-LLT for a link-layer address, stamped with the current time.
    #[cfg(feature = "std")]
    pub fn link_layer_time_now(hardware_type: u16, addr: &[u8]) -> Result<Duid> {
        Self::link_layer_time(hardware_type, Instant::now(), addr)
    }

    /// Build a DUID-LL for a link-layer address.
    pub fn link_layer(hardware_type: u16, addr: &[u8]) -> Result<Duid> {
        if addr.len() > MAX_DUID_LEN - (field::LL_ADDR.start - field::BODY.start) {
            return Err(Error::MalformedIdentifier);
        }
        Ok(Duid::LinkLayer {
            hardware_type,
            link_layer_addr: octets(addr)?,
        })
    }

    pub fn duid_type(&self) -> DuidType {
        match self {
            Duid::LinkLayerTime { .. } => DuidType::LinkLayerTime,
            Duid::Enterprise { .. } => DuidType::Enterprise,
            Duid::LinkLayer { .. } => DuidType::LinkLayer,
            Duid::Uuid { .. } => DuidType::Uuid,
            Duid::Unknown { kind, .. } => DuidType::from(*kind),
        }
    }

    /// The time field of a DUID-LLT as it appears on the wire: seconds since
    /// 2000-01-01T00:00:00Z, modulo 2^32.
    pub fn time_field(&self) -> Option<u32> {
        match self {
            Duid::LinkLayerTime { time, .. } => {
                Some((time.secs() - DUID_EPOCH_UNIX_SECS).rem_euclid(1 << 32) as u32)
            }
            _ => None,
        }
    }

    /// Return the length of the DUID on the wire.
    pub fn buffer_len(&self) -> usize {
        match self {
            Duid::LinkLayerTime {
                link_layer_addr, ..
            } => field::LLT_ADDR.start + link_layer_addr.len(),
            Duid::Enterprise { identifier, .. } => field::EN_IDENTIFIER.start + identifier.len(),
            Duid::LinkLayer {
                link_layer_addr, ..
            } => field::LL_ADDR.start + link_layer_addr.len(),
            Duid::Uuid { .. } => field::UUID.end,
            Duid::Unknown { data, .. } => field::BODY.start + data.len(),
        }
    }

    /// Emit the DUID into `buffer`, which must be exactly `buffer_len()` octets long.
    ///
    /// Fails without writing anything if the body after the type code is
    /// longer than [MAX_DUID_LEN], since such a DUID would not parse back.
    pub fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if self.buffer_len() - field::BODY.start > MAX_DUID_LEN {
            net_debug!("DHCPv6 DUID body of {} octets is too long", self.buffer_len());
            return Err(Error::MalformedIdentifier);
        }

        NetworkEndian::write_u16(&mut buffer[field::TYPE], self.duid_type().into());
        match self {
            Duid::LinkLayerTime {
                hardware_type,
                link_layer_addr,
                ..
            } => {
                NetworkEndian::write_u16(&mut buffer[field::LLT_HW_TYPE], *hardware_type);
                NetworkEndian::write_u32(
                    &mut buffer[field::LLT_TIME],
                    self.time_field().unwrap_or_default(),
                );
                buffer[field::LLT_ADDR].copy_from_slice(link_layer_addr);
            }
            Duid::Enterprise {
                enterprise_number,
                identifier,
            } => {
                NetworkEndian::write_u32(&mut buffer[field::EN_NUMBER], *enterprise_number);
                buffer[field::EN_IDENTIFIER].copy_from_slice(identifier);
            }
            Duid::LinkLayer {
                hardware_type,
                link_layer_addr,
            } => {
                NetworkEndian::write_u16(&mut buffer[field::LL_HW_TYPE], *hardware_type);
                buffer[field::LL_ADDR].copy_from_slice(link_layer_addr);
            }
            Duid::Uuid { uuid } => buffer[field::UUID].copy_from_slice(uuid),
            Duid::Unknown { data, .. } => buffer[field::BODY].copy_from_slice(data),
        }
        Ok(())
    }
}

fn octets(data: &[u8]) -> Result<Vec<u8, MAX_DUID_LEN>> {
    Vec::from_slice(data).map_err(|_| Error::MalformedIdentifier)
}

impl fmt::Display for Duid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Duid::LinkLayerTime {
                hardware_type,
                link_layer_addr,
                ..
            } => write!(
                f,
                "hwaddr/time type {} time {} {}",
                hardware_type,
                self.time_field().unwrap_or_default(),
                HexBytes(link_layer_addr)
            ),
            Duid::Enterprise {
                enterprise_number,
                identifier,
            } => write!(
                f,
                "enterprise number {} id {}",
                enterprise_number,
                HexBytes(identifier)
            ),
            Duid::LinkLayer {
                hardware_type,
                link_layer_addr,
            } => write!(
                f,
                "hwaddr type {} {}",
                hardware_type,
                HexBytes(link_layer_addr)
            ),
            Duid::Uuid { uuid } => {
                write!(f, "uuid ")?;
                for (i, octet) in uuid.iter().enumerate() {
                    if i == 4 || i == 6 || i == 8 || i == 10 {
                        write!(f, "-")?;
                    }
                    write!(f, "{octet:02x}")?;
                }
                Ok(())
            }
            Duid::Unknown { kind, data } => {
                write!(f, "unknown type {} {}", kind, HexBytes(data))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static LLT_BYTES: [u8; 14] = [
        0x00, 0x01, 0x00, 0x01, 0x1d, 0xcd, 0x65, 0x00, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
    ];

    static EN_BYTES: [u8; 10] = [0x00, 0x02, 0x00, 0x00, 0x00, 0x09, 0x0c, 0xc0, 0x84, 0xd3];

    static LL_BYTES: [u8; 10] = [0x00, 0x03, 0x00, 0x01, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55];

    static UUID_BYTES: [u8; 18] = [
        0x00, 0x04, 0x12, 0x3e, 0x45, 0x67, 0xe8, 0x9b, 0x12, 0xd3, 0xa4, 0x56, 0x42, 0x66, 0x14,
        0x17, 0x40, 0x00,
    ];

    fn emit_to_vec(duid: &Duid) -> std::vec::Vec<u8> {
        let mut bytes = vec![0; duid.buffer_len()];
        duid.emit(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_parse_llt() {
        let duid = Duid::parse(&LLT_BYTES).unwrap();
        assert_eq!(duid.duid_type(), DuidType::LinkLayerTime);
        assert_eq!(
            duid,
            Duid::LinkLayerTime {
                hardware_type: HARDWARE_TYPE_ETHERNET,
                time: Instant::from_secs(DUID_EPOCH_UNIX_SECS + 500000000),
                link_layer_addr: Vec::from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]).unwrap(),
            }
        );
        assert_eq!(duid.time_field(), Some(500000000));
        assert_eq!(duid.buffer_len(), 14);
        assert_eq!(
            duid.to_string(),
            "hwaddr/time type 1 time 500000000 aa:bb:cc:dd:ee:ff"
        );
        assert_eq!(emit_to_vec(&duid), &LLT_BYTES[..]);
    }

    #[test]
    fn test_construct_llt() {
        // Sub-second precision does not survive on the wire.
        let time = Instant::from_micros((DUID_EPOCH_UNIX_SECS + 500000000) * 1000000 + 750000);
        let duid = Duid::link_layer_time(
            HARDWARE_TYPE_ETHERNET,
            time,
            &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
        )
        .unwrap();
        assert_eq!(emit_to_vec(&duid), &LLT_BYTES[..]);
    }

    #[test]
    fn test_llt_time_wraps() {
        let time = Instant::from_secs(DUID_EPOCH_UNIX_SECS + (1 << 32) + 5);
        let duid = Duid::link_layer_time(HARDWARE_TYPE_ETHERNET, time, &[]).unwrap();
        assert_eq!(duid.time_field(), Some(5));

        let time = Instant::from_secs(DUID_EPOCH_UNIX_SECS - 1);
        let duid = Duid::link_layer_time(HARDWARE_TYPE_ETHERNET, time, &[]).unwrap();
        assert_eq!(duid.time_field(), Some(u32::MAX));
    }

    #[test]
    fn test_llt_addr_len_inferred() {
        // An 8-octet DUID-LLT has an empty link-layer address.
        let duid = Duid::parse(&LLT_BYTES[..8]).unwrap();
        assert_eq!(duid.to_string(), "hwaddr/time type 1 time 500000000 ");

        // And a longer one takes everything after the fixed fields.
        let mut bytes = LLT_BYTES.to_vec();
        bytes.extend_from_slice(&[0x01, 0x02]);
        let duid = Duid::parse(&bytes).unwrap();
        assert_eq!(
            duid.to_string(),
            "hwaddr/time type 1 time 500000000 aa:bb:cc:dd:ee:ff:01:02"
        );
        assert_eq!(emit_to_vec(&duid), bytes);
    }

    #[test]
    fn test_parse_en() {
        let duid = Duid::parse(&EN_BYTES).unwrap();
        assert_eq!(
            duid,
            Duid::Enterprise {
                enterprise_number: 9,
                identifier: Vec::from_slice(&[0x0c, 0xc0, 0x84, 0xd3]).unwrap(),
            }
        );
        assert_eq!(duid.to_string(), "enterprise number 9 id 0c:c0:84:d3");
        assert_eq!(emit_to_vec(&duid), &EN_BYTES[..]);
    }

    #[test]
    fn test_parse_ll() {
        let duid = Duid::parse(&LL_BYTES).unwrap();
        assert_eq!(
            duid,
            Duid::link_layer(HARDWARE_TYPE_ETHERNET, &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55])
                .unwrap()
        );
        assert_eq!(duid.to_string(), "hwaddr type 1 00:11:22:33:44:55");
        assert_eq!(emit_to_vec(&duid), &LL_BYTES[..]);
    }

    #[test]
    fn test_parse_uuid() {
        let duid = Duid::parse(&UUID_BYTES).unwrap();
        assert_eq!(duid.duid_type(), DuidType::Uuid);
        assert_eq!(
            duid.to_string(),
            "uuid 123e4567-e89b-12d3-a456-426614174000"
        );
        assert_eq!(emit_to_vec(&duid), &UUID_BYTES[..]);

        // A UUID is exactly 16 octets.
        assert_eq!(
            Duid::parse(&UUID_BYTES[..17]),
            Err(Error::MalformedIdentifier)
        );
        let mut bytes = UUID_BYTES.to_vec();
        bytes.push(0);
        assert_eq!(Duid::parse(&bytes), Err(Error::MalformedIdentifier));
    }

    #[test]
    fn test_parse_unknown() {
        let bytes = [0x00, 0x09, 0x01, 0x02, 0x03];
        let duid = Duid::parse(&bytes).unwrap();
        assert_eq!(duid.duid_type(), DuidType::Unknown(9));
        assert_eq!(duid.to_string(), "unknown type 9 01:02:03");
        assert_eq!(emit_to_vec(&duid), &bytes[..]);
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(Duid::parse(&[]), Err(Error::MalformedIdentifier));
        assert_eq!(Duid::parse(&[0x00]), Err(Error::MalformedIdentifier));
        assert_eq!(
            Duid::parse(&LLT_BYTES[..7]),
            Err(Error::MalformedIdentifier)
        );
        assert_eq!(Duid::parse(&EN_BYTES[..5]), Err(Error::MalformedIdentifier));
        assert_eq!(Duid::parse(&LL_BYTES[..3]), Err(Error::MalformedIdentifier));
    }

    #[test]
    fn test_parse_too_long() {
        let mut bytes = vec![0x00, 0x03, 0x00, 0x01];
        bytes.resize(2 + MAX_DUID_LEN, 0xaa);
        assert!(Duid::parse(&bytes).is_ok());
        bytes.push(0xaa);
        assert_eq!(Duid::parse(&bytes), Err(Error::MalformedIdentifier));
    }

    #[test]
    fn test_emit_too_long() {
        // Enterprise number plus identifier fills the body exactly.
        let duid = Duid::Enterprise {
            enterprise_number: 9,
            identifier: Vec::from_slice(&[0xab; MAX_DUID_LEN - 4]).unwrap(),
        };
        let bytes = emit_to_vec(&duid);
        assert_eq!(bytes.len(), 2 + MAX_DUID_LEN);
        assert_eq!(Duid::parse(&bytes), Ok(duid));

        // One octet more would not parse back, so it does not emit.
        let duid = Duid::Enterprise {
            enterprise_number: 9,
            identifier: Vec::from_slice(&[0xab; MAX_DUID_LEN - 3]).unwrap(),
        };
        let mut bytes = vec![0; duid.buffer_len()];
        assert_eq!(duid.emit(&mut bytes), Err(Error::MalformedIdentifier));
        assert!(bytes.iter().all(|&b| b == 0));

        let duid = Duid::LinkLayerTime {
            hardware_type: HARDWARE_TYPE_ETHERNET,
            time: Instant::ZERO,
            link_layer_addr: Vec::from_slice(&[0xab; MAX_DUID_LEN]).unwrap(),
        };
        let mut bytes = vec![0; duid.buffer_len()];
        assert_eq!(duid.emit(&mut bytes), Err(Error::MalformedIdentifier));

        let duid = Duid::Unknown {
            kind: 9,
            data: Vec::from_slice(&[0xab; MAX_DUID_LEN]).unwrap(),
        };
        assert_eq!(Duid::parse(&emit_to_vec(&duid)), Ok(duid));
    }
}
