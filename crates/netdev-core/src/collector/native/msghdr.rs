//! Decoder for the macOS `if_msghdr2` routing message.
//!
//! `sysctl(CTL_NET, AF_ROUTE, 0, 0, NET_RT_IFLIST2, index)` returns an
//! `if_msghdr2` followed by address messages. Only the header is decoded.
//!
//! Layout (little-endian, no implicit padding):
//!
//! ```text
//! 0   u16 msglen     2  u8 version   3  u8 type     4  i32 addrs
//! 8   i32 flags     12  u16 index   14  [2] pad    16  i32 snd_len
//! 20  i32 snd_maxlen 24 i32 snd_drops 28 i32 timer
//! 32  if_data64: 8 x u8, u32 mtu, u32 metric, u64 baudrate,
//!     u64 ipackets ierrors opackets oerrors collisions ibytes obytes
//!         imcasts omcasts iqdrops noproto,
//!     u32 recvtiming, u32 xmittiming, timeval32 lastchange
//! ```

use crate::collector::native::link::LinkData;
use crate::collector::procfs::parser::ParseError;

/// Size of `if_msghdr2` including its embedded `if_data64`.
pub const IF_MSGHDR2_LEN: usize = 160;

/// `RTM_IFINFO2` message type.
pub const RTM_IFINFO2: u8 = 0x12;

const DATA_OFFSET: usize = 32;
const IPACKETS_OFFSET: usize = DATA_OFFSET + 24;

/// Decoded `if_msghdr2` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfMsghdr2 {
    pub index: u16,
    pub mtu: u32,
    pub data: LinkData,
}

/// Decodes the leading `if_msghdr2` of a `NET_RT_IFLIST2` reply.
pub fn parse_if_msghdr2(buf: &[u8]) -> Result<IfMsghdr2, ParseError> {
    if buf.len() < IF_MSGHDR2_LEN {
        return Err(ParseError::new(format!(
            "if_msghdr2 too short: {} bytes, need {}",
            buf.len(),
            IF_MSGHDR2_LEN
        )));
    }
    if buf[3] != RTM_IFINFO2 {
        return Err(ParseError::new(format!(
            "unexpected routing message type {:#x}",
            buf[3]
        )));
    }

    // if_data64 counters, in declaration order.
    let counter = |n: usize| read_u64(buf, IPACKETS_OFFSET + n * 8);

    Ok(IfMsghdr2 {
        index: read_u16(buf, 12),
        mtu: read_u32(buf, DATA_OFFSET + 8),
        data: LinkData {
            ipackets: counter(0),
            ierrors: counter(1),
            opackets: counter(2),
            oerrors: counter(3),
            ibytes: counter(5),
            obytes: counter(6),
            imcasts: counter(7),
            omcasts: counter(8),
            iqdrops: counter(9),
            // if_data64 has no output drop counter
            oqdrops: 0,
        },
    })
}

fn read_u16(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

fn read_u32(buf: &[u8], off: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[off..off + 4]);
    u32::from_le_bytes(b)
}

fn read_u64(buf: &[u8], off: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[off..off + 8]);
    u64::from_le_bytes(b)
}
