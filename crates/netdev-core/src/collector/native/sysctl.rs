//! macOS source: interface index list plus one routing sysctl per device.

use std::ffi::CStr;
use std::io;

use crate::collector::counter::CounterStats;
use crate::collector::error::CollectError;
use crate::collector::filter::DeviceFilter;
use crate::collector::native::link::LinkProfile;
use crate::collector::native::msghdr::{IfMsghdr2, parse_if_msghdr2};
use crate::collector::native::walk::collect_indexed;
use crate::collector::traits::NetDevSource;

/// Owned `if_nameindex` array, freed on drop.
struct NameIndex {
    head: *mut libc::if_nameindex,
}

impl NameIndex {
    fn new() -> io::Result<Self> {
        // SAFETY: returns an array we own until if_freenameindex, or null.
        let head = unsafe { libc::if_nameindex() };
        if head.is_null() {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { head })
    }

    /// Copies the `(index, name)` pairs out of the OS array.
    fn to_vec(&self) -> Vec<(u32, String)> {
        let mut out = Vec::new();
        let mut cur = self.head;
        loop {
            // SAFETY: the array is terminated by an entry with index 0 and null name.
            let entry = unsafe { &*cur };
            if entry.if_index == 0 || entry.if_name.is_null() {
                break;
            }
            // SAFETY: if_name is a NUL-terminated string owned by the array.
            let name = unsafe { CStr::from_ptr(entry.if_name) }
                .to_string_lossy()
                .into_owned();
            out.push((entry.if_index, name));
            // SAFETY: not past the terminator yet.
            cur = unsafe { cur.add(1) };
        }
        out
    }
}

impl Drop for NameIndex {
    fn drop(&mut self) {
        // SAFETY: head came from a successful if_nameindex and is freed once.
        unsafe { libc::if_freenameindex(self.head) };
    }
}

fn interfaces() -> io::Result<Vec<(u32, String)>> {
    let list = NameIndex::new()?;
    Ok(list.to_vec())
}

/// Fetches the `if_msghdr2` of one interface.
fn iface_data(index: u32) -> io::Result<IfMsghdr2> {
    let mut mib: [libc::c_int; 6] = [
        libc::CTL_NET,
        libc::AF_ROUTE,
        0,
        0,
        libc::NET_RT_IFLIST2,
        index as libc::c_int,
    ];

    let mut len: libc::size_t = 0;
    // SAFETY: size probe, no output buffer.
    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            std::ptr::null_mut(),
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }

    let mut buf = vec![0u8; len];
    // SAFETY: buf holds len bytes; the kernel writes at most len and updates it.
    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            buf.as_mut_ptr().cast(),
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    buf.truncate(len);

    parse_if_msghdr2(&buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Collects counters through `NET_RT_IFLIST2`.
///
/// Failing to list interfaces is fatal; a failed per-device query only
/// skips that device.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysctlSource;

impl SysctlSource {
    pub fn new() -> Self {
        Self
    }
}

impl NetDevSource for SysctlSource {
    fn collect(&self, filter: &DeviceFilter, stats: &CounterStats) -> Result<(), CollectError> {
        collect_indexed(
            interfaces(),
            |index| iface_data(index).map(|hdr| hdr.data),
            LinkProfile::Darwin,
            filter,
            stats,
        )
    }
}
