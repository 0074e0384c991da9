//! `getifaddrs(3)` source for FreeBSD, DragonFly and OpenBSD.

use std::ffi::CStr;
use std::io;
use std::marker::PhantomData;

use crate::collector::counter::CounterStats;
use crate::collector::error::CollectError;
use crate::collector::filter::DeviceFilter;
use crate::collector::native::link::{LinkData, LinkProfile};
use crate::collector::native::walk::{LinkEntry, collect_entries};
use crate::collector::traits::NetDevSource;

/// Owned `getifaddrs` list, freed on drop.
struct IfAddrs {
    head: *mut libc::ifaddrs,
}

impl IfAddrs {
    fn new() -> io::Result<Self> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
        // SAFETY: getifaddrs writes a list head we own until freeifaddrs.
        if unsafe { libc::getifaddrs(&mut head) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { head })
    }

    fn iter(&self) -> IfAddrsIter<'_> {
        IfAddrsIter {
            current: self.head,
            _list: PhantomData,
        }
    }
}

impl Drop for IfAddrs {
    fn drop(&mut self) {
        // SAFETY: head came from a successful getifaddrs and is freed once.
        unsafe { libc::freeifaddrs(self.head) };
    }
}

struct IfAddrsIter<'a> {
    current: *mut libc::ifaddrs,
    _list: PhantomData<&'a IfAddrs>,
}

impl<'a> Iterator for IfAddrsIter<'a> {
    type Item = &'a libc::ifaddrs;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_null() {
            return None;
        }
        // SAFETY: entries live as long as the borrowed IfAddrs.
        let entry = unsafe { &*self.current };
        self.current = entry.ifa_next;
        Some(entry)
    }
}

#[allow(clippy::unnecessary_cast)]
fn link_data(data: &libc::if_data) -> LinkData {
    LinkData {
        ipackets: data.ifi_ipackets as u64,
        ierrors: data.ifi_ierrors as u64,
        opackets: data.ifi_opackets as u64,
        oerrors: data.ifi_oerrors as u64,
        ibytes: data.ifi_ibytes as u64,
        obytes: data.ifi_obytes as u64,
        imcasts: data.ifi_imcasts as u64,
        omcasts: data.ifi_omcasts as u64,
        iqdrops: data.ifi_iqdrops as u64,
        #[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
        oqdrops: data.ifi_oqdrops as u64,
        #[cfg(target_os = "openbsd")]
        oqdrops: 0,
    }
}

/// Collects link-layer counters from the `getifaddrs` list.
#[derive(Debug, Clone, Copy)]
pub struct IfaddrsSource {
    profile: LinkProfile,
}

impl IfaddrsSource {
    pub fn new() -> Self {
        #[cfg(target_os = "openbsd")]
        let profile = LinkProfile::OpenBsd;
        #[cfg(not(target_os = "openbsd"))]
        let profile = LinkProfile::FreeBsd;
        Self { profile }
    }
}

impl Default for IfaddrsSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the address list into owned entries and releases it.
fn entries() -> io::Result<Vec<LinkEntry>> {
    let list = IfAddrs::new()?;

    let entries = list
        .iter()
        .filter(|entry| !entry.ifa_addr.is_null())
        .map(|entry| {
            // SAFETY: ifa_addr checked non-null above.
            let family = unsafe { (*entry.ifa_addr).sa_family } as i32;
            let link = family == libc::AF_LINK;
            // SAFETY: ifa_name is a NUL-terminated string owned by the list.
            let name = unsafe { CStr::from_ptr(entry.ifa_name) }
                .to_string_lossy()
                .into_owned();
            let data = (link && !entry.ifa_data.is_null()).then(|| {
                // SAFETY: AF_LINK entries carry a struct if_data in ifa_data.
                link_data(unsafe { &*(entry.ifa_data as *const libc::if_data) })
            });
            LinkEntry { name, link, data }
        })
        .collect();

    Ok(entries)
}

impl NetDevSource for IfaddrsSource {
    fn collect(&self, filter: &DeviceFilter, stats: &CounterStats) -> Result<(), CollectError> {
        collect_entries(entries()?, self.profile, filter, stats)
    }
}
