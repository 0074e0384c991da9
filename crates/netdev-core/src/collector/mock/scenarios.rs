//! Pre-built mock filesystem scenarios for testing.

use super::filesystem::MockFs;

/// Captured `/proc/net/dev` with the awkward names seen in the wild:
/// veth pairs, an alias with a colon in its name and a non-ASCII name.
const NET_DEV_FIXTURE: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
vethf345468:     648       8    0    0    0     0          0         0      438       5    0    0    0     0       0          0
    lo: 1664039048 1566805    0    0    0     0          0         0 1664039048 1566805    0    0    0     0       0          0
docker0:   64910     168    0    0    0     0          0         0  2131428   31112    0    0    0     0       0          0
  eth0: 68210035552 520993275    0    0    0     0          0         0 9315587528 43451486    0    0    0     0       0          0
lxcbr0:       0       0    0    0    0     0          0         0     2630      17    0    0    0     0       0          0
 wlan0: 10437182923 13899359    0    0    0     0          0         0 2851649360 11726200    0    0    0     0       0          0
  tun0:    1888      24    0    0    0     0          0         0    67120     934    0    0    0     0       0          0
veth4B09XN:     648       8    0    0    0     0          0         0     1943      14    0    0    0     0       0          0
ibr10:30:       0       0    0    0    0     0          0         0        0       0    0    0    0     0       0          0
flannel.1: 18144009813 20844600    0    0    0     0          0         0 2394880405 14578036    0   64    0     0       0          0
 💩0:   57750     104    0    0    0     0          0        72    48282     104    0    0    0     0       0          0
";

impl MockFs {
    /// Creates a filesystem holding the captured fixture at `/proc/net/dev`.
    ///
    /// Eleven devices; nine of them survive a `^veth` ignore pattern.
    pub fn net_dev_fixture() -> Self {
        let mut fs = Self::new();
        fs.add_file("/proc/net/dev", NET_DEV_FIXTURE);
        fs
    }
}
