//! Network reachability check.
//!
//! Detail and location lookups ask [`ConnectivityProbe::has_connectivity`]
//! before every navigation to pick between the network and the cache. The
//! answer is never cached.

use std::fs;
use std::path::{Path, PathBuf};

/// Default sysfs directory listing network interfaces on Linux.
pub const SYSFS_NET_DIR: &str = "/sys/class/net";

/// Interface name prefixes used by cellular modems.
const CELLULAR_PREFIXES: &[&str] = &["wwan", "rmnet", "ccmni", "usb"];

/// ARPHRD_ETHER from `<linux/if_arp.h>`.
const ARPHRD_ETHER: &str = "1";

/// Kind of link an active interface runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Wifi,
    Cellular,
    Ethernet,
    /// Loopback, tunnels, bridges and other virtual links.
    Other,
}

impl Transport {
    /// Only physical WiFi, cellular and Ethernet links count as connectivity.
    pub fn is_usable(self) -> bool {
        !matches!(self, Transport::Other)
    }
}

/// Platform query for the transports that are currently up.
pub trait ConnectivityProbe: Send + Sync {
    fn active_transports(&self) -> Vec<Transport>;

    fn has_connectivity(&self) -> bool {
        self.active_transports().into_iter().any(Transport::is_usable)
    }
}

/// `true` iff `probe` reports at least one usable transport.
pub fn has_connectivity(probe: &dyn ConnectivityProbe) -> bool {
    probe.has_connectivity()
}

// ---------------------------------------------------------------------------
// FixedProbe
// ---------------------------------------------------------------------------

/// Always reports the configured state. Used for forced offline/online modes.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe {
    online: bool,
}

impl FixedProbe {
    pub fn online() -> Self {
        Self { online: true }
    }

    pub fn offline() -> Self {
        Self { online: false }
    }
}

impl ConnectivityProbe for FixedProbe {
    fn active_transports(&self) -> Vec<Transport> {
        if self.online {
            vec![Transport::Ethernet]
        } else {
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// SysfsProbe
// ---------------------------------------------------------------------------

/// Reads interface state from `/sys/class/net`.
///
/// An interface is active when `operstate` is `up` and `carrier` is `1`.
#[derive(Debug, Clone)]
pub struct SysfsProbe {
    root: PathBuf,
}

impl SysfsProbe {
    pub fn new() -> Self {
        Self::with_root(SYSFS_NET_DIR)
    }

    /// Probe an alternate sysfs tree.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityProbe for SysfsProbe {
    fn active_transports(&self) -> Vec<Transport> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(root = %self.root.display(), error = %e, "Cannot list network interfaces");
                return Vec::new();
            }
        };

        entries
            .filter_map(Result::ok)
            .filter(|entry| is_active(&entry.path()))
            .map(|entry| classify(&entry.file_name().to_string_lossy(), &entry.path()))
            .collect()
    }
}

fn read_attr(dir: &Path, attr: &str) -> Option<String> {
    fs::read_to_string(dir.join(attr))
        .ok()
        .map(|s| s.trim().to_string())
}

fn is_active(dir: &Path) -> bool {
    read_attr(dir, "operstate").as_deref() == Some("up")
        && read_attr(dir, "carrier").as_deref() == Some("1")
}

fn classify(name: &str, dir: &Path) -> Transport {
    if name == "lo" {
        return Transport::Other;
    }
    if dir.join("wireless").exists() || dir.join("phy80211").exists() {
        return Transport::Wifi;
    }
    if CELLULAR_PREFIXES.iter().any(|p| name.starts_with(p)) {
        return Transport::Cellular;
    }
    // Virtual links (bridges, veth, docker) have no backing `device`.
    if read_attr(dir, "type").as_deref() == Some(ARPHRD_ETHER) && dir.join("device").exists() {
        return Transport::Ethernet;
    }
    Transport::Other
}
