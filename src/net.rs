//! Local address discovery, used to pick the listen address and print a
//! reachable URL.

use std::net::{IpAddr, Ipv4Addr};

use tracing::{debug, warn};

/// The first non-loopback IPv4 address found on the host's interfaces.
pub fn discover_local_ipv4() -> Option<Ipv4Addr> {
    let interfaces = match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            warn!("Failed to list network interfaces: {}", e);
            return None;
        }
    };

    let found = first_lan_ipv4(interfaces.iter().map(|iface| iface.ip()));
    debug!("Discovered local address: {:?}", found);
    found
}

/// Pick the first IPv4 address that is neither loopback nor unspecified,
/// in the order given.
pub fn first_lan_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    })
}

/// Discovered address, or loopback when the host has no usable interface.
pub fn listen_ip() -> IpAddr {
    discover_local_ipv4()
        .map(IpAddr::V4)
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Host part for the printed URL.
pub fn display_host(ip: IpAddr) -> String {
    if ip.is_loopback() {
        "localhost".to_string()
    } else {
        ip.to_string()
    }
}
