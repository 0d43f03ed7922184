use tracing::warn;

/// Discover a unit on the local network.
///
/// Unimplemented: the units announce themselves only through DHCP and a
/// vendor discovery protocol this driver does not speak. Always returns
/// `None`; the CLI prints the operator guidance for finding a unit by hand.
pub fn autodiscover() -> Option<String> {
    warn!("autodiscovery is not implemented");
    None
}
