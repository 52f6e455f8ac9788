//! Reverse proxies allowed to report the client address.

use std::{env, net::IpAddr};
use tracing::warn;

/// Peers whose forwarding headers (`X-Forwarded-For` and friends) are believed
///
/// Empty by default, in which case audit events record the socket peer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrustedProxies {
    addrs: Vec<IpAddr>,
}

impl TrustedProxies {
    pub fn new(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            addrs: addrs.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list of IP addresses. Invalid entries are skipped.
    pub fn parse(list: &str) -> Self {
        let addrs = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match entry.parse::<IpAddr>() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!(entry, "Skipping invalid TRUSTED_PROXIES entry");
                    None
                }
            })
            .collect();
        Self { addrs }
    }

    /// Load the list from `TRUSTED_PROXIES`
    pub fn from_env() -> Self {
        env::var("TRUSTED_PROXIES")
            .map(|list| Self::parse(&list))
            .unwrap_or_default()
    }

    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.addrs.contains(addr)
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_invalid_entries() {
        let proxies = TrustedProxies::parse("10.0.0.1, ::1,not-an-ip,,10.0.0.2:80");
        assert!(proxies.contains(&"10.0.0.1".parse().unwrap()));
        assert!(proxies.contains(&"::1".parse().unwrap()));
        assert!(!proxies.contains(&"10.0.0.2".parse().unwrap()));
    }

    #[test]
    fn test_default_trusts_nobody() {
        let proxies = TrustedProxies::default();
        assert!(proxies.is_empty());
        assert!(!proxies.contains(&"127.0.0.1".parse().unwrap()));
    }
}
