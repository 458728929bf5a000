//! Bitcoin network definitions and the prefix tables used to recognise them.

/// Bitcoin network type, as far as an address can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Bitcoin mainnet
    #[default]
    Mainnet,
    /// Any of the test networks (testnet3, testnet4, signet share prefixes)
    Testnet,
    /// Prefix not recognised
    Unknown,
}

/// Base58Check version bytes: (version, network, is_script_hash).
const BASE58_VERSIONS: [(u8, Network, bool); 4] = [
    (0x00, Network::Mainnet, false),
    (0x05, Network::Mainnet, true),
    (0x6f, Network::Testnet, false),
    (0xc4, Network::Testnet, true),
];

/// Bech32 human-readable parts.
const BECH32_HRPS: [(&str, Network); 2] = [("bc", Network::Mainnet), ("tb", Network::Testnet)];

impl Network {
    /// Get the Bech32 human-readable part for this network.
    pub fn bech32_hrp(&self) -> Option<&'static str> {
        BECH32_HRPS
            .iter()
            .find(|(_, network)| network == self)
            .map(|(hrp, _)| *hrp)
    }

    /// Get the version byte for P2PKH addresses.
    pub fn p2pkh_version(&self) -> Option<u8> {
        self.base58_version(false)
    }

    /// Get the version byte for P2SH addresses.
    pub fn p2sh_version(&self) -> Option<u8> {
        self.base58_version(true)
    }

    fn base58_version(&self, script_hash: bool) -> Option<u8> {
        BASE58_VERSIONS
            .iter()
            .find(|(_, network, is_p2sh)| network == self && *is_p2sh == script_hash)
            .map(|(version, _, _)| *version)
    }

    /// Look up a Base58Check version byte.
    ///
    /// Returns the network and whether the version denotes a script hash,
    /// or `None` for versions that are not P2PKH/P2SH on a known network.
    pub fn from_base58_version(version: u8) -> Option<(Network, bool)> {
        BASE58_VERSIONS
            .iter()
            .find(|(v, _, _)| *v == version)
            .map(|(_, network, is_p2sh)| (*network, *is_p2sh))
    }

    /// Look up a (lower-case) Bech32 human-readable part.
    pub fn from_hrp(hrp: &str) -> Network {
        BECH32_HRPS
            .iter()
            .find(|(h, _)| *h == hrp)
            .map(|(_, network)| *network)
            .unwrap_or(Network::Unknown)
    }

    /// Parse network from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Some(Network::Mainnet),
            "testnet" | "testnet3" | "testnet4" | "test" | "signet" => Some(Network::Testnet),
            _ => None,
        }
    }

    /// Get network name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Unknown => "unknown",
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Mainnet => "Bitcoin Mainnet",
            Network::Testnet => "Bitcoin Testnet",
            Network::Unknown => "Unknown network",
        }
    }
}

impl core::fmt::Display for Network {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_versions() {
        assert_eq!(Network::from_base58_version(0x00), Some((Network::Mainnet, false)));
        assert_eq!(Network::from_base58_version(0x05), Some((Network::Mainnet, true)));
        assert_eq!(Network::from_base58_version(0x6f), Some((Network::Testnet, false)));
        assert_eq!(Network::from_base58_version(0xc4), Some((Network::Testnet, true)));
        assert_eq!(Network::from_base58_version(0x80), None);

        assert_eq!(Network::Testnet.p2sh_version(), Some(0xc4));
        assert_eq!(Network::Mainnet.p2pkh_version(), Some(0x00));
        assert_eq!(Network::Unknown.p2pkh_version(), None);
    }

    #[test]
    fn test_hrp_lookup() {
        assert_eq!(Network::from_hrp("bc"), Network::Mainnet);
        assert_eq!(Network::from_hrp("tb"), Network::Testnet);
        assert_eq!(Network::from_hrp("bcrt"), Network::Unknown);
        assert_eq!(Network::Mainnet.bech32_hrp(), Some("bc"));
        assert_eq!(Network::Unknown.bech32_hrp(), None);
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!(Network::from_str("mainnet"), Some(Network::Mainnet));
        assert_eq!(Network::from_str("MAINNET"), Some(Network::Mainnet));
        assert_eq!(Network::from_str("testnet4"), Some(Network::Testnet));
        assert_eq!(Network::from_str("invalid"), None);
    }
}
