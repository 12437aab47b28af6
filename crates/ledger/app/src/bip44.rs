//! BIP-44 path classification and the derivation policy applied by the device
//!
//! A Fantom path has the shape `44'/60'/account'/change/address`. The device
//! denies requests for paths outside that tree and asks the user for extra
//! confirmation when a path is unusual. The same rules are evaluated here so
//! the host can warn, or refuse, before the request reaches the device.

use derive_more::Display;

use crate::path::{ChildIndex, DerivationPath};

/// BIP-44 purpose index
pub const PURPOSE: u32 = 44;

/// SLIP-44 coin type shared with Ethereum
pub const FANTOM_COIN_TYPE: u32 = 60;

/// Accounts at or above this index are considered unusual
pub const MAX_REASONABLE_ACCOUNT: u32 = 10;

/// Address indices above this are considered unusual
pub const MAX_REASONABLE_ADDRESS: u32 = 1_000_000;

/// External chain
pub const CHANGE_EXTERNAL: u32 = 0;

/// Internal (change) chain
pub const CHANGE_INTERNAL: u32 = 1;

const I_PURPOSE: usize = 0;
const I_COIN_TYPE: usize = 1;
const I_ACCOUNT: usize = 2;
const I_CHANGE: usize = 3;
const I_ADDRESS: usize = 4;
const I_REST: usize = 5;

/// Verdict of the derivation policy for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Policy {
    /// The device refuses the request
    #[display("deny ({_0})")]
    Deny(&'static str),
    /// The device shows a warning before asking for confirmation
    #[display("warn ({_0})")]
    Warn(&'static str),
    /// The device asks for confirmation as usual
    #[display("prompt")]
    Prompt,
}

impl Policy {
    /// Reason attached to a deny or warn verdict
    pub const fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Deny(reason) | Self::Warn(reason) => Some(*reason),
            Self::Prompt => None,
        }
    }
}

impl DerivationPath {
    /// Purpose, the first segment
    pub fn purpose(&self) -> Option<ChildIndex> {
        self.get(I_PURPOSE)
    }

    /// Coin type, the second segment
    pub fn coin_type(&self) -> Option<ChildIndex> {
        self.get(I_COIN_TYPE)
    }

    /// Whether the path starts with `44'/60'`
    pub fn has_fantom_prefix(&self) -> bool {
        self.purpose() == ChildIndex::hardened(PURPOSE)
            && self.coin_type() == ChildIndex::hardened(FANTOM_COIN_TYPE)
    }

    /// Account index, the third segment
    pub fn account(&self) -> Option<ChildIndex> {
        self.get(I_ACCOUNT)
    }

    /// Change index, the fourth segment
    pub fn change(&self) -> Option<ChildIndex> {
        self.get(I_CHANGE)
    }

    /// Address index, the fifth segment
    pub fn address_index(&self) -> Option<ChildIndex> {
        self.get(I_ADDRESS)
    }

    /// Account is present, hardened and below [`MAX_REASONABLE_ACCOUNT`]
    pub fn has_reasonable_account(&self) -> bool {
        self.account()
            .is_some_and(|account| account.is_hardened() && account.value() < MAX_REASONABLE_ACCOUNT)
    }

    /// Change is present and is the external or internal chain
    pub fn has_valid_change(&self) -> bool {
        self.change().is_some_and(|change| {
            !change.is_hardened()
                && (change.value() == CHANGE_EXTERNAL || change.value() == CHANGE_INTERNAL)
        })
    }

    /// Address index is present, not hardened and at most [`MAX_REASONABLE_ADDRESS`]
    pub fn has_reasonable_address(&self) -> bool {
        self.address_index()
            .is_some_and(|address| !address.is_hardened() && address.value() <= MAX_REASONABLE_ADDRESS)
    }

    /// Whether there are segments past the address index
    pub fn has_extra_segments(&self) -> bool {
        self.len() > I_REST
    }
}

/// Policy the device applies to GET_PUBLIC_KEY
pub fn policy_for_get_public_key(path: &DerivationPath) -> Policy {
    if !path.has_fantom_prefix() {
        return Policy::Deny("path is not under 44'/60'");
    }
    if path.account().is_none() {
        return Policy::Deny("path has no account index");
    }
    if !path.has_reasonable_account() {
        return Policy::Warn("unusual account index");
    }
    Policy::Prompt
}

/// Policy the device applies to GET_ADDRESS
pub fn policy_for_get_address(path: &DerivationPath) -> Policy {
    if !path.has_fantom_prefix() {
        return Policy::Deny("path is not under 44'/60'");
    }
    if path.change().is_none() {
        return Policy::Deny("path has no change index");
    }
    if path.address_index().is_none() {
        return Policy::Deny("path has no address index");
    }
    if !path.has_reasonable_account() {
        return Policy::Warn("unusual account index");
    }
    if !path.has_valid_change() {
        return Policy::Warn("change index is neither 0 nor 1");
    }
    if !path.has_reasonable_address() {
        return Policy::Warn("unusual address index");
    }
    if path.has_extra_segments() {
        return Policy::Warn("path continues past the address index");
    }
    Policy::Prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> DerivationPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_accessors() {
        let p = path("44'/60'/3'/1/7");
        assert!(p.has_fantom_prefix());
        assert_eq!(p.purpose(), ChildIndex::hardened(44));
        assert_eq!(p.coin_type(), ChildIndex::hardened(60));
        assert_eq!(p.account(), ChildIndex::hardened(3));
        assert_eq!(p.change(), ChildIndex::normal(1));
        assert_eq!(p.address_index(), ChildIndex::normal(7));
        assert!(!p.has_extra_segments());

        let short = path("44'/60'");
        assert!(short.has_fantom_prefix());
        assert_eq!(short.account(), None);
        assert!(!short.has_reasonable_account());
    }

    #[test]
    fn test_fantom_prefix_requires_hardening() {
        assert!(!path("44/60'/0'").has_fantom_prefix());
        assert!(!path("44'/60/0'").has_fantom_prefix());
        assert!(!path("44'/61'/0'").has_fantom_prefix());
        assert!(!path("44'").has_fantom_prefix());
        assert!(!DerivationPath::default().has_fantom_prefix());
    }

    #[test]
    fn test_public_key_policy() {
        assert_eq!(policy_for_get_public_key(&path("44'/60'/0'")), Policy::Prompt);
        assert_eq!(policy_for_get_public_key(&path("44'/60'/9'/0/0")), Policy::Prompt);
        assert!(matches!(
            policy_for_get_public_key(&path("44'/60'")),
            Policy::Deny(_)
        ));
        assert!(matches!(
            policy_for_get_public_key(&path("49'/60'/0'")),
            Policy::Deny(_)
        ));
        assert!(matches!(
            policy_for_get_public_key(&path("44'/60'/10'")),
            Policy::Warn(_)
        ));
        assert!(matches!(
            policy_for_get_public_key(&path("44'/60'/0")),
            Policy::Warn(_)
        ));
    }

    #[test]
    fn test_address_policy() {
        assert_eq!(policy_for_get_address(&path("44'/60'/0'/0/0")), Policy::Prompt);
        assert_eq!(policy_for_get_address(&path("44'/60'/0'/1/1000000")), Policy::Prompt);

        for denied in ["44'/60'/0'", "44'/60'/0'/0", "44'/1'/0'/0/0", ""] {
            assert!(
                matches!(policy_for_get_address(&path(denied)), Policy::Deny(_)),
                "{denied:?} should be denied"
            );
        }

        for warned in [
            "44'/60'/10'/0/0",
            "44'/60'/0/0/0",
            "44'/60'/0'/2/0",
            "44'/60'/0'/0'/0",
            "44'/60'/0'/0/1000001",
            "44'/60'/0'/0/0'",
            "44'/60'/0'/0/0/0",
        ] {
            assert!(
                matches!(policy_for_get_address(&path(warned)), Policy::Warn(_)),
                "{warned:?} should warn"
            );
        }
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(Policy::Prompt.to_string(), "prompt");
        assert_eq!(Policy::Deny("nope").to_string(), "deny (nope)");
        assert_eq!(Policy::Warn("odd").reason(), Some("odd"));
        assert_eq!(Policy::Prompt.reason(), None);
    }
}
