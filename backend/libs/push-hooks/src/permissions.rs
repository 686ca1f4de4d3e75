use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// API permission bitmask granted to an access key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(u32);

impl Permissions {
    pub const NONE: Permissions = Permissions(0);
    pub const CREATE_TOKEN: Permissions = Permissions(1);
    pub const DELETE_TOKEN: Permissions = Permissions(1 << 1);
    pub const SEND_NOTIFICATION: Permissions = Permissions(1 << 2);
    pub const SEND_BROADCAST: Permissions = Permissions(1 << 3);

    /// 0b1111
    pub const ALL: Permissions = Permissions(
        Self::CREATE_TOKEN.0
            | Self::DELETE_TOKEN.0
            | Self::SEND_NOTIFICATION.0
            | Self::SEND_BROADCAST.0,
    );

    pub const fn from_bits(bits: u32) -> Self {
        Permissions(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Self) -> Self::Output {
        Permissions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_union_of_flags() {
        let union = Permissions::CREATE_TOKEN
            | Permissions::DELETE_TOKEN
            | Permissions::SEND_NOTIFICATION
            | Permissions::SEND_BROADCAST;

        assert_eq!(union, Permissions::ALL);
        assert_eq!(Permissions::ALL.bits(), 15);
    }

    #[test]
    fn test_contains() {
        let mut granted = Permissions::CREATE_TOKEN;
        granted |= Permissions::SEND_NOTIFICATION;

        assert!(granted.contains(Permissions::SEND_NOTIFICATION));
        assert!(!granted.contains(Permissions::SEND_BROADCAST));
        assert!(Permissions::ALL.contains(granted));
        assert!(granted.contains(Permissions::NONE));
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Permissions::ALL).unwrap(), "15");
        let parsed: Permissions = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, Permissions::CREATE_TOKEN | Permissions::SEND_NOTIFICATION);
    }
}
