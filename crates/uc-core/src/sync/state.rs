use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Connection state of one peer
///
/// Transitions are driven by the network layer; the registry only records
/// them and uses `Connected` to decide whether an unchanged announcement
/// still needs a refresh.
///
/// ```text
/// Disconnected ──► Connecting ──► Connected ──► Disconnecting ──► Disconnected
///                      │
///                      └──► Unverified (trust missing or handshake required)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncState {
    Disconnecting,
    Disconnected,
    Connecting,
    Connected,
    Unverified,
}

impl SyncState {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnecting => "DISCONNECTING",
            Self::Disconnected => "DISCONNECTED",
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Unverified => "UNVERIFIED",
        }
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::Disconnected
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DISCONNECTING" => Ok(Self::Disconnecting),
            "DISCONNECTED" => Ok(Self::Disconnected),
            "CONNECTING" => Ok(Self::Connecting),
            "CONNECTED" => Ok(Self::Connected),
            "UNVERIFIED" => Ok(Self::Unverified),
            other => Err(format!("unknown sync state: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_form_matches_serde() {
        for state in [
            SyncState::Disconnecting,
            SyncState::Disconnected,
            SyncState::Connecting,
            SyncState::Connected,
            SyncState::Unverified,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
            assert_eq!(state.as_str().parse::<SyncState>().unwrap(), state);
        }
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        assert!("ONLINE".parse::<SyncState>().is_err());
    }
}
