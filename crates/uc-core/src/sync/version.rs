use std::cmp::Ordering;

use semver::Version;
use serde::{Deserialize, Serialize};

/// How a peer's app version relates to the local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionRelation {
    EqualTo,
    /// Peer runs an older version
    LowerThan,
    /// Peer runs a newer version
    HigherThan,
}

impl VersionRelation {
    /// Compares two semantic versions. Short forms such as `1.0` are padded
    /// to `1.0.0` and a leading `v` is accepted. Returns `None` when either
    /// side does not parse.
    pub fn between(local: &str, peer: &str) -> Option<Self> {
        let local = parse_version(local)?;
        let peer = parse_version(peer)?;

        Some(match peer.cmp(&local) {
            Ordering::Less => Self::LowerThan,
            Ordering::Equal => Self::EqualTo,
            Ordering::Greater => Self::HigherThan,
        })
    }
}

fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim().trim_start_matches('v');
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(core_end);

    let normalized = match core.split('.').count() {
        1 => format!("{core}.0.0{suffix}"),
        2 => format!("{core}.0{suffix}"),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_between_versions() {
        assert_eq!(VersionRelation::between("1.0", "1.0"), Some(VersionRelation::EqualTo));
        assert_eq!(VersionRelation::between("1.0", "1.0.0"), Some(VersionRelation::EqualTo));
        assert_eq!(VersionRelation::between("1.1", "1.0.9"), Some(VersionRelation::LowerThan));
        assert_eq!(
            VersionRelation::between("1.2.0", "1.10.0"),
            Some(VersionRelation::HigherThan)
        );
        assert_eq!(VersionRelation::between("2", "1.9"), Some(VersionRelation::LowerThan));
    }

    #[test]
    fn test_prefix_and_prerelease() {
        assert_eq!(VersionRelation::between("v2.0.1", "2.0.1"), Some(VersionRelation::EqualTo));
        assert_eq!(
            VersionRelation::between("2.0.1", "2.0.1-beta"),
            Some(VersionRelation::LowerThan)
        );
        assert_eq!(
            VersionRelation::between("1.0", "1.1-rc.1"),
            Some(VersionRelation::HigherThan)
        );
    }

    #[test]
    fn test_unparseable_version_has_no_relation() {
        assert_eq!(VersionRelation::between("1.0", "garbage"), None);
        assert_eq!(VersionRelation::between("1.0", "1.x.0"), None);
        assert_eq!(VersionRelation::between("", "0.0.1"), None);
        assert_eq!(VersionRelation::between("1.0", "1.2.3.4"), None);
    }
}
