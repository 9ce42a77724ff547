use std::str::FromStr;

use nestor_core::version::ToolVersion;

#[test]
fn parse_full_version() {
    let v = ToolVersion::from_str("5.6.4").unwrap();
    assert_eq!(v.semver(), &semver::Version::new(5, 6, 4));
}

#[test]
fn parse_two_component_version() {
    let v = ToolVersion::from_str("6.7").unwrap();
    assert_eq!(v, ToolVersion::from_str("6.7.0").unwrap());
    assert_eq!(v.to_string(), "6.7");
}

#[test]
fn parse_pre_release_counts_as_base() {
    let v = ToolVersion::from_str("7.0-rc-1").unwrap();
    assert!(v.is_pre_release());
    assert_eq!(v, ToolVersion::from_str("7").unwrap());
    assert_eq!(v.to_string(), "7.0-rc-1");
}

#[test]
fn parse_invalid_version() {
    assert!(ToolVersion::from_str("").is_err());
    assert!(ToolVersion::from_str("banana").is_err());
    assert!(ToolVersion::from_str("6.x").is_err());
    assert!(ToolVersion::from_str("1.2.3.4").is_err());
}

#[test]
fn version_ordering() {
    let v1 = ToolVersion::from_str("5.6.4").unwrap();
    let v2 = ToolVersion::from_str("6.0").unwrap();
    let v3 = ToolVersion::from_str("6.7.1").unwrap();
    assert!(v1 < v2);
    assert!(v2 < v3);
}
