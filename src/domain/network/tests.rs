//! Tests for the CIDR grammar and IPv4 arithmetic

use std::net::Ipv4Addr;

use super::*;
use crate::domain::handler::HandlerOutcome;
use rstest::rstest;

fn run(expr: &str) -> Result<HandlerOutcome, DomainError> {
    network_chain().run(expr, &expr.to_lowercase())
}

fn claimed(expr: &str) -> String {
    match run(expr) {
        Ok(HandlerOutcome::Claimed(text)) => text,
        other => panic!("expected {expr:?} to be claimed, got {other:?}"),
    }
}

fn addr(text: &str) -> Ipv4Addr {
    text.parse().unwrap()
}

// ============================================================================
// Prefix arithmetic
// ============================================================================

#[rstest]
#[case(0, "0.0.0.0", "255.255.255.255")]
#[case(8, "255.0.0.0", "0.255.255.255")]
#[case(20, "255.255.240.0", "0.0.15.255")]
#[case(24, "255.255.255.0", "0.0.0.255")]
#[case(32, "255.255.255.255", "0.0.0.0")]
fn test_masks(#[case] prefix: u8, #[case] mask: &str, #[case] wildcard: &str) {
    assert_eq!(mask_for_prefix(prefix), addr(mask));
    assert_eq!(wildcard_for_prefix(prefix), addr(wildcard));
    assert_eq!(prefix_from_mask(addr(mask)), Ok(prefix));
}

#[test]
fn test_non_contiguous_mask_rejected() {
    assert_eq!(
        prefix_from_mask(addr("255.0.255.0")),
        Err(DomainError::NonContiguousMask(addr("255.0.255.0")))
    );
}

#[rstest]
#[case(24, 254)]
#[case(26, 62)]
#[case(30, 2)]
#[case(31, 2)]
#[case(32, 1)]
#[case(8, 16_777_214)]
fn test_host_count(#[case] prefix: u8, #[case] hosts: u64) {
    assert_eq!(host_count(prefix), hosts);
}

#[test]
fn test_prefix_parsing() {
    assert_eq!(parse_prefix("/24"), Ok(24));
    assert_eq!(parse_prefix("32"), Ok(32));
    assert!(matches!(parse_prefix("/33"), Err(DomainError::InvalidPrefix(_))));
    assert!(matches!(parse_prefix("x"), Err(DomainError::InvalidPrefix(_))));
}

#[test]
fn test_network_and_broadcast() {
    let net = Ipv4Net::parse("192.168.1.77/24").unwrap();
    assert_eq!(net.network(), addr("192.168.1.0"));
    assert_eq!(net.broadcast(), addr("192.168.1.255"));
    assert_eq!(net.trunc().to_string(), "192.168.1.0/24");
    assert_eq!(
        net.host_range(),
        (addr("192.168.1.1"), addr("192.168.1.254"))
    );
}

#[test]
fn test_point_to_point_range_uses_whole_block() {
    let net = Ipv4Net::parse("10.0.0.0/31").unwrap();
    assert_eq!(net.host_range(), (addr("10.0.0.0"), addr("10.0.0.1")));
}

#[test]
fn test_next_overflows_at_top_of_space() {
    let net = Ipv4Net::parse("255.255.255.0/24").unwrap();
    assert!(matches!(net.next(), Err(DomainError::Overflow(_))));
}

#[test]
fn test_split_subnets_are_aligned() {
    let split = Ipv4Net::parse("10.0.0.0/24").unwrap().split_into(3).unwrap();
    assert_eq!(split.prefix(), 26);
    assert_eq!(split.count(), 4);
    let subnets: Vec<String> = split.subnets().map(|s| s.to_string()).collect();
    assert_eq!(
        subnets,
        ["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/26", "10.0.0.192/26"]
    );
}

#[test]
fn test_split_for_too_many_hosts_is_infeasible() {
    let net = Ipv4Net::parse("10.0.0.0/24").unwrap();
    assert_eq!(
        net.split_for_hosts(300),
        Err(DomainError::InfeasibleSplit {
            prefix: 24,
            wanted: 23
        })
    );
}

#[test]
fn test_split_past_32_bits_is_infeasible() {
    let net = Ipv4Net::parse("10.0.0.0/30").unwrap();
    assert!(matches!(
        net.split_into(8),
        Err(DomainError::InfeasibleSplit { .. })
    ));
}

// ============================================================================
// Handler chain
// ============================================================================

#[test]
fn test_cidr_info() {
    assert_eq!(
        claimed("10.100.0.0/24"),
        "Network: 10.100.0.0/24\n\
         Mask: 255.255.255.0\n\
         Wildcard: 0.0.0.255\n\
         Broadcast: 10.100.0.255\n\
         Range: 10.100.0.1 - 10.100.0.254\n\
         Hosts: 254"
    );
}

#[test]
fn test_cidr_info_omits_broadcast_for_tiny_blocks() {
    let info = claimed("10.0.0.7/32");
    assert!(!info.contains("Broadcast"));
    assert!(info.contains("Range: 10.0.0.7 - 10.0.0.7"));
    assert!(info.ends_with("Hosts: 1"));
}

#[test]
fn test_cidr_info_normalizes_to_network_address() {
    assert!(claimed("192.168.1.77/24").starts_with("Network: 192.168.1.0/24\n"));
}

#[rstest]
#[case("wildcard mask for /24", "0.0.0.255")]
#[case("wildcard for 10.0.0.0/16", "0.0.255.255")]
#[case("wildcard of 255.255.255.0", "0.0.0.255")]
#[case("mask for /24", "255.255.255.0")]
#[case("netmask for 10.0.0.0/20", "255.255.240.0")]
#[case("prefix for 255.255.240.0", "/20")]
#[case("255.255.0.0 to cidr", "/16")]
#[case("is 10.0.0.5 in 10.0.0.0/24", "true")]
#[case("is 10.0.1.5 in 10.0.0.0/24?", "false")]
#[case("10.0.0.0/24 contains 10.0.0.200", "true")]
#[case("next subnet after 10.0.0.0/24", "10.0.1.0/24")]
#[case("10.0.0.64/26 next", "10.0.0.128/26")]
#[case("hosts in /26", "62")]
#[case("hosts in /8", "16,777,214")]
#[case("Hosts in 10.0.0.0/31", "2")]
fn test_phrasings(#[case] expr: &str, #[case] expected: &str) {
    assert_eq!(claimed(expr), expected);
}

#[test]
fn test_wildcard_is_tried_before_mask() {
    let names: Vec<_> = network_chain().names().collect();
    let wildcard = names.iter().position(|n| *n == "wildcard_mask").unwrap();
    let mask = names.iter().position(|n| *n == "mask_for").unwrap();
    assert!(wildcard < mask);
    assert_eq!(names.last(), Some(&"cidr_info"));
}

#[test]
fn test_split_by_count() {
    let text = claimed("10.0.0.0/24 split into 4 subnets");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "4 subnets of /26 (64 addresses, 62 hosts each)");
    assert_eq!(
        &lines[1..],
        ["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/26", "10.0.0.192/26"]
    );
}

#[test]
fn test_split_by_hosts() {
    let text = claimed("10.0.0.0/24 split into subnets of 50 hosts");
    assert!(text.starts_with("4 subnets of /26"));
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn test_large_split_is_truncated() {
    let text = claimed("10.0.0.0/8 split into 1024 subnets");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 1 + MAX_LISTED_SUBNETS as usize + 1);
    assert_eq!(lines[0], "1,024 subnets of /18 (16,384 addresses, 16,382 hosts each)");
    assert_eq!(lines.last(), Some(&"... and 768 more"));
}

#[rstest]
#[case("10.0.0.0/33")]
#[case("10.0.0.300/24")]
#[case("prefix for 255.0.255.0")]
#[case("255.255.255.0/24 next")]
#[case("10.0.0.0/24 split into subnets of 300 hosts")]
#[case("10.0.0.0/24 split into 0 subnets")]
fn test_claimed_but_invalid(#[case] expr: &str) {
    assert!(run(expr).is_err(), "expected {expr:?} to fail");
}

#[rstest]
#[case("12 + 4")]
#[case("today + 3 days")]
#[case("50% of 80")]
fn test_pre_filter_declines(#[case] expr: &str) {
    assert!(!looks_like_network(expr, &expr.to_lowercase()));
}

#[test]
fn test_unrecognised_phrase_is_not_claimed() {
    assert_eq!(run("ping 10.0.0.1"), Ok(HandlerOutcome::NotMine));
}
