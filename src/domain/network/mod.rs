//! Network / CIDR grammar
//!
//! The worked example of a handler-chain domain. Handlers are tried in the
//! order below; the first claim wins.
//!
//! | Handler         | Phrasing                                          |
//! |-----------------|---------------------------------------------------|
//! | `split_hosts`   | `10.0.0.0/24 split into subnets of 50 hosts`      |
//! | `split_count`   | `10.0.0.0/24 split into 4 subnets`                |
//! | `wildcard_mask` | `wildcard mask for /24`                           |
//! | `mask_for`      | `mask for /24`                                    |
//! | `prefix_for`    | `prefix for 255.255.240.0`, `255.255.0.0 to cidr` |
//! | `contains`      | `is 10.0.0.5 in 10.0.0.0/24`                      |
//! | `next_subnet`   | `next subnet after 10.0.0.0/24`                   |
//! | `hosts_in`      | `hosts in /26`                                    |
//! | `cidr_info`     | `10.100.0.0/24`                                   |

mod ipv4;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub use ipv4::{
    ADDRESS_BITS, Ipv4Net, Split, block_size, host_count, mask_for_prefix, parse_address,
    parse_prefix, prefix_from_mask, wildcard_for_prefix,
};

use super::error::DomainError;
use super::evaluator::ChainEvaluator;
use super::handler::{HandlerChain, HandlerOutcome, HandlerResult};
use crate::format::group_thousands;

/// Registry name of the network evaluator.
pub const NETWORK: &str = "network";

/// Subnets listed before a split result is truncated.
pub const MAX_LISTED_SUBNETS: u64 = 256;

const IP: &str = r"\d{1,3}(?:\.\d{1,3}){3}";

fn pattern(template: &str) -> Regex {
    Regex::new(&template.replace("IP", IP)).unwrap()
}

static ADDRESS_LIKE: Lazy<Regex> = Lazy::new(|| pattern(r"IP"));

static SPLIT_HOSTS: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"^(?P<net>IP/\d+)\s+(?:split|divide)\s+(?:(?:into|in)\s+subnets\s+)?(?:of|for|with)\s+(?P<hosts>[\d,]+)\s+hosts?$",
    )
});

static SPLIT_COUNT: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"^(?P<net>IP/\d+)\s+(?:split|divide)\s+(?:into|in)\s+(?P<count>[\d,]+)(?:\s+(?:subnets|networks|parts|blocks))?$",
    )
});

static WILDCARD: Lazy<Regex> = Lazy::new(|| {
    pattern(r"^wildcard(?:\s+mask)?\s+(?:for|of)\s+(?P<target>/\d+|IP/\d+|IP)$")
});

static MASK_FOR: Lazy<Regex> =
    Lazy::new(|| pattern(r"^(?:net)?mask\s+(?:for|of)\s+(?P<target>/\d+|IP/\d+)$"));

static PREFIX_FOR: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        pattern(r"^(?:prefix|cidr)\s+(?:for|of)\s+(?:mask\s+)?(?P<mask>IP)$"),
        pattern(r"^(?P<mask>IP)\s+(?:to|in|as)\s+(?:cidr|prefix)$"),
    ]
});

static CONTAINS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        pattern(r"^is\s+(?P<ip>IP)\s+in\s+(?P<net>IP/\d+)\s*\??$"),
        pattern(r"^(?P<net>IP/\d+)\s+contains\s+(?P<ip>IP)$"),
    ]
});

static NEXT_SUBNET: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        pattern(r"^next\s+(?:subnet|network|block)\s+(?:after|of|from)\s+(?P<net>IP/\d+)$"),
        pattern(r"^(?P<net>IP/\d+)\s+next(?:\s+(?:subnet|network|block))?$"),
    ]
});

static HOSTS_IN: Lazy<Regex> = Lazy::new(|| {
    pattern(r"^(?:usable\s+)?hosts?\s+(?:in|for|of)\s+(?P<target>/\d+|IP/\d+)$")
});

static CIDR: Lazy<Regex> = Lazy::new(|| pattern(r"^(?P<net>IP/\d+)$"));

// ============================================================================
// Evaluator
// ============================================================================

/// Cheap check run before any handler.
pub fn looks_like_network(_expr: &str, lower: &str) -> bool {
    const KEYWORDS: [&str; 5] = ["subnet", "mask", "wildcard", "cidr", "hosts"];
    ADDRESS_LIKE.is_match(lower) || KEYWORDS.iter().any(|k| lower.contains(k))
}

/// The network handler chain, most specific phrasing first.
pub fn network_chain() -> HandlerChain {
    HandlerChain::new()
        .with_fn("split_hosts", split_hosts)
        .with_fn("split_count", split_count)
        .with_fn("wildcard_mask", wildcard_mask)
        .with_fn("mask_for", mask_for)
        .with_fn("prefix_for", prefix_for)
        .with_fn("contains", contains)
        .with_fn("next_subnet", next_subnet)
        .with_fn("hosts_in", hosts_in)
        .with_fn("cidr_info", cidr_info)
}

/// The network domain evaluator.
pub fn network_evaluator() -> ChainEvaluator {
    ChainEvaluator::new(NETWORK, looks_like_network, network_chain()).with_numeric_results()
}

// ============================================================================
// Handlers
// ============================================================================

fn first_captures<'t>(patterns: &[Regex], text: &'t str) -> Option<Captures<'t>> {
    patterns.iter().find_map(|p| p.captures(text))
}

fn parse_count(text: &str) -> Result<u64, DomainError> {
    text.replace(',', "")
        .parse()
        .map_err(|_| DomainError::malformed(NETWORK, format!("`{text}` is not a count")))
}

/// Prefix length from `/n`, `a.b.c.d/n` or a dotted mask.
fn target_prefix(target: &str) -> Result<u8, DomainError> {
    match target.split_once('/') {
        Some((_, prefix)) => parse_prefix(prefix),
        None => prefix_from_mask(parse_address(target)?),
    }
}

fn split_hosts(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = SPLIT_HOSTS.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let net = Ipv4Net::parse(&caps["net"])?;
    let split = net.split_for_hosts(parse_count(&caps["hosts"])?)?;
    Ok(HandlerOutcome::Claimed(render_split(&split)))
}

fn split_count(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = SPLIT_COUNT.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let net = Ipv4Net::parse(&caps["net"])?;
    let split = net.split_into(parse_count(&caps["count"])?)?;
    Ok(HandlerOutcome::Claimed(render_split(&split)))
}

fn wildcard_mask(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = WILDCARD.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let prefix = target_prefix(&caps["target"])?;
    Ok(HandlerOutcome::claimed(wildcard_for_prefix(prefix).to_string()))
}

fn mask_for(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = MASK_FOR.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let prefix = target_prefix(&caps["target"])?;
    Ok(HandlerOutcome::claimed(mask_for_prefix(prefix).to_string()))
}

fn prefix_for(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = first_captures(&*PREFIX_FOR, lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let prefix = prefix_from_mask(parse_address(&caps["mask"])?)?;
    Ok(HandlerOutcome::claimed(format!("/{prefix}")))
}

fn contains(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = first_captures(&*CONTAINS, lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let net = Ipv4Net::parse(&caps["net"])?;
    let address = parse_address(&caps["ip"])?;
    Ok(HandlerOutcome::claimed(net.contains(address).to_string()))
}

fn next_subnet(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = first_captures(&*NEXT_SUBNET, lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let next = Ipv4Net::parse(&caps["net"])?.next()?;
    Ok(HandlerOutcome::claimed(next.to_string()))
}

fn hosts_in(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = HOSTS_IN.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let prefix = target_prefix(&caps["target"])?;
    Ok(HandlerOutcome::claimed(group_thousands(
        &host_count(prefix).to_string(),
    )))
}

fn cidr_info(_expr: &str, lower: &str) -> HandlerResult {
    let Some(caps) = CIDR.captures(lower) else {
        return Ok(HandlerOutcome::NotMine);
    };
    let net = Ipv4Net::parse(&caps["net"])?;
    Ok(HandlerOutcome::Claimed(render_info(&net)))
}

// ============================================================================
// Rendering
// ============================================================================

fn render_info(net: &Ipv4Net) -> String {
    let (first, last) = net.host_range();
    let mut lines = vec![
        format!("Network: {}", net.trunc()),
        format!("Mask: {}", net.mask()),
        format!("Wildcard: {}", net.wildcard()),
    ];
    if net.prefix() <= 30 {
        lines.push(format!("Broadcast: {}", net.broadcast()));
    }
    lines.push(format!("Range: {first} - {last}"));
    lines.push(format!(
        "Hosts: {}",
        group_thousands(&net.host_count().to_string())
    ));
    lines.join("\n")
}

fn render_split(split: &Split) -> String {
    let count = split.count();
    let mut lines = vec![format!(
        "{} subnets of /{} ({} addresses, {} hosts each)",
        group_thousands(&count.to_string()),
        split.prefix(),
        group_thousands(&split.subnet_size().to_string()),
        group_thousands(&host_count(split.prefix()).to_string()),
    )];
    lines.extend(
        split
            .subnets()
            .take(MAX_LISTED_SUBNETS as usize)
            .map(|subnet| subnet.to_string()),
    );
    if count > MAX_LISTED_SUBNETS {
        lines.push(format!(
            "... and {} more",
            group_thousands(&(count - MAX_LISTED_SUBNETS).to_string())
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests;
