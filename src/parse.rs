//! Conversion of textual CIDR notation into prefixes.

use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use thiserror::Error;

use crate::Cidr;

/// The string is not an address, nor an address followed by `/` and a valid prefix length.
///
/// This is kept apart from [`crate::Error`]: it reports malformed text, while the latter reports
/// invalid binary input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid CIDR notation: {input:?}")]
pub struct ParseError {
    input: String,
}

impl ParseError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Parse `addr/len` or a bare address, which denotes the host prefix of that address (`/32` or
/// `/128`). Bits of the address beyond the prefix length are ignored.
///
/// ```
/// # use lpm_trie::parse_cidr;
/// assert_eq!(parse_cidr("10.1.2.3/8").unwrap().to_string(), "10.0.0.0/8");
/// assert_eq!(parse_cidr("2001:db8::1/64").unwrap().to_string(), "2001:db8::/64");
/// assert_eq!(parse_cidr("127.0.0.1").unwrap().prefix_len(), 32);
/// assert!(parse_cidr("10").is_err());
/// ```
pub fn parse_cidr(s: &str) -> Result<Cidr, ParseError> {
    let s = s.trim();
    let cidr = if s.contains('/') {
        s.parse::<IpNet>().ok().map(Cidr::from)
    } else {
        s.parse::<IpAddr>().ok().map(Cidr::host)
    };
    cidr.ok_or_else(|| ParseError {
        input: s.to_string(),
    })
}

impl FromStr for Cidr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}
