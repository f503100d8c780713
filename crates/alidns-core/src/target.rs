//! Reconciliation targets
//!
//! A target is a fully qualified name split on its first "." into the
//! host label (RR) and the zone it lives in.

use crate::error::{Error, Result};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// The record a run is responsible for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordTarget {
    /// Host label, e.g. "home"
    pub rr: String,
    /// Zone, e.g. "example.com"
    pub domain: String,
}

impl RecordTarget {
    /// Build a target from its parts
    pub fn new(rr: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            rr: rr.into(),
            domain: domain.into(),
        }
    }

    /// Split a fully qualified name into (RR, domain)
    ///
    /// `home.example.com` becomes `("home", "example.com")`. Names without a
    /// "." or with an empty half are rejected.
    pub fn parse_fqdn(fqdn: &str) -> Result<Self> {
        let fqdn = fqdn.trim();
        let Some((rr, domain)) = fqdn.split_once('.') else {
            return Err(Error::invalid_input(format!(
                "domain '{}' must look like <rr>.<domain>, e.g. home.example.com",
                fqdn
            )));
        };

        if rr.is_empty() || domain.is_empty() {
            return Err(Error::invalid_input(format!(
                "domain '{}' has an empty record name or zone",
                fqdn
            )));
        }

        Ok(Self::new(rr, domain))
    }
}

impl FromStr for RecordTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_fqdn(s)
    }
}

impl fmt::Display for RecordTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.rr, self.domain)
    }
}

/// One `<fqdn> <ip>` line of batch input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub target: RecordTarget,
    pub ip: IpAddr,
}

impl BatchEntry {
    /// Parse a whitespace-separated `<fqdn> <ip>` pair
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse_line(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [fqdn, ip] = fields.as_slice() else {
            return Err(Error::invalid_input(format!(
                "expected '<fqdn> <ip>', got '{}'",
                line
            )));
        };

        let target = RecordTarget::parse_fqdn(fqdn)?;
        let ip = ip
            .parse::<IpAddr>()
            .map_err(|e| Error::invalid_input(format!("invalid ip '{}': {}", ip, e)))?;

        Ok(Some(Self { target, ip }))
    }
}
