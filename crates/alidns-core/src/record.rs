//! Provider-side record model
//!
//! These types mirror the JSON returned by
//! `aliyun alidns DescribeDomainRecords`. Only the record list drives any
//! decision; pagination fields are kept for logging.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// One DNS record as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainRecord {
    /// Zone the record belongs to (e.g. "example.com")
    #[serde(default)]
    pub domain_name: String,

    /// Host label (e.g. "home")
    #[serde(rename = "RR")]
    pub rr: String,

    /// Opaque provider-assigned identifier, required for updates
    pub record_id: String,

    /// Current record value
    pub value: String,

    /// Record type, "A" for everything this tool manages
    #[serde(default)]
    pub r#type: String,

    #[serde(rename = "TTL", default)]
    pub ttl: u32,

    #[serde(default)]
    pub weight: u32,

    #[serde(default)]
    pub status: String,

    /// Routing line
    #[serde(default)]
    pub line: String,

    #[serde(default)]
    pub locked: bool,
}

impl DomainRecord {
    /// Whether the record already points at `ip`
    ///
    /// Textual equality is checked first; otherwise the value is parsed so
    /// that differently formatted IPv6 addresses still compare equal.
    pub fn points_to(&self, ip: IpAddr) -> bool {
        if self.value == ip.to_string() {
            return true;
        }
        self.value
            .trim()
            .parse::<IpAddr>()
            .map(|current| current == ip)
            .unwrap_or(false)
    }
}

/// Wrapper object around the record array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainRecords {
    #[serde(default)]
    pub record: Vec<DomainRecord>,
}

/// Response envelope of `DescribeDomainRecords`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeResponse {
    #[serde(default)]
    pub domain_records: DomainRecords,

    #[serde(default)]
    pub page_number: u32,

    #[serde(default)]
    pub page_size: u32,

    #[serde(default)]
    pub request_id: String,

    #[serde(default)]
    pub total_count: u32,
}

impl DescribeResponse {
    /// Parse the raw stdout of a describe call
    pub fn from_slice(raw: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// All returned records
    pub fn records(&self) -> &[DomainRecord] {
        &self.domain_records.record
    }

    /// Consume the envelope, keeping only the records
    pub fn into_records(self) -> Vec<DomainRecord> {
        self.domain_records.record
    }
}

/// Pick the record whose RR equals `rr` exactly
///
/// The provider's `RRKeyWord` filter is a fuzzy match, so a query for
/// "home" may also return "home2" or "myhome".
pub fn find_exact<'a>(records: &'a [DomainRecord], rr: &str) -> Option<&'a DomainRecord> {
    records.iter().find(|record| record.rr == rr)
}
