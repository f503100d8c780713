// # DNS Provider Trait
//
// Defines the narrow interface the reconciler uses to talk to a DNS
// provider.
//
// ## Implementations
//
// - Aliyun CLI: `alidns-provider-cli` crate (shells out to `aliyun alidns`)
// - Tests: call-counting mocks
//
// ## Usage
//
// ```rust,ignore
// use alidns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.describe_records("example.com", "home").await?;
//     for record in &records {
//         println!("{} {} {}", record.record_id, record.rr, record.value);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

use crate::record::DomainRecord;

/// Trait for DNS provider implementations
///
/// Each method maps to exactly one provider call.
///
/// # Trust Level: Untrusted
///
/// Providers only execute the call they are asked for:
///
/// - ✅ Run the provider's API call or CLI invocation
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
/// - ❌ Retry, back off or time out (a failure aborts the run)
/// - ❌ Decide whether a change is needed (owned by `Reconciler`)
/// - ❌ Cache records between calls
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List records of `domain` whose RR matches `rr_keyword`
    ///
    /// The match may be fuzzy; callers filter for the exact RR.
    async fn describe_records(
        &self,
        domain: &str,
        rr_keyword: &str,
    ) -> Result<Vec<DomainRecord>, crate::Error>;

    /// Add an A record `rr.domain -> ip` on the default line
    async fn create_record(
        &self,
        domain: &str,
        rr: &str,
        ip: IpAddr,
    ) -> Result<(), crate::Error>;

    /// Point the existing record `record_id` at `ip`, keeping its RR and type
    async fn update_record(
        &self,
        record_id: &str,
        rr: &str,
        ip: IpAddr,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
