//! Record reconciler
//!
//! The Reconciler brings one provider record in line with a desired IP:
//! - Describing the records that match the target's RR
//! - Picking the exact RR match, if any
//! - Creating, updating or leaving the record alone
//!
//! ## Flow
//!
//! ```text
//!  describe(domain, rr)
//!          │
//!          ▼
//!   exact RR match? ── no ──▶ create(domain, rr, ip)      → Created
//!          │
//!         yes
//!          │
//!   value == ip? ──── yes ──▶ (nothing)                   → Kept
//!          │
//!          no
//!          ▼
//!   update(record_id, rr, ip)                             → Updated
//! ```
//!
//! Every provider call is a single attempt. The first failure aborts the
//! run and is returned as-is.

use std::fmt;
use std::net::IpAddr;

use tracing::{debug, info};

use crate::error::Result;
use crate::record::find_exact;
use crate::target::RecordTarget;
use crate::traits::DnsProvider;

/// Terminal outcome of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record already had the desired value (no mutating call made)
    Kept { target: RecordTarget, ip: IpAddr },

    /// Record was absent and has been created
    Created { target: RecordTarget, ip: IpAddr },

    /// Record existed with another value and has been updated
    Updated {
        target: RecordTarget,
        record_id: String,
        previous_value: String,
        ip: IpAddr,
    },
}

impl ReconcileOutcome {
    /// Whether a mutating provider call was made
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Kept { .. })
    }
}

/// Renders the line printed on stdout for this outcome
impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kept { target, ip } => write!(f, "keeping: {} => {}", target, ip),
            Self::Created { .. } | Self::Updated { .. } => f.write_str("succeed"),
        }
    }
}

/// Drives a [`DnsProvider`] to make one record match a desired IP
pub struct Reconciler {
    provider: Box<dyn DnsProvider>,
}

impl Reconciler {
    /// Create a reconciler over `provider`
    pub fn new(provider: Box<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Ensure `target` exists as an A record pointing at `ip`
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: which of kept / created / updated happened
    /// - `Err(Error)`: the first provider failure, unchanged
    pub async fn ensure_record(
        &self,
        target: &RecordTarget,
        ip: IpAddr,
    ) -> Result<ReconcileOutcome> {
        let records = self
            .provider
            .describe_records(&target.domain, &target.rr)
            .await?;

        debug!(
            "{} returned {} record(s) for keyword '{}' in {}",
            self.provider.provider_name(),
            records.len(),
            target.rr,
            target.domain
        );

        let Some(record) = find_exact(&records, &target.rr) else {
            info!("creating: {} => {}", target, ip);
            self.provider
                .create_record(&target.domain, &target.rr, ip)
                .await?;
            return Ok(ReconcileOutcome::Created {
                target: target.clone(),
                ip,
            });
        };

        if record.points_to(ip) {
            debug!("{} already points to {}", target, ip);
            return Ok(ReconcileOutcome::Kept {
                target: target.clone(),
                ip,
            });
        }

        info!(
            "updating {}: {} => {} (was {})",
            record.record_id, target, ip, record.value
        );
        self.provider
            .update_record(&record.record_id, &record.rr, ip)
            .await?;

        Ok(ReconcileOutcome::Updated {
            target: target.clone(),
            record_id: record.record_id.clone(),
            previous_value: record.value.clone(),
            ip,
        })
    }
}
