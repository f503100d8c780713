// # alidns-core
//
// Core library for declarative Aliyun DNS record reconciliation.
//
// ## Architecture Overview
//
// - **DnsProvider**: Trait for describing, creating and updating records
// - **Reconciler**: Brings one record in line with a desired IP
// - **RecordTarget**: `<rr>.<domain>` split of a fully qualified name
// - **DomainRecord / DescribeResponse**: Provider record model
//
// ## Design Principles
//
// 1. **Declarative**: Callers state the desired IP, the reconciler picks the action
// 2. **Single-shot**: One attempt per provider call, the first error aborts
// 3. **Library-First**: The binary is a thin layer over this crate

pub mod config;
pub mod error;
pub mod reconciler;
pub mod record;
pub mod target;
pub mod traits;

// Re-export core types for convenience
pub use config::{ProviderConfig, RunConfig, RunMode};
pub use error::{Error, Result};
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use record::{DescribeResponse, DomainRecord};
pub use target::{BatchEntry, RecordTarget};
pub use traits::DnsProvider;
