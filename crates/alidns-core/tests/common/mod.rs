//! Test doubles and common utilities for reconciler contract tests

#![allow(dead_code)]

use alidns_core::error::{Error, Result};
use alidns_core::record::DomainRecord;
use alidns_core::traits::DnsProvider;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

/// A provider call as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Describe { domain: String, rr_keyword: String },
    Create { domain: String, rr: String, ip: IpAddr },
    Update { record_id: String, rr: String, ip: IpAddr },
}

impl ProviderCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ProviderCall::Describe { .. })
    }
}

/// Which call the mock should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    Describe,
    Create,
    Update,
}

/// A mock DnsProvider that serves fixed records and records every call
pub struct MockDnsProvider {
    records: Vec<DomainRecord>,
    fail_on: FailOn,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DomainRecord>) -> Self {
        Self {
            records,
            fail_on: FailOn::Nothing,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_on(mut self, fail_on: FailOn) -> Self {
        self.fail_on = fail_on;
        self
    }

    /// Create a new mock that shares the call log with an existing one
    pub fn sharing_calls_with(other: &Self) -> Self {
        Self {
            records: other.records.clone(),
            fail_on: other.fail_on,
            calls: Arc::clone(&other.calls),
        }
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls().iter().filter(|c| c.is_mutation()).count()
    }

    fn push(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn describe_records(&self, domain: &str, rr_keyword: &str) -> Result<Vec<DomainRecord>> {
        self.push(ProviderCall::Describe {
            domain: domain.to_string(),
            rr_keyword: rr_keyword.to_string(),
        });
        if self.fail_on == FailOn::Describe {
            return Err(Error::operation_failed("ERROR: describe wrote to stderr"));
        }

        // Keyword search is fuzzy on the provider side
        Ok(self
            .records
            .iter()
            .filter(|r| r.domain_name == domain && r.rr.contains(rr_keyword))
            .cloned()
            .collect())
    }

    async fn create_record(&self, domain: &str, rr: &str, ip: IpAddr) -> Result<()> {
        self.push(ProviderCall::Create {
            domain: domain.to_string(),
            rr: rr.to_string(),
            ip,
        });
        if self.fail_on == FailOn::Create {
            return Err(Error::operation_failed("ERROR: create failed"));
        }
        Ok(())
    }

    async fn update_record(&self, record_id: &str, rr: &str, ip: IpAddr) -> Result<()> {
        self.push(ProviderCall::Update {
            record_id: record_id.to_string(),
            rr: rr.to_string(),
            ip,
        });
        if self.fail_on == FailOn::Update {
            return Err(Error::operation_failed("ERROR: update failed"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to build an A record in example.com
pub fn a_record(rr: &str, record_id: &str, value: &str) -> DomainRecord {
    DomainRecord {
        domain_name: "example.com".to_string(),
        rr: rr.to_string(),
        record_id: record_id.to_string(),
        value: value.to_string(),
        r#type: "A".to_string(),
        ttl: 600,
        weight: 1,
        status: "ENABLE".to_string(),
        line: "default".to_string(),
        locked: false,
    }
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid ip literal")
}
