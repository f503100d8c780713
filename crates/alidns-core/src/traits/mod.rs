//! Core traits for aliyun-dns
//!
//! - [`DnsProvider`]: Query and mutate DNS records at the provider

pub mod dns_provider;

pub use dns_provider::DnsProvider;
