// # Aliyun CLI DNS Provider
//
// This crate provides a DnsProvider that drives the `aliyun` command-line
// tool (https://github.com/aliyun/aliyun-cli), subcommand `alidns`.
//
// ## Behavior
//
// - ✅ One subprocess per provider call, run to completion before returning
// - ✅ stdout and stderr are captured fully into memory
// - ✅ Non-zero exit OR any stderr output is a failure, surfaced verbatim
// - ✅ Dry-run mode: describe runs, create/update are only logged
// - ❌ NO retry logic (a failed call aborts the run)
// - ❌ NO timeout (a hung CLI hangs the caller)
// - ❌ NO credential handling (the CLI must already be configured)
//
// ## Command Reference
//
// ```text
// aliyun alidns DescribeDomainRecords --DomainName <domain> --RRKeyWord <rr>
// aliyun alidns UpdateDomainRecord --RecordId <id> --RR <rr> --Type A --Value <ip>
// aliyun alidns AddDomainRecord --DomainName <domain> --RR <rr> --Type A --Value <ip> --Line default
// ```

use alidns_core::config::ProviderConfig;
use alidns_core::record::{DescribeResponse, DomainRecord};
use alidns_core::traits::DnsProvider;
use alidns_core::{Error, Result};
use async_trait::async_trait;
use std::net::IpAddr;
use std::process::Stdio;
use tokio::process::Command;

/// Name reported by [`DnsProvider::provider_name`]
pub const PROVIDER_NAME: &str = "aliyun-cli";

/// Product subcommand of the aliyun CLI
const SUBCOMMAND: &str = "alidns";

/// Record type for every record this provider writes
const RECORD_TYPE: &str = "A";

/// Routing line for created records
const DEFAULT_LINE: &str = "default";

/// DNS provider backed by the `aliyun` CLI
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Run `DescribeDomainRecords` as usual
/// - Log the create/update command it would have run
/// - **NOT** modify any record
#[derive(Debug, Clone)]
pub struct AliyunCliProvider {
    /// Executable to spawn
    program: String,

    /// Arguments placed before the `alidns` subcommand
    base_args: Vec<String>,

    /// Print raw stdout of successful calls
    echo_output: bool,

    /// Skip mutating calls
    dry_run: bool,
}

impl AliyunCliProvider {
    /// Create a provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        if config.dry_run {
            tracing::warn!("aliyun CLI provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            program: config.program.clone(),
            base_args: config.base_args.clone(),
            echo_output: config.echo_output,
            dry_run: config.dry_run,
        })
    }

    /// Whether mutating calls are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn describe_args(domain: &str, rr: &str) -> Vec<String> {
        [
            "DescribeDomainRecords",
            "--DomainName",
            domain,
            "--RRKeyWord",
            rr,
        ]
        .map(str::to_string)
        .to_vec()
    }

    fn update_args(record_id: &str, rr: &str, ip: IpAddr) -> Vec<String> {
        let ip = ip.to_string();
        [
            "UpdateDomainRecord",
            "--RecordId",
            record_id,
            "--RR",
            rr,
            "--Type",
            RECORD_TYPE,
            "--Value",
            ip.as_str(),
        ]
        .map(str::to_string)
        .to_vec()
    }

    fn create_args(domain: &str, rr: &str, ip: IpAddr) -> Vec<String> {
        let ip = ip.to_string();
        [
            "AddDomainRecord",
            "--DomainName",
            domain,
            "--RR",
            rr,
            "--Type",
            RECORD_TYPE,
            "--Value",
            ip.as_str(),
            "--Line",
            DEFAULT_LINE,
        ]
        .map(str::to_string)
        .to_vec()
    }

    /// Full command line, for logs
    fn command_line(&self, args: &[String]) -> String {
        let mut words = Vec::with_capacity(self.base_args.len() + args.len() + 2);
        words.push(self.program.as_str());
        words.extend(self.base_args.iter().map(String::as_str));
        words.push(SUBCOMMAND);
        words.extend(args.iter().map(String::as_str));
        words.join(" ")
    }

    /// Run one CLI invocation and return its stdout
    ///
    /// Fails on launch error, on non-zero exit, and on any stderr output
    /// even when the exit status is zero.
    async fn run(&self, args: &[String]) -> Result<Vec<u8>> {
        let command_line = self.command_line(args);
        tracing::debug!("running: {}", command_line);

        let output = Command::new(&self.program)
            .args(&self.base_args)
            .arg(SUBCOMMAND)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                Error::operation_failed(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.stderr.is_empty() {
            return Err(Error::operation_failed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        if !output.status.success() {
            return Err(Error::operation_failed(format!(
                "{} exited with {}",
                command_line, output.status
            )));
        }

        tracing::debug!(
            "{} byte(s) of output from {}",
            output.stdout.len(),
            args.first().map(String::as_str).unwrap_or(SUBCOMMAND)
        );

        if self.echo_output {
            println!("{}", String::from_utf8_lossy(&output.stdout));
        }

        Ok(output.stdout)
    }

    /// Run a mutating call, or only log it in dry-run mode
    async fn mutate(&self, args: Vec<String>) -> Result<()> {
        if self.is_dry_run() {
            tracing::info!("[DRY-RUN] Would run: {}", self.command_line(&args));
            return Ok(());
        }

        self.run(&args).await?;
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for AliyunCliProvider {
    async fn describe_records(&self, domain: &str, rr_keyword: &str) -> Result<Vec<DomainRecord>> {
        let stdout = self.run(&Self::describe_args(domain, rr_keyword)).await?;
        let response = DescribeResponse::from_slice(&stdout)?;

        tracing::debug!(
            "DescribeDomainRecords {}: {} of {} record(s), page {} (request {})",
            domain,
            response.records().len(),
            response.total_count,
            response.page_number,
            response.request_id
        );

        Ok(response.into_records())
    }

    async fn create_record(&self, domain: &str, rr: &str, ip: IpAddr) -> Result<()> {
        self.mutate(Self::create_args(domain, rr, ip)).await
    }

    async fn update_record(&self, record_id: &str, rr: &str, ip: IpAddr) -> Result<()> {
        self.mutate(Self::update_args(record_id, rr, ip)).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
