// # aliyun-dns
//
// Keeps one Aliyun DNS A record pointing at a given IP. Meant to be run
// from cron on a host whose address changes.
//
// This binary is a THIN integration layer:
// 1. Parse flags / environment into a `RunConfig`
// 2. Initialize logging and the runtime
// 3. Hand the record(s) to `alidns_core::Reconciler`
// 4. Map the outcome to stdout and an exit code
//
// ## Configuration
//
// Every flag can also come from the environment:
//
// - `--ip` / `ALIDNS_IP`: Desired IP address
// - `--domain` / `ALIDNS_DOMAIN`: Fully qualified name, e.g. home.example.com
// - `--cli` / `ALIDNS_CLI`: Provider CLI command (default: aliyun)
// - `--log-level` / `ALIDNS_LOG_LEVEL`: trace, debug, info, warn, error
// - `--dry-run` / `ALIDNS_DRY_RUN`: Describe only, never create or update
//
// ## Example
//
// ```bash
// */5 * * * * aliyun-dns --ip="$(curl -s https://api.ipify.org)" --domain=home.example.com
// ```
//
// Batch mode reads `<fqdn> <ip>` pairs from stdin:
//
// ```bash
// printf 'home.example.com 1.2.3.4\nnas.example.com 1.2.3.4\n' | aliyun-dns --batch
// ```

use alidns_core::config::{DEFAULT_CLI, ProviderConfig, RunConfig, RunMode};
use alidns_core::{BatchEntry, Error, ReconcileOutcome, Reconciler, RecordTarget};
use alidns_provider_cli::AliyunCliProvider;
use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::net::IpAddr;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{Level, debug, error, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the different ways a run can end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DnsExitCode {
    /// Record kept, created or updated
    Success = 0,
    /// Missing or malformed input; nothing was sent to the provider
    UsageError = 1,
    /// The provider CLI failed
    ReconcileFailed = 2,
}

impl From<DnsExitCode> for ExitCode {
    fn from(code: DnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// A wrapper of aliyun-cli subcommand alidns, run in declarative mode.
///
/// Creates the A record if it is missing, updates it if it points
/// elsewhere, and leaves it alone otherwise.
#[derive(Parser, Debug)]
#[command(
    name = "aliyun-dns",
    version,
    override_usage = "aliyun-dns --ip=xxx.xxx.xxx.xxx --domain=xxx.xxx.com"
)]
struct Cli {
    /// ip address: 192.168.1.1 (required)
    #[arg(long, env = "ALIDNS_IP")]
    ip: Option<IpAddr>,

    /// domain name: abc.example.com (required)
    #[arg(long, env = "ALIDNS_DOMAIN")]
    domain: Option<String>,

    /// debug mode: echo raw aliyun output
    #[arg(short, long)]
    debug: bool,

    /// Provider CLI command, optionally with leading arguments
    #[arg(long, env = "ALIDNS_CLI", default_value = DEFAULT_CLI)]
    cli: String,

    /// Log level written to stderr
    #[arg(long, env = "ALIDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Describe records but never create or update
    #[arg(
        long,
        env = "ALIDNS_DRY_RUN",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    dry_run: bool,

    /// Read `<fqdn> <ip>` lines from stdin instead of --ip/--domain
    #[arg(long, conflicts_with_all = ["ip", "domain"])]
    batch: bool,
}

impl Cli {
    /// Turn parsed flags into the run configuration
    fn into_run_config(self) -> alidns_core::Result<RunConfig> {
        let mode = if self.batch {
            RunMode::Batch
        } else {
            let (Some(domain), Some(ip)) = (self.domain.as_deref(), self.ip) else {
                return Err(Error::invalid_input("--ip and --domain are required"));
            };
            RunMode::Single {
                target: RecordTarget::parse_fqdn(domain)?,
                ip,
            }
        };

        let provider = ProviderConfig::from_command_line(&self.cli)?
            .with_echo_output(self.debug)
            .with_dry_run(self.dry_run);

        Ok(RunConfig {
            mode,
            provider,
            log_level: self.log_level,
            debug: self.debug,
        })
    }
}

/// Print the help text and the reason input was rejected
fn usage_error(reason: &Error) -> DnsExitCode {
    if let Err(e) = Cli::command().print_help() {
        eprintln!("Failed to print help: {}", e);
    }
    println!();
    eprintln!("{}", reason);
    DnsExitCode::UsageError
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version land here as well
            if let Err(io) = e.print() {
                eprintln!("Failed to print usage: {}", io);
            }
            return if e.use_stderr() {
                DnsExitCode::UsageError.into()
            } else {
                DnsExitCode::Success.into()
            };
        }
    };

    let config = match cli.into_run_config() {
        Ok(config) => config,
        Err(e) => return usage_error(&e).into(),
    };

    if let Err(e) = config.validate() {
        return usage_error(&e).into();
    }

    let log_level = match config.effective_log_level().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout is reserved for the result line
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DnsExitCode::UsageError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DnsExitCode::ReconcileFailed.into();
        }
    };

    let code = rt.block_on(async {
        match run(config).await {
            Ok(code) => code,
            Err(e) => {
                println!("{}", e);
                DnsExitCode::ReconcileFailed
            }
        }
    });

    code.into()
}

/// Run one reconciliation pass according to `config`
async fn run(config: RunConfig) -> Result<DnsExitCode> {
    let provider = AliyunCliProvider::new(&config.provider)?;
    let reconciler = Reconciler::new(Box::new(provider));
    debug!("Using provider {}", reconciler.provider_name());

    match config.mode {
        RunMode::Single { target, ip } => match reconciler.ensure_record(&target, ip).await {
            Ok(outcome) => {
                println!("{}", outcome);
                Ok(DnsExitCode::Success)
            }
            Err(e) => {
                println!("{}", e);
                Ok(DnsExitCode::ReconcileFailed)
            }
        },
        RunMode::Batch => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_batch(&reconciler, stdin).await
        }
    }
}

/// Reconcile every `<fqdn> <ip>` line of `input`, in order
///
/// Malformed lines, including ones that are not valid UTF-8, are skipped.
/// A failed line does not stop the batch but makes the whole run fail.
async fn run_batch<R>(reconciler: &Reconciler, input: R) -> Result<DnsExitCode>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.split(b'\n');
    let mut failures = 0usize;
    let mut line_no = 0usize;

    while let Some(raw) = lines.next_segment().await? {
        line_no += 1;

        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no, e);
                continue;
            }
        };

        let entry = match BatchEntry::parse_line(&line) {
            Ok(Some(entry)) => entry,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no, e);
                continue;
            }
        };

        match reconciler.ensure_record(&entry.target, entry.ip).await {
            Ok(outcome @ ReconcileOutcome::Kept { .. }) => println!("{}", outcome),
            Ok(outcome) => println!("{}: {}", entry.target, outcome),
            Err(e) => {
                failures += 1;
                println!("{}: {}", entry.target, e);
            }
        }
    }

    if failures > 0 {
        error!("{} record(s) failed", failures);
        Ok(DnsExitCode::ReconcileFailed)
    } else {
        Ok(DnsExitCode::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("aliyun-dns").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_single_mode_config() {
        let config = parse(&["--ip", "1.2.3.4", "--domain", "home.example.com"])
            .into_run_config()
            .unwrap();

        assert_eq!(
            config.mode,
            RunMode::Single {
                target: RecordTarget::new("home", "example.com"),
                ip: "1.2.3.4".parse().unwrap(),
            }
        );
        assert_eq!(config.provider.program, "aliyun");
        assert!(!config.provider.echo_output);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_equals_syntax_and_debug() {
        let config = parse(&["--ip=2001:db8::1", "--domain=nas.example.com", "-d"])
            .into_run_config()
            .unwrap();

        assert!(config.debug);
        assert!(config.provider.echo_output);
        assert_eq!(config.effective_log_level(), "debug");
    }

    #[test]
    fn test_missing_flags_rejected() {
        let err = parse(&["--ip", "1.2.3.4"]).into_run_config().unwrap_err();
        assert!(err.is_invalid_input());

        let err = parse(&["--domain", "home.example.com"])
            .into_run_config()
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_domain_without_dot_rejected() {
        let err = parse(&["--ip", "1.2.3.4", "--domain", "noDotHere"])
            .into_run_config()
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_bad_ip_rejected_by_parser() {
        assert!(
            Cli::try_parse_from(["aliyun-dns", "--ip", "1.2.3", "--domain", "a.example.com"])
                .is_err()
        );
    }

    #[test]
    fn test_cli_command_with_profile() {
        let config = parse(&["--batch", "--cli", "aliyun --profile home", "--dry-run"])
            .into_run_config()
            .unwrap();

        assert_eq!(config.mode, RunMode::Batch);
        assert_eq!(config.provider.base_args, vec!["--profile", "home"]);
        assert!(config.provider.dry_run);
    }

    #[test]
    fn test_batch_conflicts_with_single_record_flags() {
        assert!(Cli::try_parse_from(["aliyun-dns", "--batch", "--ip", "1.2.3.4"]).is_err());
        assert!(
            Cli::try_parse_from(["aliyun-dns", "--batch", "--domain", "home.example.com"])
                .is_err()
        );
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DnsExitCode::Success as u8, 0);
        assert_eq!(DnsExitCode::UsageError as u8, 1);
        assert_eq!(DnsExitCode::ReconcileFailed as u8, 2);
    }
}
