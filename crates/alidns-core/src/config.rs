//! Configuration types for aliyun-dns
//!
//! The binary builds a [`RunConfig`] once at startup from flags and
//! environment variables, validates it, and hands it down. Nothing below the
//! binary reads process-wide state.

use std::net::IpAddr;

use crate::error::{Error, Result};
use crate::target::RecordTarget;

/// Default provider CLI program
pub const DEFAULT_CLI: &str = "aliyun";

/// Log levels accepted by `--log-level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// What to reconcile
    pub mode: RunMode,

    /// How to reach the provider
    pub provider: ProviderConfig,

    /// Max tracing level
    pub log_level: String,

    /// Echo raw provider output and log at debug level
    pub debug: bool,
}

impl RunConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        let level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::invalid_input(format!(
                "log level '{}' is not valid. Valid levels: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Level the subscriber should use once `debug` is taken into account
    pub fn effective_log_level(&self) -> String {
        let level = self.log_level.to_lowercase();
        if self.debug && level != "trace" {
            "debug".to_string()
        } else {
            level
        }
    }
}

/// Which records a run reconciles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// One record from `--domain` / `--ip`
    Single {
        target: RecordTarget,
        ip: IpAddr,
    },

    /// `<fqdn> <ip>` lines read from stdin
    Batch,
}

/// Provider CLI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Executable to run (e.g. "aliyun")
    pub program: String,

    /// Arguments placed before `alidns` (e.g. `--profile home`)
    pub base_args: Vec<String>,

    /// Print raw stdout of every successful call
    pub echo_output: bool,

    /// Describe as usual but skip create/update
    pub dry_run: bool,
}

impl ProviderConfig {
    /// Build from a command line such as `"aliyun --profile home"`
    ///
    /// The first word is the program, the rest become `base_args`.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| Error::invalid_input("provider CLI command cannot be empty"))?;

        Ok(Self {
            program,
            base_args: words.collect(),
            echo_output: false,
            dry_run: false,
        })
    }

    /// Enable raw output echo
    pub fn with_echo_output(mut self, echo_output: bool) -> Self {
        self.echo_output = echo_output;
        self
    }

    /// Enable dry-run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(Error::invalid_input("provider CLI program cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_CLI.to_string(),
            base_args: Vec::new(),
            echo_output: false,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single() -> RunConfig {
        RunConfig {
            mode: RunMode::Single {
                target: RecordTarget::new("home", "example.com"),
                ip: "1.2.3.4".parse().unwrap(),
            },
            provider: ProviderConfig::default(),
            log_level: "info".to_string(),
            debug: false,
        }
    }

    #[test]
    fn test_from_command_line() {
        let config = ProviderConfig::from_command_line("aliyun --profile home").unwrap();
        assert_eq!(config.program, "aliyun");
        assert_eq!(config.base_args, vec!["--profile", "home"]);

        let config = ProviderConfig::from_command_line("  /usr/local/bin/aliyun ").unwrap();
        assert_eq!(config.program, "/usr/local/bin/aliyun");
        assert!(config.base_args.is_empty());

        assert!(ProviderConfig::from_command_line("   ").is_err());
    }

    #[test]
    fn test_default_provider() {
        let config = ProviderConfig::default();
        assert_eq!(config.program, DEFAULT_CLI);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = single();
        assert!(config.validate().is_ok());

        config.log_level = "WARN".to_string();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_program() {
        let mut config = single();
        config.provider.program = String::new();
        assert!(config.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_debug_raises_level() {
        let mut config = single();
        assert_eq!(config.effective_log_level(), "info");

        config.debug = true;
        assert_eq!(config.effective_log_level(), "debug");

        config.log_level = "trace".to_string();
        assert_eq!(config.effective_log_level(), "trace");
    }
}
