//! Configuration loading from process arguments and environment.

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{Config, DEFAULT_PORT};
use crate::config::validation::{validate_config, ValidationError};

/// Command-line arguments understood by the config source.
///
/// The verbosity flag is deliberately not defined here: the lifecycle
/// coordinator consumes `--verbose`/`-v` before the arguments reach this
/// parser, so an unstripped verbosity flag is a parse error.
#[derive(Debug, Parser)]
#[command(name = "portico", about = "Lifecycle-coordinated HTTP service")]
struct Cli {
    /// TCP port to listen on. Falls back to $PORT, then 8080.
    #[arg(short, long)]
    port: Option<String>,
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The argument list did not parse (unknown flag, missing value).
    #[error("invalid arguments: {0}")]
    Parse(#[from] clap::Error),

    /// The parsed values failed semantic validation.
    #[error("invalid configuration: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration.
///
/// `args` is the raw argument list (including the program name) with the
/// verbosity flag already stripped. `env_lookup` is an injected environment
/// accessor; the process environment is never read directly.
pub fn parse<E>(args: &[String], env_lookup: E) -> Result<Config, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let cli = Cli::try_parse_from(args)?;

    let port = cli
        .port
        .or_else(|| env_lookup("PORT"))
        .unwrap_or_else(|| DEFAULT_PORT.to_string());

    let config = Config {
        port,
        ..Config::default()
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn port_from_long_flag() {
        let config = parse(&args(&["portico", "--port", "9000"]), no_env).unwrap();
        assert_eq!(config.port, "9000");
    }

    #[test]
    fn port_from_short_flag() {
        let config = parse(&args(&["portico", "-p", "9000"]), no_env).unwrap();
        assert_eq!(config.port, "9000");
    }

    #[test]
    fn port_from_environment() {
        let env = |name: &str| (name == "PORT").then(|| "7000".to_string());
        let config = parse(&args(&["portico"]), env).unwrap();
        assert_eq!(config.port, "7000");
    }

    #[test]
    fn argument_overrides_environment() {
        let env = |name: &str| (name == "PORT").then(|| "7000".to_string());
        let config = parse(&args(&["portico", "--port", "9000"]), env).unwrap();
        assert_eq!(config.port, "9000");
    }

    #[test]
    fn default_port_when_unset() {
        let config = parse(&args(&["portico"]), no_env).unwrap();
        assert_eq!(config.port, "8080");
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = parse(&args(&["portico", "--bogus"]), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_missing_port_value() {
        let err = parse(&args(&["portico", "--port"]), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_unstripped_verbosity_flag() {
        let err = parse(&args(&["portico", "--verbose"]), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = parse(&args(&["portico", "--port", "http"]), no_env).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ValidationError::InvalidPort(_))));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_port_from_environment() {
        let env = |name: &str| (name == "PORT").then(String::new);
        let err = parse(&args(&["portico"]), env).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.contains(&ValidationError::EmptyPort));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
