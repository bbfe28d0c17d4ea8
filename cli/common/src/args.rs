//! Command line arguments shared by the rangeflow binaries.

use clap::{Args, ValueEnum};
use rf_s3::{RetryConfig, S3Config};

/// Connection options for S3 and S3-compatible stores.
#[derive(Args, Debug, Clone)]
pub struct S3Args {
    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "RF_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    /// Retries for transient S3 errors (0 disables retrying)
    #[arg(long, default_value = "3")]
    pub max_retries: u32,
}

impl S3Args {
    /// Build the client configuration for `bucket`.
    pub fn to_s3_config(&self, bucket: &str) -> S3Config {
        let mut config = S3Config::new(bucket)
            .with_region(&self.region)
            .with_timeout(self.timeout_secs);

        if let Some(endpoint) = &self.s3_endpoint {
            config = config.with_endpoint(endpoint);
        }

        if let (Some(access_key), Some(secret_key)) = (&self.access_key, &self.secret_key) {
            config = config.with_credentials(access_key, secret_key);
        }

        if let Some(profile) = &self.profile {
            config = config.with_profile(profile);
        }

        config
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new().with_max_retries(self.max_retries)
    }
}

/// Log level argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose, includes every listed key
    Trace,
    /// Page fetches and split boundaries
    Debug,
    /// Run summaries (default)
    Info,
    /// Configuration precedence and ordering violations
    Warn,
    /// Errors only
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Parse a positive u32 (>= 1).
pub fn parse_positive_u32(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value < 1 {
        return Err(format!("{value} is not in 1.."));
    }
    Ok(value)
}

/// Parse a positive usize (>= 1).
pub fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value < 1 {
        return Err(format!("{value} is not in 1.."));
    }
    Ok(value)
}
