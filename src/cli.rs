//! Command-line interface.
//!
//! Every flag has an environment-variable fallback so the gateway can
//! be configured through either in container deployments. Token
//! validation flags override their config-file counterparts when
//! given, letting one YAML file serve several environments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::GatewayConfig;

#[derive(Parser, Debug)]
#[command(name = "auth-gateway", version, about = "Authentication and authorization gateway")]
pub struct Cli {
    /// Cryptographic signing key: the raw secret for HMAC algorithms,
    /// a PEM-encoded public key for RSA/ECDSA/EdDSA.
    #[arg(short = 'k', long, env = "GATEWAY_SIGNING_KEY")]
    pub signing_key: String,

    /// Signing algorithm identifier (HS256, RS256, ES256, ...).
    #[arg(short = 'm', long, env = "GATEWAY_SIGNING_METHOD", default_value = "HS256")]
    pub signing_method: String,

    /// Config YAML path.
    #[arg(
        short = 'p',
        long,
        env = "GATEWAY_CONFIG_PATH",
        default_value = "/etc/auth-gateway/config.yaml"
    )]
    pub config_path: PathBuf,

    /// Listen address.
    #[arg(
        short = 'l',
        long,
        env = "GATEWAY_LISTEN_ADDRESS",
        default_value = "0.0.0.0:3512"
    )]
    pub listen_address: String,

    /// URL requests are forwarded to once authorized. Overrides the
    /// config file; omit both to run in sidecar mode.
    #[arg(long = "url", env = "GATEWAY_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Valid token issuer.
    #[arg(long = "iss", env = "GATEWAY_VALID_ISSUER")]
    pub valid_issuer: Option<String>,

    /// Valid token audience.
    #[arg(long = "aud", env = "GATEWAY_VALID_AUDIENCE")]
    pub valid_audience: Option<String>,

    /// Accept tokens without an expiration claim.
    #[arg(long, env = "GATEWAY_IGNORE_EXPIRATION")]
    pub ignore_expiration: bool,

    /// Accept tokens without a not-before claim.
    #[arg(long, env = "GATEWAY_IGNORE_NOT_BEFORE")]
    pub ignore_not_before: bool,

    /// Clock skew tolerance in seconds for expiration and not-before
    /// checks.
    #[arg(long = "clock-skew", env = "GATEWAY_CLOCK_SKEW")]
    pub clock_skew_in_seconds: Option<u64>,
}

impl Cli {
    /// Fold flag overrides into the loaded configuration. Flags that
    /// were not given leave the config file values untouched.
    pub fn apply_overrides(&self, config: &mut GatewayConfig) {
        if self.upstream_url.is_some() {
            config.server.upstream_url = self.upstream_url.clone();
        }
        if self.valid_issuer.is_some() {
            config.authentication.issuer = self.valid_issuer.clone();
        }
        if self.valid_audience.is_some() {
            config.authentication.audience = self.valid_audience.clone();
        }
        if self.ignore_expiration {
            config.authentication.ignore_expiration = true;
        }
        if self.ignore_not_before {
            config.authentication.ignore_not_before = true;
        }
        if let Some(skew) = self.clock_skew_in_seconds {
            config.authentication.clock_skew_in_seconds = skew;
        }
    }
}
