//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use titan_admission::{DEFAULT_MAX_ATTEMPTS, DEFAULT_SUFFIX_LEN, MAX_SUFFIX_LEN, MIN_SUFFIX_LEN};
use titan_store::KubeStoreOptions;

const DEFAULT_LISTEN: &str = "0.0.0.0:8000";
const DEFAULT_NAMESPACE: &str = "default";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_KUBE_API_URL: &str = "https://kubernetes.default.svc";
const SERVICE_ACCOUNT_TOKEN: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Kubernetes API server (custom objects API).
    Kube,
    /// Process-local store, for development without a cluster.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: SocketAddr,
    pub namespace: String,
    pub store: StoreBackend,
    /// `None` disables the per-call deadline.
    pub store_timeout: Option<Duration>,
    pub submit_attempts: u32,
    pub id_suffix_len: usize,
    pub kube_api_url: String,
    pub kube_token: Option<String>,
    /// Explicit token file; when unset the service-account token is used if present.
    pub kube_token_file: Option<PathBuf>,
    pub kube_ca_cert: Option<PathBuf>,
    pub kube_insecure_skip_tls_verify: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (environment in production).
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let listen = get("TITAN_LISTEN")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| invalid("TITAN_LISTEN", e))?;

        let store = match get("TITAN_STORE").as_deref().map(str::to_ascii_lowercase) {
            None => StoreBackend::Kube,
            Some(ref s) if s == "kube" => StoreBackend::Kube,
            Some(ref s) if s == "memory" => StoreBackend::Memory,
            Some(other) => {
                return Err(invalid(
                    "TITAN_STORE",
                    format!("expected kube or memory, got {}", other),
                ))
            }
        };

        let timeout_ms = parse_or(
            "TITAN_STORE_TIMEOUT_MS",
            get("TITAN_STORE_TIMEOUT_MS"),
            DEFAULT_STORE_TIMEOUT_MS,
        )?;
        let submit_attempts = parse_or(
            "TITAN_SUBMIT_ATTEMPTS",
            get("TITAN_SUBMIT_ATTEMPTS"),
            DEFAULT_MAX_ATTEMPTS,
        )?;
        if submit_attempts == 0 {
            return Err(invalid("TITAN_SUBMIT_ATTEMPTS", "must be at least 1"));
        }
        let id_suffix_len = parse_or(
            "TITAN_ID_SUFFIX_LEN",
            get("TITAN_ID_SUFFIX_LEN"),
            DEFAULT_SUFFIX_LEN,
        )?;
        if !(MIN_SUFFIX_LEN..=MAX_SUFFIX_LEN).contains(&id_suffix_len) {
            return Err(invalid(
                "TITAN_ID_SUFFIX_LEN",
                format!("must be between {} and {}", MIN_SUFFIX_LEN, MAX_SUFFIX_LEN),
            ));
        }

        let kube_insecure_skip_tls_verify = match get("KUBE_INSECURE_SKIP_TLS_VERIFY") {
            None => false,
            Some(v) => {
                parse_bool(&v).ok_or_else(|| invalid("KUBE_INSECURE_SKIP_TLS_VERIFY", v))?
            }
        };

        Ok(Self {
            listen,
            namespace: get("TITAN_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            store,
            store_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            submit_attempts,
            id_suffix_len,
            kube_api_url: get("KUBE_API_URL").unwrap_or_else(|| DEFAULT_KUBE_API_URL.to_string()),
            kube_token: get("KUBE_TOKEN"),
            kube_token_file: get("KUBE_TOKEN_FILE").map(PathBuf::from),
            kube_ca_cert: get("KUBE_CA_CERT").map(PathBuf::from),
            kube_insecure_skip_tls_verify,
        })
    }

    /// Resolves credentials and CA bundle from disk for the Kubernetes backend.
    pub fn kube_options(&self) -> Result<KubeStoreOptions, ConfigError> {
        let token = match (&self.kube_token, &self.kube_token_file) {
            (Some(token), _) => Some(token.clone()),
            (None, Some(path)) => Some(read_to_string(path)?.trim().to_string()),
            (None, None) => {
                let default = Path::new(SERVICE_ACCOUNT_TOKEN);
                if default.exists() {
                    Some(read_to_string(default)?.trim().to_string())
                } else {
                    None
                }
            }
        };
        let ca_cert_pem = match &self.kube_ca_cert {
            Some(path) => Some(std::fs::read(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?),
            None => None,
        };
        Ok(KubeStoreOptions {
            api_url: self.kube_api_url.clone(),
            namespace: self.namespace.clone(),
            token,
            ca_cert_pem,
            insecure_skip_tls_verify: self.kube_insecure_skip_tls_verify,
            timeout: self.store_timeout,
        })
    }
}

fn invalid(name: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.to_string(),
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v.trim().parse().map_err(|e| invalid(name, e)),
        None => Ok(default),
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn read_to_string(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}
