//! Core types for the open-URL policy.
//!
//! A `Policy` is the parsed configuration file. Every validation produces a
//! `Verdict`: either the URL may be opened, or a `Rejection` says why not.

use serde::Serialize;
use std::fmt;

/// Milliseconds used when `IdlePeriod:` is missing a usable positive value.
pub const DEFAULT_IDLE_PERIOD_MS: u64 = 1000;

/// The active allowlist and timing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    /// Open the releases page at startup.
    pub check_update: bool,

    /// Minimum milliseconds between two accepted calls. Always > 0.
    pub idle_period_ms: u64,

    /// URL schemes that may be opened, compared exactly.
    pub allowed_protocols: Vec<String>,

    /// Hostnames that may be opened, together with their subdomains.
    pub allowed_domains: Vec<String>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            check_update: true,
            idle_period_ms: DEFAULT_IDLE_PERIOD_MS,
            allowed_protocols: Vec::new(),
            allowed_domains: Vec::new(),
        }
    }
}

impl Policy {
    /// Whether `scheme` is one of the allowed protocols.
    /// Case-sensitive, no wildcards.
    pub fn allows_protocol(&self, scheme: &str) -> bool {
        self.allowed_protocols
            .iter()
            .any(|p| !p.is_empty() && p == scheme)
    }

    /// Whether `host` equals an allowed domain or is a subdomain of one.
    ///
    /// `sub.example.com` matches `example.com`; `evilexample.com` does not.
    pub fn allows_domain(&self, host: &str) -> bool {
        self.allowed_domains.iter().any(|d| {
            !d.is_empty()
                && (host == d
                    || host
                        .strip_suffix(d.as_str())
                        .is_some_and(|rest| rest.ends_with('.')))
        })
    }
}

/// Why a URL was not opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The configuration file could not be loaded.
    SettingsUnavailable { error: String },
    /// The cooldown since the last accepted call has not elapsed.
    RateLimited { elapsed_ms: u64, idle_period_ms: u64 },
    /// The target is not a syntactically valid absolute URL.
    InvalidUrl { error: String },
    /// The scheme is not in the protocol allowlist.
    UnauthorizedProtocol { scheme: String },
    /// The host is not in the domain allowlist.
    UnauthorizedDomain { host: String },
}

impl Rejection {
    /// Short stable identifier, used in log lines and `check` output.
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::SettingsUnavailable { .. } => "settings_unavailable",
            Rejection::RateLimited { .. } => "rate_limited",
            Rejection::InvalidUrl { .. } => "invalid_url",
            Rejection::UnauthorizedProtocol { .. } => "unauthorized_protocol",
            Rejection::UnauthorizedDomain { .. } => "unauthorized_domain",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::SettingsUnavailable { error } => {
                write!(f, "could not load the settings: {}", error)
            }
            Rejection::RateLimited {
                elapsed_ms,
                idle_period_ms,
            } => write!(
                f,
                "call interval {}ms is less than the set value {}ms",
                elapsed_ms, idle_period_ms
            ),
            Rejection::InvalidUrl { error } => write!(f, "invalid URL: {}", error),
            Rejection::UnauthorizedProtocol { scheme } => {
                write!(f, "not an authorized protocol: {}", scheme)
            }
            Rejection::UnauthorizedDomain { host } => {
                write!(f, "not an authorized domain: {}", host)
            }
        }
    }
}

/// The outcome of validating one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(r) => Some(r),
        }
    }
}

impl From<Result<(), Rejection>> for Verdict {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => Verdict::Accepted,
            Err(r) => Verdict::Rejected(r),
        }
    }
}
