//! URL validation — the decision core.
//!
//! A candidate URL passes through these gates in order, stopping at the
//! first failure:
//! 1. Reload the settings from disk (fail closed if that fails)
//! 2. Cooldown since the last call that passed this gate
//! 3. URL syntax
//! 4. Protocol allowlist (exact, case-sensitive)
//! 5. Domain allowlist (exact host or a subdomain of an entry)
//!
//! The cooldown timestamp moves as soon as gate 2 is passed, so a caller that
//! gets through the rate gate is held off for the next idle period even when
//! its URL is then rejected on protocol or domain grounds.

use crate::audit::ActivityLog;
use crate::policy::parser::ConfigStore;
use crate::policy::rate::{RateCheck, RateState};
use crate::policy::types::{Policy, Rejection, Verdict};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Validates open-URL requests against the settings on disk.
pub struct UrlValidator {
    store: ConfigStore,
    rate: Arc<RateState>,
    log: Arc<ActivityLog>,
}

impl UrlValidator {
    pub fn new(store: ConfigStore, rate: Arc<RateState>, log: Arc<ActivityLog>) -> Self {
        Self { store, rate, log }
    }

    /// Validate `raw_url` now.
    pub fn validate(&self, raw_url: &str) -> Verdict {
        self.validate_at(raw_url, Instant::now())
    }

    /// Validate `raw_url` as if the call arrived at `now`.
    pub fn validate_at(&self, raw_url: &str, now: Instant) -> Verdict {
        let verdict: Verdict = self.run_gates(raw_url, now).into();

        match verdict.rejection() {
            None => tracing::debug!(url = raw_url, "URL accepted"),
            Some(rejection) => {
                tracing::debug!(url = raw_url, reason = rejection.kind(), "URL rejected");
                self.log_rejection(raw_url, rejection);
            }
        }

        verdict
    }

    fn run_gates(&self, raw_url: &str, now: Instant) -> Result<(), Rejection> {
        let policy = self
            .store
            .reload()
            .map_err(|e| Rejection::SettingsUnavailable {
                error: e.to_string(),
            })?;

        let idle_period = Duration::from_millis(policy.idle_period_ms);
        if let RateCheck::Limited { elapsed } = self.rate.check_and_advance(now, idle_period) {
            return Err(Rejection::RateLimited {
                elapsed_ms: elapsed.as_millis() as u64,
                idle_period_ms: policy.idle_period_ms,
            });
        }

        check_url(&policy, raw_url)
    }

    fn log_rejection(&self, raw_url: &str, rejection: &Rejection) {
        match rejection {
            Rejection::SettingsUnavailable { error } => {
                self.log.log(&["Could not load the settings", error.as_str()]);
            }
            Rejection::RateLimited {
                elapsed_ms,
                idle_period_ms,
            } => {
                let elapsed = elapsed_ms.to_string();
                let set = format!("set:{}", idle_period_ms);
                self.log.log(&[
                    "The call interval is less than the set value",
                    elapsed.as_str(),
                    set.as_str(),
                ]);
            }
            Rejection::InvalidUrl { .. } => self.log.log(&["Invalid URL", raw_url]),
            Rejection::UnauthorizedProtocol { .. } => {
                self.log.log(&["Not an authorized Protocol", raw_url]);
            }
            Rejection::UnauthorizedDomain { .. } => {
                self.log.log(&["Not an authorized Domain", raw_url]);
            }
        }
    }

    #[cfg(test)]
    fn store(&self) -> &ConfigStore {
        &self.store
    }
}

/// Check URL syntax, protocol and domain against `policy`.
/// No I/O and no cooldown; used by the validator and by `openbrowser check`.
pub fn check_url(policy: &Policy, raw_url: &str) -> Result<(), Rejection> {
    let url = Url::parse(raw_url).map_err(|e| Rejection::InvalidUrl {
        error: e.to_string(),
    })?;

    let scheme = scheme_as_written(raw_url, &url);
    if !policy.allows_protocol(scheme) {
        return Err(Rejection::UnauthorizedProtocol {
            scheme: scheme.to_string(),
        });
    }

    let host = url.host_str().unwrap_or_default();
    if !policy.allows_domain(host) {
        return Err(Rejection::UnauthorizedDomain {
            host: host.to_string(),
        });
    }

    Ok(())
}

/// The scheme exactly as the caller typed it. `Url` lowercases schemes,
/// which would make `HTTPS://` match an allowlisted `https`.
fn scheme_as_written<'a>(raw_url: &'a str, url: &Url) -> &'a str {
    let trimmed = raw_url.trim_start_matches(|c: char| c <= ' ');
    trimmed.get(..url.scheme().len()).unwrap_or_default()
}
