//! Process configuration read from the environment.

use std::net::SocketAddr;

use anyhow::{Context, bail};

const DEFAULT_JWT_SECRET: &str = "dev-secret";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
/// One hundred years.
const MAX_TOKEN_TTL_MINUTES: i64 = 525_600 * 100;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub bind_addr: SocketAddr,
    pub seed_demo_data: bool,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEFAULT_JWT_SECRET.to_string()
        });

        let access_token_ttl_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("ACCESS_TOKEN_EXPIRE_MINUTES is not an integer: {raw:?}"))?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&access_token_ttl_minutes) {
            bail!(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}, got {access_token_ttl_minutes}"
            );
        }

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_raw:?}"))?;

        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            Some(raw) => raw
                .trim()
                .to_lowercase()
                .parse::<bool>()
                .with_context(|| format!("SEED_DEMO_DATA must be true or false: {raw:?}"))?,
            None => false,
        };

        Ok(Self {
            jwt_secret,
            access_token_ttl_minutes,
            bind_addr,
            seed_demo_data,
        })
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }

    /// Config for in-process tests: fixed secret, no seeding.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            access_token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            seed_demo_data: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;
    use scriptorium_auth::{Role, Subject, TokenIssuer};
    use scriptorium_core::SubjectId;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.jwt_secret, "dev-secret");
        assert_eq!(cfg.access_token_ttl_minutes, 60);
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert!(!cfg.seed_demo_data);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let cfg = ApiConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "15"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("SEED_DEMO_DATA", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert!(cfg.seed_demo_data);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ApiConfig::from_lookup(lookup(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "0")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "soon")])).is_err());
        assert!(
            ApiConfig::from_lookup(lookup(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "200000000000")])).is_err()
        );
        assert!(ApiConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("SEED_DEMO_DATA", "yes")])).is_err());
    }

    #[test]
    fn largest_accepted_ttl_still_issues_tokens() {
        let cfg = ApiConfig::from_lookup(lookup(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "52560000")])).unwrap();
        let issuer = TokenIssuer::new(cfg.jwt_secret.as_bytes(), cfg.token_ttl());
        let subject = Subject::new(SubjectId::new(1), Role::User);

        let token = issuer.issue(&subject, "user1", Utc::now()).unwrap();
        assert!(token.expires_at > Utc::now());
    }
}
