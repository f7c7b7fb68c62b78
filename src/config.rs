//! Configuration for invitations, sessions and password hashing.
//!
//! # Example
//!
//! ```rust
//! use chrono::Duration;
//! use onboard::config::{InvitationConfig, OnboardConfig};
//!
//! let config = OnboardConfig {
//!     invitations: InvitationConfig {
//!         ttl: Duration::hours(24),
//!         ..Default::default()
//!     },
//!     ..OnboardConfig::default()
//! };
//! assert_eq!(config.invitations.token_length, 32);
//! ```

use chrono::Duration;

use crate::SecretString;

#[derive(Debug, Clone, Default)]
pub struct OnboardConfig {
    pub invitations: InvitationConfig,
    pub sessions: SessionConfig,
    pub hashing: HashingConfig,
}

impl OnboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Long-lived invitations and cheap hashing for local work.
    pub fn development() -> Self {
        Self {
            invitations: InvitationConfig {
                ttl: Duration::days(14),
                ..InvitationConfig::default()
            },
            sessions: SessionConfig {
                lifetime: Duration::days(7),
                ..SessionConfig::default()
            },
            hashing: HashingConfig::default(),
        }
    }

    /// Short invitations, longer tokens, OWASP hashing parameters.
    pub fn strict() -> Self {
        Self {
            invitations: InvitationConfig {
                ttl: Duration::hours(24),
                token_length: 48,
                ..InvitationConfig::default()
            },
            sessions: SessionConfig {
                lifetime: Duration::hours(8),
                ..SessionConfig::default()
            },
            hashing: HashingConfig::production(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// Time-to-live of a fresh or extended token.
    ///
    /// Default: 72 hours
    pub ttl: Duration,

    /// Length of generated tokens, in characters.
    ///
    /// Default: 32
    pub token_length: usize,

    /// Page the accept link points at; the token is appended as a path
    /// segment.
    pub link_base: String,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(72),
            token_length: 32,
            link_base: "http://localhost:8080/invitations".to_owned(),
        }
    }
}

/// Shortest token length stores will issue.
pub const MIN_TOKEN_LENGTH: usize = 16;

impl InvitationConfig {
    /// # Errors
    ///
    /// Returns a description of the problem when tokens would be shorter than
    /// [`MIN_TOKEN_LENGTH`] or the TTL is not positive.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.token_length < MIN_TOKEN_LENGTH {
            return Err("token_length must be at least 16");
        }
        if self.ttl <= Duration::zero() {
            return Err("ttl must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Default: 24 hours
    pub lifetime: Duration,
    /// HMAC key for session handles. Must be set before issuing sessions.
    pub secret_key: SecretString,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::hours(24),
            secret_key: SecretString::new(""),
        }
    }
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns a description of the problem when the key is empty or shorter
    /// than 32 bytes.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.secret_key.is_empty() {
            return Err("secret_key must not be empty");
        }
        if self.secret_key.expose_secret().len() < 32 {
            return Err("secret_key should be at least 32 bytes");
        }
        Ok(())
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashingConfig {
    /// KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19_456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HashingConfig {
    pub fn production() -> Self {
        Self {
            memory_cost: 65_536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}
