use serde::{Deserialize, Serialize};

/// The composite key identifying one tracked attempt bucket.
///
/// Two identities with the same email and IP address refer to the same
/// lockout record; different pairs are tracked independently. The calling
/// authentication handler constructs this from request contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub ip: String,
}

impl Identity {
    /// Create a new identity from an email address and a client IP.
    pub fn new(email: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ip: ip.into(),
        }
    }

    /// The store key for this identity, rendered as `email/ip`.
    ///
    /// This format is also what keys the snapshot file, so it must stay
    /// stable across releases.
    pub fn key(&self) -> String {
        format!("{}/{}", self.email, self.ip)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.email, self.ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let identity = Identity::new("user@example.com", "192.168.1.1");
        assert_eq!(identity.key(), "user@example.com/192.168.1.1");
        assert_eq!(identity.to_string(), identity.key());
    }

    #[test]
    fn test_distinct_pairs_produce_distinct_keys() {
        let a = Identity::new("user@example.com", "192.168.1.1");
        let b = Identity::new("user@example.com", "192.168.1.2");
        let c = Identity::new("other@example.com", "192.168.1.1");
        assert_ne!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }
}
