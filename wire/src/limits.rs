//! Configurable limits for bounded decoding.

/// Limits enforced while decoding event bodies.
///
/// Counts and lengths are validated before allocation so a hostile body
/// cannot request unbounded memory. Interpreting the opaque component and
/// player payloads is bounded by the higher layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum length of one opaque component or player payload in bytes.
    pub max_payload_bytes: usize,

    /// Maximum number of component entries in one update body.
    pub max_components_per_update: usize,

    /// Maximum number of roster entries in one player list body.
    pub max_players: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Component state is small; 16 KB leaves ample headroom.
            max_payload_bytes: 16 * 1024,
            max_components_per_update: 64,
            max_players: 256,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_payload_bytes: 1024,
            max_components_per_update: 8,
            max_players: 8,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_payload_bytes: usize::MAX,
            max_components_per_update: usize::MAX,
            max_players: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testing_limits_smaller_than_default() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_payload_bytes < default_limits.max_payload_bytes);
        assert!(test_limits.max_components_per_update < default_limits.max_components_per_update);
        assert!(test_limits.max_players < default_limits.max_players);
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_payload_bytes, usize::MAX);
        assert_eq!(limits.max_components_per_update, usize::MAX);
        assert_eq!(limits.max_players, usize::MAX);
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_components_per_update, 8);
    }

    #[test]
    fn limits_equality_and_clone() {
        let l1 = Limits::default();
        assert_eq!(l1, l1.clone());
        assert_ne!(l1, Limits::for_testing());
    }
}
