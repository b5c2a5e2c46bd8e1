//! Eligibility Gate
//!
//! Decides from a unit's declared name alone whether it is sampled. Units
//! that are not eligible run nowhere near the sampler and get no record.

use serde::{Deserialize, Serialize};

/// Trailing character that marks a unit for sampling
pub const DEFAULT_MARKER: char = '#';

/// Which units take part in sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eligibility {
    /// Units whose name ends with the given character
    Marker(char),
    /// Every unit
    All,
    /// No unit
    Off,
}

impl Default for Eligibility {
    fn default() -> Self {
        Eligibility::Marker(DEFAULT_MARKER)
    }
}

impl Eligibility {
    /// Whether a unit named `name` is sampled under this policy
    pub fn is_eligible(&self, name: &str) -> bool {
        match self {
            Eligibility::Marker(marker) => name.ends_with(*marker),
            Eligibility::All => true,
            Eligibility::Off => false,
        }
    }
}

/// Default policy: a trailing `#` marks a unit for sampling
pub fn is_eligible(name: &str) -> bool {
    Eligibility::default().is_eligible(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_marker() {
        assert!(is_eligible("A#"));
        assert!(is_eligible("parses a large document #"));
        assert!(!is_eligible("B"));
        assert!(!is_eligible("#not trailing"));
        assert!(!is_eligible(""));
    }

    #[test]
    fn test_custom_marker() {
        let policy = Eligibility::Marker('⏱');
        assert!(policy.is_eligible("render ⏱"));
        assert!(!policy.is_eligible("render #"));
    }

    #[test]
    fn test_all_and_off() {
        assert!(Eligibility::All.is_eligible("B"));
        assert!(!Eligibility::Off.is_eligible("A#"));
    }
}
