//! Lane and row coordinates.

use serde::{Deserialize, Serialize};

/// One of the three battlefield lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lane {
    Alpha,
    Bravo,
    Charlie,
}

impl Lane {
    /// All lanes in fixed order. Iteration order matters for determinism:
    /// every scan of the battlefield walks Alpha, Bravo, Charlie.
    pub const ALL: [Lane; 3] = [Lane::Alpha, Lane::Bravo, Lane::Charlie];

    /// Stable index of this lane (0-2).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Lane::Alpha => 0,
            Lane::Bravo => 1,
            Lane::Charlie => 2,
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Lane::Alpha => "Alpha",
            Lane::Bravo => "Bravo",
            Lane::Charlie => "Charlie",
        };
        write!(f, "{name}")
    }
}

/// Position within a lane side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Row {
    Frontline,
    Backline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_order_is_stable() {
        assert_eq!(Lane::ALL[0], Lane::Alpha);
        assert_eq!(Lane::ALL[2], Lane::Charlie);
        assert_eq!(Lane::Bravo.index(), 1);
    }

    #[test]
    fn test_lane_serde_names() {
        let json = serde_json::to_string(&Lane::Charlie).unwrap();
        assert_eq!(json, "\"CHARLIE\"");
    }
}
