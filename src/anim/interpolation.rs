//! Keyframe interpolation modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::Error;

/// Interpolation mode recorded on a single keyframe of a single channel.
///
/// Written to `.animation` files by its upper-case name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interpolation {
    Constant,
    Linear,
    Bezier,
    Sine,
    Quad,
    Cubic,
    Quart,
    Quint,
    Expo,
    Circ,
    Back,
    Bounce,
    Elastic,
}

impl Interpolation {
    /// Every mode, in declaration order.
    pub const ALL: [Interpolation; 13] = [
        Self::Constant,
        Self::Linear,
        Self::Bezier,
        Self::Sine,
        Self::Quad,
        Self::Cubic,
        Self::Quart,
        Self::Quint,
        Self::Expo,
        Self::Circ,
        Self::Back,
        Self::Bounce,
        Self::Elastic,
    ];

    /// Name as written in track files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "CONSTANT",
            Self::Linear => "LINEAR",
            Self::Bezier => "BEZIER",
            Self::Sine => "SINE",
            Self::Quad => "QUAD",
            Self::Cubic => "CUBIC",
            Self::Quart => "QUART",
            Self::Quint => "QUINT",
            Self::Expo => "EXPO",
            Self::Circ => "CIRC",
            Self::Back => "BACK",
            Self::Bounce => "BOUNCE",
            Self::Elastic => "ELASTIC",
        }
    }
}

impl Default for Interpolation {
    fn default() -> Self {
        Self::Bezier
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| Error::other(format!("unknown interpolation mode '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for mode in Interpolation::ALL {
            assert_eq!(mode.as_str().parse::<Interpolation>().unwrap(), mode);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("linear".parse::<Interpolation>().is_err());
        assert!("".parse::<Interpolation>().is_err());
    }

    #[test]
    fn test_serde_matches_display() {
        let json = serde_json::to_string(&Interpolation::Constant).unwrap();
        assert_eq!(json, "\"CONSTANT\"");
        assert_eq!(Interpolation::Constant.to_string(), "CONSTANT");
    }
}
