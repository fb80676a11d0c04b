//! Capture constraints and the two-tier negotiation vocabulary.

use serde::{Deserialize, Serialize};

/// Which physical camera is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// User-facing camera.
    Front,
    /// World-facing camera.
    Rear,
}

impl Facing {
    /// The other facing mode. Exactly two values exist.
    pub fn toggled(self) -> Self {
        match self {
            Facing::Front => Facing::Rear,
            Facing::Rear => Facing::Front,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::Rear => "rear",
        }
    }
}

impl std::str::FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "front" | "user" => Ok(Facing::Front),
            "rear" | "back" | "environment" => Ok(Facing::Rear),
            other => Err(format!("unknown facing mode '{other}'")),
        }
    }
}

/// Named set of acquisition hints, tried in strict-then-relaxed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintTier {
    /// Resolution and frame-rate hints included.
    Rich,
    /// Facing only.
    Minimal,
}

/// Resolution hints for the rich tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionHint {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

/// Frame-rate hints for the rich tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRateHint {
    pub ideal_fps: u32,
    pub min_fps: u32,
}

/// One immutable negotiation attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureConstraints {
    pub facing: Facing,
    pub tier: ConstraintTier,
    pub resolution: Option<ResolutionHint>,
    pub frame_rate: Option<FrameRateHint>,
}

impl CaptureConstraints {
    /// The rich tier: full resolution and frame-rate hints.
    pub fn rich(facing: Facing) -> Self {
        Self {
            facing,
            tier: ConstraintTier::Rich,
            resolution: Some(ResolutionHint {
                ideal_width: 1920,
                ideal_height: 1080,
                min_width: 1280,
                min_height: 720,
            }),
            frame_rate: Some(FrameRateHint {
                ideal_fps: 30,
                min_fps: 15,
            }),
        }
    }

    /// The minimal tier: facing only, no resolution or frame-rate hints.
    pub fn minimal(facing: Facing) -> Self {
        Self {
            facing,
            tier: ConstraintTier::Minimal,
            resolution: None,
            frame_rate: None,
        }
    }

    /// Tiers in fallback order for one facing mode.
    pub fn fallback_order(facing: Facing) -> [Self; 2] {
        [Self::rich(facing), Self::minimal(facing)]
    }
}

/// Effective settings read back from the granted device, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Effective frame width in pixels.
    pub width: u32,
    /// Effective frame height in pixels.
    pub height: u32,
    /// Effective frame rate in frames per second.
    pub frame_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_toggles_between_exactly_two_values() {
        assert_eq!(Facing::Front.toggled(), Facing::Rear);
        assert_eq!(Facing::Rear.toggled(), Facing::Front);
        assert_eq!(Facing::Front.toggled().toggled(), Facing::Front);
    }

    #[test]
    fn facing_parses_common_aliases() {
        assert_eq!("back".parse::<Facing>().unwrap(), Facing::Rear);
        assert_eq!("user".parse::<Facing>().unwrap(), Facing::Front);
        assert!("sideways".parse::<Facing>().is_err());
    }

    #[test]
    fn fallback_order_is_rich_then_minimal() {
        let [first, second] = CaptureConstraints::fallback_order(Facing::Rear);
        assert_eq!(first.tier, ConstraintTier::Rich);
        assert!(first.resolution.is_some());
        assert!(first.frame_rate.is_some());
        assert_eq!(second.tier, ConstraintTier::Minimal);
        assert!(second.resolution.is_none());
        assert!(second.frame_rate.is_none());
    }
}
