//! The tunable parameter vector behind the AI's behavior.
//!
//! A [`Policy`] holds six scalars. Five of them drive the tactics in
//! [`crate::tactics`]; the navigation gain is carried along (mutated, clamped
//! and serialized) but no control law reads it yet.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of scalar fields in a [`Policy`].
pub const FIELD_COUNT: usize = 6;

/// Name and valid range of one policy field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldSpec {
    const fn new(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, min, max }
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Field specs in [`Policy::to_array`] order.
pub const FIELDS: [FieldSpec; FIELD_COUNT] = [
    FieldSpec::new("engagement radius", 90.0, 340.0),
    FieldSpec::new("fire bias", 0.0, 1.0),
    FieldSpec::new("break aggression", 0.0, 1.0),
    FieldSpec::new("weave amplitude", 0.0, 1.8),
    FieldSpec::new("weave frequency", 0.1, 2.0),
    FieldSpec::new("nav gain", 2.5, 6.0),
];

/// Behavioral parameters of the AI pilot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Preferred distance to the foe. The AI orbits outwards when closer than
    /// 85% of it and closes in when farther than 115%.
    pub engagement_radius: f64,
    /// Willingness to fire, from 0 (needs a near-perfect aim) to 1 (fires
    /// loosely).
    pub fire_bias: f64,
    /// How hard the AI turns away from an incoming missile.
    pub break_aggression: f64,
    /// Amplitude of the sinusoidal weave added to the turn command.
    pub weave_amplitude: f64,
    /// Weave frequency in Hz.
    pub weave_frequency: f64,
    /// Proportional navigation gain. Reserved.
    pub nav_gain: f64,
}

impl Default for Policy {
    fn default() -> Self {
        Self::INITIAL_MEAN
    }
}

impl Policy {
    /// Starting mean of the optimizer. Deliberately weak so that learning is
    /// visible within the first minutes of play.
    pub const INITIAL_MEAN: Self = Self {
        engagement_radius: 120.0,
        fire_bias: 0.9,
        break_aggression: 0.1,
        weave_amplitude: 0.05,
        weave_frequency: 0.2,
        nav_gain: 3.0,
    };

    /// Starting per-field sampling spread of the optimizer.
    pub const INITIAL_SIGMA: Self = Self {
        engagement_radius: 40.0,
        fire_bias: 0.15,
        break_aggression: 0.2,
        weave_amplitude: 0.15,
        weave_frequency: 0.25,
        nav_gain: 0.4,
    };

    #[must_use]
    pub const fn to_array(&self) -> [f64; FIELD_COUNT] {
        [
            self.engagement_radius,
            self.fire_bias,
            self.break_aggression,
            self.weave_amplitude,
            self.weave_frequency,
            self.nav_gain,
        ]
    }

    /// Builds a policy from raw field values without clamping.
    #[must_use]
    pub const fn from_array(values: [f64; FIELD_COUNT]) -> Self {
        let [
            engagement_radius,
            fire_bias,
            break_aggression,
            weave_amplitude,
            weave_frequency,
            nav_gain,
        ] = values;
        Self {
            engagement_radius,
            fire_bias,
            break_aggression,
            weave_amplitude,
            weave_frequency,
            nav_gain,
        }
    }

    /// Returns a copy with every field clamped into its valid range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let mut values = self.to_array();
        for (value, spec) in values.iter_mut().zip(&FIELDS) {
            *value = spec.clamp(*value);
        }
        Self::from_array(values)
    }

    /// Returns `true` if every field lies within its valid range.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        self.to_array()
            .iter()
            .zip(&FIELDS)
            .all(|(value, spec)| (spec.min..=spec.max).contains(value))
    }

    #[must_use]
    pub fn summary(&self) -> StrategySummary {
        StrategySummary::new(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Distance {
    #[display("close")]
    Close,
    #[display("mid-range")]
    MidRange,
    #[display("far")]
    Far,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Shooting {
    #[display("aggressive")]
    Aggressive,
    #[display("balanced")]
    Balanced,
    #[display("cautious")]
    Cautious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Evasion {
    #[display("very hard")]
    VeryHard,
    #[display("moderate")]
    Moderate,
    #[display("low")]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Weave {
    #[display("strong")]
    Strong,
    #[display("medium")]
    Medium,
    #[display("weak")]
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Tempo {
    #[display("fast")]
    Fast,
    #[display("medium")]
    Medium,
    #[display("slow")]
    Slow,
}

/// Coarse, human-readable reading of a [`Policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySummary {
    pub distance: Distance,
    pub shooting: Shooting,
    pub evasion: Evasion,
    pub weave: Weave,
    pub tempo: Tempo,
}

impl StrategySummary {
    #[must_use]
    pub fn new(policy: &Policy) -> Self {
        let distance = if policy.engagement_radius < 150.0 {
            Distance::Close
        } else if policy.engagement_radius < 220.0 {
            Distance::MidRange
        } else {
            Distance::Far
        };
        let shooting = if policy.fire_bias > 0.7 {
            Shooting::Aggressive
        } else if policy.fire_bias > 0.4 {
            Shooting::Balanced
        } else {
            Shooting::Cautious
        };
        let evasion = if policy.break_aggression > 0.7 {
            Evasion::VeryHard
        } else if policy.break_aggression > 0.3 {
            Evasion::Moderate
        } else {
            Evasion::Low
        };
        let weave = if policy.weave_amplitude > 1.0 {
            Weave::Strong
        } else if policy.weave_amplitude > 0.4 {
            Weave::Medium
        } else {
            Weave::Weak
        };
        let tempo = if policy.weave_frequency > 1.2 {
            Tempo::Fast
        } else if policy.weave_frequency > 0.6 {
            Tempo::Medium
        } else {
            Tempo::Slow
        };
        Self {
            distance,
            shooting,
            evasion,
            weave,
            tempo,
        }
    }
}

impl fmt::Display for StrategySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "distance: {}, shooting: {}, evasion: {}, weave: {} ({})",
            self.distance, self.shooting, self.evasion, self.weave, self.tempo
        )
    }
}
