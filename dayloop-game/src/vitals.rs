//! Character vitals and the mood derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    INITIAL_ENERGY, INITIAL_HUNGER, INITIAL_HYGIENE, MOOD_CONTENT_MEAN, MOOD_EXHAUSTED_ENERGY,
    MOOD_GRUBBY_HYGIENE, MOOD_HAPPY_MEAN, MOOD_HUNGRY_HUNGER, VITAL_MAX, VITAL_MIN,
};
use crate::numbers::mean_i32;

/// Clip a vital value into `[0, 100]`.
#[must_use]
pub const fn clamp_vital(value: i32) -> i32 {
    if value < VITAL_MIN {
        VITAL_MIN
    } else if value > VITAL_MAX {
        VITAL_MAX
    } else {
        value
    }
}

/// How a single vital changes when an action completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum VitalEffect {
    #[default]
    Unchanged,
    Set(i32),
    Add(i32),
}

impl VitalEffect {
    /// Apply the effect to `current`, clamping the result.
    #[must_use]
    pub const fn apply(self, current: i32) -> i32 {
        match self {
            Self::Unchanged => current,
            Self::Set(value) => clamp_vital(value),
            Self::Add(delta) => clamp_vital(current.saturating_add(delta)),
        }
    }
}

/// The character's bounded needs. Every value stays within `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "VitalsRepr")]
pub struct CharacterVitals {
    energy: i32,
    hygiene: i32,
    hunger: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    social: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    production: Option<i32>,
}

#[derive(Deserialize)]
struct VitalsRepr {
    energy: i32,
    hygiene: i32,
    hunger: i32,
    #[serde(default)]
    social: Option<i32>,
    #[serde(default)]
    production: Option<i32>,
}

impl From<VitalsRepr> for CharacterVitals {
    fn from(raw: VitalsRepr) -> Self {
        Self::new(raw.energy, raw.hygiene, raw.hunger)
            .with_social(raw.social)
            .with_production(raw.production)
    }
}

impl Default for CharacterVitals {
    fn default() -> Self {
        Self::initial()
    }
}

impl CharacterVitals {
    /// Build vitals from raw values, clamping each into range.
    #[must_use]
    pub const fn new(energy: i32, hygiene: i32, hunger: i32) -> Self {
        Self {
            energy: clamp_vital(energy),
            hygiene: clamp_vital(hygiene),
            hunger: clamp_vital(hunger),
            social: None,
            production: None,
        }
    }

    /// Vitals every new or reset session starts with.
    #[must_use]
    pub const fn initial() -> Self {
        Self::new(INITIAL_ENERGY, INITIAL_HYGIENE, INITIAL_HUNGER)
    }

    #[must_use]
    pub const fn with_social(mut self, social: Option<i32>) -> Self {
        self.social = match social {
            Some(value) => Some(clamp_vital(value)),
            None => None,
        };
        self
    }

    #[must_use]
    pub const fn with_production(mut self, production: Option<i32>) -> Self {
        self.production = match production {
            Some(value) => Some(clamp_vital(value)),
            None => None,
        };
        self
    }

    #[must_use]
    pub const fn energy(&self) -> i32 {
        self.energy
    }

    #[must_use]
    pub const fn hygiene(&self) -> i32 {
        self.hygiene
    }

    #[must_use]
    pub const fn hunger(&self) -> i32 {
        self.hunger
    }

    #[must_use]
    pub const fn social(&self) -> Option<i32> {
        self.social
    }

    #[must_use]
    pub const fn production(&self) -> Option<i32> {
        self.production
    }

    pub(crate) const fn apply(
        &mut self,
        energy: VitalEffect,
        hygiene: VitalEffect,
        hunger: VitalEffect,
    ) {
        self.energy = energy.apply(self.energy);
        self.hygiene = hygiene.apply(self.hygiene);
        self.hunger = hunger.apply(self.hunger);
    }

    /// Every tracked vital, optional ones included only when present.
    #[must_use]
    pub fn values(&self) -> Vec<i32> {
        let mut values = vec![self.energy, self.hygiene, self.hunger];
        values.extend(self.social);
        values.extend(self.production);
        values
    }

    #[must_use]
    pub fn mood(&self) -> Mood {
        derive_mood(self)
    }
}

/// Finite mood classification derived from vitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Content,
    Low,
    Hungry,
    Grubby,
    Exhausted,
}

impl Mood {
    pub const ALL: [Self; 6] = [
        Self::Happy,
        Self::Content,
        Self::Low,
        Self::Hungry,
        Self::Grubby,
        Self::Exhausted,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Content => "content",
            Self::Low => "low",
            Self::Hungry => "hungry",
            Self::Grubby => "grubby",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify vitals into a mood. Urgent needs win over the overall average.
#[must_use]
pub fn derive_mood(vitals: &CharacterVitals) -> Mood {
    if vitals.energy < MOOD_EXHAUSTED_ENERGY {
        return Mood::Exhausted;
    }
    if vitals.hunger < MOOD_HUNGRY_HUNGER {
        return Mood::Hungry;
    }
    if vitals.hygiene < MOOD_GRUBBY_HYGIENE {
        return Mood::Grubby;
    }
    let mean = mean_i32(&vitals.values());
    if mean >= MOOD_HAPPY_MEAN {
        Mood::Happy
    } else if mean >= MOOD_CONTENT_MEAN {
        Mood::Content
    } else {
        Mood::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_clips_both_ends() {
        assert_eq!(clamp_vital(-4), 0);
        assert_eq!(clamp_vital(42), 42);
        assert_eq!(clamp_vital(250), 100);
    }

    #[test]
    fn effects_clamp_results() {
        assert_eq!(VitalEffect::Add(10).apply(95), 100);
        assert_eq!(VitalEffect::Add(-5).apply(3), 0);
        assert_eq!(VitalEffect::Set(100).apply(12), 100);
        assert_eq!(VitalEffect::Unchanged.apply(33), 33);
        assert_eq!(VitalEffect::Add(i32::MIN).apply(50), 0);
    }

    #[test]
    fn initial_vitals_are_content() {
        let vitals = CharacterVitals::initial();
        assert_eq!(vitals.energy(), 80);
        assert_eq!(vitals.hygiene(), 70);
        assert_eq!(vitals.hunger(), 60);
        assert_eq!(vitals.social(), None);
        assert_eq!(derive_mood(&vitals), Mood::Content);
    }

    #[test]
    fn urgent_needs_override_average() {
        assert_eq!(
            derive_mood(&CharacterVitals::new(10, 100, 100)),
            Mood::Exhausted
        );
        assert_eq!(derive_mood(&CharacterVitals::new(100, 100, 5)), Mood::Hungry);
        assert_eq!(derive_mood(&CharacterVitals::new(100, 20, 100)), Mood::Grubby);
        assert_eq!(derive_mood(&CharacterVitals::new(90, 100, 60)), Mood::Happy);
        assert_eq!(derive_mood(&CharacterVitals::new(40, 40, 40)), Mood::Low);
    }

    #[test]
    fn optional_vitals_join_the_average() {
        let vitals = CharacterVitals::new(90, 90, 90).with_social(Some(0));
        assert_eq!(derive_mood(&vitals), Mood::Content);
        let vitals = vitals.with_social(None).with_production(Some(100));
        assert_eq!(derive_mood(&vitals), Mood::Happy);
    }

    #[test]
    fn deserialization_clamps_out_of_range_values() {
        let vitals: CharacterVitals =
            serde_json::from_str(r#"{"energy":140,"hygiene":-3,"hunger":50,"social":101}"#)
                .unwrap();
        assert_eq!(vitals.energy(), 100);
        assert_eq!(vitals.hygiene(), 0);
        assert_eq!(vitals.social(), Some(100));
        assert_eq!(vitals.production(), None);
    }

    #[test]
    fn serialization_omits_absent_optionals() {
        let json = serde_json::to_string(&CharacterVitals::initial()).unwrap();
        assert_eq!(json, r#"{"energy":80,"hygiene":70,"hunger":60}"#);
    }
}
