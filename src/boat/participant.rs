use std::fmt;

use serde::{Deserialize, Serialize};

use crate::optimizer::LineupError;

/// Numeric roster id. Its ordering is the tie-break when candidates are
/// otherwise equal, so opaque string ids are not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Left,
    Right,
    Drum,
    Steer,
}

impl Capability {
    pub const ALL: [Capability; 4] = [Self::Left, Self::Right, Self::Drum, Self::Steer];

    const fn bit(self) -> u8 {
        match self {
            Self::Left => 0b0001,
            Self::Right => 0b0010,
            Self::Drum => 0b0100,
            Self::Steer => 0b1000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Drum => "drum",
            Self::Steer => "steer",
        }
    }

    /// Parse a roster tag. Accepts the role nouns rosters tend to use ("drummer", "steerer").
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Self::Left),
            "right" | "r" => Some(Self::Right),
            "drum" | "drummer" => Some(Self::Drum),
            "steer" | "steerer" | "sweep" => Some(Self::Steer),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-size set of [Capability] values, stored as a bitset.
/// Serialized as a list of capability names in canonical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Capability>", into = "Vec<Capability>")]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const EMPTY: Self = Self(0);

    pub fn of(capabilities: &[Capability]) -> Self {
        capabilities.iter().copied().collect()
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.insert(capability);
        self
    }

    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn can_paddle(self) -> bool {
        self.contains(Capability::Left) || self.contains(Capability::Right)
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .into_iter()
            .filter(move |capability| self.contains(*capability))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

impl From<Vec<Capability>> for CapabilitySet {
    fn from(value: Vec<Capability>) -> Self {
        value.into_iter().collect()
    }
}

impl From<CapabilitySet> for Vec<Capability> {
    fn from(value: CapabilitySet) -> Self {
        value.iter().collect()
    }
}

/// Body weight in kilograms. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    pub fn new(kg: f64) -> Result<Self, LineupError> {
        if kg.is_finite() && kg > 0.0 {
            Ok(Self(kg))
        } else {
            Err(LineupError::InvalidWeight { value: kg })
        }
    }

    pub fn kg(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Weight {
    type Error = LineupError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weight> for f64 {
    fn from(value: Weight) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub weight: Weight,
    #[serde(default, alias = "caps")]
    pub capabilities: CapabilitySet,
    #[serde(default, alias = "isSubstitute")]
    pub is_substitute: bool,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, weight: Weight, capabilities: CapabilitySet) -> Self {
        Self {
            id: id.into(),
            weight,
            capabilities,
            is_substitute: false,
        }
    }

    pub fn as_substitute(mut self) -> Self {
        self.is_substitute = true;
        self
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }
}
