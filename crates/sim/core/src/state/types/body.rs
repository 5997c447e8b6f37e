//! Hit locations and their armor layering.

use arrayvec::ArrayVec;

use super::common::Meter;
use super::equipment::ArmorSlot;
use crate::config::SimConfig;

/// A hit location on a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyPartKind {
    Head,
    Torso,
    Arm,
    Hand,
    Leg,
    Foot,
}

impl BodyPartKind {
    /// Armor layers covering this part, outermost first.
    ///
    /// The torso is the only part with two layers (body armor over shirt);
    /// everything else has at most one.
    pub fn armor_layers(self) -> (Option<ArmorSlot>, Option<ArmorSlot>) {
        match self {
            BodyPartKind::Head => (Some(ArmorSlot::Helmet), None),
            BodyPartKind::Torso => (Some(ArmorSlot::BodyArmor), Some(ArmorSlot::Shirt)),
            BodyPartKind::Arm => (Some(ArmorSlot::Shirt), None),
            BodyPartKind::Hand => (Some(ArmorSlot::Gloves), None),
            BodyPartKind::Leg => (Some(ArmorSlot::LegArmor), None),
            BodyPartKind::Foot => (Some(ArmorSlot::Boots), None),
        }
    }

    /// Returns true if emptying this part's health kills the actor.
    pub fn is_vital(self) -> bool {
        matches!(self, BodyPartKind::Head | BodyPartKind::Torso)
    }
}

/// Health pool for one hit location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyPart {
    pub kind: BodyPartKind,
    pub health: Meter,
}

impl BodyPart {
    pub fn new(kind: BodyPartKind, max_health: u32) -> Self {
        Self {
            kind,
            health: Meter::full(max_health),
        }
    }
}

/// The full set of hit locations for one actor.
pub type BodyParts = ArrayVec<BodyPart, { SimConfig::BODY_PART_COUNT }>;

/// Builds the standard six-part body with uniform part health.
pub fn standard_body(part_health: u32) -> BodyParts {
    use strum::IntoEnumIterator;

    BodyPartKind::iter()
        .map(|kind| BodyPart::new(kind, part_health))
        .collect()
}
