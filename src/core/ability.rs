//! Ability records attached to objects and cards.
//!
//! Three kinds of ability live on board objects:
//!
//! - **Passive** (`PassiveAbility`): continuously reconciled. Each carries a
//!   target descriptor and records the targets it is currently applied to.
//! - **Triggered** (`TriggeredAbility`): fires once per matching event.
//! - **Activated** (`ActivatedAbility`): run on demand by the controller.
//!
//! What a passive ability leaves behind on its targets is recorded as
//! `StatAdjustment` or `ObjectEffect` entries tagged with the ability's ID,
//! so unapplying is a matter of removing every entry carrying that tag.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::cards::{Attribute, AttributeSelector};
use crate::error::ScriptError;
use crate::script::{Closure, Program};
use crate::targeting::Collection;

/// A revocable attribute modification.
///
/// `func` maps the attribute's running value to its adjusted value;
/// adjustments are folded in insertion order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatAdjustment {
    /// The ability that installed this adjustment.
    pub ability: EntityId,
    pub attribute: Attribute,
    pub func: Closure,
}

/// Named status effects an object can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    CanMoveOverObjects,
    CannotActivate,
    CannotAttack,
    CannotFightBack,
    CannotMove,
    CanOnlyAttack,
    Taunt,
}

impl EffectKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EffectKind::CanMoveOverObjects => "canmoveoverobjects",
            EffectKind::CannotActivate => "cannotactivate",
            EffectKind::CannotAttack => "cannotattack",
            EffectKind::CannotFightBack => "cannotfightback",
            EffectKind::CannotMove => "cannotmove",
            EffectKind::CanOnlyAttack => "canonlyattack",
            EffectKind::Taunt => "taunt",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "canmoveoverobjects" => Ok(EffectKind::CanMoveOverObjects),
            "cannotactivate" => Ok(EffectKind::CannotActivate),
            "cannotattack" => Ok(EffectKind::CannotAttack),
            "cannotfightback" => Ok(EffectKind::CannotFightBack),
            "cannotmove" => Ok(EffectKind::CannotMove),
            "canonlyattack" => Ok(EffectKind::CanOnlyAttack),
            "taunt" => Ok(EffectKind::Taunt),
            other => Err(ScriptError::UnknownEffect(other.to_string())),
        }
    }
}

/// A status effect applied to an object by a passive ability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectEffect {
    pub ability: EntityId,
    pub kind: EffectKind,
    /// For `canonlyattack`: the objects this object may still attack.
    pub allowed: Option<Vec<EntityId>>,
}

/// How an ability finds its targets.
///
/// `Deferred` closures are re-evaluated on every reconciliation pass
/// against the owner's frame; `Fixed` collections were resolved once
/// (for example by an event card) and never change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AbilityTargets {
    Deferred(Closure),
    Fixed(Collection),
}

/// What a passive ability does to each of its targets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PassiveKind {
    ApplyEffect {
        effect: EffectKind,
        allowed: Option<AbilityTargets>,
    },
    AttributeAdjustment {
        attribute: AttributeSelector,
        func: Closure,
    },
    GiveAbility {
        program: Arc<Program>,
    },
}

/// A continuously reconciled ability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PassiveAbility {
    pub id: EntityId,
    /// Set when another ability's `giveAbility` installed this one.
    pub source: Option<EntityId>,
    pub kind: PassiveKind,
    pub targets: AbilityTargets,
    /// Objects or cards this ability is applied to right now.
    pub current_targets: Vec<EntityId>,
    pub disabled: bool,
    pub one_shot: bool,
    /// Remaining end-of-turn sweeps before the ability expires.
    pub duration: Option<u32>,
}

/// Event types a triggered ability can listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    AfterAttack,
    AfterCardPlay,
    AfterDamageReceived,
    AfterDestroyed,
    AfterMoved,
    AfterPlayed,
    BeginningOfTurn,
    EndOfTurn,
}

impl TriggerKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TriggerKind::AfterAttack => "afterAttack",
            TriggerKind::AfterCardPlay => "afterCardPlay",
            TriggerKind::AfterDamageReceived => "afterDamageReceived",
            TriggerKind::AfterDestroyed => "afterDestroyed",
            TriggerKind::AfterMoved => "afterMoved",
            TriggerKind::AfterPlayed => "afterPlayed",
            TriggerKind::BeginningOfTurn => "beginningOfTurn",
            TriggerKind::EndOfTurn => "endOfTurn",
        }
    }

    /// Filter value that matches every event of this kind.
    #[must_use]
    pub const fn wildcard(self) -> Option<&'static str> {
        match self {
            TriggerKind::AfterAttack | TriggerKind::AfterDamageReceived => Some("allobjects"),
            TriggerKind::AfterCardPlay => Some("anycard"),
            TriggerKind::AfterDestroyed => Some("anyevent"),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event type plus the scope a triggered ability listens to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub kind: TriggerKind,
    pub targets: AbilityTargets,
    /// Narrows the event by type or cause, e.g. `"robot"` or `"combat"`.
    pub filter: Option<String>,
}

impl TriggerSpec {
    /// Whether an event tagged `tag` passes this trigger's filter.
    #[must_use]
    pub fn accepts_tag(&self, tag: Option<&str>) -> bool {
        match (&self.filter, tag) {
            (None, _) => true,
            (Some(filter), _) if Some(filter.as_str()) == self.kind.wildcard() => true,
            (Some(filter), Some(tag)) => filter == tag,
            (Some(_), None) => false,
        }
    }
}

/// A triggered ability installed on an object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TriggeredAbility {
    pub id: EntityId,
    pub source: Option<EntityId>,
    pub trigger: TriggerSpec,
    pub action: Closure,
    /// Replace the event's default behavior instead of running after it.
    pub override_default: bool,
    pub duration: Option<u32>,
}

/// An ability the controller can activate from the board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub id: EntityId,
    pub source: Option<EntityId>,
    pub action: Closure,
    pub text: String,
    pub duration: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerColor;
    use crate::script::Frame;

    fn spec(kind: TriggerKind, filter: Option<&str>) -> TriggerSpec {
        TriggerSpec {
            kind,
            targets: AbilityTargets::Fixed(Collection::Players(vec![PlayerColor::Orange])),
            filter: filter.map(str::to_string),
        }
    }

    #[test]
    fn test_effect_names_roundtrip() {
        for name in [
            "canmoveoverobjects",
            "cannotactivate",
            "cannotattack",
            "cannotfightback",
            "cannotmove",
            "canonlyattack",
            "taunt",
        ] {
            assert_eq!(name.parse::<EffectKind>().unwrap().name(), name);
        }
        assert!(matches!("flying".parse::<EffectKind>(), Err(ScriptError::UnknownEffect(_))));
    }

    #[test]
    fn test_trigger_filters() {
        assert!(spec(TriggerKind::AfterAttack, None).accepts_tag(Some("robot")));
        assert!(spec(TriggerKind::AfterAttack, Some("allobjects")).accepts_tag(Some("kernel")));
        assert!(spec(TriggerKind::AfterAttack, Some("robot")).accepts_tag(Some("robot")));
        assert!(!spec(TriggerKind::AfterAttack, Some("robot")).accepts_tag(Some("structure")));
        assert!(spec(TriggerKind::AfterDestroyed, Some("anyevent")).accepts_tag(Some("spell")));
        assert!(!spec(TriggerKind::AfterDestroyed, Some("combat")).accepts_tag(None));
    }

    #[test]
    fn test_closure_backed_targets_serialize() {
        let closure = Closure::constant(Frame::for_player(PlayerColor::Blue), 0);
        let targets = AbilityTargets::Deferred(closure);
        let bytes = bincode::serialize(&targets).unwrap();
        let back: AbilityTargets = bincode::deserialize(&bytes).unwrap();
        assert!(matches!(back, AbilityTargets::Deferred(_)));
    }
}
