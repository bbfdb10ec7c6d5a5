//! The closed vocabulary effect programs may call.
//!
//! Every callable name is a `Builtin`, grouped by namespace the way
//! programs spell them: bare helpers (`count`, `setTrigger`, ...) and the
//! `targets.`, `conditions.`, `actions.`, `abilities.` and `triggers.`
//! namespaces. Anything outside this table is rejected when a program is
//! compiled.
//!
//! ## Purity
//!
//! Attribute-adjustment closures and attribute comparisons run against a
//! read-only state. Builtins marked impure (every action, `choose`,
//! `random`, `save`, `setAbility`, `setTrigger`) fail with
//! `ScriptError::ImpureContext` there.

use serde::{Deserialize, Serialize};

use crate::core::TriggerKind;

/// Un-namespaced helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Helper {
    SetAbility,
    SetTrigger,
    Save,
    Count,
    AttributeValue,
    AttributeSum,
    EnergyAmount,
    ObjectsMatchingConditions,
    CardsInHand,
    CardsInDiscardPile,
    AllTiles,
    TilesMatchingConditions,
}

/// `targets.*`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFn {
    All,
    Choose,
    Random,
    SelfPlayer,
    Opponent,
    AllPlayers,
    ThisObject,
    It,
    That,
    ItP,
    ControllerOf,
}

/// `conditions.*`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionFn {
    AdjacentTo,
    AttributeComparison,
    ControlledBy,
    HasEffect,
    HasProperty,
    WithinDistanceOf,
    ExactDistanceFrom,
    Within,
    Unoccupied,
}

/// `actions.*`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionFn {
    DealDamage,
    Destroy,
    Draw,
    Discard,
    ModifyAttribute,
    SetAttribute,
    SwapAttributes,
    ModifyEnergy,
    PayEnergy,
    ReturnToHand,
    TakeControl,
    SpawnObject,
    Become,
    GiveAbility,
    MoveObject,
    SwapPositions,
    ShuffleCardsIntoDeck,
    RemoveAllAbilities,
    RestoreHealth,
    CanMoveAgain,
    CanAttackAgain,
    CanMoveAndAttackAgain,
    ForEach,
    IfThen,
    IfThenElse,
}

/// `abilities.*`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityFn {
    ApplyEffect,
    AttributeAdjustment,
    GiveAbility,
    Activated,
}

/// Any callable name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    Helper(Helper),
    Target(TargetFn),
    Condition(ConditionFn),
    Action(ActionFn),
    Ability(AbilityFn),
    /// `triggers.*`
    Trigger(TriggerKind),
}

/// Name, minimum and maximum argument count, and purity of a builtin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub pure: bool,
}

const fn sig(name: &'static str, min_args: usize, max_args: usize, pure: bool) -> Signature {
    Signature {
        name,
        min_args,
        max_args,
        pure,
    }
}

impl Builtin {
    /// Every builtin, in table order.
    pub const ALL: &'static [Builtin] = &[
        Builtin::Helper(Helper::SetAbility),
        Builtin::Helper(Helper::SetTrigger),
        Builtin::Helper(Helper::Save),
        Builtin::Helper(Helper::Count),
        Builtin::Helper(Helper::AttributeValue),
        Builtin::Helper(Helper::AttributeSum),
        Builtin::Helper(Helper::EnergyAmount),
        Builtin::Helper(Helper::ObjectsMatchingConditions),
        Builtin::Helper(Helper::CardsInHand),
        Builtin::Helper(Helper::CardsInDiscardPile),
        Builtin::Helper(Helper::AllTiles),
        Builtin::Helper(Helper::TilesMatchingConditions),
        Builtin::Target(TargetFn::All),
        Builtin::Target(TargetFn::Choose),
        Builtin::Target(TargetFn::Random),
        Builtin::Target(TargetFn::SelfPlayer),
        Builtin::Target(TargetFn::Opponent),
        Builtin::Target(TargetFn::AllPlayers),
        Builtin::Target(TargetFn::ThisObject),
        Builtin::Target(TargetFn::It),
        Builtin::Target(TargetFn::That),
        Builtin::Target(TargetFn::ItP),
        Builtin::Target(TargetFn::ControllerOf),
        Builtin::Condition(ConditionFn::AdjacentTo),
        Builtin::Condition(ConditionFn::AttributeComparison),
        Builtin::Condition(ConditionFn::ControlledBy),
        Builtin::Condition(ConditionFn::HasEffect),
        Builtin::Condition(ConditionFn::HasProperty),
        Builtin::Condition(ConditionFn::WithinDistanceOf),
        Builtin::Condition(ConditionFn::ExactDistanceFrom),
        Builtin::Condition(ConditionFn::Within),
        Builtin::Condition(ConditionFn::Unoccupied),
        Builtin::Action(ActionFn::DealDamage),
        Builtin::Action(ActionFn::Destroy),
        Builtin::Action(ActionFn::Draw),
        Builtin::Action(ActionFn::Discard),
        Builtin::Action(ActionFn::ModifyAttribute),
        Builtin::Action(ActionFn::SetAttribute),
        Builtin::Action(ActionFn::SwapAttributes),
        Builtin::Action(ActionFn::ModifyEnergy),
        Builtin::Action(ActionFn::PayEnergy),
        Builtin::Action(ActionFn::ReturnToHand),
        Builtin::Action(ActionFn::TakeControl),
        Builtin::Action(ActionFn::SpawnObject),
        Builtin::Action(ActionFn::Become),
        Builtin::Action(ActionFn::GiveAbility),
        Builtin::Action(ActionFn::MoveObject),
        Builtin::Action(ActionFn::SwapPositions),
        Builtin::Action(ActionFn::ShuffleCardsIntoDeck),
        Builtin::Action(ActionFn::RemoveAllAbilities),
        Builtin::Action(ActionFn::RestoreHealth),
        Builtin::Action(ActionFn::CanMoveAgain),
        Builtin::Action(ActionFn::CanAttackAgain),
        Builtin::Action(ActionFn::CanMoveAndAttackAgain),
        Builtin::Action(ActionFn::ForEach),
        Builtin::Action(ActionFn::IfThen),
        Builtin::Action(ActionFn::IfThenElse),
        Builtin::Ability(AbilityFn::ApplyEffect),
        Builtin::Ability(AbilityFn::AttributeAdjustment),
        Builtin::Ability(AbilityFn::GiveAbility),
        Builtin::Ability(AbilityFn::Activated),
        Builtin::Trigger(TriggerKind::AfterAttack),
        Builtin::Trigger(TriggerKind::AfterCardPlay),
        Builtin::Trigger(TriggerKind::AfterDamageReceived),
        Builtin::Trigger(TriggerKind::AfterDestroyed),
        Builtin::Trigger(TriggerKind::AfterMoved),
        Builtin::Trigger(TriggerKind::AfterPlayed),
        Builtin::Trigger(TriggerKind::BeginningOfTurn),
        Builtin::Trigger(TriggerKind::EndOfTurn),
    ];

    /// Resolve a dotted name such as `"actions.dealDamage"`.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL.iter().copied().find(|b| b.signature().name == name)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.signature().name
    }

    #[must_use]
    pub fn is_pure(self) -> bool {
        self.signature().pure
    }

    /// Whether the second argument is a nested program string.
    #[must_use]
    pub fn takes_program(self) -> bool {
        matches!(
            self,
            Builtin::Action(ActionFn::GiveAbility) | Builtin::Ability(AbilityFn::GiveAbility)
        )
    }

    #[must_use]
    pub const fn signature(self) -> Signature {
        match self {
            Builtin::Helper(h) => match h {
                Helper::SetAbility => sig("setAbility", 1, 1, false),
                Helper::SetTrigger => sig("setTrigger", 2, 3, false),
                Helper::Save => sig("save", 2, 2, false),
                Helper::Count => sig("count", 1, 1, true),
                Helper::AttributeValue => sig("attributeValue", 2, 2, true),
                Helper::AttributeSum => sig("attributeSum", 2, 2, true),
                Helper::EnergyAmount => sig("energyAmount", 1, 1, true),
                Helper::ObjectsMatchingConditions => sig("objectsMatchingConditions", 2, 2, true),
                Helper::CardsInHand => sig("cardsInHand", 2, 3, true),
                Helper::CardsInDiscardPile => sig("cardsInDiscardPile", 2, 3, true),
                Helper::AllTiles => sig("allTiles", 0, 0, true),
                Helper::TilesMatchingConditions => sig("tilesMatchingConditions", 1, 1, true),
            },
            Builtin::Target(t) => match t {
                TargetFn::All => sig("targets.all", 1, 1, true),
                TargetFn::Choose => sig("targets.choose", 1, 2, false),
                TargetFn::Random => sig("targets.random", 2, 2, false),
                TargetFn::SelfPlayer => sig("targets.self", 0, 0, true),
                TargetFn::Opponent => sig("targets.opponent", 0, 0, true),
                TargetFn::AllPlayers => sig("targets.allPlayers", 0, 0, true),
                TargetFn::ThisObject => sig("targets.thisObject", 0, 0, true),
                TargetFn::It => sig("targets.it", 0, 0, true),
                TargetFn::That => sig("targets.that", 0, 0, true),
                TargetFn::ItP => sig("targets.itP", 0, 0, true),
                TargetFn::ControllerOf => sig("targets.controllerOf", 1, 1, true),
            },
            Builtin::Condition(c) => match c {
                ConditionFn::AdjacentTo => sig("conditions.adjacentTo", 1, 1, true),
                ConditionFn::AttributeComparison => {
                    sig("conditions.attributeComparison", 2, 2, true)
                }
                ConditionFn::ControlledBy => sig("conditions.controlledBy", 1, 1, true),
                ConditionFn::HasEffect => sig("conditions.hasEffect", 1, 1, true),
                ConditionFn::HasProperty => sig("conditions.hasProperty", 1, 1, true),
                ConditionFn::WithinDistanceOf => sig("conditions.withinDistanceOf", 2, 2, true),
                ConditionFn::ExactDistanceFrom => sig("conditions.exactDistanceFrom", 2, 2, true),
                ConditionFn::Within => sig("conditions.within", 1, 1, true),
                ConditionFn::Unoccupied => sig("conditions.unoccupied", 0, 0, true),
            },
            Builtin::Action(a) => match a {
                ActionFn::DealDamage => sig("actions.dealDamage", 2, 2, false),
                ActionFn::Destroy => sig("actions.destroy", 1, 1, false),
                ActionFn::Draw => sig("actions.draw", 2, 2, false),
                ActionFn::Discard => sig("actions.discard", 1, 1, false),
                ActionFn::ModifyAttribute => sig("actions.modifyAttribute", 3, 3, false),
                ActionFn::SetAttribute => sig("actions.setAttribute", 3, 3, false),
                ActionFn::SwapAttributes => sig("actions.swapAttributes", 3, 3, false),
                ActionFn::ModifyEnergy => sig("actions.modifyEnergy", 2, 2, false),
                ActionFn::PayEnergy => sig("actions.payEnergy", 2, 2, false),
                ActionFn::ReturnToHand => sig("actions.returnToHand", 1, 1, false),
                ActionFn::TakeControl => sig("actions.takeControl", 2, 2, false),
                ActionFn::SpawnObject => sig("actions.spawnObject", 2, 3, false),
                ActionFn::Become => sig("actions.become", 2, 2, false),
                ActionFn::GiveAbility => sig("actions.giveAbility", 2, 2, false),
                ActionFn::MoveObject => sig("actions.moveObject", 2, 2, false),
                ActionFn::SwapPositions => sig("actions.swapPositions", 2, 2, false),
                ActionFn::ShuffleCardsIntoDeck => sig("actions.shuffleCardsIntoDeck", 2, 2, false),
                ActionFn::RemoveAllAbilities => sig("actions.removeAllAbilities", 1, 1, false),
                ActionFn::RestoreHealth => sig("actions.restoreHealth", 1, 1, false),
                ActionFn::CanMoveAgain => sig("actions.canMoveAgain", 1, 1, false),
                ActionFn::CanAttackAgain => sig("actions.canAttackAgain", 1, 1, false),
                ActionFn::CanMoveAndAttackAgain => {
                    sig("actions.canMoveAndAttackAgain", 1, 1, false)
                }
                ActionFn::ForEach => sig("actions.forEach", 2, 2, false),
                ActionFn::IfThen => sig("actions.ifThen", 2, 2, false),
                ActionFn::IfThenElse => sig("actions.ifThenElse", 3, 3, false),
            },
            Builtin::Ability(a) => match a {
                AbilityFn::ApplyEffect => sig("abilities.applyEffect", 2, 3, true),
                AbilityFn::AttributeAdjustment => sig("abilities.attributeAdjustment", 3, 3, true),
                AbilityFn::GiveAbility => sig("abilities.giveAbility", 2, 2, true),
                AbilityFn::Activated => sig("abilities.activated", 1, 2, true),
            },
            Builtin::Trigger(kind) => match kind {
                TriggerKind::AfterAttack => sig("triggers.afterAttack", 1, 2, true),
                TriggerKind::AfterCardPlay => sig("triggers.afterCardPlay", 1, 2, true),
                TriggerKind::AfterDamageReceived => sig("triggers.afterDamageReceived", 1, 2, true),
                TriggerKind::AfterDestroyed => sig("triggers.afterDestroyed", 1, 2, true),
                TriggerKind::AfterMoved => sig("triggers.afterMoved", 1, 2, true),
                TriggerKind::AfterPlayed => sig("triggers.afterPlayed", 1, 2, true),
                TriggerKind::BeginningOfTurn => sig("triggers.beginningOfTurn", 1, 2, true),
                TriggerKind::EndOfTurn => sig("triggers.endOfTurn", 1, 2, true),
            },
        }
    }
}
