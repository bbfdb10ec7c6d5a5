//! Builtin dispatch: what each vocabulary entry does when called.
//!
//! Arguments arrive already evaluated. Missing optional arguments are
//! `Value::Unit`. Actions delegate to `crate::effects`, which owns the
//! state-level verbs; this module only unpacks values and applies the
//! interpreter-local `duration`/`oneShot` memory.

use std::sync::Arc;

use super::interpreter::{Env, Interpreter};
use super::program::Program;
use super::value::{AbilityDraft, Closure, Value};
use super::vocabulary::{AbilityFn, ActionFn, Builtin, ConditionFn, Helper, TargetFn};
use crate::cards::{Attribute, AttributeSelector};
use crate::core::{
    AbilityTargets, CardZone, EffectKind, GameState, PassiveKind, Property, TriggerKind,
    TriggerSpec,
};
use crate::effects::{self, abilities};
use crate::error::{ScriptError, ScriptResult};
use crate::targeting::{self, Collection, Condition, TypeFilter};
use crate::triggers;

/// Memory key that turns attribute modifications into temporary abilities.
const DURATION_KEY: &str = "duration";
/// Memory key that marks installed passive abilities as one-shot.
const ONE_SHOT_KEY: &str = "oneShot";

struct Args(std::vec::IntoIter<Value>);

impl Args {
    fn next(&mut self) -> Value {
        self.0.next().unwrap_or(Value::Unit)
    }

    fn optional(&mut self) -> Option<Value> {
        self.0.next().filter(|v| !matches!(v, Value::Unit))
    }

    fn collection(&mut self) -> ScriptResult<Collection> {
        self.next().into_collection()
    }

    fn int(&mut self) -> ScriptResult<i64> {
        self.next().into_int()
    }

    fn count(&mut self) -> ScriptResult<usize> {
        Ok(usize::try_from(self.int()?).unwrap_or(0))
    }

    fn distance(&mut self) -> ScriptResult<u32> {
        Ok(u32::try_from(self.int()?).unwrap_or(0))
    }

    fn string(&mut self) -> ScriptResult<String> {
        self.next().into_string()
    }

    fn closure(&mut self) -> ScriptResult<Closure> {
        self.next().into_closure()
    }
}

fn type_filters(value: Value) -> ScriptResult<Vec<TypeFilter>> {
    value
        .into_strings()?
        .iter()
        .map(|name| TypeFilter::parse(name))
        .collect()
}

/// Attribute values of every entry in a collection: objects (and the
/// kernels standing in for players) through `GameState::attribute`,
/// cards through their printed stats and current cost.
fn attribute_values(state: &GameState, collection: &Collection, attr: Attribute) -> Vec<i64> {
    match collection {
        Collection::CardsInHand(ids) | Collection::CardsInDiscardPile(ids) => ids
            .iter()
            .filter_map(|id| state.card(*id))
            .filter_map(|card| match attr {
                Attribute::Cost => Some(state.card_cost(card)),
                stat => card.definition.stats.get(stat),
            })
            .collect(),
        other => targeting::object_ids(state, other, "attributeValue")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| state.attribute(id, attr))
            .collect(),
    }
}

impl Interpreter<'_> {
    fn memory_duration(&self) -> ScriptResult<Option<u32>> {
        match self.memory.get(DURATION_KEY) {
            None | Some(Value::Unit) => Ok(None),
            Some(value) => Ok(Some(u32::try_from(value.clone().into_int()?).unwrap_or(0))),
        }
    }

    fn memory_one_shot(&self) -> ScriptResult<bool> {
        match self.memory.get(ONE_SHOT_KEY) {
            None | Some(Value::Unit) => Ok(false),
            Some(value) => value.clone().into_bool(),
        }
    }

    pub(super) fn call_builtin(
        &mut self,
        builtin: Builtin,
        args: Vec<Value>,
        env: &mut Env,
    ) -> ScriptResult<Value> {
        let args = Args(args.into_iter());
        match builtin {
            Builtin::Helper(h) => self.helper(h, args, env),
            Builtin::Target(t) => self.target(t, args, env),
            Builtin::Condition(c) => condition(c, args),
            Builtin::Action(a) => self.action(a, args, env),
            Builtin::Ability(a) => ability(a, args),
            Builtin::Trigger(kind) => trigger(kind, args),
        }
    }

    fn helper(&mut self, helper: Helper, mut args: Args, env: &Env) -> ScriptResult<Value> {
        let builtin = Builtin::Helper(helper);
        match helper {
            Helper::SetAbility => {
                let draft = match args.next() {
                    Value::Ability(draft) => *draft,
                    other => {
                        return Err(ScriptError::TypeMismatch {
                            expected: "ability",
                            found: other.type_name(),
                        })
                    }
                };
                let duration = self.memory_duration()?;
                let one_shot = self.memory_one_shot()?;
                let state = self.state_mut(builtin)?;
                abilities::install_ability(state, &env.frame, draft, duration, one_shot);
                Ok(Value::Unit)
            }
            Helper::SetTrigger => {
                let spec = match args.next() {
                    Value::Trigger(spec) => *spec,
                    other => {
                        return Err(ScriptError::TypeMismatch {
                            expected: "trigger",
                            found: other.type_name(),
                        })
                    }
                };
                let action = args.closure()?;
                let override_default = match args.optional() {
                    Some(value) => value.into_bool()?,
                    None => false,
                };
                let duration = self.memory_duration()?;
                let state = self.state_mut(builtin)?;
                abilities::install_trigger(
                    state,
                    &env.frame,
                    spec,
                    action,
                    override_default,
                    duration,
                );
                Ok(Value::Unit)
            }
            Helper::Save => {
                let key = args.string()?;
                let value = args.next();
                self.memory.insert(key, value);
                Ok(Value::Unit)
            }
            Helper::Count => Ok(Value::Int(args.collection()?.len() as i64)),
            Helper::AttributeValue => {
                let collection = args.collection()?;
                let attr: Attribute = args.string()?.parse()?;
                let values = attribute_values(self.state(), &collection, attr);
                Ok(Value::Int(values.first().copied().unwrap_or(0)))
            }
            Helper::AttributeSum => {
                let collection = args.collection()?;
                let attr: Attribute = args.string()?.parse()?;
                let values = attribute_values(self.state(), &collection, attr);
                Ok(Value::Int(values.iter().sum()))
            }
            Helper::EnergyAmount => {
                let collection = args.collection()?;
                let state = self.state();
                let players = targeting::player_colors(state, &collection, builtin.name())?;
                let total: i64 = players.iter().map(|p| state.player(*p).energy.available).sum();
                Ok(Value::Int(total))
            }
            Helper::ObjectsMatchingConditions => {
                let types = type_filters(args.next())?;
                let conditions = args.next().into_conditions()?;
                targeting::objects_matching(self.state(), &types, &conditions)
                    .map(Value::Collection)
            }
            Helper::CardsInHand | Helper::CardsInDiscardPile => {
                let zone = if helper == Helper::CardsInHand {
                    CardZone::Hand
                } else {
                    CardZone::DiscardPile
                };
                let collection = args.collection()?;
                let filter = TypeFilter::parse(&args.string()?)?;
                let conditions = match args.optional() {
                    Some(value) => value.into_conditions()?,
                    None => Vec::new(),
                };
                let state = self.state();
                let players = targeting::player_colors(state, &collection, builtin.name())?;
                targeting::cards_in_zone(state, zone, &players, filter, &conditions)
                    .map(Value::Collection)
            }
            Helper::AllTiles => Ok(Value::Collection(targeting::all_tiles(self.state()))),
            Helper::TilesMatchingConditions => {
                let conditions = args.next().into_conditions()?;
                targeting::tiles_matching(self.state(), &conditions).map(Value::Collection)
            }
        }
    }

    fn target(&mut self, target: TargetFn, mut args: Args, env: &Env) -> ScriptResult<Value> {
        let frame = &env.frame;
        let collection = match target {
            TargetFn::All => args.collection()?,
            TargetFn::Choose => {
                let collection = args.collection()?;
                let amount = match args.optional() {
                    Some(value) => usize::try_from(value.into_int()?).unwrap_or(0),
                    None => 1,
                };
                let state = self.state_mut(Builtin::Target(target))?;
                targeting::choose(state, frame.player, &collection, amount)
            }
            TargetFn::Random => {
                let amount = args.count()?;
                let collection = args.collection()?;
                let state = self.state_mut(Builtin::Target(target))?;
                targeting::random(state, &collection, amount)
            }
            TargetFn::SelfPlayer => Collection::Players(vec![frame.player]),
            TargetFn::Opponent => Collection::Players(vec![frame.player.opponent()]),
            TargetFn::AllPlayers => {
                Collection::Players(vec![frame.player, frame.player.opponent()])
            }
            TargetFn::ThisObject => Collection::Objects(frame.this_object.into_iter().collect()),
            TargetFn::It => Collection::Objects(frame.it.into_iter().collect()),
            TargetFn::That => Collection::Objects(frame.that.into_iter().collect()),
            TargetFn::ItP => {
                let player = frame
                    .it_player
                    .or_else(|| frame.it.and_then(|id| self.state().locate(id)).map(|(c, _)| c));
                Collection::Players(player.into_iter().collect())
            }
            TargetFn::ControllerOf => {
                let collection = args.collection()?;
                Collection::Players(targeting::controller_of(self.state(), &collection))
            }
        };
        Ok(Value::Collection(collection))
    }

    fn action(&mut self, action: ActionFn, mut args: Args, env: &Env) -> ScriptResult<Value> {
        let builtin = Builtin::Action(action);
        let name = builtin.name();
        match action {
            ActionFn::ForEach => {
                let collection = args.collection()?;
                let f = args.closure()?;
                for single in collection.split() {
                    self.call(&f, vec![Value::Collection(single)], None)?;
                }
                return Ok(Value::Unit);
            }
            ActionFn::IfThen => {
                if args.next().into_bool()? {
                    let then = args.closure()?;
                    return self.call(&then, Vec::new(), None);
                }
                return Ok(Value::Unit);
            }
            ActionFn::IfThenElse => {
                let condition = args.next().into_bool()?;
                let then = args.closure()?;
                let otherwise = args.closure()?;
                let branch = if condition { then } else { otherwise };
                return self.call(&branch, Vec::new(), None);
            }
            ActionFn::ModifyAttribute | ActionFn::SetAttribute => {
                let targets = args.collection()?;
                let selector: AttributeSelector = args.string()?.parse()?;
                let func = if action == ActionFn::SetAttribute {
                    Closure::constant(env.frame.clone(), args.int()?)
                } else {
                    args.closure()?
                };
                self.modify_attribute(builtin, &targets, selector, &func)?;
                return Ok(Value::Unit);
            }
            ActionFn::ModifyEnergy => {
                let players = args.collection()?;
                let f = args.closure()?;
                let colors = targeting::player_colors(self.state(), &players, name)?;
                for color in colors {
                    let current = self.state().player(color).energy.available;
                    let next = self.call(&f, vec![Value::Int(current)], None)?.into_int()?;
                    effects::set_energy(self.state_mut(builtin)?, color, next);
                }
                return Ok(Value::Unit);
            }
            _ => {}
        }

        let frame = env.frame.clone();
        let state = self.state_mut(builtin)?;
        match action {
            ActionFn::DealDamage => {
                let targets = args.collection()?;
                let amount = args.int()?;
                let ids = targeting::object_ids(state, &targets, name)?;
                effects::deal_damage(state, &ids, amount, effects::CAUSE_EFFECT)?;
            }
            ActionFn::Destroy => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                effects::destroy(state, &ids)?;
            }
            ActionFn::Draw => {
                let players = targeting::player_colors(state, &args.collection()?, name)?;
                let count = args.count()?;
                effects::draw(state, &players, count);
            }
            ActionFn::Discard => match args.collection()? {
                Collection::CardsInHand(ids) => effects::discard(state, &ids),
                other => {
                    return Err(ScriptError::TargetKindMismatch {
                        action: name,
                        expected: "cardsInHand",
                        found: other.kind().name(),
                    })
                }
            },
            ActionFn::SwapAttributes => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                let first: Attribute = args.string()?.parse()?;
                let second: Attribute = args.string()?.parse()?;
                effects::swap_attributes(state, &ids, first, second)?;
            }
            ActionFn::PayEnergy => {
                let players = targeting::player_colors(state, &args.collection()?, name)?;
                let amount = args.int()?;
                effects::pay_energy(state, &players, amount);
            }
            ActionFn::ReturnToHand => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                effects::return_to_hand(state, &ids)?;
            }
            ActionFn::TakeControl => {
                let players = targeting::player_colors(state, &args.collection()?, name)?;
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                if let Some(&player) = players.first() {
                    effects::take_control(state, player, &ids)?;
                }
            }
            ActionFn::SpawnObject => {
                let card_name = args.string()?;
                let hexes = targeting::positions(state, &args.collection()?);
                let owner = match args.optional() {
                    Some(value) => targeting::player_colors(state, &value.into_collection()?, name)?
                        .first()
                        .copied()
                        .unwrap_or(frame.player),
                    None => frame.player,
                };
                effects::spawn_object(state, &card_name, &hexes, owner)?;
            }
            ActionFn::Become => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                let card_name = args.string()?;
                effects::become_card(state, &ids, &card_name)?;
            }
            ActionFn::GiveAbility => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                let program = Program::compile(&args.string()?)?;
                effects::give_ability(state, &ids, &program)?;
            }
            ActionFn::MoveObject => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                let hexes = targeting::positions(state, &args.collection()?);
                effects::move_objects(state, &ids, &hexes)?;
            }
            ActionFn::SwapPositions => {
                let first = targeting::object_ids(state, &args.collection()?, name)?;
                let second = targeting::object_ids(state, &args.collection()?, name)?;
                if let (Some(&a), Some(&b)) = (first.first(), second.first()) {
                    effects::swap_positions(state, a, b)?;
                }
            }
            ActionFn::ShuffleCardsIntoDeck => {
                let players = targeting::player_colors(state, &args.collection()?, name)?;
                let names = args.next().into_strings()?;
                effects::shuffle_into_deck(state, &players, &names)?;
            }
            ActionFn::RemoveAllAbilities => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                effects::remove_all_abilities(state, &ids)?;
            }
            ActionFn::RestoreHealth => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                effects::restore_health(state, &ids);
            }
            ActionFn::CanMoveAgain | ActionFn::CanAttackAgain | ActionFn::CanMoveAndAttackAgain => {
                let ids = targeting::object_ids(state, &args.collection()?, name)?;
                let movement = action != ActionFn::CanAttackAgain;
                let attack = action != ActionFn::CanMoveAgain;
                effects::refresh(state, &ids, movement, attack);
            }
            ActionFn::ForEach
            | ActionFn::IfThen
            | ActionFn::IfThenElse
            | ActionFn::ModifyAttribute
            | ActionFn::SetAttribute
            | ActionFn::ModifyEnergy => {}
        }
        Ok(Value::Unit)
    }

    /// `modifyAttribute` / `setAttribute`.
    ///
    /// On board objects the change is permanent to the base stat unless a
    /// duration is saved, in which case a temporary adjustment ability is
    /// installed instead. On cards only `cost` applies and the change is
    /// always permanent.
    fn modify_attribute(
        &mut self,
        builtin: Builtin,
        targets: &Collection,
        selector: AttributeSelector,
        func: &Closure,
    ) -> ScriptResult<()> {
        let duration = self.memory_duration()?;
        match targets {
            Collection::CardsInHand(ids) | Collection::CardsInDiscardPile(ids) => {
                if !selector.attributes().contains(&Attribute::Cost) {
                    return Ok(());
                }
                for &id in ids {
                    let Some(current) = self.state().card(id).map(|c| c.cost) else {
                        continue;
                    };
                    let next = self.call(func, vec![Value::Int(current)], None)?.into_int()?;
                    effects::set_card_cost(self.state_mut(builtin)?, id, next);
                }
            }
            other => {
                let ids = targeting::object_ids(self.state(), other, builtin.name())?;
                if let Some(duration) = duration {
                    let state = self.state_mut(builtin)?;
                    for id in ids {
                        abilities::add_temporary_adjustment(
                            state,
                            id,
                            selector,
                            func.clone(),
                            duration,
                        );
                    }
                } else {
                    for id in ids {
                        for attr in selector.attributes() {
                            let base = self.state().object(id).and_then(|o| o.base_attribute(attr));
                            let Some(current) = base else {
                                continue;
                            };
                            let next =
                                self.call(func, vec![Value::Int(current)], None)?.into_int()?;
                            effects::set_attribute(self.state_mut(builtin)?, id, attr, next);
                        }
                    }
                }
            }
        }
        triggers::apply_abilities(self.state_mut(builtin)?)
    }
}

fn condition(condition: ConditionFn, mut args: Args) -> ScriptResult<Value> {
    let condition = match condition {
        ConditionFn::AdjacentTo => Condition::AdjacentTo(args.collection()?),
        ConditionFn::AttributeComparison => Condition::AttributeComparison {
            attribute: args.string()?.parse()?,
            comparator: args.closure()?,
        },
        ConditionFn::ControlledBy => match args.collection()? {
            Collection::Players(players) => Condition::ControlledBy(players),
            other => {
                return Err(ScriptError::TargetKindMismatch {
                    action: Builtin::Condition(condition).name(),
                    expected: "players",
                    found: other.kind().name(),
                })
            }
        },
        ConditionFn::HasEffect => Condition::HasEffect(args.string()?.parse::<EffectKind>()?),
        ConditionFn::HasProperty => Condition::HasProperty(args.string()?.parse::<Property>()?),
        ConditionFn::WithinDistanceOf => Condition::WithinDistanceOf {
            distance: args.distance()?,
            of: args.collection()?,
        },
        ConditionFn::ExactDistanceFrom => Condition::ExactDistanceFrom {
            distance: args.distance()?,
            of: args.collection()?,
        },
        ConditionFn::Within => Condition::Within(args.collection()?),
        ConditionFn::Unoccupied => Condition::Unoccupied,
    };
    Ok(Value::Condition(Box::new(condition)))
}

fn ability(ability: AbilityFn, mut args: Args) -> ScriptResult<Value> {
    let draft = match ability {
        AbilityFn::ApplyEffect => {
            let targets = args.next().into_ability_targets()?;
            let effect: EffectKind = args.string()?.parse()?;
            let allowed = match args.optional() {
                Some(value) => Some(value.into_ability_targets()?),
                None => None,
            };
            AbilityDraft::Passive {
                kind: PassiveKind::ApplyEffect { effect, allowed },
                targets,
            }
        }
        AbilityFn::AttributeAdjustment => {
            let targets = args.next().into_ability_targets()?;
            let attribute: AttributeSelector = args.string()?.parse()?;
            let func = args.closure()?;
            AbilityDraft::Passive {
                kind: PassiveKind::AttributeAdjustment { attribute, func },
                targets,
            }
        }
        AbilityFn::GiveAbility => {
            let targets = args.next().into_ability_targets()?;
            let program = Program::compile(&args.string()?)?;
            AbilityDraft::Passive {
                kind: PassiveKind::GiveAbility {
                    program: Arc::new(program),
                },
                targets,
            }
        }
        AbilityFn::Activated => {
            let action = args.closure()?;
            let text = match args.optional() {
                Some(value) => value.into_string()?,
                None => String::new(),
            };
            AbilityDraft::Activated { action, text }
        }
    };
    Ok(Value::Ability(Box::new(draft)))
}

fn trigger(kind: TriggerKind, mut args: Args) -> ScriptResult<Value> {
    let targets: AbilityTargets = args.next().into_ability_targets()?;
    let filter = match args.optional() {
        Some(value) => Some(value.into_string()?),
        None => None,
    };
    Ok(Value::Trigger(Box::new(TriggerSpec {
        kind,
        targets,
        filter,
    })))
}
