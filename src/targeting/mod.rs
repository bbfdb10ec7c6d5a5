//! Collection & targeting resolver.
//!
//! Turns target descriptors into ordered, kind-tagged `Collection`s:
//!
//! - `collection`: the `Collection` type and its kinds
//! - `condition`: composable filters (`adjacentTo`, `controlledBy`, ...)
//! - `resolver`: board/hand/tile queries, player-to-kernel redirection,
//!   seeded `random`, and `choose`, which drives interactive prompts

pub mod collection;
pub mod condition;
pub mod resolver;

pub use collection::{Collection, CollectionKind};
pub use condition::Condition;
pub use resolver::{
    all_tiles, cards_in_zone, choose, controller_of, object_ids, objects_matching, player_colors,
    positions, random, tiles_matching, TypeFilter,
};
