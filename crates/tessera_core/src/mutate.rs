//! # Mutation Primitives
//!
//! Writes go through a [`Join`] so that a view read from some stores is
//! written back to exactly those stores. Entities not named in the written
//! views are never touched.
//!
//! Bulk steps are two-phase: the join is computed once, every view is
//! transformed, and only then are results written back. A transform never
//! observes a partially updated world.

use crate::query::{Join, View};

/// Writes every component of `view` into its store at the view's id.
///
/// Writing a view for an id the allocator never issued creates component
/// data at that slot; the entity only becomes live once the id is issued.
pub fn set_entity<W, J: Join<W>>(world: &mut W, stores: &J, view: J::View) {
    stores.write(world, view);
}

/// Writes a batch of views, in order.
pub fn set_entities<W, J, I>(world: &mut W, stores: &J, views: I)
where
    J: Join<W>,
    I: IntoIterator<Item = J::View>,
{
    for view in views {
        stores.write(world, view);
    }
}

/// Applies `transform` to every entity matching `stores`.
///
/// `transform` must return a view with the same id it was given.
///
/// Returns the number of entities updated.
pub fn step_all<W, J, F>(world: &mut W, stores: &J, mut transform: F) -> usize
where
    J: Join<W>,
    F: FnMut(J::View) -> J::View,
{
    let updated: Vec<J::View> = stores
        .query(world)
        .into_iter()
        .map(|view| {
            let id = view.id();
            let next = transform(view);
            debug_assert_eq!(next.id(), id, "transform changed the entity id");
            next
        })
        .collect();

    let count = updated.len();
    set_entities(world, stores, updated);
    count
}

/// Like [`step_all`], threading an accumulator through the matched entities
/// in ascending id order.
///
/// Useful for steps that depend on sequential cross-entity state, such as a
/// running counter or a random number generator, without global state.
/// Returns the final accumulator.
pub fn step_with_accumulator<W, J, S, F>(world: &mut W, stores: &J, init: S, mut transform: F) -> S
where
    J: Join<W>,
    F: FnMut(J::View, S) -> (J::View, S),
{
    let views = stores.query(world);
    let mut updated = Vec::with_capacity(views.len());
    let mut acc = init;

    for view in views {
        let id = view.id();
        let (next, next_acc) = transform(view, acc);
        debug_assert_eq!(next.id(), id, "transform changed the entity id");
        updated.push(next);
        acc = next_acc;
    }

    set_entities(world, stores, updated);
    acc
}
