//! # Entity Views and Join Queries
//!
//! A join intersects presence across one to three component stores:
//!
//! ```text
//!   positions:  [ p0 ,  -  , p2 , p3 ,  -  ]
//!   velocities: [ v0 , v1  ,  - , v3 ]
//!   join        (#0, p0, v0)       (#3, p3, v3)
//! ```
//!
//! The first named store drives the scan in ascending id order; every other
//! store is probed at the same id. An entity missing any named component is
//! silently left out. The result is a list of owned views, so the world is
//! free to be mutated while the views are being worked on.

use crate::accessor::Accessor;
use crate::entity::EntityId;

/// A materialized view that knows which entity it belongs to.
pub trait View {
    /// The entity this view was read from.
    fn id(&self) -> EntityId;
}

/// View over a single component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entity<A> {
    /// The entity id.
    pub id: EntityId,
    /// The component value.
    pub value: A,
}

/// View over two components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entity2<A, B> {
    /// The entity id.
    pub id: EntityId,
    /// Value from the first store.
    pub a: A,
    /// Value from the second store.
    pub b: B,
}

/// View over three components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entity3<A, B, C> {
    /// The entity id.
    pub id: EntityId,
    /// Value from the first store.
    pub a: A,
    /// Value from the second store.
    pub b: B,
    /// Value from the third store.
    pub c: C,
}

impl<A> View for Entity<A> {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl<A, B> View for Entity2<A, B> {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl<A, B, C> View for Entity3<A, B, C> {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A set of stores that can be joined and written back to.
///
/// Implemented for a single [`Accessor`] and for pairs and triples of them.
pub trait Join<W> {
    /// The view produced for each matching entity.
    type View: View;

    /// Returns every entity that has all named components, ascending by id.
    fn query(&self, world: &W) -> Vec<Self::View>;

    /// Writes each component of `view` back into its store at `view.id()`.
    fn write(&self, world: &mut W, view: Self::View);
}

impl<W, A: Clone> Join<W> for Accessor<W, A> {
    type View = Entity<A>;

    fn query(&self, world: &W) -> Vec<Self::View> {
        self.store(world)
            .iter()
            .map(|(id, value)| Entity {
                id,
                value: value.clone(),
            })
            .collect()
    }

    fn write(&self, world: &mut W, view: Self::View) {
        self.set(world, view.id, view.value);
    }
}

impl<W, A: Clone, B: Clone> Join<W> for (Accessor<W, A>, Accessor<W, B>) {
    type View = Entity2<A, B>;

    fn query(&self, world: &W) -> Vec<Self::View> {
        let second = self.1.store(world);
        self.0
            .store(world)
            .iter()
            .filter_map(|(id, a)| {
                let b = second.get(id)?;
                Some(Entity2 {
                    id,
                    a: a.clone(),
                    b: b.clone(),
                })
            })
            .collect()
    }

    fn write(&self, world: &mut W, view: Self::View) {
        self.0.set(world, view.id, view.a);
        self.1.set(world, view.id, view.b);
    }
}

impl<W, A: Clone, B: Clone, C: Clone> Join<W> for (Accessor<W, A>, Accessor<W, B>, Accessor<W, C>) {
    type View = Entity3<A, B, C>;

    fn query(&self, world: &W) -> Vec<Self::View> {
        let second = self.1.store(world);
        let third = self.2.store(world);
        self.0
            .store(world)
            .iter()
            .filter_map(|(id, a)| {
                let b = second.get(id)?;
                let c = third.get(id)?;
                Some(Entity3 {
                    id,
                    a: a.clone(),
                    b: b.clone(),
                    c: c.clone(),
                })
            })
            .collect()
    }

    fn write(&self, world: &mut W, view: Self::View) {
        self.0.set(world, view.id, view.a);
        self.1.set(world, view.id, view.b);
        self.2.set(world, view.id, view.c);
    }
}

/// Runs a join query.
///
/// Shorthand for [`Join::query`] that reads naturally at call sites:
/// `join(&world, &(POSITIONS, VELOCITIES))`.
pub fn join<W, J: Join<W>>(world: &W, stores: &J) -> Vec<J::View> {
    stores.query(world)
}
