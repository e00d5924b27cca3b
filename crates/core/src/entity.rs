//! Entity trait: identity + continuity across state changes.

use crate::type_name::short_type_name;

/// Entity marker + minimal interface.
///
/// Two entities are the same entity iff their identifiers are equal, no matter
/// how the rest of their state differs. Identifiers are always supplied by the
/// caller; nothing in this crate generates them implicitly.
///
/// Use [`entity_identity!`](crate::entity_identity) to derive `PartialEq`, `Eq`
/// and `Hash` from the identifier alone.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Identity comparison across (possibly different) entity types sharing an id type.
    fn same_identity_as<O>(&self, other: &O) -> bool
    where
        O: Entity<Id = Self::Id> + ?Sized,
    {
        self.id() == other.id()
    }

    /// Renders `TypeName(id=<id>)`.
    fn describe(&self) -> String
    where
        Self: Sized,
    {
        format!("{}(id={:?})", short_type_name::<Self>(), self.id())
    }
}

/// Implements `PartialEq`, `Eq` and `Hash` for an [`Entity`] using only its id.
///
/// ```ignore
/// struct Customer { id: CustomerId, name: String }
///
/// impl Entity for Customer {
///     type Id = CustomerId;
///     fn id(&self) -> &CustomerId { &self.id }
/// }
///
/// entity_identity!(Customer);
/// ```
#[macro_export]
macro_rules! entity_identity {
    ($t:ty) => {
        impl ::core::cmp::PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                $crate::Entity::id(self) == $crate::Entity::id(other)
            }
        }

        impl ::core::cmp::Eq for $t {}

        impl ::core::hash::Hash for $t {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash($crate::Entity::id(self), state)
            }
        }
    };
}
