//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

use core::any::Any;
use core::fmt::Debug;
use core::hash::Hash;

use crate::type_name::short_type_name;

/// Value object contract.
///
/// Value objects are **immutable** and **compared by value**. The comparison key is
/// the tuple returned by [`equality_components`](ValueObject::equality_components);
/// the concrete type is part of that key, so two different value object types never
/// compare equal even when their components coincide.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two value objects with same values are equal)
/// - **Entity**: Has identity (two entities with same ID are the same entity)
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// struct Money {
///     amount: i64,
///     currency: String,
/// }
///
/// impl ValueObject for Money {
///     type Components = (i64, String);
///
///     fn equality_components(&self) -> Self::Components {
///         (self.amount, self.currency.clone())
///     }
/// }
///
/// value_object!(Money);
///
/// let m1 = Money { amount: 100, currency: "USD".to_string() };
/// let m2 = Money { amount: 100, currency: "USD".to_string() };
/// assert_eq!(m1, m2);  // Equal by value, not identity
/// ```
pub trait ValueObject: Clone + Debug + 'static {
    /// Ordered tuple of the values that define this object.
    type Components: Eq + Hash + Debug;

    fn equality_components(&self) -> Self::Components;

    /// Type-aware equality against an arbitrary value.
    ///
    /// Returns `false` unless `other` is the same concrete type with equal components.
    fn equals_any(&self, other: &dyn Any) -> bool
    where
        Self: Sized,
    {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.equality_components() == other.equality_components())
    }

    /// Renders `TypeName(c1, c2, ...)`.
    fn describe(&self) -> String
    where
        Self: Sized,
    {
        let components = format!("{:?}", self.equality_components());
        // Single-element tuples render as `(x,)`.
        let components = match components.strip_suffix(",)") {
            Some(head) => format!("{head})"),
            None => components,
        };
        format!("{}{}", short_type_name::<Self>(), components)
    }
}

/// Implements `PartialEq`, `Eq` and `Hash` for a [`ValueObject`] from its components.
#[macro_export]
macro_rules! value_object {
    ($t:ty) => {
        impl ::core::cmp::PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                $crate::ValueObject::equality_components(self)
                    == $crate::ValueObject::equality_components(other)
            }
        }

        impl ::core::cmp::Eq for $t {}

        impl ::core::hash::Hash for $t {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(&$crate::ValueObject::equality_components(self), state)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;

    #[derive(Debug, Clone)]
    struct Label {
        value: String,
    }

    impl ValueObject for Label {
        type Components = (String,);

        fn equality_components(&self) -> Self::Components {
            (self.value.clone(),)
        }
    }

    crate::value_object!(Label);

    #[derive(Debug, Clone)]
    struct Tag {
        value: String,
    }

    impl ValueObject for Tag {
        type Components = (String,);

        fn equality_components(&self) -> Self::Components {
            (self.value.clone(),)
        }
    }

    crate::value_object!(Tag);

    #[derive(Debug, Clone)]
    struct Quantity {
        unit: &'static str,
        amount: i64,
    }

    impl ValueObject for Quantity {
        type Components = (&'static str, i64);

        fn equality_components(&self) -> Self::Components {
            (self.unit, self.amount)
        }
    }

    crate::value_object!(Quantity);

    #[derive(Debug, Clone)]
    struct Nothing;

    impl ValueObject for Nothing {
        type Components = ();

        fn equality_components(&self) -> Self::Components {}
    }

    fn label(value: &str) -> Label {
        Label {
            value: value.to_string(),
        }
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn same_components_are_equal() {
        assert_eq!(label("test"), label("test"));
        assert_eq!(hash_of(&label("test")), hash_of(&label("test")));
    }

    #[test]
    fn different_components_are_not_equal() {
        assert_ne!(label("a"), label("b"));
        assert_ne!(hash_of(&label("a")), hash_of(&label("b")));
    }

    #[test]
    fn different_types_with_same_components_are_not_equal() {
        let l = label("urgent");
        let t = Tag {
            value: "urgent".to_string(),
        };
        assert_eq!(l.equality_components(), t.equality_components());
        assert!(!l.equals_any(&t));
        assert!(l.equals_any(&label("urgent")));
    }

    #[test]
    fn unrelated_values_are_not_equal() {
        assert!(!label("1").equals_any(&1_i32));
    }

    #[test]
    fn describe_single_component() {
        assert_eq!(label("test").describe(), "Label(\"test\")");
    }

    #[test]
    fn describe_multiple_components() {
        let q = Quantity {
            unit: "kg",
            amount: 42,
        };
        assert_eq!(q.describe(), "Quantity(\"kg\", 42)");
    }

    #[test]
    fn describe_without_components() {
        assert_eq!(Nothing.describe(), "Nothing()");
    }
}
