//! Strongly-typed identifiers used across the domain.
//!
//! The kernel treats identifiers as opaque (`Entity::Id` only needs `Clone + Eq +
//! Hash + Debug`). This module offers the common case: a UUID newtype per
//! aggregate type, defined with [`define_id!`](crate::define_id).

/// Defines a `Copy` UUID newtype with parsing, display and serde support.
///
/// ```ignore
/// blocks_core::define_id!(OrderId, "OrderId");
///
/// let id = OrderId::new();
/// let parsed: OrderId = id.to_string().parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($t:ident, $name:literal) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $t($crate::__private::uuid::Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self($crate::__private::uuid::Uuid::now_v7())
            }

            pub fn from_uuid(uuid: $crate::__private::uuid::Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &$crate::__private::uuid::Uuid {
                &self.0
            }
        }

        impl ::core::default::Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::core::fmt::Display for $t {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::convert::From<$crate::__private::uuid::Uuid> for $t {
            fn from(value: $crate::__private::uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl ::core::convert::From<$t> for $crate::__private::uuid::Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl ::core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let uuid = $crate::__private::uuid::Uuid::parse_str(s).map_err(|e| {
                    $crate::DomainError::validation(format!("invalid {}: {}", $name, e))
                        .with_detail("value", s)
                })?;
                Ok(Self(uuid))
            }
        }

        impl $crate::__private::serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                <$crate::__private::uuid::Uuid as $crate::__private::serde::Deserialize<'de>>::deserialize(
                    deserializer,
                )
                .map(Self)
            }
        }
    };
}

crate::define_id!(AggregateId, "AggregateId");
