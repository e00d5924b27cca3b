//! Human-readable type names for rendering domain objects.

/// Returns the unqualified name of `T` (module path and generic arguments stripped).
///
/// `blocks_core::entity::tests::Person` becomes `Person`,
/// `alloc::vec::Vec<u8>` becomes `Vec`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = core::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
