/// Accessor names owned by every contract instance.
///
/// A property declared under one of these names would shadow the contract's own
/// accessors, so declaring one is a configuration error. Use a different public
/// name and map it with `as` instead.
pub const RESERVED_NAMES: &[&str] = &["model", "aliased_model", "aliasedModel", "fields", "mapper"];

/// Separator between segments of a nested error path (`hit.rating`).
pub const PATH_SEPARATOR: char = '.';

/// Returns `true` when `name` collides with a reserved accessor.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}
