//! Alternate method names
//!
//! Each adapter documents its alternate names with `#[doc(alias)]`. This
//! table carries the same mapping at runtime, for embedders that dispatch
//! by name (scripting bridges, REPLs).

/// One alternate name for an adapter method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    /// Adapter type name
    pub entity: &'static str,

    /// The alternate name
    pub alias: &'static str,

    /// The method it stands for
    pub method: &'static str,
}

const fn alias(entity: &'static str, alias: &'static str, method: &'static str) -> Alias {
    Alias { entity, alias, method }
}

pub static ALIASES: &[Alias] = &[
    // EntityHandle
    alias("EntityHandle", "type", "key_type"),
    alias("EntityHandle", "del", "delete_key"),
    alias("EntityHandle", "clear", "delete_key"),
    // Scalar
    alias("Scalar", "set_value", "set"),
    alias("Scalar", "get_value", "get"),
    // Hash
    alias("Hash", "put", "set"),
    alias("Hash", "store", "set"),
    alias("Hash", "fetch", "get"),
    alias("Hash", "include", "has_key"),
    alias("Hash", "is_key", "has_key"),
    alias("Hash", "is_member", "has_key"),
    alias("Hash", "contains", "has_key"),
    alias("Hash", "vals", "values"),
    alias("Hash", "length", "size"),
    alias("Hash", "count", "size"),
    alias("Hash", "is_empty", "empty"),
    alias("Hash", "update", "bulk_set"),
    alias("Hash", "incr", "incrby"),
    // List
    alias("List", "pushall", "push_all"),
    alias("List", "unshiftall", "unshift_all"),
    alias("List", "range", "slice"),
    alias("List", "setat", "set_at"),
    alias("List", "size", "length"),
    alias("List", "is_empty", "empty"),
    // Set
    alias("Set", "push", "add"),
    alias("Set", "ismember", "is_member"),
    alias("Set", "include", "is_member"),
    alias("Set", "contains", "is_member"),
    alias("Set", "size", "length"),
    alias("Set", "count", "length"),
    alias("Set", "is_empty", "empty"),
    // OrderedSet
    alias("OrderedSet", "put", "add"),
    alias("OrderedSet", "set", "add"),
    alias("OrderedSet", "put_all", "add_all"),
    alias("OrderedSet", "set_all", "add_all"),
    alias("OrderedSet", "rev_rank", "revrank"),
    alias("OrderedSet", "slice", "range"),
    alias("OrderedSet", "rev_range", "revrange"),
    alias("OrderedSet", "rangebyscore", "range_by_score"),
    alias("OrderedSet", "revrangebyscore", "rev_range_by_score"),
    alias("OrderedSet", "remrangebyrank", "rem_range_by_rank"),
    alias("OrderedSet", "remrangebyscore", "rem_range_by_score"),
    alias("OrderedSet", "incrby", "increment"),
    alias("OrderedSet", "decrby", "decrement"),
    alias("OrderedSet", "size", "length"),
    alias("OrderedSet", "is_empty", "empty"),
    alias("OrderedSet", "include", "is_member"),
    alias("OrderedSet", "contains", "is_member"),
];

/// The method `name` refers to on `entity`: the aliased method when `name`
/// is an alias, otherwise `name` itself
pub fn canonical<'a>(entity: &str, name: &'a str) -> &'a str {
    ALIASES
        .iter()
        .find(|a| a.entity == entity && a.alias == name)
        .map_or(name, |a| a.method)
}

/// Every alternate name for `entity`'s `method`
pub fn aliases_of(entity: &str, method: &str) -> Vec<&'static str> {
    ALIASES
        .iter()
        .filter(|a| a.entity == entity && a.method == method)
        .map(|a| a.alias)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_resolves_aliases() {
        assert_eq!(canonical("Hash", "fetch"), "get");
        assert_eq!(canonical("OrderedSet", "set"), "add");
        assert_eq!(canonical("List", "range"), "slice");
        // unknown names pass through
        assert_eq!(canonical("Set", "members"), "members");
        // aliases are per entity
        assert_eq!(canonical("Set", "put"), "put");
    }

    #[test]
    fn test_aliases_of() {
        let mut names = aliases_of("Hash", "has_key");
        names.sort_unstable();
        assert_eq!(names, vec!["contains", "include", "is_key", "is_member"]);
    }

    #[test]
    fn test_no_duplicate_aliases() {
        let mut seen = HashSet::new();
        for a in ALIASES {
            assert!(seen.insert((a.entity, a.alias)), "duplicate alias {:?}", a);
            assert_ne!(a.alias, a.method);
        }
    }
}
