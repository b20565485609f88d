//! Dotted-path resolution against a JSON context
//!
//! Two lookups layered on each other: [`resolve`] walks a path straight
//! down from the context root, and [`resolve_in_scope`] adds the fallback
//! used by nested iteration, where the first path segment may name a loop
//! variable merged into the current scope.

use serde_json::Value;

/// Walk `path` (dot-separated segments) down from `context`. Returns `None`
/// as soon as a segment is missing or the current value can't be indexed.
/// Numeric segments index sequences; everything else is a mapping lookup.
/// Empty segments never match, so `a..b` and the empty path resolve to
/// `None`.
pub fn resolve<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = context;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// [`resolve`], with a scope fallback for dotted paths: when the direct
/// lookup misses, the first segment is tried as a variable bound in
/// `context` (the merged scope an iteration builds), and the remainder is
/// resolved against that variable's value. This is what lets an inner block
/// reach `section.items` when `section` is an outer loop variable.
pub fn resolve_in_scope<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(value) = resolve(context, path) {
        return Some(value);
    }

    let (head, tail) = path.split_once('.')?;
    let bound = context.as_object()?.get(head)?;
    if !bound.is_object() && !bound.is_array() {
        return None;
    }
    if tail.is_empty() {
        return Some(bound);
    }
    resolve(bound, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_paths() {
        let ctx = json!({"a": {"b": {"c": 42}}});
        assert_eq!(resolve(&ctx, "a.b.c"), Some(&json!(42)));
        assert_eq!(resolve(&ctx, "a.b"), Some(&json!({"c": 42})));
        assert_eq!(resolve(&ctx, "a"), Some(&json!({"b": {"c": 42}})));
    }

    #[test]
    fn misses_return_none_immediately() {
        let ctx = json!({"a": {"b": 1}});
        assert_eq!(resolve(&ctx, "a.x"), None);
        assert_eq!(resolve(&ctx, "a.b.c"), None); // 1 is not indexable
        assert_eq!(resolve(&ctx, "nope"), None);
    }

    #[test]
    fn numeric_segments_index_sequences_only() {
        let ctx = json!({"list": ["x", "y"], "map": {"0": "zero"}});
        assert_eq!(resolve(&ctx, "list.0"), Some(&json!("x")));
        assert_eq!(resolve(&ctx, "list.2"), None);
        assert_eq!(resolve(&ctx, "list.first"), None);
        assert_eq!(resolve(&ctx, "map.0"), Some(&json!("zero")));
    }

    #[test]
    fn empty_segments_are_invalid() {
        let ctx = json!({"a": {"b": 1}});
        assert_eq!(resolve(&ctx, ""), None);
        assert_eq!(resolve(&ctx, "a..b"), None);
    }

    #[test]
    fn scope_lookup_dereferences_loop_variable() {
        // "section" bound in the merged scope by an outer loop
        let scope = json!({"section": {"items": [1, 2]}});
        assert_eq!(resolve_in_scope(&scope, "section.items"), Some(&json!([1, 2])));
        assert_eq!(resolve_in_scope(&scope, "section.missing"), None);

        let scope = json!({"row": ["a", "b"]});
        assert_eq!(resolve_in_scope(&scope, "row.1"), Some(&json!("b")));
        assert_eq!(resolve_in_scope(&scope, "row.items"), None);
    }

    #[test]
    fn scope_fallback_requires_indexable_binding() {
        let scope = json!({"name": "text"});
        assert_eq!(resolve_in_scope(&scope, "name.len"), None);
    }

    #[test]
    fn trailing_dot_returns_bound_structure() {
        let scope = json!({"section": {"items": []}});
        assert_eq!(
            resolve_in_scope(&scope, "section."),
            Some(&json!({"items": []}))
        );
    }

    #[test]
    fn dotless_paths_never_use_fallback() {
        let scope = json!({"a": {"b": 1}});
        assert_eq!(resolve_in_scope(&scope, "missing"), None);
    }
}
