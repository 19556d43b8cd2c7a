//! PHP type annotations: grammar, normalization and memoization.
//!
//! ```ignore
//! let parser = TypeParser::new();
//! let ty = parser.parse("?array<int, App\\User>").unwrap();
//! assert_eq!(ty.repr(), "array<int, App\\User>");
//! assert!(ty.nullable());
//! ```
//!
//! Malformed annotations yield `None`; they are hints, not a correctness
//! gate.

mod cache;
mod grammar;
mod import;
mod normalize;
mod php_type;

use std::sync::Arc;

pub use cache::{CacheKey, TypeCache};
pub use import::ImportContext;
pub use php_type::{
    BASIC_ITERABLES, BUILTIN_TYPES, IterationSpec, PhpType, SingleType, UnionType,
    is_basic_iterable, is_builtin,
};

use crate::config::TypeParserConfig;

/// Parse and normalize `input` without memoization.
pub fn parse_type(input: &str, ctx: Option<&ImportContext>) -> Option<PhpType> {
    let node = grammar::parse_node(input)?;
    match ctx {
        Some(ctx) => normalize::normalize(&node, ctx),
        None => normalize::normalize(&node, &ImportContext::default()),
    }
}

/// Memoizing type parser.
///
/// Cheap to clone; clones share the same [`TypeCache`].
#[derive(Clone, Debug)]
pub struct TypeParser {
    cache: Arc<TypeCache>,
}

impl TypeParser {
    pub fn new() -> Self {
        Self::with_config(&TypeParserConfig::default())
    }

    pub fn with_config(config: &TypeParserConfig) -> Self {
        Self::with_cache(Arc::new(TypeCache::new(config.cache_capacity)))
    }

    /// Use an existing cache, e.g. one shared between several hosts.
    pub fn with_cache(cache: Arc<TypeCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<TypeCache> {
        &self.cache
    }

    /// Parse an annotation with no namespace or imports.
    pub fn parse(&self, input: &str) -> Option<Arc<PhpType>> {
        self.cache
            .get_or_insert_with(CacheKey::new(input, None), || parse_type(input, None))
    }

    /// Parse an annotation, resolving class names through `ctx`.
    pub fn parse_in(&self, input: &str, ctx: &ImportContext) -> Option<Arc<PhpType>> {
        if ctx.is_empty() {
            return self.parse(input);
        }
        let key = CacheKey::new(input, Some(ctx.fingerprint()));
        self.cache
            .get_or_insert_with(key, || parse_type(input, Some(ctx)))
    }
}

impl Default for TypeParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_memoized() {
        let parser = TypeParser::new();
        let a = parser.parse("array<int>").unwrap();
        let b = parser.parse("array<int>").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(parser.cache().len(), 1);
    }

    #[test]
    fn test_context_changes_resolution() {
        let parser = TypeParser::new();
        let ctx = ImportContext::new().with_namespace("App");

        assert_eq!(parser.parse("User").unwrap().repr(), "User");
        assert_eq!(parser.parse_in("User", &ctx).unwrap().repr(), "App\\User");
        assert_eq!(parser.cache().len(), 2);
    }

    #[test]
    fn test_clones_share_cache() {
        let parser = TypeParser::new();
        let clone = parser.clone();
        clone.parse("int");
        assert_eq!(parser.cache().len(), 1);
    }
}
