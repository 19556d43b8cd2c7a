//! Namespace and `use` import context for resolving type names.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::php_type::is_builtin;

/// The namespace a template's types are written in, plus its imports.
///
/// Imports map a short name (alias) to a fully-qualified class name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportContext {
    namespace: Option<SmolStr>,
    imports: FxHashMap<SmolStr, SmolStr>,
}

impl ImportContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        let namespace = namespace.trim_matches('\\');
        self.namespace = (!namespace.is_empty()).then(|| SmolStr::new(namespace));
        self
    }

    /// Add `use <fqn> as <alias>`.
    pub fn with_import(mut self, alias: &str, fqn: &str) -> Self {
        self.add_import(alias, fqn);
        self
    }

    pub fn add_import(&mut self, alias: &str, fqn: &str) {
        self.imports
            .insert(SmolStr::new(alias), SmolStr::new(fqn.trim_start_matches('\\')));
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.namespace.is_none() && self.imports.is_empty()
    }

    /// Resolve a written name to its canonical form (no leading `\`).
    ///
    /// - `\Foo\Bar` is fully qualified and only loses the separator.
    /// - Built-in keywords are returned unchanged.
    /// - An exact import alias wins, then an alias for the first segment
    ///   of a qualified name (`Models\User` with `use App\Models`).
    /// - Otherwise the current namespace, if any, is prefixed.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('\\') {
            return absolute.to_string();
        }
        if is_builtin(name) {
            return name.to_string();
        }
        if let Some(fqn) = self.imports.get(name) {
            return fqn.to_string();
        }
        if let Some((first, rest)) = name.split_once('\\') {
            if let Some(fqn) = self.imports.get(first) {
                return format!("{fqn}\\{rest}");
            }
        }
        match &self.namespace {
            Some(namespace) => format!("{namespace}\\{name}"),
            None => name.to_string(),
        }
    }

    /// Stable textual form, used as part of type cache keys.
    pub fn fingerprint(&self) -> String {
        let mut imports: Vec<_> = self.imports.iter().collect();
        imports.sort();

        let mut out = String::from(self.namespace.as_deref().unwrap_or(""));
        for (alias, fqn) in imports {
            out.push(';');
            out.push_str(alias);
            out.push('=');
            out.push_str(fqn);
        }
        out
    }
}
