//! Tunables for scanning, type parsing and document analysis.
//!
//! Every struct has sensible defaults; override individual knobs with the
//! `with_*` builders:
//!
//! ```ignore
//! let config = AnalysisConfig::default()
//!     .with_scanner(ScannerConfig::default().with_lookahead_window(512));
//! ```

/// Default number of bytes a scanner sub-match may look ahead.
pub const DEFAULT_LOOKAHEAD_WINDOW: usize = 4096;

/// Default number of parsed type annotations kept in a [`TypeCache`](crate::types::TypeCache).
pub const DEFAULT_TYPE_CACHE_CAPACITY: usize = 1024;

/// Scanner configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScannerConfig {
    /// Upper bound, in bytes, on the text a regex sub-match may inspect.
    pub lookahead_window: usize,
    /// Letter that, followed by `:`, starts an attribute-style tag (`n:if`).
    pub attribute_prefix: char,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
            attribute_prefix: 'n',
        }
    }
}

impl ScannerConfig {
    /// Set the sub-match lookahead window. Zero is bumped to one byte.
    pub fn with_lookahead_window(mut self, bytes: usize) -> Self {
        self.lookahead_window = bytes.max(1);
        self
    }

    /// Set the attribute-style tag prefix letter.
    pub fn with_attribute_prefix(mut self, prefix: char) -> Self {
        self.attribute_prefix = prefix;
        self
    }
}

/// Type parser configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TypeParserConfig {
    /// Maximum number of memoized annotations. Zero disables memoization.
    pub cache_capacity: usize,
}

impl Default for TypeParserConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_TYPE_CACHE_CAPACITY,
        }
    }
}

impl TypeParserConfig {
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

/// Configuration for [`AnalysisHost`](crate::ide::AnalysisHost).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    pub scanner: ScannerConfig,
    pub types: TypeParserConfig,
}

impl AnalysisConfig {
    pub fn with_scanner(mut self, scanner: ScannerConfig) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_types(mut self, types: TypeParserConfig) -> Self {
        self.types = types;
        self
    }
}
