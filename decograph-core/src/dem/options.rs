//! Parser configuration.

/// Environment variable consulted by [`tag_feature_available`].
pub const TAG_FEATURE_ENV: &str = "DECOGRAPH_DEM_TAGS";

/// Default for [`ParserOptions::max_repeat_depth`].
pub const DEFAULT_MAX_REPEAT_DEPTH: usize = 64;

/// Whether instruction tags (`error[tag](p) ...`) are recognized.
///
/// Tag syntax is a later addition to the DEM format; consumers pinned to an
/// older producer can switch it off by setting `DECOGRAPH_DEM_TAGS` to `0`,
/// `false` or `off`. Any other value, or no value, enables tags.
#[must_use]
pub fn tag_feature_available() -> bool {
    match std::env::var(TAG_FEATURE_ENV) {
        Ok(value) => !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "off"
        ),
        Err(_) => true,
    }
}

/// Options for [`DemParser`](super::DemParser).
///
/// # Example
///
/// ```
/// use decograph_core::dem::ParserOptions;
///
/// let options = ParserOptions::default()
///     .with_max_logicals(Some(2))
///     .with_strict_instructions(false);
/// assert_eq!(options.max_logicals(), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    tags_enabled: bool,
    max_logicals: Option<u32>,
    strict_instructions: bool,
    max_repeat_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            tags_enabled: tag_feature_available(),
            max_logicals: None,
            strict_instructions: true,
            max_repeat_depth: DEFAULT_MAX_REPEAT_DEPTH,
        }
    }
}

impl ParserOptions {
    /// Keep tags as provenance (`true`) or strip them with a warning.
    #[must_use]
    pub const fn with_tags_enabled(mut self, enabled: bool) -> Self {
        self.tags_enabled = enabled;
        self
    }

    /// Reject `L<i>` with `i >= max`.
    #[must_use]
    pub const fn with_max_logicals(mut self, max: Option<u32>) -> Self {
        self.max_logicals = max;
        self
    }

    /// Fail on unknown instructions (`true`) or skip them with a warning.
    #[must_use]
    pub const fn with_strict_instructions(mut self, strict: bool) -> Self {
        self.strict_instructions = strict;
        self
    }

    /// Reject `repeat` blocks nested more than `depth` deep.
    #[must_use]
    pub const fn with_max_repeat_depth(mut self, depth: usize) -> Self {
        self.max_repeat_depth = depth;
        self
    }

    /// Whether tags are kept.
    #[must_use]
    pub const fn tags_enabled(&self) -> bool {
        self.tags_enabled
    }

    /// Observable limit, if any.
    #[must_use]
    pub const fn max_logicals(&self) -> Option<u32> {
        self.max_logicals
    }

    /// Whether unknown instructions are fatal.
    #[must_use]
    pub const fn strict_instructions(&self) -> bool {
        self.strict_instructions
    }

    /// Deepest allowed `repeat` nesting.
    #[must_use]
    pub const fn max_repeat_depth(&self) -> usize {
        self.max_repeat_depth
    }
}
