/// Extraction options and builder

use crate::filesystem::DEFAULT_MAX_DEPTH;

/// What to do when an entry fails to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first error
    #[default]
    Abort,
    /// Log the failing entry, record it in the summary and continue
    Skip,
}

/// Options controlling a tree extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Maximum directory nesting below the starting directory
    pub max_depth: usize,
    /// Error handling policy
    pub error_policy: ErrorPolicy,
    /// Replace host files that already exist
    pub overwrite: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            error_policy: ErrorPolicy::Abort,
            overwrite: true,
        }
    }
}

impl ExtractOptions {
    /// Create a new builder for extraction options
    pub fn builder() -> ExtractOptionsBuilder {
        ExtractOptionsBuilder::new()
    }
}

/// Builder for [`ExtractOptions`]
#[derive(Debug, Default)]
pub struct ExtractOptionsBuilder {
    options: ExtractOptions,
}

impl ExtractOptionsBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum directory depth
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Set the error policy
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.options.error_policy = policy;
        self
    }

    /// Continue past failing entries instead of aborting
    pub fn skip_errors(self, skip: bool) -> Self {
        self.error_policy(if skip {
            ErrorPolicy::Skip
        } else {
            ErrorPolicy::Abort
        })
    }

    /// Allow replacing existing host files
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.options.overwrite = overwrite;
        self
    }

    /// Build the options
    pub fn build(self) -> ExtractOptions {
        self.options
    }
}
