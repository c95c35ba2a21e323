//! Rendering options and configuration.

/// Options for rendering pages.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Render only the columns written mostly in the primary script
    pub primary_only: bool,

    /// Emit the running head on page elements
    pub include_running_head: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render only primary-script columns, or every non-empty column.
    pub fn with_primary_only(mut self, primary_only: bool) -> Self {
        self.primary_only = primary_only;
        self
    }

    /// Render every non-empty column.
    pub fn all_columns(mut self) -> Self {
        self.primary_only = false;
        self
    }

    /// Include or omit the running head.
    pub fn with_running_head(mut self, include: bool) -> Self {
        self.include_running_head = include;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            primary_only: true,
            include_running_head: true,
        }
    }
}
