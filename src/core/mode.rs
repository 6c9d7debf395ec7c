//! Build mode for production/development builds.

/// Build mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Whether every page entry imports the live-reload client.
    pub dev_client: bool,

    /// Whether the generated output is written to disk.
    /// Development builds are served from memory.
    pub write_output: bool,
}

impl BuildMode {
    /// Production mode: output written to disk, no reload client.
    pub const PRODUCTION: Self = Self {
        dev_client: false,
        write_output: true,
    };

    /// Development mode: in-memory output with the reload client injected.
    pub const DEVELOPMENT: Self = Self {
        dev_client: true,
        write_output: false,
    };

    /// Check if this is development mode.
    #[inline]
    pub const fn is_dev(&self) -> bool {
        self.dev_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes() {
        assert!(BuildMode::DEVELOPMENT.is_dev());
        assert!(!BuildMode::DEVELOPMENT.write_output);
        assert!(!BuildMode::PRODUCTION.is_dev());
        assert!(BuildMode::PRODUCTION.write_output);
    }
}
