//! Commit configuration with builder pattern

/// Worker-pool settings for committing operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitConfig {
    /// Maximum operations in flight at once
    pub workers: usize,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self::sequential()
    }
}

impl CommitConfig {
    /// Create a new builder for CommitConfig
    pub fn builder() -> CommitConfigBuilder {
        CommitConfigBuilder::new()
    }

    /// One operation at a time, in order
    pub fn sequential() -> Self {
        Self { workers: 1 }
    }

    /// Worker count, never below one
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }
}

/// Builder for CommitConfig
#[derive(Debug)]
pub struct CommitConfigBuilder {
    config: CommitConfig,
}

impl CommitConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: CommitConfig::default(),
        }
    }

    /// Set the worker-pool size
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Apply an optional override, keeping the current value when absent
    pub fn workers_override(mut self, workers: Option<usize>) -> Self {
        if let Some(workers) = workers {
            self.config.workers = workers;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CommitConfig {
        self.config
    }
}

impl Default for CommitConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential() {
        assert_eq!(CommitConfig::default().workers, 1);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CommitConfig::builder()
            .workers(4)
            .workers_override(None)
            .build();
        assert_eq!(config.workers, 4);

        let config = CommitConfig::builder().workers_override(Some(8)).build();
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_zero_workers_clamped() {
        let config = CommitConfig::builder().workers(0).build();
        assert_eq!(config.effective_workers(), 1);
    }
}
