use serde::{Deserialize, Serialize};

/// What to do when a fetched page yields no visible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyTextPolicy {
    /// Write the empty string. The record keeps `Some("")` and is fetched
    /// again on the next run, since only non-empty text counts as populated.
    #[default]
    Store,
    /// Leave `text` absent.
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Entries processed concurrently (default: 1, strictly sequential)
    pub workers: usize,

    /// Handling of pages that extract to nothing (default: store)
    pub empty_text: EmptyTextPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            empty_text: EmptyTextPolicy::Store,
        }
    }
}

impl PipelineConfig {
    /// Worker count, never below one.
    pub fn concurrency(&self) -> usize {
        self.workers.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.workers, 1);
        assert_eq!(config.empty_text, EmptyTextPolicy::Store);
    }

    #[test]
    fn test_zero_workers_still_runs() {
        let config = PipelineConfig {
            workers: 0,
            ..Default::default()
        };
        assert_eq!(config.concurrency(), 1);
    }

    #[test]
    fn test_empty_text_policy_from_toml() {
        let config: PipelineConfig = toml::from_str(r#"empty_text = "skip""#).unwrap();
        assert_eq!(config.empty_text, EmptyTextPolicy::Skip);
        assert_eq!(config.workers, 1);
    }
}
