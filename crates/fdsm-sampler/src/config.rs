use serde::{Deserialize, Serialize};

/// Parameters governing a sampling run.
///
/// At the configuration layer `steps == 0` means "derive from the data";
/// call [`RunConfig::resolved`] before handing the config to
/// [`crate::run`], which consumes the step count literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of graph samples to draw.
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Swap attempts per sample; 0 requests the `⌈m·ln m⌉` default.
    #[serde(default)]
    pub steps: usize,
    /// Worker thread count; 0 is a fatal misconfiguration.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Chain seed. The CLI maps a zero seed to the wall clock before the
    /// core ever sees it; the core uses the value as given.
    #[serde(default)]
    pub seed: u64,
}

fn default_samples() -> usize {
    10_000
}

fn default_threads() -> usize {
    4
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            steps: 0,
            threads: default_threads(),
            seed: 0,
        }
    }
}

impl RunConfig {
    /// Replaces a zero step count with [`auto_steps`] for the given graph.
    pub fn resolved(mut self, edge_count: usize) -> Self {
        if self.steps == 0 {
            self.steps = auto_steps(edge_count);
        }
        self
    }
}

/// Default chain length between samples: `⌈m·ln m⌉` for `m` edges, the
/// usual mixing heuristic for the double-edge-swap chain.
pub fn auto_steps(edge_count: usize) -> usize {
    let m = edge_count as f64;
    (m * m.ln()).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::{auto_steps, RunConfig};

    #[test]
    fn defaults_match_the_documented_settings() {
        let config = RunConfig::default();
        assert_eq!(config.samples, 10_000);
        assert_eq!(config.steps, 0);
        assert_eq!(config.threads, 4);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn zero_steps_resolve_to_m_ln_m() {
        let config = RunConfig {
            steps: 0,
            ..RunConfig::default()
        };
        assert_eq!(config.resolved(100).steps, auto_steps(100));
        assert_eq!(auto_steps(100), 461); // 100 * ln(100) = 460.51…
    }

    #[test]
    fn explicit_steps_survive_resolution() {
        let config = RunConfig {
            steps: 7,
            ..RunConfig::default()
        };
        assert_eq!(config.resolved(100).steps, 7);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: RunConfig = serde_json::from_str("{\"samples\": 50}").unwrap();
        assert_eq!(config.samples, 50);
        assert_eq!(config.threads, 4);
    }
}
