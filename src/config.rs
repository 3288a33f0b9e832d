//! Parameters for sampling runs, and helpers for parsing them from JSON.
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// The parameters of a batch of spanning tree samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleParams {
    /// The number of trees to draw.
    pub num_trees: u64,
    /// The seed of the RNG used to draw trees.
    pub rng_seed: u64,
    /// The number of worker threads.
    pub n_threads: usize,
    /// The number of trees per unit of multithreaded work.
    pub batch_size: usize,
    /// A diagnostic cap on random walk steps per tree (see
    /// [crate::spanning_tree::USTSampler::with_step_limit]).
    pub step_limit: Option<u64>,
}

impl Default for SampleParams {
    fn default() -> SampleParams {
        SampleParams {
            num_trees: 1,
            rng_seed: 0,
            n_threads: 1,
            batch_size: 1,
            step_limit: None,
        }
    }
}

impl SampleParams {
    /// Rejects parameters a runner cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.n_threads == 0 {
            bail!("Parameter error: at least one thread is required");
        }
        if self.batch_size == 0 {
            bail!("Parameter error: batch size must be positive");
        }
        if self.step_limit == Some(0) {
            bail!("Parameter error: a step limit of 0 rejects every graph with more than one vertex");
        }
        Ok(())
    }
}

/// Parses sampling parameters from a JSON object. Missing fields take
/// their default values; the empty string yields the defaults.
pub fn parse_sample_params(raw: &str) -> Result<SampleParams> {
    let params = match raw.trim() {
        "" => SampleParams::default(),
        raw => serde_json::from_str::<SampleParams>(raw).context("Could not parse sample parameters")?,
    };
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_sample_params("").unwrap(), SampleParams::default());
        assert_eq!(parse_sample_params("  ").unwrap(), SampleParams::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let params = parse_sample_params(r#"{"num_trees": 50, "step_limit": 1000}"#).unwrap();
        assert_eq!(
            params,
            SampleParams {
                num_trees: 50,
                step_limit: Some(1000),
                ..SampleParams::default()
            }
        );
    }

    #[test]
    fn invalid_configs() {
        assert!(parse_sample_params(r#"{"n_threads": 0}"#).is_err());
        assert!(parse_sample_params(r#"{"batch_size": 0}"#).is_err());
        assert!(parse_sample_params(r#"{"step_limit": 0}"#).is_err());
        assert!(parse_sample_params("{not json").is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let params = SampleParams {
            num_trees: 3,
            rng_seed: 153434375,
            n_threads: 4,
            batch_size: 2,
            step_limit: None,
        };
        let raw = serde_json::to_string(&params).unwrap();
        assert_eq!(parse_sample_params(&raw).unwrap(), params);
    }
}
