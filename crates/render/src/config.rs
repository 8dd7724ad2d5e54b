use serde::{Deserialize, Serialize};

/// What to do when a priority bias would push a primitive off the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasPolicy {
    /// Drop the bias and keep the primitive in its unbiased bucket.
    #[default]
    Unbiased,
    /// Clamp the biased index to the first or last bucket.
    Clamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of depth buckets.
    pub table_size: usize,
    /// Bucket offset applied to Low (+) and High (-) priority renderables.
    pub bias: i32,
    pub bias_policy: BiasPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            table_size: 4096,
            bias: 256,
            bias_policy: BiasPolicy::Unbiased,
        }
    }
}
