//! Depth-bucketed primitive lists drawn far to near.

use lowpoly_common::DrawPriority;
use std::collections::TryReserveError;

use crate::config::{BiasPolicy, RenderConfig};
use crate::primitive::DrawPrimitive;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("ordering table needs at least one bucket")]
    EmptyTable,
    #[error("ordering table allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

/// Bucket for a primitive at `depth`, or `None` when the depth is outside
/// `(0, table_size)`. The priority bias applies only when it keeps the index
/// in range, unless the policy clamps it.
pub fn place(depth: i32, priority: DrawPriority, config: &RenderConfig) -> Option<usize> {
    let size = i64::try_from(config.table_size).unwrap_or(i64::MAX);
    let depth = i64::from(depth);
    if depth <= 0 || depth >= size {
        return None;
    }
    let biased = depth + i64::from(priority.offset(config.bias));
    let index = if (0..size).contains(&biased) {
        biased
    } else {
        match config.bias_policy {
            BiasPolicy::Unbiased => depth,
            BiasPolicy::Clamp => biased.clamp(0, size - 1),
        }
    };
    usize::try_from(index).ok()
}

/// Fixed number of buckets holding indices into a per-frame primitive arena.
#[derive(Debug, Clone)]
pub struct OrderingTable {
    buckets: Vec<Vec<u32>>,
    prims: Vec<DrawPrimitive>,
}

impl OrderingTable {
    pub fn new(size: usize) -> Result<Self, RenderError> {
        if size == 0 {
            return Err(RenderError::EmptyTable);
        }
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(size)?;
        buckets.resize_with(size, Vec::new);
        Ok(Self {
            buckets,
            prims: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    /// Number of primitives filed this frame.
    pub fn len(&self) -> usize {
        self.prims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }

    /// Empty every bucket, last to first. Capacity is kept for the next frame.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut().rev() {
            bucket.clear();
        }
        self.prims.clear();
    }

    /// File `prim` under bucket `prim.bucket`. Returns false if that bucket
    /// does not exist.
    pub fn insert(&mut self, prim: DrawPrimitive) -> bool {
        let Ok(index) = u32::try_from(self.prims.len()) else {
            return false;
        };
        let Some(bucket) = self.buckets.get_mut(prim.bucket) else {
            return false;
        };
        bucket.push(index);
        self.prims.push(prim);
        true
    }

    /// Primitives in one bucket, in insertion order.
    pub fn bucket(&self, index: usize) -> impl Iterator<Item = &DrawPrimitive> + '_ {
        self.buckets
            .get(index)
            .into_iter()
            .flatten()
            .map(|&i| &self.prims[i as usize])
    }

    /// All primitives from the highest bucket to the lowest.
    pub fn iter_far_to_near(&self) -> impl Iterator<Item = &DrawPrimitive> + '_ {
        self.buckets
            .iter()
            .rev()
            .flatten()
            .map(|&i| &self.prims[i as usize])
    }

    pub fn occupied_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }
}
