//! Circular dependency detection over the active resolution stack.

use tracing::trace;

use crate::error::GraphLoadError;
use crate::model::TargetKey;

/// Stack of target keys whose resolution is in progress.
///
/// A key is on the stack only between the start and the end of its own
/// resolution, so revisiting an already resolved target through the cache
/// never reports a cycle.
#[derive(Debug, Default)]
pub struct CircularDependencyDetector {
    active: Vec<TargetKey>,
}

impl CircularDependencyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as in progress.
    ///
    /// Fails with [`GraphLoadError::CircularDependency`] when `key` is already
    /// active; the chain runs from its first occurrence through the repeated
    /// key and the stack is left untouched.
    pub fn push(&mut self, key: TargetKey) -> Result<(), GraphLoadError> {
        if let Some(start) = self.active.iter().position(|k| *k == key) {
            let mut chain = self.active[start..].to_vec();
            chain.push(key);
            return Err(GraphLoadError::CircularDependency { chain });
        }

        trace!("Resolving {} (depth {})", key, self.active.len());
        self.active.push(key);
        Ok(())
    }

    /// Remove the most recent occurrence of `key`.
    pub fn pop(&mut self, key: &TargetKey) {
        if let Some(idx) = self.active.iter().rposition(|k| k == key) {
            self.active.remove(idx);
            trace!("Finished {}", key);
        }
    }

    /// Whether `key` is currently being resolved
    pub fn is_active(&self, key: &TargetKey) -> bool {
        self.active.contains(key)
    }

    /// Number of in-progress resolutions
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    /// In-progress keys, outermost first
    pub fn active(&self) -> &[TargetKey] {
        &self.active
    }
}
