use std::collections::HashMap;
use std::sync::Arc;

use crate::compile::compiler::compile_kernel;
use crate::compile::kernel::CompiledKernel;
use crate::compile::signature::{Signature, signature_of};
use crate::foundation::error::LoopwaveResult;
use crate::graph::node::Node;

/// Hit and miss counters of a [`KernelCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served by an existing kernel.
    pub hits: u64,
    /// Lookups that compiled a new kernel.
    pub misses: u64,
}

/// Compiled kernels keyed by structural signature.
///
/// Two trees that differ only in parameter values or buffer names share one kernel.
#[derive(Debug, Default)]
pub struct KernelCache {
    kernels: HashMap<Signature, Arc<CompiledKernel>>,
    stats: CacheStats,
}

impl KernelCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel for `root`, compiling it on first sight of its shape.
    ///
    /// The tree is validated on every call, hit or miss.
    pub fn get_or_compile(&mut self, root: &Node) -> LoopwaveResult<Arc<CompiledKernel>> {
        root.validate()?;
        let sig = signature_of(root);
        if let Some(k) = self.kernels.get(&sig) {
            self.stats.hits += 1;
            return Ok(Arc::clone(k));
        }

        let kernel = Arc::new(compile_kernel(root)?);
        tracing::debug!(signature = %sig, "kernel cache miss");
        self.stats.misses += 1;
        self.kernels.insert(sig, Arc::clone(&kernel));
        Ok(kernel)
    }

    /// Number of distinct kernels held.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Whether no kernel has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Counters since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
