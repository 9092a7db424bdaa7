use xxhash_rust::xxh3::Xxh3;

use crate::graph::node::Node;
use crate::graph::op::OPERATOR_LIBRARY_VERSION;
use crate::graph::walk::preorder;

const XXH3_SEED: u64 = 0x4c6f_6f70_7761_7665;

/// Structural identity of a node tree: operator sequence and input arity in canonical order.
///
/// Parameter values, time functions and buffer names do not participate, so two trees that only
/// differ in what they are fed share one compiled kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    /// High 64 bits of the digest.
    pub hi: u64,
    /// Low 64 bits of the digest.
    pub lo: u64,
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_u8(&mut self, v: u8) {
        self.inner.update(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.inner.update(&v.to_le_bytes());
    }

    fn finish(self) -> Signature {
        let v = self.inner.digest128();
        Signature {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Compute the structural signature of `root`.
pub fn signature_of(root: &Node) -> Signature {
    let mut h = StableHasher::new();
    h.write_u32(OPERATOR_LIBRARY_VERSION);
    let nodes = preorder(root);
    h.write_u32(nodes.len() as u32);
    for n in nodes {
        h.write_u8(n.op().code());
        h.write_u8(n.inputs().len() as u8);
    }
    h.finish()
}
