pub(crate) mod cache;
pub(crate) mod compiler;
pub(crate) mod kernel;
pub(crate) mod signature;
