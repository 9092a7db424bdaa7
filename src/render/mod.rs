pub(crate) mod buffers;
pub(crate) mod exec;
pub(crate) mod surface;
