pub(crate) mod args;
pub(crate) mod node;
pub(crate) mod op;
pub(crate) mod patch;
pub(crate) mod walk;
