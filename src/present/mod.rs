pub(crate) mod compositor;
pub(crate) mod ffmpeg;
pub(crate) mod png;
pub(crate) mod sink;
