pub(crate) mod config;
pub(crate) mod frame_set;
pub(crate) mod loader;
pub(crate) mod select;
pub(crate) mod source;
