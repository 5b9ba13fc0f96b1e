pub(crate) mod builtin;
pub(crate) mod measure;
pub(crate) mod outline;
pub(crate) mod resolve;
