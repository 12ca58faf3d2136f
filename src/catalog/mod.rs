pub(crate) mod fingerprint;
pub(crate) mod model;
pub(crate) mod source;
