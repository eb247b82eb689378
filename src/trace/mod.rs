pub(crate) mod fingerprint;
pub(crate) mod record;
pub(crate) mod tree;
