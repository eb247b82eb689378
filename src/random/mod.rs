pub(crate) mod context;
pub(crate) mod distribution;
pub(crate) mod fork;
pub(crate) mod sampler;
