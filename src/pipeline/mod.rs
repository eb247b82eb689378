pub(crate) mod engine;
pub(crate) mod invoke;
pub(crate) mod ir;
pub(crate) mod node;
pub(crate) mod normalize;
