pub(crate) mod geometric;
pub(crate) mod photometric;
