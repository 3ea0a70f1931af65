pub(crate) mod decode;
pub(crate) mod reframe;
