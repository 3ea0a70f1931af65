pub(crate) mod decode;
pub(crate) mod mix;
pub(crate) mod probe;
pub(crate) mod track;
