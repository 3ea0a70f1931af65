pub(crate) mod frame;
pub(crate) mod ken_burns;
pub(crate) mod pipeline;
pub(crate) mod stream;
