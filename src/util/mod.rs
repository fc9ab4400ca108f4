pub mod bits;
pub mod err;
#[cfg(feature = "tracing")]
pub mod trace;
