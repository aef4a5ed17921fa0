pub mod constants;
pub mod interop;
pub mod payload;

pub use payload::Payload;
