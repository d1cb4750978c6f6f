pub mod envelope;
pub mod error;
pub mod lifecycle;
pub mod status;
pub mod worlds;
