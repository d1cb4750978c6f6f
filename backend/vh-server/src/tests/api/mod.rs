mod error;
mod lifecycle;
