pub mod authorize;
pub mod healthz;
pub mod token;
