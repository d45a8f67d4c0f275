//! Infrastructure layer - External service implementations

pub mod fs_lister;
pub mod imaging;
pub mod logging;
pub mod runtime;
pub mod services;
