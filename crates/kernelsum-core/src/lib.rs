pub mod compute;
pub mod config;
pub mod consts;
pub mod detector;
pub mod error;
pub mod frame;
pub mod io;
pub mod kernel;
pub mod mask;
pub mod reference;
pub mod session;
pub mod source;
pub mod stream;
pub mod strong;
pub mod validate;
