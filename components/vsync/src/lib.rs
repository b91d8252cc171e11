#[macro_use]
extern crate quick_error;

#[macro_use]
extern crate slog_global;

#[macro_use]
pub mod testutil;

pub mod conf;
pub mod entry;
pub mod service;
pub mod sync;
pub mod wire;
