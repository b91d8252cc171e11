mod log_format;
pub use log_format::*;

mod setup;
pub use setup::*;

#[cfg(test)]
mod test_format;
