mod quorums;
pub use quorums::*;

mod sync;
pub use sync::*;

#[cfg(test)]
mod test_quorums;
