mod errors;
pub use errors::*;

mod name;
pub use name::*;

mod vote;
pub use vote::*;

mod entry;
pub use entry::*;

mod account;
pub use account::*;

mod version;
pub use version::*;
