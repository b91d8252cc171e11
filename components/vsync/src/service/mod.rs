mod db;
pub use db::*;

mod dispatch;
pub use dispatch::*;

mod errors;
pub use errors::*;

mod message;
pub use message::*;

mod service;
pub use service::*;


#[cfg(test)]
mod test_service;
