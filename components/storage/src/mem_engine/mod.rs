use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

mod memdb;
pub use memdb::*;

/// MemEngine is an in-memory storage engine, for tests and single-process
/// use. The persistent engine lives behind the same `Base` trait.
pub struct MemEngine {
    _db: Mutex<HashMap<String, BTreeMap<Vec<u8>, Vec<u8>>>>,
}
