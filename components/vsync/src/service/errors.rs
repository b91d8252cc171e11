use storage::StorageError;

use crate::entry::EntryError;

quick_error! {
    #[derive(Debug)]
    pub enum ServiceError {
        Storage(err: StorageError) {
            from()
            display("storage error: {}", err)
        }

        Entry(err: EntryError) {
            from()
            display("entry error: {}", err)
        }

        NoSuchKey(name: String) {
            display("no version record for key:{}", name)
        }

        NoSuchVersion(name: String, version: i64) {
            display("version {} not in history of key:{}", version, name)
        }

        LackOfPayload {
            display("resolved entry carries no agreed payload")
        }

        BadStatusRecord(len: usize) {
            display("status record has {} bytes, want 8", len)
        }
    }
}
