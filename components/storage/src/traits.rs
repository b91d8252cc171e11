use prost::Message;

use crate::StorageError;

/// DBColumnFamily defines several `table`:
/// Record stores resolved account/version state, e.g. the version list of a key.
/// Status stores node status, such as the last finished maintenance round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DBColumnFamily {
    Record,
    Status,
}

impl DBColumnFamily {
    pub fn all() -> Vec<DBColumnFamily> {
        vec![DBColumnFamily::Record, DBColumnFamily::Status]
    }
}

impl From<&DBColumnFamily> for &str {
    fn from(cf: &DBColumnFamily) -> Self {
        match cf {
            DBColumnFamily::Record => return "record",
            DBColumnFamily::Status => return "status",
        }
    }
}

impl From<DBColumnFamily> for &str {
    fn from(cf: DBColumnFamily) -> Self {
        (&cf).into()
    }
}

/// ToKey converts a logical key into its storage key bytes.
pub trait ToKey {
    fn to_key(&self) -> Vec<u8>;
}

/// Base offer basic key-value access
pub trait Base: Send + Sync {
    /// set a new key-value
    fn set(&self, cf: DBColumnFamily, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// get an existing value with key
    fn get(&self, cf: DBColumnFamily, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// delete a key
    fn delete(&self, cf: DBColumnFamily, key: &[u8]) -> Result<(), StorageError>;
}

/// StatusKV offers functions to store node status, e.g. the last finished
/// maintenance round.
pub trait StatusKV: Base {
    fn set_status(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.set(DBColumnFamily::Status, key, value)
    }

    fn get_status(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.get(DBColumnFamily::Status, key)
    }
}

/// ObjectEngine stores prost-message objects addressed by a ToKey key.
/// Because the underlying storage is a plain byte store, it encodes an
/// object on set and decodes it on get.
pub trait ObjectEngine<OK, OV>: Base
where
    OK: ToKey,
    OV: Message + Default,
{
    /// set an object
    fn set_obj(&self, k: &OK, v: &OV) -> Result<(), StorageError> {
        let key = k.to_key();
        let mut value = vec![];
        v.encode(&mut value)?;

        self.set(DBColumnFamily::Record, &key, &value)
    }

    /// get an object with its logical key
    fn get_obj(&self, k: &OK) -> Result<Option<OV>, StorageError> {
        let key = k.to_key();
        let vbs = self.get(DBColumnFamily::Record, &key)?;
        let r = match vbs {
            Some(v) => OV::decode(v.as_slice())?,
            None => return Ok(None),
        };

        Ok(Some(r))
    }

    /// delete an object
    fn delete_obj(&self, k: &OK) -> Result<(), StorageError> {
        self.delete(DBColumnFamily::Record, &k.to_key())
    }
}

impl<T> StatusKV for T where T: Base + ?Sized {}

impl<T, OK, OV> ObjectEngine<OK, OV> for T
where
    T: Base + ?Sized,
    OK: ToKey,
    OV: Message + Default,
{
}
