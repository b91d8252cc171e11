use std::sync::Arc;

use storage::{Base, DBColumnFamily, ObjectEngine, StatusKV, ToKey};

use super::ServiceError;
use crate::entry::DataName;
use crate::wire::VersionList;

const LAST_SYNC_ROUND_KEY: &[u8] = b"/status/last_sync_round";

/// VersionKey renders a data identity as the storage key of its
/// resolved version history.
pub struct VersionKey<'a>(pub &'a DataName);

impl<'a> ToKey for VersionKey<'a> {
    fn to_key(&self) -> Vec<u8> {
        format!("/versions/{}", self.0).into_bytes()
    }
}

/// Db is the resolved-state store of the version persona.
/// Histories are append-only lists, oldest first; consensus happens before
/// anything reaches here, so Db never sees a contended write.
pub struct Db {
    sto: Arc<dyn Base>,
}

impl Db {
    pub fn new(sto: Arc<dyn Base>) -> Db {
        Db { sto }
    }

    /// get_versions returns the stored history of `name`, oldest first.
    pub fn get_versions(&self, name: &DataName) -> Result<Option<VersionList>, ServiceError> {
        let r: Option<VersionList> = self.sto.get_obj(&VersionKey(name))?;
        Ok(r)
    }

    /// get_branch returns the history of `name` up to and including `tip`.
    pub fn get_branch(&self, name: &DataName, tip: i64) -> Result<Vec<i64>, ServiceError> {
        let vl = self
            .get_versions(name)?
            .ok_or_else(|| ServiceError::NoSuchKey(format!("{}", name)))?;

        let i = position_of(&vl, name, tip)?;
        Ok(vl.versions[..=i].to_vec())
    }

    /// apply_put_version appends an agreed version to the history of
    /// `name`, creating the history if absent. Re-applying an already
    /// recorded version is a no-op.
    pub fn apply_put_version(&self, name: &DataName, version: i64) -> Result<(), ServiceError> {
        let mut vl = self.get_versions(name)?.unwrap_or_default();

        if !vl.versions.contains(&version) {
            vl.versions.push(version);
            self.sto.set_obj(&VersionKey(name), &vl)?;
        }

        Ok(())
    }

    /// apply_delete_branch removes `tip` and everything recorded after it
    /// from the history of `name`. A missing key or tip is an error; the
    /// caller turns it into a failure reply for that key only.
    pub fn apply_delete_branch(&self, name: &DataName, tip: i64) -> Result<(), ServiceError> {
        let mut vl = self
            .get_versions(name)?
            .ok_or_else(|| ServiceError::NoSuchKey(format!("{}", name)))?;

        let i = position_of(&vl, name, tip)?;
        vl.versions.truncate(i);

        if vl.versions.is_empty() {
            self.sto.delete(DBColumnFamily::Record, &VersionKey(name).to_key())?;
        } else {
            self.sto.set_obj(&VersionKey(name), &vl)?;
        }

        Ok(())
    }

    /// record_sync_round notes the maintenance round just finished, in the
    /// Status column family.
    pub fn record_sync_round(&self, round: u64) -> Result<(), ServiceError> {
        self.sto.set_status(LAST_SYNC_ROUND_KEY, &round.to_be_bytes())?;
        Ok(())
    }

    /// last_sync_round returns the last recorded maintenance round, if any.
    pub fn last_sync_round(&self) -> Result<Option<u64>, ServiceError> {
        let got = self.sto.get_status(LAST_SYNC_ROUND_KEY)?;
        match got {
            None => Ok(None),
            Some(b) => {
                if b.len() != 8 {
                    return Err(ServiceError::BadStatusRecord(b.len()));
                }
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&b);
                Ok(Some(u64::from_be_bytes(buf)))
            }
        }
    }
}

fn position_of(vl: &VersionList, name: &DataName, version: i64) -> Result<usize, ServiceError> {
    vl.versions
        .iter()
        .position(|v| *v == version)
        .ok_or_else(|| ServiceError::NoSuchVersion(format!("{}", name), version))
}
