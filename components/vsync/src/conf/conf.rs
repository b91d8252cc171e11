use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::ConfError;
use crate::sync::{quorum, SyncConf};

#[cfg(test)]
#[path = "./tests/conf_tests.rs"]
mod tests;

/// NodeName identifies a vault in the close group and should be unique
/// globally.
pub type NodeName = String;

/// Node is one member of the close group.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
pub struct Node {
    #[serde(default)]
    pub node_name: NodeName,
    pub api_addr: SocketAddr,
}

fn default_sync_counter_max() -> u32 {
    20
}

fn default_sync_interval_ms() -> u64 {
    1000
}

/// VaultConf is the cluster conf of one close group.
#[derive(Serialize, Deserialize, Debug)]
pub struct VaultConf {
    /// The key is NodeName; when parsing conf yaml the key is copied into
    /// `node_name`, so a user does not need to fill it in twice.
    pub nodes: BTreeMap<NodeName, Node>,

    /// resolution threshold; absent means a strict majority of the group.
    pub quorum: Option<usize>,

    /// maintenance rounds a pending entry survives before eviction.
    #[serde(default = "default_sync_counter_max")]
    pub sync_counter_max: u32,

    /// period of the maintenance loop driving do_sync.
    #[serde(default = "default_sync_interval_ms")]
    pub sync_interval_ms: u64,
}

// let user use c.get() just like c.nodes.get()
impl Deref for VaultConf {
    type Target = BTreeMap<NodeName, Node>;
    fn deref(&self) -> &Self::Target {
        &self.nodes
    }
}

impl DerefMut for VaultConf {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.nodes
    }
}

impl VaultConf {
    /// from_file reads cluster conf yaml from a local file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<VaultConf, ConfError> {
        let content = fs::read_to_string(path)?;
        let mut conf: VaultConf = serde_yaml::from_str(content.as_str())?;

        for (name, node) in conf.nodes.iter_mut() {
            node.node_name = name.clone();
        }

        conf.check()?;

        Ok(conf)
    }

    pub fn group_size(&self) -> usize {
        self.nodes.len()
    }

    /// quorum_threshold is the configured quorum, or a strict majority of
    /// the group when the conf leaves it out.
    pub fn quorum_threshold(&self) -> usize {
        match self.quorum {
            Some(q) => q,
            None => quorum(self.group_size()),
        }
    }

    pub fn sync_conf(&self) -> SyncConf {
        SyncConf {
            quorum: self.quorum_threshold(),
            sync_counter_max: self.sync_counter_max,
        }
    }

    /// check validates what serde cannot: group shape and threshold bounds.
    pub fn check(&self) -> Result<(), ConfError> {
        let n = self.group_size();
        if n == 0 {
            return Err(ConfError::EmptyGroup);
        }

        if let Some(q) = self.quorum {
            if q == 0 || q > n {
                return Err(ConfError::BadQuorum(q, n));
            }
        }

        if self.sync_counter_max == 0 {
            return Err(ConfError::BadSyncCounterMax);
        }

        Ok(())
    }
}
