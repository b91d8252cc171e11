use std::fmt;

use super::EntryError;

/// NodeId is the opaque identity of a vault in the network.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(Vec<u8>);

impl NodeId {
    pub fn new(bytes: Vec<u8>) -> NodeId {
        NodeId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for NodeId {
    fn from(b: &[u8]) -> NodeId {
        NodeId(b.to_vec())
    }
}

impl From<Vec<u8>> for NodeId {
    fn from(b: Vec<u8>) -> NodeId {
        NodeId(b)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> NodeId {
        NodeId(s.as_bytes().to_vec())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// DataName is the sum-typed identity of one datum a close group is
/// responsible for. The wire tag is fixed per variant.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum DataName {
    Immutable(Vec<u8>),
    Mutable(Vec<u8>),
    Version(Vec<u8>),
}

impl DataName {
    pub fn tag(&self) -> i32 {
        match self {
            DataName::Immutable(_) => 1,
            DataName::Mutable(_) => 2,
            DataName::Version(_) => 3,
        }
    }

    pub fn name(&self) -> &[u8] {
        match self {
            DataName::Immutable(n) => n,
            DataName::Mutable(n) => n,
            DataName::Version(n) => n,
        }
    }

    /// from_tag rebuilds a DataName from its wire form.
    pub fn from_tag(tag: i32, name: Vec<u8>) -> Result<DataName, EntryError> {
        match tag {
            1 => Ok(DataName::Immutable(name)),
            2 => Ok(DataName::Mutable(name)),
            3 => Ok(DataName::Version(name)),
            _ => Err(EntryError::UnknownDataTag(tag)),
        }
    }
}

impl Default for DataName {
    fn default() -> DataName {
        DataName::Immutable(vec![])
    }
}

impl fmt::Display for DataName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self {
            DataName::Immutable(_) => "im",
            DataName::Mutable(_) => "mu",
            DataName::Version(_) => "ver",
        };
        write!(f, "{}:", kind)?;
        for b in self.name().iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
