use prost::Message;

use super::{Action, DataName, EntryError, NodeId, PendingEntry, Vote, DEFAULT_WIRE_VOTE_CAP};
use crate::wire;

/// VersionAction is the closed action set of the version-handler persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionAction {
    PutVersion,
    DeleteBranchUntilFork,
}

impl Default for VersionAction {
    fn default() -> VersionAction {
        VersionAction::PutVersion
    }
}

impl Action for VersionAction {
    fn to_wire(self) -> i32 {
        match self {
            VersionAction::PutVersion => 20,
            VersionAction::DeleteBranchUntilFork => 21,
        }
    }

    fn from_wire(v: i32) -> Result<VersionAction, EntryError> {
        match v {
            20 => Ok(VersionAction::PutVersion),
            21 => Ok(VersionAction::DeleteBranchUntilFork),
            _ => Err(EntryError::ActionOutOfSet(v)),
        }
    }
}

/// VersionEntry is the pending-consensus record of the version-handler
/// persona. The `no_persist` wire field belongs to the account persona
/// exclusively: decoding fails if it is present here.
#[derive(Debug, Clone, Default)]
pub struct VersionEntry {
    pub name: DataName,
    pub action: VersionAction,
    pub votes: Vec<Vote>,
    pub sync_count: u32,
}

// sync_count is node-local bookkeeping, not part of the value.
impl PartialEq for VersionEntry {
    fn eq(&self, other: &VersionEntry) -> bool {
        self.name == other.name && self.action == other.action && self.votes == other.votes
    }
}

impl PendingEntry for VersionEntry {
    type Action = VersionAction;

    const WIRE_VOTE_CAP: usize = DEFAULT_WIRE_VOTE_CAP;

    fn new_proposal(
        name: DataName,
        action: VersionAction,
        payload: Option<i64>,
        proposer: NodeId,
    ) -> VersionEntry {
        VersionEntry {
            name,
            action,
            votes: vec![Vote::of(proposer, payload)],
            sync_count: 0,
        }
    }

    fn name(&self) -> &DataName {
        &self.name
    }

    fn action(&self) -> VersionAction {
        self.action
    }

    fn votes(&self) -> &[Vote] {
        &self.votes
    }

    fn votes_mut(&mut self) -> &mut Vec<Vote> {
        &mut self.votes
    }

    fn sync_count(&self) -> u32 {
        self.sync_count
    }

    fn set_sync_count(&mut self, n: u32) {
        self.sync_count = n;
    }

    fn encode(&self) -> Result<Vec<u8>, EntryError> {
        let pb = wire::UnresolvedEntry {
            key: Some(wire::EntryKey {
                typ: self.name.tag(),
                name: self.name.name().to_vec(),
                action: self.action.to_wire(),
            }),
            votes: self.votes.iter().map(Into::into).collect(),
            no_persist: None,
        };

        let mut buf = Vec::with_capacity(pb.encoded_len());
        pb.encode(&mut buf)?;
        Ok(buf)
    }

    fn decode(buf: &[u8]) -> Result<VersionEntry, EntryError> {
        let pb = wire::UnresolvedEntry::decode(buf)?;

        let key = pb.key.ok_or_else(|| EntryError::LackOf("key".into()))?;
        let name = DataName::from_tag(key.typ, key.name)?;
        let action = VersionAction::from_wire(key.action)?;

        if pb.votes.len() > Self::WIRE_VOTE_CAP {
            return Err(EntryError::TooManyVotes(pb.votes.len(), Self::WIRE_VOTE_CAP));
        }

        if pb.no_persist.is_some() {
            return Err(EntryError::FlagMismatch("version", "forbidden but present"));
        }

        Ok(VersionEntry {
            name,
            action,
            votes: pb.votes.iter().map(Vote::from).collect(),
            sync_count: 0,
        })
    }
}
