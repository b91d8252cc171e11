use prost::Message;

use super::{Action, DataName, EntryError, NodeId, PendingEntry, Vote, DEFAULT_WIRE_VOTE_CAP};
use crate::wire;

/// AccountAction is the closed action set of the account-holder persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountAction {
    Put,
    Delete,
}

impl Default for AccountAction {
    fn default() -> AccountAction {
        AccountAction::Put
    }
}

impl Action for AccountAction {
    fn to_wire(self) -> i32 {
        match self {
            AccountAction::Put => 10,
            AccountAction::Delete => 11,
        }
    }

    fn from_wire(v: i32) -> Result<AccountAction, EntryError> {
        match v {
            10 => Ok(AccountAction::Put),
            11 => Ok(AccountAction::Delete),
            _ => Err(EntryError::ActionOutOfSet(v)),
        }
    }
}

/// AccountEntry is the pending-consensus record of the account-holder
/// persona. Its wire form must carry `no_persist` explicitly: an entry
/// with `no_persist = true` aggregates votes only and must never be
/// replayed into the store when it resolves.
#[derive(Debug, Clone, Default)]
pub struct AccountEntry {
    pub name: DataName,
    pub action: AccountAction,
    pub votes: Vec<Vote>,
    pub sync_count: u32,
    pub no_persist: bool,
}

// sync_count is node-local bookkeeping, not part of the value.
impl PartialEq for AccountEntry {
    fn eq(&self, other: &AccountEntry) -> bool {
        self.name == other.name
            && self.action == other.action
            && self.votes == other.votes
            && self.no_persist == other.no_persist
    }
}

impl PendingEntry for AccountEntry {
    type Action = AccountAction;

    const WIRE_VOTE_CAP: usize = DEFAULT_WIRE_VOTE_CAP;

    fn new_proposal(
        name: DataName,
        action: AccountAction,
        payload: Option<i64>,
        proposer: NodeId,
    ) -> AccountEntry {
        AccountEntry {
            name,
            action,
            votes: vec![Vote::of(proposer, payload)],
            sync_count: 0,
            no_persist: false,
        }
    }

    fn name(&self) -> &DataName {
        &self.name
    }

    fn action(&self) -> AccountAction {
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
            no_persist: Some(self.no_persist),
        };

        let mut buf = Vec::with_capacity(pb.encoded_len());
        pb.encode(&mut buf)?;
        Ok(buf)
    }

    fn decode(buf: &[u8]) -> Result<AccountEntry, EntryError> {
        let pb = wire::UnresolvedEntry::decode(buf)?;

        let key = pb.key.ok_or_else(|| EntryError::LackOf("key".into()))?;
        let name = DataName::from_tag(key.typ, key.name)?;
        let action = AccountAction::from_wire(key.action)?;

        if pb.votes.len() > Self::WIRE_VOTE_CAP {
            return Err(EntryError::TooManyVotes(pb.votes.len(), Self::WIRE_VOTE_CAP));
        }

        let no_persist = match pb.no_persist {
            Some(v) => v,
            None => return Err(EntryError::FlagMismatch("account", "required but absent")),
        };

        Ok(AccountEntry {
            name,
            action,
            votes: pb.votes.iter().map(Vote::from).collect(),
            sync_count: 0,
            no_persist,
        })
    }
}
