use std::fmt;

use super::{DataName, EntryError, NodeId, Vote};

/// Default cap of votes a serialized entry may carry.
/// Gossiped entries never need more: one proposer plus one relayer.
pub const DEFAULT_WIRE_VOTE_CAP: usize = 2;

/// Action is a member of one persona's closed action set.
/// Decoding a wire value outside the set fails.
pub trait Action: Copy + Eq + fmt::Debug {
    fn to_wire(self) -> i32;
    fn from_wire(v: i32) -> Result<Self, EntryError>;
}

/// PendingEntry is the behavior contract shared by the persona unresolved
/// entries: construct from a local proposal, encode/decode, key access,
/// vote list access and the staleness counter driving eviction.
///
/// The staleness counter is node-local bookkeeping: it does not travel on
/// the wire and is excluded from equality.
pub trait PendingEntry: Clone + PartialEq + Default {
    type Action: Action;

    /// cap of votes a serialized entry may carry; decode fails above it.
    const WIRE_VOTE_CAP: usize;

    /// new_proposal creates a single-vote entry for an operation this node
    /// originates itself.
    fn new_proposal(
        name: DataName,
        action: Self::Action,
        payload: Option<i64>,
        proposer: NodeId,
    ) -> Self;

    fn name(&self) -> &DataName;
    fn action(&self) -> Self::Action;

    fn votes(&self) -> &[Vote];
    fn votes_mut(&mut self) -> &mut Vec<Vote>;

    fn sync_count(&self) -> u32;
    fn set_sync_count(&mut self, n: u32);

    fn encode(&self) -> Result<Vec<u8>, EntryError>;
    fn decode(buf: &[u8]) -> Result<Self, EntryError>;

    /// same_key is the per-key match rule for merging votes.
    fn same_key(&self, other: &Self) -> bool {
        self.name() == other.name() && self.action() == other.action()
    }
}
