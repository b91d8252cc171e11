use crate::entry::{DataName, NodeId};

/// PutVersionRequest asks the group to append `new_version` to the
/// history of `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutVersionRequest {
    pub requester: NodeId,
    pub name: DataName,
    pub new_version: i64,
}

/// DeleteBranchRequest asks the group to drop `branch_tip` and everything
/// recorded after it from the history of `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteBranchRequest {
    pub requester: NodeId,
    pub name: DataName,
    pub branch_tip: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetVersionsRequest {
    pub requester: NodeId,
    pub name: DataName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBranchRequest {
    pub requester: NodeId,
    pub name: DataName,
    pub branch_tip: i64,
}

/// SyncEntryMessage is one peer's serialized pending entry, counted as
/// `voter`'s vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEntryMessage {
    pub voter: NodeId,
    pub entry: Vec<u8>,
}

/// AccountTransferMessage hands over a departing or relocated peer's
/// pending entries during churn. `all_received` marks the final chunk:
/// from then on the snapshot is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTransferMessage {
    pub from: NodeId,
    pub entries: Vec<Vec<u8>>,
    pub all_received: bool,
}

/// MembershipChange lists (departed, replacement) pairs of the close group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    pub replaced: Vec<(NodeId, NodeId)>,
}

/// VaultMessage is the closed set of inputs the version service accepts.
/// Adding a message means adding a variant; there is no catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultMessage {
    PutVersion(PutVersionRequest),
    DeleteBranchUntilFork(DeleteBranchRequest),
    GetVersions(GetVersionsRequest),
    GetBranch(GetBranchRequest),
    SyncPutVersion(SyncEntryMessage),
    SyncDeleteBranch(SyncEntryMessage),
    AccountTransfer(AccountTransferMessage),
    Churn(MembershipChange),
}
