//! Wire schema of the vault network. Field tags and types must stay
//! byte-compatible with peers; a renamed rust field is fine, a changed tag
//! is not.

/// EntryKey identifies what is being agreed on: (data identity, action).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EntryKey {
    /// tag of the data identity variant.
    #[prost(int32, tag = "1")]
    pub typ: i32,
    #[prost(bytes, tag = "2")]
    pub name: Vec<u8>,
    /// a member of the owning persona's action set.
    #[prost(int32, tag = "3")]
    pub action: i32,
}

/// VoteContent is one peer's attestation for a proposed operation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VoteContent {
    #[prost(bytes, tag = "1")]
    pub peer: Vec<u8>,
    #[prost(int64, optional, tag = "2")]
    pub sequence_id: Option<i64>,
    /// cost or version marker, depending on the action.
    #[prost(int64, optional, tag = "3")]
    pub payload: Option<i64>,
}

/// UnresolvedEntry is the serialized form of a pending-consensus record.
/// Presence of `no_persist` is persona-specific: the account persona
/// requires it, the version persona forbids it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnresolvedEntry {
    #[prost(message, optional, tag = "1")]
    pub key: Option<EntryKey>,
    #[prost(message, repeated, tag = "2")]
    pub votes: Vec<VoteContent>,
    #[prost(bool, optional, tag = "3")]
    pub no_persist: Option<bool>,
}

/// VersionList is the resolved state stored for one version key.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionList {
    #[prost(int64, repeated, tag = "1")]
    pub versions: Vec<i64>,
}

/// MessageBase is the common part of the inter-node message envelope family.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageBase {
    #[prost(bytes, tag = "1")]
    pub sender: Vec<u8>,
    #[prost(bytes, tag = "2")]
    pub receiver: Vec<u8>,
    #[prost(int32, tag = "3")]
    pub id: i32,
    #[prost(int32, tag = "4")]
    pub parent_id: i32,
    #[prost(bytes, tag = "5")]
    pub signed_header: Vec<u8>,
}

/// Alert announces that a message is waiting for the receiver.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Alert {
    #[prost(message, optional, tag = "1")]
    pub base: Option<MessageBase>,
    #[prost(bytes, tag = "2")]
    pub message_id: Vec<u8>,
}

/// FullMessage carries the signed body itself.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FullMessage {
    #[prost(message, optional, tag = "1")]
    pub base: Option<MessageBase>,
    #[prost(bytes, tag = "2")]
    pub signed_body: Vec<u8>,
}
