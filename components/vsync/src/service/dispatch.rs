use crate::entry::NodeId;

/// VaultReply is the terminal response for one client operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultReply {
    pub key: String,
    pub ok: bool,
    pub info: String,
}

/// GossipKind tells a receiving peer which engine the carried entries
/// belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GossipKind {
    PutVersion,
    DeleteBranch,
}

/// GossipMessage carries the serialized pending entries of one engine,
/// re-announced once per maintenance round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GossipMessage {
    pub kind: GossipKind,
    pub entries: Vec<Vec<u8>>,
}

/// Dispatcher is the outbound seam of the service: replies to requesters
/// and periodic gossip to the close group. The network layer implements it.
pub trait Dispatcher: Send + Sync {
    fn reply(&self, to: &NodeId, reply: VaultReply);

    fn broadcast(&self, msg: GossipMessage);
}

/// LogDispatcher drops outbound traffic into the log, for single-node runs.
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn reply(&self, to: &NodeId, reply: VaultReply) {
        info!("reply";
              "to" => format!("{}", to),
              "key" => reply.key,
              "ok" => reply.ok,
              "info" => reply.info,
        );
    }

    fn broadcast(&self, msg: GossipMessage) {
        info!("broadcast";
              "kind" => format!("{:?}", msg.kind),
              "entries" => msg.entries.len(),
        );
    }
}
