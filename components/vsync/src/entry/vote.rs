use super::NodeId;
use crate::wire::VoteContent;

/// Vote is one peer's attestation for a proposed operation.
/// An unresolved entry holds at most one vote per distinct voter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vote {
    pub voter: NodeId,
    pub sequence_id: Option<i64>,
    pub payload: Option<i64>,
}

impl Vote {
    pub fn of(voter: NodeId, payload: Option<i64>) -> Vote {
        Vote {
            voter,
            sequence_id: None,
            payload,
        }
    }
}

impl From<&Vote> for VoteContent {
    fn from(v: &Vote) -> VoteContent {
        VoteContent {
            peer: v.voter.as_bytes().to_vec(),
            sequence_id: v.sequence_id,
            payload: v.payload,
        }
    }
}

impl From<&VoteContent> for Vote {
    fn from(vc: &VoteContent) -> Vote {
        Vote {
            voter: NodeId::new(vc.peer.clone()),
            sequence_id: vc.sequence_id,
            payload: vc.payload,
        }
    }
}
