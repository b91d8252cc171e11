use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use storage::MemEngine;

use super::*;
use crate::entry::{DataName, NodeId, PendingEntry, VersionAction, VersionEntry};
use crate::sync::SyncConf;
use crate::testutil::{new_delete_entry, new_put_entry};

/// RecDispatcher records outbound traffic for assertions.
#[derive(Clone, Default)]
struct RecDispatcher {
    replies: Arc<Mutex<Vec<(NodeId, VaultReply)>>>,
    gossips: Arc<Mutex<Vec<GossipMessage>>>,
}

impl RecDispatcher {
    fn replies(&self) -> Vec<(NodeId, VaultReply)> {
        self.replies.lock().unwrap().clone()
    }

    fn gossips(&self) -> Vec<GossipMessage> {
        self.gossips.lock().unwrap().clone()
    }
}

impl Dispatcher for RecDispatcher {
    fn reply(&self, to: &NodeId, reply: VaultReply) {
        self.replies.lock().unwrap().push((to.clone(), reply));
    }

    fn broadcast(&self, msg: GossipMessage) {
        self.gossips.lock().unwrap().push(msg);
    }
}

fn new_service(quorum: usize) -> (VersionService<RecDispatcher>, RecDispatcher, Db) {
    let eng = Arc::new(MemEngine::new().unwrap());
    let disp = RecDispatcher::default();
    let svc = VersionService::new(
        NodeId::from("me"),
        eng.clone(),
        SyncConf {
            quorum,
            sync_counter_max: 5,
        },
        disp.clone(),
    );
    (svc, disp, Db::new(eng))
}

fn name(s: &str) -> DataName {
    DataName::Version(s.as_bytes().to_vec())
}

fn put_req(requester: &str, key: &str, version: i64) -> VaultMessage {
    VaultMessage::PutVersion(PutVersionRequest {
        requester: NodeId::from(requester),
        name: name(key),
        new_version: version,
    })
}

fn sync_put(voter: &str, key: &str, version: i64) -> VaultMessage {
    let e = new_put_entry(key, version, voter);
    VaultMessage::SyncPutVersion(SyncEntryMessage {
        voter: NodeId::from(voter),
        entry: e.encode().unwrap(),
    })
}

#[test]
fn test_put_version_single_node() {
    // quorum 1: a local proposal commits immediately
    let (svc, disp, db) = new_service(1);

    svc.handle(put_req("client", "k", 7)).unwrap();

    assert_eq!(vec![7], db.get_versions(&name("k")).unwrap().unwrap().versions);
    assert_eq!((0, 0), svc.unresolved_counts());

    let replies = disp.replies();
    assert_eq!(1, replies.len());
    assert_eq!(NodeId::from("client"), replies[0].0);
    assert!(replies[0].1.ok);
}

#[test]
fn test_put_version_reaches_quorum_via_gossip() {
    let (svc, disp, db) = new_service(2);

    svc.handle(put_req("client", "k", 7)).unwrap();
    assert_eq!(None, db.get_versions(&name("k")).unwrap());
    assert_eq!(0, disp.replies().len());
    assert_eq!((1, 0), svc.unresolved_counts());

    // peer-a's matching vote completes the quorum
    svc.handle(sync_put("peer-a", "k", 7)).unwrap();

    assert_eq!(vec![7], db.get_versions(&name("k")).unwrap().unwrap().versions);
    assert_eq!((0, 0), svc.unresolved_counts());

    // requester and peer voter are told, this node is not
    let replies = disp.replies();
    assert_eq!(2, replies.len());
    assert_eq!(NodeId::from("client"), replies[0].0);
    assert_eq!(NodeId::from("peer-a"), replies[1].0);
    assert!(replies.iter().all(|(_, r)| r.ok));
}

#[test]
fn test_duplicate_sync_message_is_noop() {
    let (svc, disp, db) = new_service(2);

    svc.handle(sync_put("peer-a", "k", 7)).unwrap();
    svc.handle(sync_put("peer-a", "k", 7)).unwrap();

    assert_eq!(None, db.get_versions(&name("k")).unwrap());
    assert_eq!((1, 0), svc.unresolved_counts());
    assert_eq!(0, disp.replies().len());
}

#[test]
fn test_sync_message_routes_by_action() {
    let (svc, _disp, db) = new_service(2);

    for v in &[1, 2] {
        svc.handle(sync_put("peer-a", "k", *v)).unwrap();
        svc.handle(sync_put("peer-b", "k", *v)).unwrap();
    }
    assert_eq!(vec![1, 2], db.get_versions(&name("k")).unwrap().unwrap().versions);

    // delete-branch entries land in their own engine even when carried by
    // the put-version sync message
    let e = new_delete_entry("k", 2, "peer-a");
    svc.handle(VaultMessage::SyncPutVersion(SyncEntryMessage {
        voter: NodeId::from("peer-a"),
        entry: e.encode().unwrap(),
    }))
    .unwrap();
    assert_eq!((0, 1), svc.unresolved_counts());

    let e = new_delete_entry("k", 2, "peer-b");
    svc.handle(VaultMessage::SyncDeleteBranch(SyncEntryMessage {
        voter: NodeId::from("peer-b"),
        entry: e.encode().unwrap(),
    }))
    .unwrap();

    assert_eq!(vec![1], db.get_versions(&name("k")).unwrap().unwrap().versions);
}

#[test]
fn test_delete_branch_store_miss_is_failure_reply() {
    let (svc, disp, _db) = new_service(1);

    svc.handle(VaultMessage::DeleteBranchUntilFork(DeleteBranchRequest {
        requester: NodeId::from("client"),
        name: name("absent"),
        branch_tip: 3,
    }))
    .unwrap();

    let replies = disp.replies();
    assert_eq!(1, replies.len());
    assert!(!replies[0].1.ok);

    // the engine is clean again: the failure consumed the entry
    assert_eq!((0, 0), svc.unresolved_counts());
}

#[test]
fn test_corrupt_sync_message_merges_nothing() {
    let (svc, _disp, _db) = new_service(2);

    let r = svc.handle(VaultMessage::SyncPutVersion(SyncEntryMessage {
        voter: NodeId::from("peer-a"),
        entry: vec![0xff, 0xff, 0xff],
    }));
    assert!(r.is_err());
    assert_eq!((0, 0), svc.unresolved_counts());
}

#[test]
fn test_account_transfer_forces_commit() {
    let (svc, disp, db) = new_service(3);

    // one live vote, far from quorum
    svc.handle(sync_put("peer-a", "k", 7)).unwrap();

    let e = new_put_entry("k", 7, "peer-b");
    svc.handle(VaultMessage::AccountTransfer(AccountTransferMessage {
        from: NodeId::from("peer-b"),
        entries: vec![e.encode().unwrap()],
        all_received: true,
    }))
    .unwrap();

    assert_eq!(vec![7], db.get_versions(&name("k")).unwrap().unwrap().versions);
    assert_eq!((0, 0), svc.unresolved_counts());

    // both voters are told
    let replies = disp.replies();
    assert_eq!(2, replies.len());
}

#[test]
fn test_account_transfer_rejects_atomically() {
    let (svc, _disp, _db) = new_service(3);

    let good = new_put_entry("k", 7, "peer-b").encode().unwrap();
    let r = svc.handle(VaultMessage::AccountTransfer(AccountTransferMessage {
        from: NodeId::from("peer-b"),
        entries: vec![good, vec![0x01, 0x02]],
        all_received: false,
    }));

    assert!(r.is_err());
    // the decodable entry was not merged either
    assert_eq!((0, 0), svc.unresolved_counts());
}

#[test]
fn test_churn_handover_keeps_vote_weight() {
    let (svc, _disp, db) = new_service(2);

    svc.handle(sync_put("peer-a", "k", 7)).unwrap();

    svc.handle(VaultMessage::Churn(MembershipChange {
        replaced: vec![(NodeId::from("peer-a"), NodeId::from("peer-z"))],
    }))
    .unwrap();

    // the replacement's own vote is a duplicate of the inherited one
    svc.handle(sync_put("peer-z", "k", 7)).unwrap();
    assert_eq!(None, db.get_versions(&name("k")).unwrap());

    // a genuinely new peer completes the quorum
    svc.handle(sync_put("peer-c", "k", 7)).unwrap();
    assert_eq!(vec![7], db.get_versions(&name("k")).unwrap().unwrap().versions);
}

#[test]
fn test_get_versions_and_branch() {
    let (svc, disp, _db) = new_service(1);

    svc.handle(put_req("client", "k", 1)).unwrap();
    svc.handle(put_req("client", "k", 2)).unwrap();

    svc.handle(VaultMessage::GetVersions(GetVersionsRequest {
        requester: NodeId::from("reader"),
        name: name("k"),
    }))
    .unwrap();

    svc.handle(VaultMessage::GetBranch(GetBranchRequest {
        requester: NodeId::from("reader"),
        name: name("k"),
        branch_tip: 1,
    }))
    .unwrap();

    svc.handle(VaultMessage::GetVersions(GetVersionsRequest {
        requester: NodeId::from("reader"),
        name: name("absent"),
    }))
    .unwrap();

    let replies: Vec<_> = disp
        .replies()
        .into_iter()
        .filter(|(to, _)| *to == NodeId::from("reader"))
        .collect();

    assert_eq!(3, replies.len());
    assert!(replies[0].1.ok);
    assert_eq!("[1, 2]", replies[0].1.info);
    assert!(replies[1].1.ok);
    assert_eq!("[1]", replies[1].1.info);
    assert!(!replies[2].1.ok);
}

#[test]
fn test_do_sync_gossips_pending_entries() {
    let (svc, disp, _db) = new_service(3);

    svc.handle(put_req("client", "k", 7)).unwrap();
    svc.handle(VaultMessage::DeleteBranchUntilFork(DeleteBranchRequest {
        requester: NodeId::from("client"),
        name: name("k2"),
        branch_tip: 1,
    }))
    .unwrap();

    svc.do_sync();

    let gossips = disp.gossips();
    assert_eq!(2, gossips.len());
    assert_eq!(GossipKind::PutVersion, gossips[0].kind);
    assert_eq!(1, gossips[0].entries.len());
    assert_eq!(GossipKind::DeleteBranch, gossips[1].kind);

    // gossiped bytes decode back into the pending entry
    let e = VersionEntry::decode(&gossips[0].entries[0]).unwrap();
    assert_eq!(name("k"), *e.name());
    assert_eq!(VersionAction::PutVersion, e.action());
}

#[test]
fn test_eviction_drops_stale_requesters() {
    let (svc, disp, db) = new_service(2);

    // client-1's proposal never gathers quorum and is evicted
    svc.handle(put_req("client-1", "k", 7)).unwrap();
    for _ in 0..5 {
        svc.do_sync();
    }
    assert_eq!((0, 0), svc.unresolved_counts());
    assert_eq!(0, disp.replies().len());

    // a later round for the same key answers only its own requester
    svc.handle(put_req("client-2", "k", 7)).unwrap();
    svc.handle(sync_put("peer-a", "k", 7)).unwrap();

    assert_eq!(vec![7], db.get_versions(&name("k")).unwrap().unwrap().versions);

    let replies = disp.replies();
    assert!(replies.iter().all(|(to, _)| *to != NodeId::from("client-1")));
    assert!(replies.iter().any(|(to, _)| *to == NodeId::from("client-2")));
}

#[test]
fn test_do_sync_keeps_requesters_of_pending_keys() {
    let (svc, disp, db) = new_service(2);

    svc.handle(put_req("client", "k", 7)).unwrap();

    // rounds below the ceiling must not lose the waiting requester
    for _ in 0..4 {
        svc.do_sync();
    }
    assert_eq!((1, 0), svc.unresolved_counts());

    svc.handle(sync_put("peer-a", "k", 7)).unwrap();

    assert_eq!(vec![7], db.get_versions(&name("k")).unwrap().unwrap().versions);
    assert!(disp
        .replies()
        .iter()
        .any(|(to, _)| *to == NodeId::from("client")));
}

#[test]
fn test_do_sync_records_maintenance_round() {
    let (svc, _disp, db) = new_service(3);

    assert_eq!(None, db.last_sync_round().unwrap());

    svc.do_sync();
    svc.do_sync();
    assert_eq!(Some(2), db.last_sync_round().unwrap());
}

#[test]
fn test_do_sync_evicts_stale_entries() {
    let (svc, disp, _db) = new_service(3);

    svc.handle(put_req("client", "k", 7)).unwrap();

    // sync_counter_max is 5: rounds 1..4 still gossip, round 5 evicts
    for _ in 0..4 {
        svc.do_sync();
    }
    assert_eq!((1, 0), svc.unresolved_counts());
    assert_eq!(4, disp.gossips().len());

    svc.do_sync();
    assert_eq!((0, 0), svc.unresolved_counts());
    assert_eq!(4, disp.gossips().len());
}
