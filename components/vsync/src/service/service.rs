use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use storage::Base;

use super::{
    AccountTransferMessage, DeleteBranchRequest, Dispatcher, Db, GetBranchRequest,
    GetVersionsRequest, GossipKind, GossipMessage, MembershipChange, PutVersionRequest,
    ServiceError, SyncEntryMessage, VaultMessage, VaultReply,
};
use crate::entry::{DataName, NodeId, PendingEntry, VersionAction, VersionEntry};
use crate::sync::{agreed_payload, Sync, SyncConf};

/// State behind the service mutex. The two engines and the store commit
/// move together: a resolved entry is removed and applied under one
/// critical section, so a peer can never observe a resolved-but-uncommitted
/// key.
struct Inner {
    db: Db,
    sync_put: Sync<VersionEntry>,
    sync_delete: Sync<VersionEntry>,
    requesters: HashMap<(DataName, VersionAction), Vec<NodeId>>,
    round: u64,
}

/// VersionService drives the version persona of a vault: it feeds client
/// requests and peer gossip into the quorum engines, commits agreed
/// operations to the store and answers requesters through the dispatcher.
pub struct VersionService<D>
where
    D: Dispatcher,
{
    this_node_id: NodeId,
    dispatcher: D,
    inner: Mutex<Inner>,
}

impl<D> VersionService<D>
where
    D: Dispatcher,
{
    pub fn new(this_node_id: NodeId, sto: Arc<dyn Base>, conf: SyncConf, dispatcher: D) -> VersionService<D> {
        VersionService {
            this_node_id: this_node_id.clone(),
            dispatcher,
            inner: Mutex::new(Inner {
                db: Db::new(sto),
                sync_put: Sync::new(this_node_id.clone(), conf.clone()),
                sync_delete: Sync::new(this_node_id, conf),
                requesters: HashMap::new(),
                round: 0,
            }),
        }
    }

    /// handle feeds one inbound message into the service.
    /// An Err means the message itself was unusable and nothing was
    /// merged; per-key commit failures are reported to requesters
    /// instead of propagating.
    pub fn handle(&self, msg: VaultMessage) -> Result<(), ServiceError> {
        match msg {
            VaultMessage::PutVersion(req) => self.handle_put_version(req),
            VaultMessage::DeleteBranchUntilFork(req) => self.handle_delete_branch(req),
            VaultMessage::GetVersions(req) => self.handle_get_versions(req),
            VaultMessage::GetBranch(req) => self.handle_get_branch(req),
            VaultMessage::SyncPutVersion(m) => self.handle_sync_entry(m),
            VaultMessage::SyncDeleteBranch(m) => self.handle_sync_entry(m),
            VaultMessage::AccountTransfer(m) => self.handle_account_transfer(m),
            VaultMessage::Churn(m) => self.handle_churn(m),
        }
    }

    /// unresolved_counts reports the pending entry counts of the two
    /// engines, for status logging.
    pub fn unresolved_counts(&self) -> (usize, usize) {
        let inner = self.inner.lock().unwrap();
        (inner.sync_put.unresolved_count(), inner.sync_delete.unresolved_count())
    }

    /// do_sync runs one maintenance round: age out stale entries, drop the
    /// requesters of keys eviction took with it, record the round, then
    /// re-announce what is still pending. The lock is released before the
    /// gossip goes out.
    pub fn do_sync(&self) {
        let (puts, dels) = {
            let mut inner = self.inner.lock().unwrap();
            inner.sync_put.increment_sync_attempts();
            inner.sync_delete.increment_sync_attempts();

            let puts = inner.sync_put.get_unresolved_data();
            let dels = inner.sync_delete.get_unresolved_data();

            // an evicted key will never commit; nobody answers its
            // requesters, so they must not linger for a later round.
            let mut live: HashSet<(DataName, VersionAction)> =
                HashSet::with_capacity(puts.len() + dels.len());
            for e in puts.iter().chain(dels.iter()) {
                live.insert((e.name().clone(), e.action()));
            }
            inner.requesters.retain(|k, _| live.contains(k));

            inner.round += 1;
            let round = inner.round;
            if let Err(e) = inner.db.record_sync_round(round) {
                warn!("record maintenance round failed";
                      "round" => round,
                      "err" => format!("{}", e),
                );
            }

            (encode_for_gossip(&puts), encode_for_gossip(&dels))
        };

        if !puts.is_empty() {
            self.dispatcher.broadcast(GossipMessage {
                kind: GossipKind::PutVersion,
                entries: puts,
            });
        }
        if !dels.is_empty() {
            self.dispatcher.broadcast(GossipMessage {
                kind: GossipKind::DeleteBranch,
                entries: dels,
            });
        }
    }

    fn handle_put_version(&self, req: PutVersionRequest) -> Result<(), ServiceError> {
        let entry = VersionEntry::new_proposal(
            req.name.clone(),
            VersionAction::PutVersion,
            Some(req.new_version),
            self.this_node_id.clone(),
        );

        let mut inner = self.inner.lock().unwrap();
        inner
            .requesters
            .entry((req.name, VersionAction::PutVersion))
            .or_insert_with(Vec::new)
            .push(req.requester);

        if inner.sync_put.add_local_entry(entry.clone()) {
            self.commit(&mut inner, &entry);
        }
        Ok(())
    }

    fn handle_delete_branch(&self, req: DeleteBranchRequest) -> Result<(), ServiceError> {
        let entry = VersionEntry::new_proposal(
            req.name.clone(),
            VersionAction::DeleteBranchUntilFork,
            Some(req.branch_tip),
            self.this_node_id.clone(),
        );

        let mut inner = self.inner.lock().unwrap();
        inner
            .requesters
            .entry((req.name, VersionAction::DeleteBranchUntilFork))
            .or_insert_with(Vec::new)
            .push(req.requester);

        if inner.sync_delete.add_local_entry(entry.clone()) {
            self.commit(&mut inner, &entry);
        }
        Ok(())
    }

    /// Reads bypass the quorum engines entirely: they answer from the
    /// already agreed store state.
    fn handle_get_versions(&self, req: GetVersionsRequest) -> Result<(), ServiceError> {
        let key = format!("{}", req.name);

        let got = {
            let inner = self.inner.lock().unwrap();
            inner.db.get_versions(&req.name)
        };

        let reply = match got {
            Ok(Some(vl)) => VaultReply {
                key,
                ok: true,
                info: format!("{:?}", vl.versions),
            },
            Ok(None) => VaultReply {
                key,
                ok: false,
                info: "no such key".into(),
            },
            Err(e) => VaultReply {
                key,
                ok: false,
                info: format!("{}", e),
            },
        };

        self.dispatcher.reply(&req.requester, reply);
        Ok(())
    }

    fn handle_get_branch(&self, req: GetBranchRequest) -> Result<(), ServiceError> {
        let key = format!("{}", req.name);

        let got = {
            let inner = self.inner.lock().unwrap();
            inner.db.get_branch(&req.name, req.branch_tip)
        };

        let reply = match got {
            Ok(versions) => VaultReply {
                key,
                ok: true,
                info: format!("{:?}", versions),
            },
            Err(e) => VaultReply {
                key,
                ok: false,
                info: format!("{}", e),
            },
        };

        self.dispatcher.reply(&req.requester, reply);
        Ok(())
    }

    fn handle_sync_entry(&self, msg: SyncEntryMessage) -> Result<(), ServiceError> {
        let entry = VersionEntry::decode(&msg.entry)?;

        let mut inner = self.inner.lock().unwrap();
        let resolved = match entry.action() {
            VersionAction::PutVersion => inner.sync_put.add_unresolved_entry(entry.clone(), msg.voter),
            VersionAction::DeleteBranchUntilFork => {
                inner.sync_delete.add_unresolved_entry(entry.clone(), msg.voter)
            }
        };

        if resolved {
            self.commit(&mut inner, &entry);
        }
        Ok(())
    }

    fn handle_account_transfer(&self, msg: AccountTransferMessage) -> Result<(), ServiceError> {
        // decode everything up front: a snapshot with a corrupt entry is
        // rejected as a whole, nothing is merged.
        let mut entries = Vec::with_capacity(msg.entries.len());
        for b in msg.entries.iter() {
            entries.push(VersionEntry::decode(b)?);
        }

        let mut inner = self.inner.lock().unwrap();
        for e in entries {
            let resolved = match e.action() {
                VersionAction::PutVersion => inner.sync_put.add_account_transfer_record(
                    e.clone(),
                    msg.from.clone(),
                    msg.all_received,
                ),
                VersionAction::DeleteBranchUntilFork => inner.sync_delete.add_account_transfer_record(
                    e.clone(),
                    msg.from.clone(),
                    msg.all_received,
                ),
            };

            if resolved {
                self.commit(&mut inner, &e);
            }
        }
        Ok(())
    }

    fn handle_churn(&self, msg: MembershipChange) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        for (old, new) in msg.replaced.iter() {
            info!("churn: vote identity handover";
                  "old" => format!("{}", old),
                  "new" => format!("{}", new),
            );
            inner.sync_put.replace_node(old, new);
            inner.sync_delete.replace_node(old, new);
        }
        Ok(())
    }

    /// commit removes the just-resolved entry from its engine, applies the
    /// agreed operation to the store and answers everyone who is waiting:
    /// recorded requesters plus every distinct voter except this node.
    /// A store-level failure stays confined to this key and becomes a
    /// failure reply.
    fn commit(&self, inner: &mut Inner, key_of: &VersionEntry) {
        let action = key_of.action();
        let removed = match action {
            VersionAction::PutVersion => inner.sync_put.remove_entry(key_of),
            VersionAction::DeleteBranchUntilFork => inner.sync_delete.remove_entry(key_of),
        };

        let entry = match removed {
            Some(e) => e,
            None => return,
        };

        let applied = match agreed_payload(&entry) {
            None => Err(ServiceError::LackOfPayload),
            Some(p) => match action {
                VersionAction::PutVersion => inner.db.apply_put_version(entry.name(), p),
                VersionAction::DeleteBranchUntilFork => inner.db.apply_delete_branch(entry.name(), p),
            },
        };

        let (ok, info) = match applied {
            Ok(_) => (true, "applied".to_string()),
            Err(e) => {
                warn!("commit failed";
                      "key" => format!("{}", entry.name()),
                      "err" => format!("{}", e),
                );
                (false, format!("{}", e))
            }
        };

        let reply = VaultReply {
            key: format!("{}", entry.name()),
            ok,
            info,
        };

        let mut told: Vec<NodeId> = vec![];

        if let Some(reqs) = inner.requesters.remove(&(entry.name().clone(), action)) {
            for r in reqs {
                if told.contains(&r) {
                    continue;
                }
                self.dispatcher.reply(&r, reply.clone());
                told.push(r);
            }
        }

        for v in entry.votes() {
            if v.voter == self.this_node_id || told.contains(&v.voter) {
                continue;
            }
            self.dispatcher.reply(&v.voter, reply.clone());
            told.push(v.voter.clone());
        }
    }
}

/// Entries on the wire carry at most WIRE_VOTE_CAP votes; merged entries
/// may hold more in memory, so gossip sends a capped copy. The carried
/// proposal content is in the first vote, which always survives.
fn encode_for_gossip(entries: &[VersionEntry]) -> Vec<Vec<u8>> {
    let mut r = Vec::with_capacity(entries.len());
    for e in entries.iter() {
        let mut e = e.clone();
        e.votes_mut().truncate(VersionEntry::WIRE_VOTE_CAP);

        match e.encode() {
            Ok(b) => r.push(b),
            Err(err) => {
                warn!("skip gossip of unencodable entry";
                      "key" => format!("{}", e.name()),
                      "err" => format!("{}", err),
                );
            }
        }
    }
    r
}
