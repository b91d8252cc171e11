use crate::entry::{NodeId, PendingEntry, Vote};

/// SyncConf carries the policy-external inputs of the quorum engine.
/// Both values come from cluster configuration, never from literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConf {
    /// minimal count of distinct votes agreeing on one payload.
    pub quorum: usize,
    /// maintenance rounds a pending entry survives before eviction.
    pub sync_counter_max: u32,
}

/// A pending entry plus its latched resolution state.
struct Slot<E> {
    entry: E,
    resolved: bool,
}

/// Sync ensures enough vault peers have agreed an operation is valid.
///
/// It is pure in-memory bookkeeping: no I/O, nothing blocks, and there is
/// no internal locking — the owning service serializes every mutating call
/// together with the store commit it triggers.
pub struct Sync<E>
where
    E: PendingEntry,
{
    conf: SyncConf,
    this_node_id: NodeId,
    slots: Vec<Slot<E>>,
}

impl<E> Sync<E>
where
    E: PendingEntry,
{
    pub fn new(this_node_id: NodeId, conf: SyncConf) -> Sync<E> {
        Sync {
            conf,
            this_node_id,
            slots: Vec::new(),
        }
    }

    /// add_unresolved_entry merges one peer vote for `entry`'s key.
    /// A voter already recorded for that key is ignored.
    /// Returns true exactly on the unresolved-to-resolved transition caused
    /// by this call, never for an entry that already was resolved.
    pub fn add_unresolved_entry(&mut self, entry: E, voter: NodeId) -> bool {
        let vote = carried_vote(&entry, voter);
        self.merge(entry, vec![vote], false)
    }

    /// add_local_entry merges this node's own vote for a proposal it
    /// originates itself.
    pub fn add_local_entry(&mut self, entry: E) -> bool {
        let vote = carried_vote(&entry, self.this_node_id.clone());
        self.merge(entry, vec![vote], false)
    }

    /// add_account_transfer_record merges the votes carried by a snapshot
    /// entry handed over during churn. Once `all_transfers_received` the
    /// snapshot is authoritative for the transferring peer's view and the
    /// entry resolves even below the live quorum count.
    pub fn add_account_transfer_record(
        &mut self,
        entry: E,
        voter: NodeId,
        all_transfers_received: bool,
    ) -> bool {
        let mut votes = entry.votes().to_vec();
        if votes.is_empty() {
            votes.push(Vote::of(voter, None));
        }
        self.merge(entry, votes, all_transfers_received)
    }

    /// replace_node rewrites the voter identity on every vote of `old`:
    /// a replacement peer inherits the departing member's vote weight, so
    /// churn does not silently short the quorum count.
    pub fn replace_node(&mut self, old: &NodeId, new: &NodeId) {
        for s in self.slots.iter_mut() {
            for v in s.entry.votes_mut().iter_mut() {
                if v.voter == *old {
                    v.voter = new.clone();
                }
            }
        }
    }

    /// get_unresolved_data snapshots all pending entries, for gossip to
    /// catching-up peers or diagnostics.
    pub fn get_unresolved_data(&self) -> Vec<E> {
        self.slots.iter().map(|s| s.entry.clone()).collect()
    }

    pub fn unresolved_count(&self) -> usize {
        self.slots.len()
    }

    /// increment_sync_attempts advances the staleness counter on every
    /// pending entry and evicts entries reaching the configured ceiling.
    /// This bounds memory growth from proposals that will never gather
    /// quorum. Called once per maintenance round; Sync has no timer.
    pub fn increment_sync_attempts(&mut self) {
        let max = self.conf.sync_counter_max;

        for s in self.slots.iter_mut() {
            let n = s.entry.sync_count() + 1;
            s.entry.set_sync_count(n);
        }

        self.slots.retain(|s| {
            let stale = s.entry.sync_count() >= max;
            if stale {
                debug!("evict unresolved entry"; "key" => format!("{}", s.entry.name()), "rounds" => max);
            }
            !stale
        });
    }

    /// remove_entry discards the pending entry matching `key_of`'s key,
    /// after the owning service committed its effect to the store.
    pub fn remove_entry(&mut self, key_of: &E) -> Option<E> {
        let i = self.find(key_of)?;
        Some(self.slots.remove(i).entry)
    }

    fn find(&self, key_of: &E) -> Option<usize> {
        // linear scan: close groups are small, so entry counts stay bounded.
        self.slots.iter().position(|s| s.entry.same_key(key_of))
    }

    fn merge(&mut self, entry: E, votes: Vec<Vote>, force: bool) -> bool {
        match self.find(&entry) {
            None => {
                let mut e = entry;
                // seed with exactly the incoming votes; staleness restarts.
                e.votes_mut().clear();
                for v in votes {
                    if !has_vote(&e, &v.voter) {
                        e.votes_mut().push(v);
                    }
                }
                e.set_sync_count(0);

                let resolved = force || reaches_quorum(&e, self.conf.quorum);
                self.slots.push(Slot { entry: e, resolved });
                resolved
            }
            Some(i) => {
                let s = &mut self.slots[i];
                for v in votes {
                    if has_vote(&s.entry, &v.voter) {
                        // duplicate vote: silent no-op, no recount
                        continue;
                    }
                    s.entry.votes_mut().push(v);
                }

                if s.resolved {
                    return false;
                }

                let resolved = force || reaches_quorum(&s.entry, self.conf.quorum);
                s.resolved = resolved;
                resolved
            }
        }
    }
}

fn has_vote<E: PendingEntry>(e: &E, voter: &NodeId) -> bool {
    e.votes().iter().any(|v| v.voter == *voter)
}

/// carried_vote extracts the proposal content of `entry` as a vote
/// attributed to `voter`.
fn carried_vote<E: PendingEntry>(entry: &E, voter: NodeId) -> Vote {
    let first = entry.votes().first();
    Vote {
        voter,
        sequence_id: first.and_then(|v| v.sequence_id),
        payload: first.and_then(|v| v.payload),
    }
}

/// matching_votes returns the size of the largest group of votes agreeing
/// on one payload.
pub fn matching_votes<E: PendingEntry>(e: &E) -> usize {
    let mut best = 0;
    for v in e.votes() {
        let n = e.votes().iter().filter(|x| x.payload == v.payload).count();
        if n > best {
            best = n;
        }
    }
    best
}

/// agreed_payload returns the payload of the largest agreeing vote group.
pub fn agreed_payload<E: PendingEntry>(e: &E) -> Option<i64> {
    let mut best = 0;
    let mut payload = None;
    for v in e.votes() {
        let n = e.votes().iter().filter(|x| x.payload == v.payload).count();
        if n > best {
            best = n;
            payload = v.payload;
        }
    }
    payload
}

fn reaches_quorum<E: PendingEntry>(e: &E, quorum: usize) -> bool {
    matching_votes(e) >= quorum
}
