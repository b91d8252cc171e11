use rand::Rng;

use crate::entry::{AccountAction, AccountEntry, DataName, NodeId, PendingEntry, VersionAction, VersionEntry};

/// round-trip a prost message and assert equality.
#[allow(unused_macros)]
macro_rules! test_enc_dec {
    // $msg is a prost Message.
    ($msg:ident, $typ:ty) => {
        let size = $msg.encoded_len();
        assert!(size > 0);

        let mut byts = vec![];
        $msg.encode(&mut byts).unwrap();
        let msg2 = <$typ>::decode(byts.as_slice()).unwrap();
        assert_eq!($msg, msg2);
    };
}

/// rand_node_id makes a random 16-byte vault identity.
pub fn rand_node_id() -> NodeId {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..16).map(|_| rng.gen()).collect();
    NodeId::new(bytes)
}

/// new_put_entry builds a single-vote put-version proposal for tests.
pub fn new_put_entry(name: &str, version: i64, voter: &str) -> VersionEntry {
    VersionEntry::new_proposal(
        DataName::Version(name.as_bytes().to_vec()),
        VersionAction::PutVersion,
        Some(version),
        NodeId::from(voter),
    )
}

/// new_delete_entry builds a single-vote delete-branch proposal for tests.
pub fn new_delete_entry(name: &str, tip: i64, voter: &str) -> VersionEntry {
    VersionEntry::new_proposal(
        DataName::Version(name.as_bytes().to_vec()),
        VersionAction::DeleteBranchUntilFork,
        Some(tip),
        NodeId::from(voter),
    )
}

/// new_account_entry builds a single-vote account proposal for tests.
pub fn new_account_entry(name: &str, action: AccountAction, cost: i64, voter: &str) -> AccountEntry {
    AccountEntry::new_proposal(
        DataName::Mutable(name.as_bytes().to_vec()),
        action,
        Some(cost),
        NodeId::from(voter),
    )
}
