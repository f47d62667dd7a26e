use hush_store::{CreditStore, LedgerStore, MetaStore, VoterStore, VotingStore, WriteBatch};
use hush_store_lmdb::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use hush_types::{VoterAddress, VotingId};

fn test_voter(n: u8) -> VoterAddress {
    VoterAddress::from_bytes([n; 20])
}

fn open(dir: &tempfile::TempDir) -> LmdbEnvironment {
    LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap()
}

#[test]
fn batch_is_visible_after_commit() {
    let dir = tempfile::tempdir().unwrap();
    let env = open(&dir);

    let mut batch = WriteBatch::new();
    batch.put_voting(VotingId::new(0), b"voting-0");
    batch.put_voter(VotingId::new(0), &test_voter(1), b"record");
    batch.put_credit_balance(VotingId::new(0), &test_voter(1), b"balance");
    batch.put_allocation(VotingId::new(0), &test_voter(1), b"allocation");
    batch.put_public_key(&test_voter(1), [7u8; 32]);
    batch.put_decryption_request(11, VotingId::new(0));
    batch.put_meta("owner", b"someone");
    env.commit(batch).unwrap();

    assert_eq!(env.get_voting(VotingId::new(0)).unwrap().unwrap(), b"voting-0");
    assert_eq!(
        env.get_voter(VotingId::new(0), &test_voter(1)).unwrap().unwrap(),
        b"record"
    );
    assert_eq!(
        env.get_credit_balance(VotingId::new(0), &test_voter(1))
            .unwrap()
            .unwrap(),
        b"balance"
    );
    assert_eq!(
        env.get_allocation(VotingId::new(0), &test_voter(1))
            .unwrap()
            .unwrap(),
        b"allocation"
    );
    assert_eq!(env.get_public_key(&test_voter(1)).unwrap(), Some([7u8; 32]));
    assert_eq!(env.get_decryption_request(11).unwrap(), Some(VotingId::new(0)));
    assert_eq!(env.get_meta("owner").unwrap().unwrap(), b"someone");
    assert_eq!(env.get_decryption_request(12).unwrap(), None);
}

#[test]
fn votings_iterate_in_id_order() {
    let dir = tempfile::tempdir().unwrap();
    let env = open(&dir);

    let mut batch = WriteBatch::new();
    for id in [300u64, 2, 256, 0] {
        batch.put_voting(VotingId::new(id), &id.to_be_bytes());
    }
    env.commit(batch).unwrap();

    let ids: Vec<u64> = env
        .iter_votings()
        .unwrap()
        .into_iter()
        .map(|(id, _)| id.as_u64())
        .collect();
    assert_eq!(ids, vec![0, 2, 256, 300]);
    assert_eq!(env.voting_count().unwrap(), 4);
}

#[test]
fn voter_scan_stays_inside_one_voting() {
    let dir = tempfile::tempdir().unwrap();
    let env = open(&dir);

    let mut batch = WriteBatch::new();
    batch.put_voter(VotingId::new(1), &test_voter(1), b"a");
    batch.put_voter(VotingId::new(1), &test_voter(2), b"b");
    batch.put_voter(VotingId::new(2), &test_voter(3), b"c");
    batch.put_allocation(VotingId::new(2), &test_voter(3), b"x");
    env.commit(batch).unwrap();

    let voters = env.iter_voters(VotingId::new(1)).unwrap();
    assert_eq!(voters.len(), 2);
    assert!(voters.iter().all(|(v, _)| *v != test_voter(3)));

    assert!(env.iter_allocations(VotingId::new(1)).unwrap().is_empty());
    assert_eq!(env.iter_allocations(VotingId::new(2)).unwrap().len(), 1);
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let env = open(&dir);
        let mut batch = WriteBatch::new();
        batch.put_voting(VotingId::new(0), b"persisted");
        batch.put_meta("next_voting_id", &1u64.to_be_bytes());
        env.commit(batch).unwrap();
    }

    let env = open(&dir);
    assert_eq!(env.get_voting(VotingId::new(0)).unwrap().unwrap(), b"persisted");
    assert_eq!(
        env.get_meta("next_voting_id").unwrap().unwrap(),
        1u64.to_be_bytes().to_vec()
    );
}

#[test]
fn later_put_in_same_batch_wins() {
    let dir = tempfile::tempdir().unwrap();
    let env = open(&dir);

    let mut batch = WriteBatch::new();
    batch.put_voting(VotingId::new(0), b"first");
    batch.put_voting(VotingId::new(0), b"second");
    env.commit(batch).unwrap();

    assert_eq!(env.get_voting(VotingId::new(0)).unwrap().unwrap(), b"second");
}
