//! Integration test: period scheduling and payout over the SQLite host.
//!
//! Exercises the full period lifecycle:
//! 1. Seed the queue on an empty system and sweep the master pool
//! 2. Split a period across ranks and pay every member
//! 3. Prorate a period cut short by an election
//! 4. Park a period while an election runs and release it afterwards
//! 5. Tear everything down

use guild_db::queries::{accounts, distributions, members, pools, settings};
use guild_distribution::{
    clear_all, distribute_monthly, distribution_queue, process_election_distribution,
    setup_distribution,
};
use guild_types::{
    AccountScope, BlockTimestamp, CurrentDistribution, DistributionRecord, ElectionDistribution,
    Member, Name, Pool,
};
use rusqlite::Connection;

/// Base timestamp for test scenarios.
const BASE_UNIX: u64 = 1_700_000_000;

fn t0() -> BlockTimestamp {
    BlockTimestamp::from_unix_secs(BASE_UNIX)
}

fn contract() -> Name {
    Name::from("guild.treasury")
}

/// Helper: members at the given ranks, funds in the master pool and an
/// election scheduled at `election`.
fn community(
    ranks: &[(&str, u8)],
    funds: u64,
    election: Option<BlockTimestamp>,
) -> Connection {
    let conn = guild_db::open_memory().expect("open DB");
    for &(account, rank) in ranks {
        members::upsert(&conn, &Member::new(account, rank), BASE_UNIX).expect("member");
    }
    accounts::add(&conn, AccountScope::Owned, &Name::from("master"), funds).expect("fund");
    set_election(&conn, election);
    conn
}

fn set_election(conn: &Connection, election: Option<BlockTimestamp>) {
    match election {
        Some(t) => settings::set(conn, settings::NEXT_ELECTION_TIME, &t.slot.to_string()),
        None => settings::remove(conn, settings::NEXT_ELECTION_TIME),
    }
    .expect("election schedule");
}

fn pooled(conn: &Connection, time: BlockTimestamp) -> Option<u64> {
    accounts::balance(conn, AccountScope::distribution(time, 0), &contract()).expect("balance")
}

fn master(conn: &Connection) -> Option<u64> {
    accounts::balance(conn, AccountScope::Owned, &Name::from("master")).expect("balance")
}

#[test]
fn empty_system_seeds_and_sweeps_master_pool() {
    let mut conn = community(
        &[("alice", 2), ("bob", 1), ("carol", 1)],
        1_000_000,
        Some(t0().plus_days(90)),
    );

    let progressed = guild_db::transact(&mut conn, &contract(), t0(), |host| {
        setup_distribution(host, t0())
    })
    .expect("setup");
    assert!(progressed);

    assert_eq!(pools::list(&conn).expect("pools"), vec![Pool::master()]);
    assert_eq!(
        distributions::list(&conn).expect("queue"),
        vec![
            DistributionRecord::Current(CurrentDistribution::new(t0(), vec![8_333, 25_001])),
            DistributionRecord::next(t0().plus_days(30)),
        ]
    );
    assert_eq!(master(&conn), Some(950_000));
    assert_eq!(pooled(&conn, t0()), Some(50_000));

    // Nothing else is due at the same time.
    let again = guild_db::transact(&mut conn, &contract(), t0(), |host| {
        setup_distribution(host, BlockTimestamp::default())
    })
    .expect("setup");
    assert!(!again);
}

#[test]
fn three_members_split_three_hundred() {
    // 6_000 in the pool, 5% = 300 swept.
    let mut conn = community(
        &[("alice", 2), ("bob", 1), ("carol", 1)],
        6_000,
        Some(t0().plus_days(90)),
    );
    guild_db::transact(&mut conn, &contract(), t0(), |host| setup_distribution(host, t0()))
        .expect("setup");

    let queue = distributions::list(&conn).expect("queue");
    assert_eq!(
        queue[0],
        DistributionRecord::Current(CurrentDistribution::new(t0(), vec![50, 150]))
    );
    let stored = serde_json::to_value(&queue[0]).expect("json");
    assert_eq!(stored["kind"], "current");
    assert_eq!(stored["rank_distribution"], serde_json::json!([50, 150]));

    let remaining = guild_db::transact(&mut conn, &contract(), t0(), |host| {
        distribute_monthly(host, 100)
    })
    .expect("payout");
    // 3 members + closing the period.
    assert_eq!(remaining, 96);

    let level1 = accounts::list_scope(&conn, AccountScope::distribution(t0(), 1)).expect("l1");
    let level2 = accounts::list_scope(&conn, AccountScope::distribution(t0(), 2)).expect("l2");
    assert_eq!(
        level1,
        vec![
            (Name::from("alice"), 50),
            (Name::from("bob"), 50),
            (Name::from("carol"), 50),
        ]
    );
    assert_eq!(level2, vec![(Name::from("alice"), 150)]);
    assert_eq!(pooled(&conn, t0()), None);
    assert_eq!(
        distributions::list(&conn).expect("queue"),
        vec![DistributionRecord::next(t0().plus_days(30))]
    );
}

#[test]
fn election_inside_period_sweeps_half() {
    let election = t0().plus_days(45);
    let mut conn = community(
        &[("alice", 2), ("bob", 1), ("carol", 1)],
        1_000_000,
        Some(election),
    );

    let now = t0().plus_days(44);
    guild_db::transact(&mut conn, &contract(), now, |host| setup_distribution(host, t0()))
        .expect("setup");

    let second = t0().plus_days(30);
    // Full month: 5% of 1_000_000. Second period: 15 of 30 days of 5% of 950_000.
    assert_eq!(pooled(&conn, t0()), Some(50_000));
    assert_eq!(pooled(&conn, second), Some(23_750));
    assert_eq!(23_750 * 2, 950_000 * 5 / 100);
    assert_eq!(master(&conn), Some(926_250));

    let times: Vec<_> = distributions::list(&conn)
        .expect("queue")
        .iter()
        .map(DistributionRecord::distribution_time)
        .collect();
    assert_eq!(times, vec![t0(), second, election]);
}

#[test]
fn running_election_parks_period_until_results() {
    let election = t0().plus_days(45);
    let mut conn = community(
        &[("alice", 2), ("bob", 1), ("carol", 1)],
        1_000_000,
        Some(election),
    );
    guild_db::transact(&mut conn, &contract(), t0().plus_days(44), |host| {
        setup_distribution(host, t0())
    })
    .expect("setup");

    // Election starts; the oracle has no next election while it runs.
    set_election(&conn, None);
    let now = election.plus_days(1);
    guild_db::transact(&mut conn, &contract(), now, |host| {
        setup_distribution(host, BlockTimestamp::default())
    })
    .expect("setup");

    // 5% of 926_250.
    let parked = DistributionRecord::Election(ElectionDistribution {
        distribution_time: election,
        amount: 46_312,
    });
    let queue = distributions::list(&conn).expect("queue");
    assert_eq!(queue[2], parked);
    assert_eq!(queue[3], DistributionRecord::next(election.plus_days(30)));

    // Pay out the two earlier periods; the walk stops at the parked one.
    let remaining = guild_db::transact(&mut conn, &contract(), now, |host| {
        distribute_monthly(host, 100)
    })
    .expect("payout");
    assert_eq!(remaining, 100 - 8);
    let queue = guild_db::transact(&mut conn, &contract(), now, |host| distribution_queue(&*host))
        .expect("queue");
    assert_eq!(queue[0], parked);

    // Results are in: dave joins at rank 1, carol is promoted.
    members::upsert(&conn, &Member::new("dave", 1), BASE_UNIX).expect("member");
    members::upsert(&conn, &Member::new("carol", 2), BASE_UNIX).expect("member");
    set_election(&conn, Some(election.plus_days(180)));

    let converted = guild_db::transact(&mut conn, &contract(), now, |host| {
        process_election_distribution(host)
    })
    .expect("release");
    assert_eq!(converted, 1);

    // 46_312 over 2 levels: level 2 has 2 members, level 1 has 4.
    let expected = CurrentDistribution::new(election, vec![5_789, 11_578]);
    assert_eq!(
        distributions::list(&conn).expect("queue")[0],
        DistributionRecord::Current(expected)
    );

    let remaining = guild_db::transact(&mut conn, &contract(), now, |host| {
        distribute_monthly(host, 100)
    })
    .expect("payout");
    assert_eq!(remaining, 100 - 5);
    assert_eq!(pooled(&conn, election), None);
}

#[test]
fn clear_all_wipes_distribution_state() {
    let mut conn = community(
        &[("alice", 2), ("bob", 1)],
        1_000_000,
        Some(t0().plus_days(90)),
    );
    guild_db::transact(&mut conn, &contract(), t0(), |host| {
        setup_distribution(host, t0())?;
        distribute_monthly(host, 100)
    })
    .expect("cycle");
    assert!(!accounts::points(&conn, 10).expect("points").is_empty());

    guild_db::transact(&mut conn, &contract(), t0(), |host| clear_all(host)).expect("clear");

    assert!(accounts::points(&conn, 10).expect("points").is_empty());
    for rank in 0..=2 {
        assert!(accounts::scope_is_empty(&conn, AccountScope::distribution(t0(), rank))
            .expect("empty"));
    }
    assert!(pools::list(&conn).expect("pools").is_empty());
    assert!(distributions::list(&conn).expect("queue").is_empty());
    assert_eq!(master(&conn), Some(950_000));
}
