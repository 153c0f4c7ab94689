//! Metered driver.
//!
//! [`distribute_monthly`] spends a step budget on advancing the period queue
//! and then on paying out the oldest active period. The budget is returned
//! so the caller can meter other work with what is left.

use guild_types::{BlockTimestamp, DistributionRecord};

use crate::host::Host;
use crate::payout::{distribute_to_members, return_undistributed};
use crate::proration::make_distribution;
use crate::scheduler::setup_distribution;
use crate::Result;

/// Advance the queue and pay out due periods, using at most `max_steps`.
///
/// Processing a batch of due periods costs one step, each paid member one
/// step, and closing a finished period one step. Closing returns any
/// undistributed remainder to the master pool. Returns the unused budget.
pub fn distribute_monthly<H: Host + ?Sized>(host: &mut H, mut max_steps: u32) -> Result<u32> {
    if max_steps > 0 && setup_distribution(host, BlockTimestamp::default())? {
        max_steps -= 1;
    }

    for record in host.records()? {
        if max_steps == 0 {
            break;
        }
        match record {
            DistributionRecord::Current(current) => {
                let mut copy = current;
                max_steps = distribute_to_members(host, max_steps, &mut copy)?;
                if max_steps > 0 {
                    return_undistributed(host, copy.distribution_time)?;
                    host.erase_record(copy.distribution_time)?;
                    tracing::info!(
                        distribution_time = %copy.distribution_time,
                        "distribution period paid out"
                    );
                    max_steps -= 1;
                } else {
                    tracing::debug!(
                        distribution_time = %copy.distribution_time,
                        cursor = %copy.last_processed,
                        "checkpointed payout walk"
                    );
                    host.put_record(&DistributionRecord::Current(copy))?;
                    return Ok(max_steps);
                }
            }
            // Nothing due yet, or the split waits for the running election.
            DistributionRecord::Next(_) | DistributionRecord::Election(_) => {
                return Ok(max_steps);
            }
        }
    }
    Ok(max_steps)
}

/// Split every period parked by an election, now that ranks are known.
///
/// Scans up to the next-distribution marker. Returns how many periods were
/// converted; periods stay parked while nobody holds a rank.
pub fn process_election_distribution<H: Host + ?Sized>(host: &mut H) -> Result<u32> {
    let mut converted = 0;
    for record in host.records()? {
        match record {
            DistributionRecord::Election(election) => {
                let Some(current) =
                    make_distribution(host, election.distribution_time, election.amount)?
                else {
                    continue;
                };
                tracing::info!(
                    distribution_time = %election.distribution_time,
                    amount = election.amount,
                    "election distribution released"
                );
                host.put_record(&DistributionRecord::Current(current))?;
                converted += 1;
            }
            DistributionRecord::Next(_) => break,
            DistributionRecord::Current(_) => {}
        }
    }
    Ok(converted)
}

/// The distribution queue, oldest first.
pub fn distribution_queue<H: Host + ?Sized>(host: &H) -> Result<Vec<DistributionRecord>> {
    host.records()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DistributionTables, Ledger};
    use crate::memory::MemoryHost;
    use crate::DistributionError;
    use guild_types::{AccountScope, CurrentDistribution, ElectionDistribution, Name};

    const T0: BlockTimestamp = BlockTimestamp::from_slot(2_000_000);

    fn community() -> MemoryHost {
        let mut host = MemoryHost::new("guild");
        host.set_now(T0);
        host.set_next_election(Some(T0.plus_days(180)));
        host.set_rank_levels(2);
        host.add_member("alice", 2);
        host.add_member("bob", 1);
        host.add_member("carol", 1);
        host.fund_pool("master", 6_000).expect("fund");
        setup_distribution(&mut host, T0).expect("seed");
        host
    }

    #[test]
    fn test_zero_budget_does_nothing() {
        let mut host = community();
        let before = host.records().expect("records");
        assert_eq!(distribute_monthly(&mut host, 0).expect("run"), 0);
        assert_eq!(host.records().expect("records"), before);
    }

    #[test]
    fn test_full_budget_pays_and_erases() {
        let mut host = community();
        // 3 members + 1 to close the period.
        assert_eq!(distribute_monthly(&mut host, 10).expect("run"), 6);
        assert_eq!(
            host.records().expect("records"),
            vec![DistributionRecord::next(T0.plus_days(30))]
        );
        // 300 swept: alice 200, bob 50, carol 50.
        let level1 = host.accounts_in(AccountScope::distribution(T0, 1));
        let level2 = host.accounts_in(AccountScope::distribution(T0, 2));
        assert_eq!(level1.values().sum::<u64>(), 150);
        assert_eq!(level2.get(&Name::from("alice")), Some(&150));
    }

    #[test]
    fn test_partial_budget_checkpoints() {
        let mut host = community();
        assert_eq!(distribute_monthly(&mut host, 2).expect("run"), 0);
        let records = host.records().expect("records");
        assert_eq!(
            records[0],
            DistributionRecord::Current(CurrentDistribution {
                distribution_time: T0,
                rank_distribution: vec![50, 150],
                last_processed: Name::from("bob"),
            })
        );
    }

    #[test]
    fn test_stops_at_parked_election_period() {
        let mut host = community();
        host.put_record(&DistributionRecord::Election(ElectionDistribution {
            distribution_time: BlockTimestamp::from_slot(1),
            amount: 10,
        }))
        .expect("put");
        assert_eq!(distribute_monthly(&mut host, 10).expect("run"), 10);
    }

    #[test]
    fn test_process_election_distribution_converts_parked_period() {
        let mut host = MemoryHost::new("guild");
        host.set_now(T0);
        host.fund_pool("master", 6_000).expect("fund");
        setup_distribution(&mut host, T0).expect("seed");
        // Election running and nobody ranked yet.
        assert!(matches!(
            host.records().expect("records")[0],
            DistributionRecord::Election(_)
        ));
        assert_eq!(process_election_distribution(&mut host).expect("no ranks"), 0);

        host.add_member("alice", 1);
        host.add_member("bob", 1);
        assert_eq!(process_election_distribution(&mut host).expect("convert"), 1);
        assert_eq!(
            host.records().expect("records")[0],
            DistributionRecord::Current(CurrentDistribution::new(T0, vec![150]))
        );
        assert_eq!(process_election_distribution(&mut host).expect("nothing left"), 0);
    }

    #[test]
    fn test_release_converts_every_parked_period() {
        let mut host = MemoryHost::new("guild");
        host.set_now(T0.plus_days(65));
        host.fund_pool("master", 1_000_000).expect("fund");
        host.add_member("alice", 2);
        host.add_member("bob", 1);
        // Three periods come due while the election runs.
        setup_distribution(&mut host, T0).expect("seed");
        let kinds: Vec<_> = host
            .records()
            .expect("records")
            .iter()
            .map(DistributionRecord::kind)
            .collect();
        assert_eq!(kinds, vec!["election", "election", "election", "next"]);

        host.set_next_election(Some(T0.plus_days(365)));
        assert_eq!(process_election_distribution(&mut host).expect("release"), 3);

        // 3 periods of 2 members, each closed with one step.
        assert_eq!(distribute_monthly(&mut host, 100).expect("run"), 91);
        assert_eq!(
            host.records().expect("records"),
            vec![DistributionRecord::next(T0.plus_days(90))]
        );
        // Every unit swept is either paid out or back in the pool.
        let master = host
            .balance(AccountScope::Owned, &Name::from("master"))
            .expect("balance")
            .unwrap_or(0);
        assert_eq!(host.distributed_total() + master, 1_000_000);
    }

    #[test]
    fn test_failed_walk_is_rolled_back_by_transact() {
        let mut host = community();
        host.add_member("zed", 7);
        let before = host.clone();
        let err = host
            .transact(|h| distribute_monthly(h, 10))
            .expect_err("rank too high");
        assert!(matches!(err, DistributionError::Invariant(_)));
        assert_eq!(host.records().expect("records"), before.records().expect("records"));
        assert_eq!(
            host.balance(AccountScope::distribution(T0, 0), &Name::from("guild"))
                .expect("balance"),
            Some(300)
        );
    }

    #[test]
    fn test_budget_partition_does_not_change_outcome() {
        let mut whole = community();
        let mut sliced = community();
        distribute_monthly(&mut whole, 100).expect("whole");
        for _ in 0..20 {
            distribute_monthly(&mut sliced, 1).expect("slice");
        }
        for rank in 0..=2 {
            let scope = AccountScope::distribution(T0, rank);
            assert_eq!(whole.accounts_in(scope), sliced.accounts_in(scope), "rank {rank}");
        }
        assert_eq!(
            whole.records().expect("records"),
            sliced.records().expect("records")
        );
    }
}
