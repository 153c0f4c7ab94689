//! Membership query functions.

use guild_types::{Member, Name};
use rusqlite::Connection;

use crate::{DbError, Result};

/// Insert a member or update their rank.
pub fn upsert(conn: &Connection, member: &Member, joined_at: u64) -> Result<()> {
    conn.execute(
        "INSERT INTO members (account, election_rank, joined_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(account) DO UPDATE SET election_rank = excluded.election_rank",
        rusqlite::params![
            member.account.as_str(),
            i64::from(member.election_rank),
            joined_at as i64,
        ],
    )?;
    Ok(())
}

/// Remove a member.
pub fn remove(conn: &Connection, account: &Name) -> Result<()> {
    let removed = conn.execute("DELETE FROM members WHERE account = ?1", [account.as_str()])?;
    if removed == 0 {
        return Err(DbError::NotFound(format!("member '{account}'")));
    }
    Ok(())
}

/// Up to `limit` members whose account sorts after `cursor`.
pub fn page_after(conn: &Connection, cursor: &Name, limit: usize) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare(
        "SELECT account, election_rank FROM members
         WHERE account > ?1 ORDER BY account ASC LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(
            rusqlite::params![cursor.as_str(), i64::try_from(limit).unwrap_or(i64::MAX)],
            |row| {
                Ok(Member {
                    account: Name::new(row.get::<_, String>(0)?),
                    election_rank: row.get::<_, i64>(1)? as u8,
                })
            },
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Member count per rank, indexed by rank, at least `levels + 1` long.
pub fn rank_histogram(conn: &Connection, levels: usize) -> Result<Vec<u16>> {
    let mut stmt = conn.prepare(
        "SELECT election_rank, COUNT(*) FROM members GROUP BY election_rank ORDER BY election_rank",
    )?;

    let counts = stmt
        .query_map([], |row| {
            Ok((row.get::<_, i64>(0)? as usize, row.get::<_, i64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let top = counts.last().map_or(0, |(rank, _)| *rank);
    let mut ranks = vec![0u16; levels.max(top) + 1];
    for (rank, count) in counts {
        ranks[rank] = u16::try_from(count).map_err(|_| {
            DbError::Constraint(format!("{count} members at rank {rank} exceed the histogram"))
        })?;
    }
    Ok(ranks)
}
