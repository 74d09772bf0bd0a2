//! Block staleness check.
//!
//! A node that says it has finished syncing but whose head block is old has
//! most likely lost its peers. Transport failures propagate as errors so the
//! caller can tell "can't tell" from "confirmed stale".

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::rpc::types::BlockNumberOrTag;

use crate::blockchain::{ClientError, ClientResult, ExecutionClient};

/// Default freshness threshold for the latest block.
pub const DEFAULT_STALENESS_THRESHOLD: Duration = Duration::from_secs(5 * 60);

/// Result of comparing the latest block time against the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFreshness {
    pub is_fresh: bool,
    pub block_time: SystemTime,
    /// Time elapsed since the block; zero for blocks stamped in the future.
    pub age: Duration,
}

/// Fetch the latest header and check its age against `threshold`.
pub async fn check_block_freshness<C>(client: &C, threshold: Duration) -> ClientResult<BlockFreshness>
where
    C: ExecutionClient + ?Sized,
{
    let header = client
        .header_by_number(BlockNumberOrTag::Latest)
        .await?
        .ok_or_else(|| ClientError::NotFound("latest block header".to_string()))?;

    Ok(freshness_at(header.inner.timestamp, SystemTime::now(), threshold))
}

/// Freshness of a block stamped `timestamp` (unix seconds) as seen at `now`.
pub fn freshness_at(timestamp: u64, now: SystemTime, threshold: Duration) -> BlockFreshness {
    let block_time = UNIX_EPOCH + Duration::from_secs(timestamp);
    let age = now.duration_since(block_time).unwrap_or_default();
    BlockFreshness {
        is_fresh: age <= threshold,
        block_time,
        age,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = Duration::from_secs(300);

    fn now_at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_recent_block_is_fresh() {
        let result = freshness_at(1_000, now_at(1_012), THRESHOLD);
        assert!(result.is_fresh);
        assert_eq!(result.age, Duration::from_secs(12));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(freshness_at(1_000, now_at(1_300), THRESHOLD).is_fresh);
        assert!(!freshness_at(1_000, now_at(1_301), THRESHOLD).is_fresh);
    }

    #[test]
    fn test_future_block_counts_as_fresh() {
        let result = freshness_at(2_000, now_at(1_000), THRESHOLD);
        assert!(result.is_fresh);
        assert_eq!(result.age, Duration::ZERO);
    }
}
