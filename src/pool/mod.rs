// Pool module - the ledger bound to the native asset it accounts for

mod staking;

pub use staking::{PoolError, PoolStatistics, StakingPool};
