// stakeledger - native-asset staking ledger
//
// Participants deposit a native asset, withdraw up to their balance, and the
// ledger keeps the total and the number of active depositors in step.

pub mod config;
pub mod identity;
pub mod ledger;
pub mod pool;
pub mod storage;
pub mod transfer;
