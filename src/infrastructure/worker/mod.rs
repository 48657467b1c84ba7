//! Worker Layer - Background Task Processing
//!
//! 实现 IdleSweeper，回收长时间不活动的听众

mod idle_sweeper;

pub use idle_sweeper::{IdleSweeper, IdleSweeperConfig};
