pub mod leg_log;
pub mod leg_snapshot;
pub mod statistics_report;
