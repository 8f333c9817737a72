pub mod activity_log;
pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod scan;
pub mod schedule;
