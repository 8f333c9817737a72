pub mod activity_log;
pub mod attendance;
pub mod employee;
pub mod role;
pub mod schedule;
pub mod shift;
