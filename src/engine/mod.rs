pub mod classify;
pub mod cooldown;
pub mod day;
pub mod decision;
pub mod night;
pub mod scan;
