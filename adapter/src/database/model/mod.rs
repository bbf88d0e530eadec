pub mod booking;
pub mod lab;
pub mod user;
pub mod utilization;
