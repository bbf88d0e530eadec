pub mod auth;
pub mod booking;
pub mod id;
pub mod lab;
pub mod role;
pub mod user;
pub mod utilization;
