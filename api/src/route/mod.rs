pub mod auth;
pub mod booking;
pub mod health;
pub mod lab;
pub mod user;
pub mod utilization;
pub mod v1;
