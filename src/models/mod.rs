pub mod agent;
pub mod order;
pub mod restaurant;
pub mod user;
