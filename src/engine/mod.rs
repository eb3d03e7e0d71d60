pub mod acceptance;
pub mod reservation;
