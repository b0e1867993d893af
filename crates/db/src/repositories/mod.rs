pub mod booking;
pub mod customer;
pub mod organization;
pub mod service;
