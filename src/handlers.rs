pub mod auth;
pub mod catalog;
pub mod company;
pub mod partners;
pub mod users;
