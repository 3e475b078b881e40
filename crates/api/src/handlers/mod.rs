pub mod auth;
pub mod catalog;
pub mod coupons;
pub mod deliveries;
pub mod orders;
pub mod products;
pub mod shoppers;
pub mod wholesalers;
