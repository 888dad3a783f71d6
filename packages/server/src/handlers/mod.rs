pub mod auth;
pub mod meta;
pub mod product;
pub mod profile;
pub mod uploads;
