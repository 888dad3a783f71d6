pub mod auth;
pub mod product;
pub mod profile;
pub mod shared;
