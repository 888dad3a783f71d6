pub mod product;
pub mod storage;

pub use product::{MalformedRecord, Product, StoredProduct};
