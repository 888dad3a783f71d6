use common::Product;
use serde_json::Map;
use tracing::info;

use crate::store::{RecordStore, StoreError};

/// Sample listings offered on a fresh install: `(id, title, price, description, category, image, contact)`.
const SAMPLE_PRODUCTS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    (
        "1",
        "EGN lab kit",
        "free",
        "My lab project kit which i used last semester. still like new. giving it away",
        "project kit",
        "https://i.redd.it/x46dlbbrwn081.jpg",
        "email:abdukarimkhusenov@usf.edu",
    ),
    (
        "2",
        "Grokking algorithm book",
        "$7.0",
        "Printed version of Grokking Algorithm book. Paper quality is good, you can read the content.",
        "books",
        "https://artemdemo.com/static/bd61bf0968541db117178677c6ea29af/dbdff/grokking-algorithms.jpg",
        "instagram:ChazSeitz",
    ),
];

/// Insert the sample listings when the store holds no listings at all.
///
/// Returns how many were inserted. Ids that already exist are left alone.
pub async fn seed_sample_products(store: &dyn RecordStore) -> Result<usize, StoreError> {
    if !store.list_all().await?.is_empty() {
        return Ok(0);
    }

    let mut inserted = 0;
    for &(id, title, price, description, category, image, contact) in SAMPLE_PRODUCTS {
        let product = Product {
            title: title.into(),
            price: price.into(),
            description: description.into(),
            category: category.into(),
            image: image.into(),
            contact: contact.into(),
            created_at: None,
            extra: Map::new(),
        };
        match store.put(id, &product.to_blob()).await {
            Ok(()) => inserted += 1,
            Err(StoreError::DuplicateKey(_)) => {}
            Err(e) => return Err(e),
        }
    }

    info!("Seeded {} sample products", inserted);
    Ok(inserted)
}
