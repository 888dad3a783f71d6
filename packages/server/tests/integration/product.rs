use crate::common::{MAX_IMAGE_SIZE, Photo, ProductUpload, TestApp, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn created_product_can_be_read_back() {
        let app = TestApp::spawn().await;

        let id = app.create_product(ProductUpload::default()).await;
        let res = app.get(&routes::product(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id.as_str());
        assert_eq!(res.body["title"], "EGN lab kit");
        assert_eq!(res.body["price"], "free");
        assert_eq!(res.body["category"], "project kit");
        assert_eq!(res.body["contact"], "email:seller@usf.edu");
        assert_eq!(res.body["image"], "https://i.redd.it/x46dlbbrwn081.jpg");
        assert!(res.body["created_at"].is_string());
    }

    #[tokio::test]
    async fn create_responds_with_message_and_id() {
        let app = TestApp::spawn().await;

        let res = app.post_product(ProductUpload::default()).await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["message"], "Product created successfully");
        assert!(res.body["product_id"].is_string());
    }

    #[tokio::test]
    async fn uploaded_photo_is_served_under_uploads() {
        let app = TestApp::spawn().await;

        let id = app
            .create_product(ProductUpload {
                photo: Photo::File {
                    name: "Kit.PNG",
                    bytes: b"not really a png".to_vec(),
                },
                ..Default::default()
            })
            .await;

        let product = app.get(&routes::product(&id)).await;
        let image = product.body["image"].as_str().unwrap().to_string();
        assert_eq!(image, format!("{id}.png"));

        let res = app.get(&routes::upload(&image)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.header("content-type"), Some("image/png"));
        assert_eq!(res.header("x-content-type-options"), Some("nosniff"));
        assert_eq!(res.header("content-security-policy"), Some("sandbox"));
        assert_eq!(res.text, "not really a png");
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductUpload {
                photo: Photo::File {
                    name: "notes.txt",
                    bytes: b"hello".to_vec(),
                },
                ..Default::default()
            })
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn svg_upload_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductUpload {
                photo: Photo::File {
                    name: "kit.svg",
                    bytes: br#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#
                        .to_vec(),
                },
                ..Default::default()
            })
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(app.get(routes::PRODUCTS).await.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductUpload {
                photo: Photo::File {
                    name: "big.jpg",
                    bytes: vec![0u8; MAX_IMAGE_SIZE as usize + 1],
                },
                ..Default::default()
            })
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn photo_text_must_be_a_url() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductUpload {
                photo: Photo::Url("../../etc/passwd"),
                ..Default::default()
            })
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_photo_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductUpload {
                photo: Photo::Missing,
                ..Default::default()
            })
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn empty_file_input_counts_as_missing_photo() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductUpload {
                photo: Photo::File {
                    name: "",
                    bytes: Vec::new(),
                },
                ..Default::default()
            })
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Missing 'photo' field");
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_product(ProductUpload {
                title: "   ",
                ..Default::default()
            })
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::product("missing")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn legacy_email_record_reads_with_derived_contact() {
        let app = TestApp::spawn().await;
        app.insert_raw("7", r#"{"title":"Desk","email":"a@b.com"}"#)
            .await;

        let res = app.get(&routes::product("7")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["contact"], "email:a@b.com");
        assert!(res.body.get("email").is_none());
        // Reading never rewrites storage.
        assert!(app.raw_record("7").await.contains("\"email\""));
    }

    #[tokio::test]
    async fn legacy_instagram_record_reads_with_derived_contact() {
        let app = TestApp::spawn().await;
        app.insert_raw("8", r#"{"title":"Lamp","instagram":"handle"}"#)
            .await;

        let res = app.get(&routes::product("8")).await;

        assert_eq!(res.body["contact"], "instagram:handle");
    }

    #[tokio::test]
    async fn existing_contact_wins_over_legacy_keys() {
        let app = TestApp::spawn().await;
        app.insert_raw(
            "9",
            r#"{"title":"Chair","contact":"email:x@y.com","email":"should-be-ignored@y.com"}"#,
        )
        .await;

        let res = app.get(&routes::product("9")).await;

        assert_eq!(res.body["contact"], "email:x@y.com");
    }

    #[tokio::test]
    async fn unknown_keys_pass_through() {
        let app = TestApp::spawn().await;
        app.insert_raw(
            "10",
            r#"{"title":"Bike","contact":"email:x@y.com","condition":"used"}"#,
        )
        .await;

        let res = app.get(&routes::product("10")).await;

        assert_eq!(res.body["condition"], "used");
    }

    #[tokio::test]
    async fn numeric_price_reads_as_text() {
        let app = TestApp::spawn().await;
        app.insert_raw("11", r#"{"title":"Desk","price":7,"contact":"email:x@y.com"}"#)
            .await;

        let res = app.get(&routes::product("11")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["price"], "7");
    }

    #[tokio::test]
    async fn malformed_record_is_distinct_from_missing() {
        let app = TestApp::spawn().await;
        app.insert_raw("bad", "{not json").await;

        let res = app.get(&routes::product("bad")).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "MALFORMED_RECORD");
    }
}

mod list_and_search {
    use super::*;

    #[tokio::test]
    async fn listing_skips_malformed_records() {
        let app = TestApp::spawn().await;
        app.create_product(ProductUpload::default()).await;
        app.insert_raw("bad", "[1, 2, 3]").await;

        let res = app.get(routes::PRODUCTS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let app = TestApp::spawn().await;
        app.insert_raw("old", r#"{"title":"Old","email":"a@b.com"}"#)
            .await;
        let first = app.create_product(ProductUpload::default()).await;
        let second = app
            .create_product(ProductUpload {
                title: "Second",
                ..Default::default()
            })
            .await;

        let res = app.get(routes::PRODUCTS).await;
        let ids: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();

        // Undated legacy rows sort last.
        assert_eq!(ids.last(), Some(&"old"));
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&first.as_str()));
        assert!(ids.contains(&second.as_str()));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_fields() {
        let app = TestApp::spawn().await;
        app.create_product(ProductUpload {
            title: "Grokking Algorithms",
            category: "books",
            ..Default::default()
        })
        .await;
        app.create_product(ProductUpload {
            title: "Soldering iron",
            description: "Works great for EGN kits",
            category: "tools",
            ..Default::default()
        })
        .await;

        let by_title = app.get(&routes::search("GROKKING")).await;
        assert_eq!(by_title.body.as_array().unwrap().len(), 1);

        let by_category = app.get(&routes::search("Tools")).await;
        assert_eq!(by_category.body.as_array().unwrap().len(), 1);
        assert_eq!(by_category.body[0]["title"], "Soldering iron");

        let by_description = app.get(&routes::search("egn")).await;
        assert_eq!(by_description.body.as_array().unwrap().len(), 1);

        let none = app.get(&routes::search("piano")).await;
        assert_eq!(none.status, 200);
        assert!(none.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_query_returns_everything() {
        let app = TestApp::spawn().await;
        app.create_product(ProductUpload::default()).await;
        app.create_product(ProductUpload::default()).await;

        let res = app.get(routes::SEARCH).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_matches_legacy_rows() {
        let app = TestApp::spawn().await;
        app.insert_raw("42", r#"{"title":"Desk lamp","email":"a@b.com"}"#)
            .await;

        let res = app.get(&routes::search("lamp")).await;

        let results = res.body.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["contact"], "email:a@b.com");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn deleted_product_is_gone() {
        let app = TestApp::spawn().await;
        let id = app.create_product(ProductUpload::default()).await;

        let res = app.delete(&routes::product(&id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Product deleted successfully");

        let res = app.get(&routes::product(&id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn deleting_unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::product("missing")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_removes_uploaded_image() {
        let app = TestApp::spawn().await;
        let id = app
            .create_product(ProductUpload {
                photo: Photo::File {
                    name: "kit.jpg",
                    bytes: b"jpeg bytes".to_vec(),
                },
                ..Default::default()
            })
            .await;
        let image = format!("{id}.jpg");
        assert!(app.uploads.path().join(&image).exists());

        app.delete(&routes::product(&id)).await;

        assert!(!app.uploads.path().join(&image).exists());
        let res = app.get(&routes::upload(&image)).await;
        assert_eq!(res.status, 404);
    }
}

mod uploads {
    use super::*;

    #[tokio::test]
    async fn missing_upload_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::upload("nothing.png")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn hidden_names_are_refused() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::upload(".tmp")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
