use crate::common::{TestApp, routes};

#[tokio::test]
async fn root_greets() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::ROOT).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["message"], "Hello World");
}

#[tokio::test]
async fn openapi_document_lists_product_routes() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    assert!(res.body["paths"]["/products"]["post"].is_object());
    assert!(res.body["paths"]["/products/{id}"]["get"].is_object());
    assert!(res.body["paths"]["/user/profile"]["put"].is_object());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = TestApp::spawn().await;

    let res = app.get("/does-not-exist").await;

    assert_eq!(res.status, 404);
}
