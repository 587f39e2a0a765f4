use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};
use marketplace::{models::User, routes::RegistrationResponse, schema::users};

use crate::helpers::{error_body, TestApp};

fn valid_registration() -> serde_json::Value {
    serde_json::json!({
        "email": "ana@example.com",
        "phone": "+1 650-253-0000",
        "name": "Ana Pérez",
        "password": "correct horse battery"
    })
}

#[actix_web::test]
async fn post_registration_with_valid_data(){
    let app = TestApp::spawn_app().await;

    let response = app.post_register(&valid_registration()).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: RegistrationResponse = response.json().await.unwrap();
    assert_eq!(body.user.email, "ana@example.com");
    assert_eq!(body.user.phone, "+16502530000");
    assert!(body.user.can_buy);
    assert!(body.user.can_sell);
    assert!(body.message.contains("Ana Pérez"));
}

#[actix_web::test]
async fn post_registration_stores_hashed_password(){
    let app = TestApp::spawn_app().await;

    let response = app.post_register(&valid_registration()).await;
    assert_eq!(response.status().as_u16(), 200);

    let mut conn = app.pool.get().unwrap();
    let user: User = users::table
        .filter(users::email.eq("ana@example.com"))
        .select(User::as_select())
        .first(&mut conn)
        .unwrap();

    assert_ne!(user.password_hash, "correct horse battery");
    assert!(user.password_hash.starts_with("$argon2"));
}

#[actix_web::test]
async fn post_registration_with_missing_fields_fails(){
    let app = TestApp::spawn_app().await;

    for field in ["email", "phone", "name", "password"] {
        let mut body = valid_registration();
        body.as_object_mut().unwrap().remove(field);

        let response = app.post_register(&body).await;
        assert_eq!(response.status().as_u16(), 400, "missing {} should be rejected", field);

        let error = error_body(response).await;
        assert_eq!(error["errorKind"], "InvalidRequest");
    }
}

#[actix_web::test]
async fn post_registration_with_invalid_email_or_phone_fails(){
    let app = TestApp::spawn_app().await;

    let mut body = valid_registration();
    body["email"] = serde_json::json!("not-an-email");
    assert_eq!(app.post_register(&body).await.status().as_u16(), 400);

    let mut body = valid_registration();
    body["phone"] = serde_json::json!("call me");
    assert_eq!(app.post_register(&body).await.status().as_u16(), 400);
}

#[actix_web::test]
async fn post_registration_with_taken_email_conflicts(){
    let app = TestApp::spawn_app().await;

    assert_eq!(app.post_register(&valid_registration()).await.status().as_u16(), 200);

    let mut again = valid_registration();
    again["email"] = serde_json::json!("ANA@example.com");
    let response = app.post_register(&again).await;

    assert_eq!(response.status().as_u16(), 409);
    assert_eq!(error_body(response).await["errorKind"], "Conflict");
}
