//! Registration, login and logout over HTTP

#[cfg(test)]
mod tests {
    use crate::common::{TEST_PASSWORD, TestApp, UserFactory, response_cookie};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;
    use storefront_gate::core::models::{UserRole, UserStatus};

    #[actix_web::test]
    async fn test_register_creates_signed_in_customer() {
        let app = TestApp::new().await;
        let service = init_app!(app);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": TEST_PASSWORD,
            }))
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let cookie = response_cookie(&resp, "storefront-session").expect("session cookie");
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user"]["role"], "customer");
        assert_eq!(body["data"]["redirect"], "/account/dashboard");

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["email"], "ada@example.com");
    }

    #[actix_web::test]
    async fn test_register_rejects_duplicate_email_and_short_password() {
        let app = TestApp::new().await;
        let existing = app.seed_role(UserRole::Artist);
        let service = init_app!(app);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Copycat",
                "email": existing.email.to_uppercase(),
                "password": TEST_PASSWORD,
            }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Shorty",
                "email": "shorty@example.com",
                "password": "short",
            }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_login_honors_permitted_return_path_only() {
        let app = TestApp::new().await;
        let customer = app.seed(UserFactory::with_password(UserRole::Customer));
        let service = init_app!(app);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({
                "email": customer.email,
                "password": TEST_PASSWORD,
                "redirect": "/account/orders",
            }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["redirect"], "/account/orders");
        assert!(body["data"]["user"]["lastLogin"].is_string());

        // A customer may not go to the admin dashboard, nor off-site
        for redirect in ["/dashboard", "//evil.example.com"] {
            let req = test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({
                    "email": customer.email,
                    "password": TEST_PASSWORD,
                    "redirect": redirect,
                }))
                .to_request();
            let resp = test::call_service(&service, req).await;
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["data"]["redirect"], "/account/dashboard");
        }
    }

    #[actix_web::test]
    async fn test_login_failures() {
        let app = TestApp::new().await;
        let customer = app.seed(UserFactory::with_password(UserRole::Customer));
        let mut suspended = UserFactory::with_password(UserRole::Artist);
        suspended.status = UserStatus::Suspended;
        let suspended = app.seed(suspended);
        let service = init_app!(app);

        let cases = [
            (customer.email.as_str(), "wrong-password", StatusCode::UNAUTHORIZED),
            ("nobody@example.com", TEST_PASSWORD, StatusCode::UNAUTHORIZED),
            (suspended.email.as_str(), TEST_PASSWORD, StatusCode::FORBIDDEN),
        ];
        for (email, password, expected) in cases {
            let req = test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": email, "password": password }))
                .to_request();
            let resp = test::call_service(&service, req).await;
            assert_eq!(resp.status(), expected, "{}", email);
            assert!(response_cookie(&resp, "storefront-session").is_none());
        }
    }

    #[actix_web::test]
    async fn test_logout_clears_session_cookie() {
        let app = TestApp::new().await;
        let service = init_app!(app);

        let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
        let resp = test::call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let cleared = response_cookie(&resp, "storefront-session").expect("removal cookie");
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }

    #[actix_web::test]
    async fn test_me_requires_session() {
        let app = TestApp::new().await;
        let service = init_app!(app);

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let resp = test::call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "AUTH_ERROR");
    }
}
