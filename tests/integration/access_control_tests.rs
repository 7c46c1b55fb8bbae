//! Route protection through the edge guard and the page handlers behind it

#[cfg(test)]
mod tests {
    use crate::common::{TestApp, UserFactory, assert_redirect, location, response_cookie};
    use crate::init_app;
    use actix_web::http::{StatusCode, header};
    use actix_web::test;
    use storefront_gate::core::models::UserRole;

    // ==================== Unauthenticated ====================

    #[actix_web::test]
    async fn test_protected_page_without_cookie_redirects_to_login() {
        let app = TestApp::new().await;
        let service = init_app!(app);

        let req = test::TestRequest::get().uri("/super-admin/settings").to_request();
        let resp = test::call_service(&service, req).await;

        assert_redirect(&resp, "/login?redirect=%2Fsuper-admin%2Fsettings");
    }

    #[actix_web::test]
    async fn test_every_protected_prefix_requires_login() {
        let app = TestApp::new().await;
        let service = init_app!(app);

        for path in ["/dashboard", "/dashboard/users", "/artist/dashboard", "/account/orders"] {
            let req = test::TestRequest::get().uri(path).to_request();
            let resp = test::call_service(&service, req).await;
            assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
            assert!(location(&resp).unwrap().starts_with("/login?redirect=%2F"));
        }
    }

    #[actix_web::test]
    async fn test_public_pages_are_open() {
        let app = TestApp::new().await;
        let service = init_app!(app);

        for path in ["/", "/login", "/register"] {
            let req = test::TestRequest::get().uri(path).to_request();
            let resp = test::call_service(&service, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", path);
        }
    }

    #[actix_web::test]
    async fn test_tampered_cookie_redirects_to_login() {
        let app = TestApp::new().await;
        let customer = app.seed_role(UserRole::Customer);
        let mut cookie = app.cookie_for(&customer);
        let mut value = cookie.value().to_string();
        value.push('0');
        cookie.set_value(value);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/account/orders")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_redirect(&resp, "/login?redirect=%2Faccount%2Forders");
    }

    #[actix_web::test]
    async fn test_legacy_unsigned_cookie_is_rejected_by_default() {
        let app = TestApp::new().await;
        let admin = app.seed_role(UserRole::Admin);
        let legacy = format!(r#"{{"id":"{}","role":"admin"}}"#, admin.id);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/dashboard")
            .cookie(actix_web::cookie::Cookie::new("storefront-session", legacy))
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_redirect(&resp, "/login?redirect=%2Fdashboard");
    }

    // ==================== Role checks ====================

    #[actix_web::test]
    async fn test_customer_is_sent_to_their_landing_page() {
        let app = TestApp::new().await;
        let customer = app.seed_role(UserRole::Customer);
        let cookie = app.cookie_for(&customer);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/artist")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_redirect(&resp, "/account/dashboard");

        let req = test::TestRequest::get()
            .uri("/dashboard/users")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_redirect(&resp, "/account/dashboard");
    }

    #[actix_web::test]
    async fn test_artist_can_view_account_orders() {
        let app = TestApp::new().await;
        let artist = app.seed_role(UserRole::Artist);
        let cookie = app.cookie_for(&artist);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/account/orders")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["page"], "account-orders");
        assert_eq!(body["user"]["role"], "artist");
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[actix_web::test]
    async fn test_admin_is_kept_out_of_super_admin_pages() {
        let app = TestApp::new().await;
        let admin = app.seed_role(UserRole::Admin);
        let cookie = app.cookie_for(&admin);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/super-admin/settings")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_redirect(&resp, "/dashboard");
    }

    #[actix_web::test]
    async fn test_percent_encoded_paths_are_guarded_as_decoded() {
        let app = TestApp::new().await;
        let customer = app.seed_role(UserRole::Customer);
        let cookie = app.cookie_for(&customer);
        let service = init_app!(app);

        for path in ["/%64ashboard", "/%64ashboard/users", "/%61rtist/dashboard"] {
            let req = test::TestRequest::get()
                .uri(path)
                .cookie(cookie.clone())
                .to_request();
            let resp = test::call_service(&service, req).await;
            assert_redirect(&resp, "/account/dashboard");
        }

        let req = test::TestRequest::get().uri("/%64ashboard").to_request();
        let resp = test::call_service(&service, req).await;
        assert_redirect(&resp, "/login?redirect=%2Fdashboard");
    }

    #[actix_web::test]
    async fn test_percent_encoded_path_still_reaches_permitted_page() {
        let app = TestApp::new().await;
        let admin = app.seed_role(UserRole::Admin);
        let cookie = app.cookie_for(&admin);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/%64ashboard/users")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["page"], "admin-users");
    }

    #[actix_web::test]
    async fn test_every_landing_page_admits_its_role() {
        let app = TestApp::new().await;
        let users: Vec<_> = UserRole::ALL.iter().map(|role| app.seed_role(*role)).collect();
        let cookies: Vec<_> = users.iter().map(|user| app.cookie_for(user)).collect();
        let service = init_app!(app);

        for (user, cookie) in users.iter().zip(cookies) {
            let req = test::TestRequest::get()
                .uri(user.role.landing_page())
                .cookie(cookie)
                .to_request();
            let resp = test::call_service(&service, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "landing page for {}", user.role);
        }
    }

    // ==================== Client guard behind the edge ====================

    #[actix_web::test]
    async fn test_pages_wait_for_hydration() {
        let app = TestApp::loading();
        let customer = UserFactory::create(UserRole::Customer);
        let cookie = app.cookie_for(&customer);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/account/dashboard")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(resp.headers().contains_key(header::RETRY_AFTER));
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["loading"], true);
        assert!(body.get("user").is_none());
    }

    #[actix_web::test]
    async fn test_deleted_user_with_valid_cookie_is_sent_to_login() {
        let app = TestApp::new().await;
        let admin = app.seed_role(UserRole::Admin);
        let cookie = app.cookie_for(&admin);
        app.state.sessions.delete_user(admin.id).unwrap();
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_redirect(&resp, "/login?redirect=%2Fdashboard");
        let notice = response_cookie(&resp, "storefront-notice").expect("notice cookie");
        assert_eq!(notice.value(), "sign_in_required");
    }

    #[actix_web::test]
    async fn test_suspended_user_is_sent_to_login_with_notice() {
        let app = TestApp::new().await;
        let customer = app.seed(UserFactory::suspended(UserRole::Customer));
        let cookie = app.cookie_for(&customer);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/account/dashboard")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_redirect(&resp, "/login?redirect=%2Faccount%2Fdashboard");
        let notice = response_cookie(&resp, "storefront-notice").expect("notice cookie");
        assert_eq!(notice.value(), "account_inactive");
    }

    #[actix_web::test]
    async fn test_login_page_shows_and_clears_notice() {
        let app = TestApp::new().await;
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/login?redirect=%2Fdashboard")
            .cookie(actix_web::cookie::Cookie::new("storefront-notice", "sign_in_required"))
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let cleared = response_cookie(&resp, "storefront-notice").expect("removal cookie");
        assert_eq!(cleared.value(), "");
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["redirect"], "/dashboard");
        assert_eq!(body["data"]["notice"]["kind"], "sign_in_required");
    }

    #[actix_web::test]
    async fn test_login_page_sends_signed_in_user_home() {
        let app = TestApp::new().await;
        let artist = app.seed_role(UserRole::Artist);
        let cookie = app.cookie_for(&artist);
        let service = init_app!(app);

        let req = test::TestRequest::get().uri("/login").cookie(cookie).to_request();
        let resp = test::call_service(&service, req).await;

        assert_redirect(&resp, "/artist/dashboard");
    }
}
