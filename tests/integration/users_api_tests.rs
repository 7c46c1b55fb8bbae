//! Staff user management endpoints

#[cfg(test)]
mod tests {
    use crate::common::TestApp;
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;
    use storefront_gate::core::models::{UserRole, UserStatus};

    #[actix_web::test]
    async fn test_listing_filters_case_insensitively() {
        let app = TestApp::new().await;
        let admin = app.seed_role(UserRole::Admin);
        app.seed_role(UserRole::SuperAdmin);
        app.seed_role(UserRole::Customer);
        app.seed_role(UserRole::Customer);
        let cookie = app.cookie_for(&admin);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/api/users?role=Super_Admin")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["role"], "super-admin");

        let req = test::TestRequest::get()
            .uri("/api/users?role=CUSTOMER&status=active")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&service, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["meta"]["total"], 2);

        let req = test::TestRequest::get()
            .uri("/api/users?role=owner")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_non_staff_may_only_view_themselves() {
        let app = TestApp::new().await;
        let customer = app.seed_role(UserRole::Customer);
        let other = app.seed_role(UserRole::Customer);
        let cookie = app.cookie_for(&customer);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", customer.id))
            .cookie(cookie.clone())
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", other.id))
            .cookie(cookie.clone())
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get()
            .uri("/api/users")
            .cookie(cookie)
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get().uri("/api/users").to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_suspension_ends_existing_sessions() {
        let app = TestApp::new().await;
        let admin = app.seed_role(UserRole::Admin);
        let customer = app.seed_role(UserRole::Customer);
        let admin_cookie = app.cookie_for(&admin);
        let customer_cookie = app.cookie_for(&customer);
        let service = init_app!(app);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/users/{}/status", customer.id))
            .cookie(admin_cookie)
            .set_json(json!({ "status": "suspended" }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            app.state.sessions.get_user(customer.id).unwrap().status,
            UserStatus::Suspended
        );

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(customer_cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_staff_accounts_are_managed_by_super_admin_only() {
        let app = TestApp::new().await;
        let owner = app.seed_role(UserRole::SuperAdmin);
        let admin = app.seed_role(UserRole::Admin);
        let other_admin = app.seed_role(UserRole::Admin);
        let owner_cookie = app.cookie_for(&owner);
        let admin_cookie = app.cookie_for(&admin);
        let service = init_app!(app);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", other_admin.id))
            .cookie(admin_cookie.clone())
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", admin.id))
            .cookie(admin_cookie)
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", other_admin.id))
            .cookie(owner_cookie.clone())
            .to_request();
        assert_eq!(test::call_service(&service, req).await.status(), StatusCode::OK);
        assert!(app.state.sessions.get_user(other_admin.id).is_none());

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", owner.id))
            .cookie(owner_cookie)
            .to_request();
        assert_eq!(
            test::call_service(&service, req).await.status(),
            StatusCode::FORBIDDEN
        );
    }
}
