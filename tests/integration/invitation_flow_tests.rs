//! Invitation lifecycle over HTTP

#[cfg(test)]
mod tests {
    use crate::common::{TEST_PASSWORD, TestApp, UserFactory, assert_redirect, response_cookie};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;
    use storefront_gate::auth::NewInvitation;
    use storefront_gate::core::models::UserRole;

    #[actix_web::test]
    async fn test_admin_invitation_is_redeemed_exactly_once() {
        let app = TestApp::new().await;
        let owner = app.seed_role(UserRole::SuperAdmin);
        let owner_cookie = app.cookie_for(&owner);
        let service = init_app!(app);

        let req = test::TestRequest::post()
            .uri("/api/invitations")
            .cookie(owner_cookie)
            .set_json(json!({ "email": "new-admin@example.com", "role": "Admin" }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let token = body["data"]["invitation"]["token"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["invitation"]["status"], "pending");
        assert_eq!(body["data"]["acceptUrl"], format!("/invite/{}", token));

        // The emailed link lands on the prefilled registration form
        let req = test::TestRequest::get().uri(&format!("/invite/{}", token)).to_request();
        let resp = test::call_service(&service, req).await;
        assert_redirect(&resp, &format!("/register?invitation={}", token));

        let req = test::TestRequest::get()
            .uri(&format!("/register?invitation={}", token))
            .to_request();
        let resp = test::call_service(&service, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["invitation"]["email"], "new-admin@example.com");
        assert_eq!(body["data"]["invitation"]["role"], "admin");

        let accept = |name: &str| {
            test::TestRequest::post()
                .uri(&format!("/api/invitations/{}/accept", token))
                .set_json(json!({ "name": name, "password": TEST_PASSWORD }))
                .to_request()
        };

        let resp = test::call_service(&service, accept("New Admin")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = response_cookie(&resp, "storefront-session").expect("session cookie");
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user"]["role"], "admin");
        assert_eq!(body["data"]["redirect"], "/dashboard");

        let resp = test::call_service(&service, accept("Second Try")).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVITATION_ALREADY_USED");

        assert_eq!(app.state.sessions.users_by_role(UserRole::Admin).len(), 1);

        // The new admin's session opens the admin dashboard
        let req = test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // A used link no longer resolves
        let req = test::TestRequest::get().uri(&format!("/invite/{}", token)).to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_inviter_permissions() {
        let app = TestApp::new().await;
        let admin = app.seed_role(UserRole::Admin);
        let customer = app.seed_role(UserRole::Customer);
        let admin_cookie = app.cookie_for(&admin);
        let customer_cookie = app.cookie_for(&customer);
        let service = init_app!(app);

        let cases = [
            (admin_cookie.clone(), "artist", StatusCode::CREATED),
            (admin_cookie.clone(), "admin", StatusCode::FORBIDDEN),
            (admin_cookie, "customer", StatusCode::BAD_REQUEST),
            (customer_cookie, "artist", StatusCode::FORBIDDEN),
        ];
        for (i, (cookie, role, expected)) in cases.into_iter().enumerate() {
            let req = test::TestRequest::post()
                .uri("/api/invitations")
                .cookie(cookie)
                .set_json(json!({ "email": format!("invitee-{}@example.com", i), "role": role }))
                .to_request();
            let resp = test::call_service(&service, req).await;
            assert_eq!(resp.status(), expected, "inviting {}", role);
        }

        // Unknown roles never reach the service
        let req = test::TestRequest::post()
            .uri("/api/invitations")
            .cookie(app.cookie_for(&admin))
            .set_json(json!({ "email": "x@example.com", "role": "owner" }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_revoked_and_unknown_tokens() {
        let app = TestApp::new().await;
        let owner = app.seed_role(UserRole::SuperAdmin);
        let invitation = app
            .state
            .invitations
            .create(
                &owner,
                NewInvitation {
                    email: "artist@example.com".to_string(),
                    role: UserRole::Artist,
                    message: Some("Welcome aboard".to_string()),
                },
            )
            .unwrap();
        let owner_cookie = app.cookie_for(&owner);
        let service = init_app!(app);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/invitations/{}", invitation.token))
            .cookie(owner_cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&format!("/api/invitations/{}/accept", invitation.token))
            .set_json(json!({ "name": "Artist", "password": TEST_PASSWORD }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::GONE);

        let req = test::TestRequest::get()
            .uri("/api/invitations/not-a-real-token")
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(app.state.sessions.find_by_email("artist@example.com").is_none());
    }

    #[actix_web::test]
    async fn test_existing_customer_is_upgraded_by_invitation() {
        let app = TestApp::new().await;
        let owner = app.seed_role(UserRole::SuperAdmin);
        let customer = app.seed(UserFactory::with_password(UserRole::Customer));
        let invitation = app
            .state
            .invitations
            .create(
                &owner,
                NewInvitation {
                    email: customer.email.clone(),
                    role: UserRole::Artist,
                    message: None,
                },
            )
            .unwrap();
        let service = init_app!(app);

        let req = test::TestRequest::post()
            .uri(&format!("/api/invitations/{}/accept", invitation.token))
            .set_json(json!({ "name": "ignored", "password": "not-my-password" }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri(&format!("/api/invitations/{}/accept", invitation.token))
            .set_json(json!({ "name": "ignored", "password": TEST_PASSWORD }))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let upgraded = app.state.sessions.get_user(customer.id).unwrap();
        assert_eq!(upgraded.role, UserRole::Artist);
        assert_eq!(upgraded.name, customer.name);
        assert_eq!(app.state.sessions.user_count(), 2);
    }

    #[actix_web::test]
    async fn test_listing_requires_staff() {
        let app = TestApp::new().await;
        let admin = app.seed_role(UserRole::Admin);
        let artist = app.seed_role(UserRole::Artist);
        app.state
            .invitations
            .create(
                &admin,
                NewInvitation {
                    email: "a@example.com".to_string(),
                    role: UserRole::Artist,
                    message: None,
                },
            )
            .unwrap();
        let admin_cookie = app.cookie_for(&admin);
        let artist_cookie = app.cookie_for(&artist);
        let service = init_app!(app);

        let req = test::TestRequest::get()
            .uri("/api/invitations?status=pending")
            .cookie(admin_cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["meta"]["total"], 1);

        let req = test::TestRequest::get()
            .uri("/api/invitations")
            .cookie(artist_cookie)
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
