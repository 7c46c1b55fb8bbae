//! Configuration loading and startup with a persisted directory

#[cfg(test)]
mod tests {
    use crate::common::response_cookie;
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use serde_json::json;
    use storefront_gate::config::Config;
    use storefront_gate::core::models::UserRole;
    use storefront_gate::server::AppState;
    use storefront_gate::server::builder::load_config;
    use storefront_gate::server::server::HttpServer;
    use tempfile::tempdir;

    const EXAMPLE_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/storefront.yaml.example");

    async fn example_config(data_dir: &std::path::Path) -> Config {
        let mut config = Config::from_file(EXAMPLE_CONFIG).await.unwrap().prepare();
        config.storefront.storage.path = Some(data_dir.join("storefront.json"));
        config.storefront.payments.simulated_latency_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_example_config_is_valid() {
        let config = Config::from_file(EXAMPLE_CONFIG).await.unwrap().prepare();

        assert!(config.validate().is_ok());
        assert_eq!(config.session().cookie_name, "storefront-session");
        assert_eq!(config.invitations().validity_days, 7);
        assert!(config.bootstrap().super_admin.is_some());
    }

    #[tokio::test]
    async fn test_missing_config_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(dir.path().join("absent.yaml")).await.unwrap();

        assert!(config.session().secret.len() >= 32);
        assert!(config.validate().is_ok());
    }

    #[actix_web::test]
    async fn test_bootstrapped_super_admin_survives_restart() {
        let dir = tempdir().unwrap();

        let state = AppState::new(example_config(dir.path()).await).await.unwrap();
        let owners = state.sessions.users_by_role(UserRole::SuperAdmin);
        assert_eq!(owners.len(), 1);
        assert!(dir.path().join("storefront.json").exists());

        // Second start reads the same directory and does not bootstrap again
        let restarted = AppState::new(example_config(dir.path()).await).await.unwrap();
        let again = restarted.sessions.users_by_role(UserRole::SuperAdmin);
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].id, owners[0].id);

        let service = test::init_service(HttpServer::create_app(web::Data::new(restarted))).await;
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({
                "email": "OWNER@example.com",
                "password": "change-me-please",
            }))
            .to_request();
        let resp = test::call_service(&service, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = response_cookie(&resp, "storefront-session").unwrap();
        assert!(cookie.secure().unwrap_or(false));
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["redirect"], "/super-admin/dashboard");
    }
}
