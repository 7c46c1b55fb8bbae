//! Common test utilities for storefront-gate


pub use assertions::{assert_redirect, location, response_cookie};
pub use fixtures::{TEST_PASSWORD, TestApp, UserFactory};

/// Initialize the full application service around a [`TestApp`]
#[macro_export]
macro_rules! init_app {
    ($app:expr) => {
        actix_web::test::init_service(storefront_gate::server::server::HttpServer::create_app(
            $app.data(),
        ))
        .await
    };
}
