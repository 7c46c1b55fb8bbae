//! Edge guard middleware
//!
//! Runs [`EdgeGuard`] before routing. Allowed requests pass through untouched;
//! everything else is answered with a 307 and never reaches a handler.

use crate::auth::{AccessDecision, EdgeGuard};
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::HttpResponse;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Edge guard middleware for Actix-web
#[derive(Clone)]
pub struct EdgeGuardMiddleware {
    guard: Arc<EdgeGuard>,
}

impl EdgeGuardMiddleware {
    pub fn new(guard: EdgeGuard) -> Self {
        Self {
            guard: Arc::new(guard),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for EdgeGuardMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = EdgeGuardMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(EdgeGuardMiddlewareService {
            service,
            guard: self.guard.clone(),
        }))
    }
}

/// Service implementation for the edge guard middleware
pub struct EdgeGuardMiddlewareService<S> {
    service: S,
    guard: Arc<EdgeGuard>,
}

impl<S, B> Service<ServiceRequest> for EdgeGuardMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Classify the percent-decoded path the router matches on, not the raw URI
        let path = req.match_info().as_str().to_string();
        let cookie = req.request().cookie(self.guard.cookie_name());
        let decision = self
            .guard
            .evaluate(&path, cookie.as_ref().map(|c| c.value()));

        match decision {
            AccessDecision::Allow => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            AccessDecision::RedirectTo(redirect) => {
                debug!(
                    "Edge guard redirecting {} to {} ({:?})",
                    path,
                    redirect.location,
                    redirect.reason
                );
                let response = HttpResponse::TemporaryRedirect()
                    .insert_header((header::LOCATION, redirect.location))
                    .finish()
                    .map_into_right_body();
                let (http_req, _payload) = req.into_parts();
                Box::pin(async move { Ok(ServiceResponse::new(http_req, response)) })
            }
        }
    }
}
