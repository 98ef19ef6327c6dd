/// JWT Authentication Middleware
///
/// Validates the bearer token from the Authorization header and injects the
/// token payload into request extensions for use by route handlers.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, AUTHORIZATION},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{Authenticator, Payload};
use crate::error::AuthError;

/// Payload of the verified access token, available to handlers as
/// `web::ReqData<AuthenticatedUser>`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: Payload,
}

/// JWT middleware for protecting routes
///
/// Requests without a valid access token are answered with 401 and never
/// reach the wrapped service.
pub struct JwtMiddleware {
    authenticator: Authenticator,
}

impl JwtMiddleware {
    /// Create new JWT middleware instance
    pub fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            authenticator: self.authenticator.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    authenticator: Authenticator,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let result = authorization_value(req.headers().get(AUTHORIZATION))
            .and_then(|header| self.authenticator.authenticate_header(header));

        match result {
            Ok(user) => {
                req.extensions_mut().insert(AuthenticatedUser { user });
                tracing::debug!(path = %req.path(), "JWT validated successfully");

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                tracing::warn!(path = %req.path(), error = %e, "Request rejected");
                // Rendered as 401 {"error": ...} by AuthError's ResponseError impl
                let error: Error = e.into();
                Box::pin(async move { Err::<ServiceResponse<B>, Error>(error) })
            }
        }
    }
}

/// Read the Authorization header as text
///
/// A header that is present but not visible ASCII still carried a token,
/// so it is rejected as invalid rather than missing.
fn authorization_value(header: Option<&HeaderValue>) -> Result<Option<&str>, AuthError> {
    header
        .map(|value| value.to_str().map_err(|_| AuthError::InvalidToken))
        .transpose()
}
