/// Actor identity propagation
///
/// Authentication happens upstream: the gateway verifies the session and
/// forwards the verified identity in the `x-authenticated-user` header.
/// This middleware turns that header into an `ActorId` request extension.
/// A missing header is legitimate on anonymous-capable routes, so absence
/// is not rejected here; a present-but-malformed value is an invalid actor
/// and fails the request outright.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::error::AppError;

pub const IDENTITY_HEADER: &str = "x-authenticated-user";

/// Verified actor identity for the current request.
#[derive(Debug, Clone, Copy)]
pub struct ActorId(pub Uuid);

/// Actor identity on routes that also serve anonymous viewers.
#[derive(Debug, Clone, Copy)]
pub struct MaybeActor(pub Option<Uuid>);

pub struct IdentityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
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
        let service = self.service.clone();

        Box::pin(async move {
            // Copy the header out before touching extensions_mut so no
            // immutable borrow is alive across the mutable one.
            let header = req
                .headers()
                .get(IDENTITY_HEADER)
                .map(|v| v.to_str().map(str::to_owned));

            match header {
                None => {}
                Some(Ok(raw)) => match Uuid::parse_str(raw.trim()) {
                    Ok(id) => {
                        req.extensions_mut().insert(ActorId(id));
                    }
                    Err(_) => {
                        tracing::debug!(header = %raw, "malformed identity header");
                        return Err(AppError::Unauthorized("invalid actor identity".into()).into());
                    }
                },
                Some(Err(_)) => {
                    return Err(AppError::Unauthorized("invalid actor identity".into()).into());
                }
            }

            service.call(req).await
        })
    }
}

impl FromRequest for ActorId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<ActorId>().copied() {
            Some(actor) => ready(Ok(actor)),
            None => ready(Err(
                AppError::Unauthorized("authentication required".into()).into()
            )),
        }
    }
}

impl FromRequest for MaybeActor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let actor = req.extensions().get::<ActorId>().map(|a| a.0);
        ready(Ok(MaybeActor(actor)))
    }
}
