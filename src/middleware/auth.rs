use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::config::AppState;
use crate::services::auth_service;
use crate::utils::AppError;

/// Which collection a bearer token is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Realm {
    Customer,
    Admin,
}

/// Resolves the bearer token into a `Customer` or `Admin` record and stores it in
/// the request extensions, where handlers read it through `web::ReqData`.
pub struct AuthMiddleware {
    realm: Realm,
}

impl AuthMiddleware {
    pub fn customer() -> Self {
        Self { realm: Realm::Customer }
    }

    pub fn admin() -> Self {
        Self { realm: Realm::Admin }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            realm: self.realm,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    realm: Realm,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let realm = self.realm;

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                log::error!("❌ AppState not registered; rejecting {}", req.path());
                return Ok(req.error_response(AppError::ServiceUnavailable).map_into_right_body());
            };

            let authorization = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let resolved = match realm {
                Realm::Customer => auth_service::resolve_customer(&state, authorization.as_deref())
                    .await
                    .map(|customer| {
                        req.extensions_mut().insert(customer);
                    }),
                Realm::Admin => auth_service::resolve_admin(&state, authorization.as_deref())
                    .await
                    .map(|admin| {
                        req.extensions_mut().insert(admin);
                    }),
            };

            if let Err(e) = resolved {
                log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), e);
                return Ok(req.error_response(e).map_into_right_body());
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
