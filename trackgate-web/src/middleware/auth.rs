//! API-key authentication middleware.
//!
//! Every `/api/v1` request must carry an `X-API-Key` header that
//! resolves to an enabled user; the resolved [`AuthUser`] is attached to
//! the request extensions for the handlers' ownership and admin checks.

use actix_service::{Service, Transform};
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    Error, HttpMessage, HttpResponse,
};
use futures::{
    future::{ok, LocalBoxFuture, Ready},
    FutureExt,
};
use std::rc::Rc;
use trackgate_models::constants::API_KEY_HEADER;
use trackgate_models::domain::prelude::AuthUser;
use trackgate_models::web::ApiReply;
use trackgate_repository::UserRepository;

pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = S::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        async move {
            // CORS preflight never carries credentials.
            if req.method() == Method::OPTIONS {
                return srv.call(req).await.map(|res| res.map_into_left_body());
            }

            let key = req
                .headers()
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let Some(key) = key else {
                return Ok(req
                    .into_response(
                        HttpResponse::BadRequest().json(ApiReply::of("API key required")),
                    )
                    .map_into_right_body());
            };

            let user = match UserRepository::find_enabled_by_api_key(&key).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    return Ok(req
                        .into_response(
                            HttpResponse::Unauthorized().json(ApiReply::of("Invalid API key")),
                        )
                        .map_into_right_body());
                }
                Err(e) => {
                    tracing::error!(error = %e, "API key lookup failed");
                    return Ok(req
                        .into_response(
                            HttpResponse::InternalServerError()
                                .json(ApiReply::of("authentication unavailable")),
                        )
                        .map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthUser {
                id: user.id,
                name: user.name,
                admin: user.admin,
            });

            srv.call(req).await.map(|res| res.map_into_left_body())
        }
        .boxed_local()
    }
}
