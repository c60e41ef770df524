//! Actix front for [`crate::auth::gate::AuthGate`].
//!
//! Reads the bearer token, asks the gate for the effective path and, when
//! that differs from the requested one, rewrites the request URI and match
//! info so the router dispatches there instead. Verified claims go into
//! request extensions for [`crate::extractors::AuthClaims`].

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap};
use actix_web::http::Uri;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, Span};

use crate::auth::gate::Denial;
use crate::auth::token::TokenError;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct AuthGateMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthGateMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                return Err(AppError::internal(ErrorCode::Internal, "Application state missing").into());
            };

            // the router matches the requoted path (`/%75ser` is `/user`), so the gate must too
            let path = req.match_info().as_str().to_string();
            if !state.gate.policy().is_protected(&path) {
                return service.call(req).await;
            }

            let bearer = bearer_token(req.headers());
            let decision = state.gate.authorize(&path, bearer.as_deref()).await;

            if let Some(denial) = &decision.denial {
                log_denial(&path, denial);
            }
            if decision.path != path {
                reroute(&mut req, &decision.path)?;
            }
            let span = Span::current();
            span.record("route", decision.path.as_str());
            if let Some(claims) = decision.claims {
                span.record("subject", tracing::field::display(Redacted(&claims.subject)));
                req.extensions_mut().insert(claims);
            }

            service.call(req).await
        })
    }
}

/// `Authorization: Bearer <token>`, exactly two parts. Anything else counts as absent.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        ["Bearer", token] => Some((*token).to_string()),
        _ => None,
    }
}

fn reroute(req: &mut ServiceRequest, path: &str) -> Result<(), Error> {
    let uri: Uri = path.parse().map_err(|_| {
        AppError::internal(ErrorCode::Internal, "Authorization gate produced an invalid path")
    })?;
    debug!(from = %req.match_info().as_str(), to = %uri, "Rerouting request");
    req.match_info_mut().get_mut().update(&uri);
    req.head_mut().uri = uri;
    Ok(())
}

fn log_denial(path: &str, denial: &Denial) {
    match denial {
        Denial::RejectedToken(TokenError::Fetch(e)) => {
            error!(path, error = %e, "Verification key unavailable; request denied");
            security::access_denied(path, denial.reason(), None);
        }
        Denial::InsufficientRole { subject, .. } => {
            security::access_denied(path, denial.reason(), Some(subject));
        }
        _ => security::access_denied(path, denial.reason(), None),
    }
}
