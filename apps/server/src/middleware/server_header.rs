//! Server identification middleware
//!
//! Adds the `Server: driftbench` header to every response, as the benchmark
//! requires on all endpoints.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::Error as ActixError;
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::SERVER_NAME;

pub struct ServerHeader;

impl<S, B> Transform<S, ServiceRequest> for ServerHeader
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = ServerHeaderMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ServerHeaderMiddleware { service }))
    }
}

pub struct ServerHeaderMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ServerHeaderMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            res.headers_mut().insert(
                header::SERVER,
                header::HeaderValue::from_static(SERVER_NAME),
            );
            Ok(res)
        })
    }
}
