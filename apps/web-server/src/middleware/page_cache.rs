//! Whole-response cache for public listing pages.
//!
//! Successful `GET` responses are stored under `{prefix}:{uri}` for the
//! configured TTL; a hit is served without calling the handler.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    Error, HttpResponse,
    body::{self, BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{Method, StatusCode, header},
};

use scribe_core::ports::Cache;

pub struct PageCache {
    cache: Arc<dyn Cache>,
    key_prefix: &'static str,
    ttl: Duration,
}

impl PageCache {
    pub fn new(cache: Arc<dyn Cache>, key_prefix: &'static str, ttl: Duration) -> Self {
        Self {
            cache,
            key_prefix,
            ttl,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for PageCache
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = PageCacheService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PageCacheService {
            service: Rc::new(service),
            cache: self.cache.clone(),
            key_prefix: self.key_prefix,
            ttl: self.ttl,
        }))
    }
}

pub struct PageCacheService<S> {
    service: Rc<S>,
    cache: Arc<dyn Cache>,
    key_prefix: &'static str,
    ttl: Duration,
}

impl<S, B> Service<ServiceRequest> for PageCacheService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if req.method() != Method::GET {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_boxed_body()) });
        }

        let cache = Arc::clone(&self.cache);
        let ttl = self.ttl;
        let key = format!("{}:{}", self.key_prefix, req.uri());

        Box::pin(async move {
            if let Some(cached) = cache.get(&key).await {
                tracing::debug!(%key, "Page cache hit");
                let response = HttpResponse::Ok()
                    .content_type(header::ContentType::json())
                    .body(cached);
                return Ok(req.into_response(response));
            }

            let res = service.call(req).await?;
            if res.status() != StatusCode::OK {
                return Ok(res.map_into_boxed_body());
            }

            let (req, res) = res.into_parts();
            let (res, payload) = res.into_parts();
            let bytes = body::to_bytes(payload).await.map_err(|e| {
                let e: Box<dyn std::error::Error> = e.into();
                actix_web::error::ErrorInternalServerError(e.to_string())
            })?;

            match std::str::from_utf8(&bytes) {
                Ok(text) => {
                    if let Err(e) = cache.set(&key, text, Some(ttl)).await {
                        tracing::warn!(%key, error = %e, "Failed to store page in cache");
                    }
                }
                Err(_) => tracing::warn!(%key, "Page body is not UTF-8, not caching"),
            }

            let res = res.set_body(bytes).map_into_boxed_body();
            Ok(ServiceResponse::new(req, res))
        })
    }
}
