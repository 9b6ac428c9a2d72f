use std::convert::Infallible;
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::task::{Context, Poll};

use futures_util::future::{ready, BoxFuture, Ready};
use hyper::http::request::Parts;
use hyper::service::Service;
use hyper::{http, Method, Request, Response};
use log::{debug, warn};

use crate::body::Body;
use crate::cors;
use crate::mime;
use crate::resolve::{resolve, Resolved};
use crate::respond::{self, ResponseBuilder};

/// Per-connection request handler rooted at a serve directory.
#[derive(Clone)]
pub struct AssetService {
    root: PathBuf,
}

impl AssetService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl<B> Service<Request<B>> for AssetService {
    type Response = Response<Body>;

    type Error = IoError;

    type Future = BoxFuture<'static, Result<Response<Body>, IoError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let root = self.root.clone();
        let (parts, _body) = req.into_parts();
        Box::pin(async move { handle(root, parts).await })
    }
}

async fn handle(root: PathBuf, parts: Parts) -> Result<Response<Body>, IoError> {
    let result = match parts.method {
        Method::OPTIONS => respond::preflight_ok(),
        Method::GET | Method::HEAD => serve_asset(&root, &parts).await,
        _ => respond::method_not_allowed(),
    };
    let mut response = result.map_err(|e| IoError::new(ErrorKind::Other, e))?;
    cors::apply(response.headers_mut());
    debug!(
        "{} {} -> {}",
        parts.method,
        parts.uri.path(),
        response.status()
    );
    Ok(response)
}

async fn serve_asset(root: &Path, parts: &Parts) -> http::Result<Response<Body>> {
    match resolve(root, parts.uri.path()).await {
        Ok(Resolved::Found(asset, path)) => {
            let content_type = mime::content_type(&path);
            ResponseBuilder::from_parts(parts).build(asset, &content_type)
        }
        Ok(Resolved::NotFound) => respond::not_found(),
        Ok(Resolved::Forbidden) => respond::forbidden(),
        Err(e) => {
            warn!("failed to serve {}: {e}", parts.uri.path());
            respond::server_error()
        }
    }
}

/// Hands a fresh `AssetService` to hyper for every accepted connection.
pub struct AssetServiceMaker {
    root: PathBuf,
}

impl AssetServiceMaker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl<T> Service<T> for AssetServiceMaker {
    type Response = AssetService;

    type Error = Infallible;

    type Future = Ready<Result<AssetService, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _target: T) -> Self::Future {
        ready(Ok(AssetService::new(self.root.clone())))
    }
}
