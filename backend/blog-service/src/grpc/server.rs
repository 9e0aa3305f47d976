// gRPC server implementation for BlogService
use crate::error::{AppError, PostNotFound};
use crate::models::{NewPost, Post, PostChanges, PublicationDate};
use crate::services::{DeleteOutcome, PostStore};
use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::metadata::MetadataValue;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tonic_health::server::{health_reporter, HealthReporter};
use tracing::{info, warn};
use uuid::Uuid;

// Generated proto code
pub mod blog {
    tonic::include_proto!("blog.v1");

    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("blog_descriptor");
}

use blog::blog_service_server::{BlogService, BlogServiceServer};
use blog::*;

pub const CORRELATION_HEADER: &str = "x-correlation-id";
pub const DELETED_MESSAGE: &str = "Post deleted successfully";

/// Per-request correlation id, stored in request extensions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AppState holds shared resources for the gRPC service
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<PostStore>,
}

impl AppState {
    pub fn new(store: Arc<PostStore>) -> Self {
        Self { store }
    }
}

/// BlogServiceImpl - gRPC service implementation
#[derive(Debug, Clone)]
pub struct BlogServiceImpl {
    state: Arc<AppState>,
}

impl BlogServiceImpl {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Correlation id stashed by [`server_interceptor`]
    fn correlation_id<T>(req: &Request<T>) -> CorrelationId {
        req.extensions()
            .get::<CorrelationId>()
            .cloned()
            .unwrap_or_default()
    }
}

/// Wrap a reply and echo the correlation id back in response metadata
fn reply<T>(message: T, correlation_id: &CorrelationId) -> Response<T> {
    let mut response = Response::new(message);
    if correlation_id.0.is_empty() {
        return response;
    }
    if let Ok(value) = MetadataValue::try_from(correlation_id.0.as_str()) {
        response.metadata_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

fn convert_post_to_proto(post: Post) -> blog::Post {
    blog::Post {
        post_id: post.id,
        title: post.title,
        content: post.content,
        author: post.author,
        publication_date: post.publication_date.map(prost_types::Timestamp::from),
        tags: post.tags,
    }
}

#[tonic::async_trait]
impl BlogService for BlogServiceImpl {
    async fn create_post(
        &self,
        request: Request<CreatePostRequest>,
    ) -> Result<Response<CreatePostResponse>, Status> {
        let correlation_id = Self::correlation_id(&request);
        let req = request.into_inner();

        let post = self
            .state
            .store
            .create(NewPost {
                title: req.title,
                content: req.content,
                author: req.author,
                publication_date: req.publication_date.map(PublicationDate::from),
                tags: req.tags,
            })
            .await;

        info!(
            correlation_id = %correlation_id,
            post_id = %post.id,
            tag_count = post.tags.len(),
            published_at = ?post.publication_date.and_then(|d| d.as_datetime()),
            "create_post"
        );

        Ok(reply(
            CreatePostResponse {
                post: Some(convert_post_to_proto(post)),
            },
            &correlation_id,
        ))
    }

    async fn read_post(
        &self,
        request: Request<ReadPostRequest>,
    ) -> Result<Response<ReadPostResponse>, Status> {
        let correlation_id = Self::correlation_id(&request);
        let req = request.into_inner();

        let response = match self.state.store.read(&req.post_id).await {
            Ok(post) => {
                info!(correlation_id = %correlation_id, post_id = %req.post_id, "read_post");
                ReadPostResponse {
                    post: Some(convert_post_to_proto(post)),
                    error: String::new(),
                }
            }
            Err(not_found) => {
                warn!(
                    correlation_id = %correlation_id,
                    post_id = %not_found.post_id,
                    "read_post: post not found"
                );
                ReadPostResponse {
                    post: None,
                    error: not_found.to_string(),
                }
            }
        };

        Ok(reply(response, &correlation_id))
    }

    async fn update_post(
        &self,
        request: Request<UpdatePostRequest>,
    ) -> Result<Response<UpdatePostResponse>, Status> {
        let correlation_id = Self::correlation_id(&request);
        let req = request.into_inner();

        let changes = PostChanges {
            title: req.title,
            content: req.content,
            author: req.author,
            tags: req.tags,
        };

        let response = match self.state.store.update(&req.post_id, changes).await {
            Ok(post) => {
                info!(correlation_id = %correlation_id, post_id = %req.post_id, "update_post");
                UpdatePostResponse {
                    post: Some(convert_post_to_proto(post)),
                    error: String::new(),
                }
            }
            Err(not_found) => {
                warn!(
                    correlation_id = %correlation_id,
                    post_id = %not_found.post_id,
                    "update_post: post not found"
                );
                UpdatePostResponse {
                    post: None,
                    error: not_found.to_string(),
                }
            }
        };

        Ok(reply(response, &correlation_id))
    }

    async fn delete_post(
        &self,
        request: Request<DeletePostRequest>,
    ) -> Result<Response<DeletePostResponse>, Status> {
        let correlation_id = Self::correlation_id(&request);
        let req = request.into_inner();

        let message = match self.state.store.delete(&req.post_id).await {
            DeleteOutcome::Deleted => {
                info!(correlation_id = %correlation_id, post_id = %req.post_id, "delete_post");
                DELETED_MESSAGE.to_string()
            }
            DeleteOutcome::NotFound => {
                warn!(
                    correlation_id = %correlation_id,
                    post_id = %req.post_id,
                    "delete_post: post not found"
                );
                PostNotFound::new(req.post_id).to_string()
            }
        };

        Ok(reply(DeletePostResponse { message }, &correlation_id))
    }
}

/// Server-side correlation-id interceptor
///
/// Keeps an incoming `x-correlation-id` or mints one, and stores it in the
/// request extensions for the handlers.
pub fn server_interceptor(mut req: Request<()>) -> Result<Request<()>, Status> {
    let correlation_id = match req
        .metadata()
        .get(CORRELATION_HEADER)
        .and_then(|val| val.to_str().ok())
    {
        Some(existing) => existing.to_string(),
        None => {
            let generated = Uuid::new_v4().to_string();
            let value = MetadataValue::try_from(generated.as_str())
                .map_err(|_| Status::internal("failed to set correlation id"))?;
            req.metadata_mut().insert(CORRELATION_HEADER, value);
            generated
        }
    };

    req.extensions_mut().insert(CorrelationId(correlation_id));
    Ok(req)
}

/// Assemble health, reflection and BlogService into one router.
///
/// Health reports BlogService as SERVING once this returns.
async fn build_router(
    state: Arc<AppState>,
    enable_reflection: bool,
) -> Result<(Router, HealthReporter), AppError> {
    let (mut health, health_service) = health_reporter();
    health
        .set_serving::<BlogServiceServer<BlogServiceImpl>>()
        .await;

    let reflection_service = if enable_reflection {
        let service = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(blog::FILE_DESCRIPTOR_SET)
            .register_encoded_file_descriptor_set(tonic_health::pb::FILE_DESCRIPTOR_SET)
            .build_v1()?;
        info!("gRPC server reflection enabled");
        Some(service)
    } else {
        None
    };

    let svc = BlogServiceImpl::new(state);

    let router = Server::builder()
        .add_service(health_service)
        .add_service(BlogServiceServer::with_interceptor(svc, server_interceptor))
        .add_optional_service(reflection_service);

    Ok((router, health))
}

async fn mark_not_serving(mut health: HealthReporter) {
    health
        .set_not_serving::<BlogServiceServer<BlogServiceImpl>>()
        .await;
    info!("gRPC health set to NOT_SERVING, draining in-flight requests");
}

/// Run the gRPC server on `addr` until `shutdown` resolves
pub async fn start_grpc_server<F>(
    addr: SocketAddr,
    state: Arc<AppState>,
    enable_reflection: bool,
    shutdown: F,
) -> Result<(), AppError>
where
    F: Future<Output = ()>,
{
    let (router, health) = build_router(state, enable_reflection).await?;

    info!("Starting gRPC server on {}", addr);

    router
        .serve_with_shutdown(addr, async move {
            shutdown.await;
            mark_not_serving(health).await;
        })
        .await?;

    Ok(())
}

/// Run the gRPC server on an already bound listener until `shutdown` resolves
pub async fn serve_with_incoming<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    enable_reflection: bool,
    shutdown: F,
) -> Result<(), AppError>
where
    F: Future<Output = ()>,
{
    let (router, health) = build_router(state, enable_reflection).await?;

    if let Ok(addr) = listener.local_addr() {
        info!("Starting gRPC server on {}", addr);
    }

    router
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
            shutdown.await;
            mark_not_serving(health).await;
        })
        .await?;

    Ok(())
}
