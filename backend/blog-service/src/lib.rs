//! Blog Service Library
//!
//! In-memory blog post CRUD exposed over gRPC.
//!
//! ## Modules
//!
//! - `config`: Service configuration
//! - `error`: Error types
//! - `grpc`: gRPC server implementation
//! - `models`: Data models
//! - `services`: The concurrent post store

pub mod config;
pub mod error;
pub mod grpc;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, PostNotFound, Result};
pub use grpc::blog::{
    blog_service_client::BlogServiceClient,
    blog_service_server::{BlogService, BlogServiceServer},
    CreatePostRequest, CreatePostResponse, DeletePostRequest, DeletePostResponse,
    ReadPostRequest, ReadPostResponse, UpdatePostRequest, UpdatePostResponse,
};
pub use services::{DeleteOutcome, PostStore};
