// gRPC module - exports server implementation

mod server;

pub use server::{
    blog, serve_with_incoming, server_interceptor, start_grpc_server, AppState, BlogServiceImpl,
    CorrelationId, CORRELATION_HEADER, DELETED_MESSAGE,
};

// Re-export proto types for convenience
pub use blog::blog_service_server::BlogServiceServer;
