//! JWT Credential Propagation for gRPC Microservices
//!
//! Tonic adapters around `token-manager`: tokens travel in the `authorization`
//! metadata header as `Bearer <token>` and are verified on every inbound call.
//!
//! ## Core Components
//!
//! - **JwtClientInterceptor**: Injects a token into outgoing gRPC metadata
//! - **JwtServerInterceptor**: Verifies incoming tokens, stores `PrincipalClaims`
//! - **JwtClaimsExt**: Request extension trait for claims and permission checks
//! - **status_for**: Maps each `TokenError` kind to a gRPC status
//!
//! ## Usage Example
//!
//! ### Server Side (Backend Service)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use grpc_jwt_propagation::{JwtClaimsExt, JwtServerInterceptor};
//! use token_manager::TokenManager;
//! use tonic::{Request, Response, Status};
//!
//! # fn setup() -> Result<(), token_manager::TokenError> {
//! let manager = Arc::new(TokenManager::new("shared-secret")?);
//! let interceptor = JwtServerInterceptor::new(manager);
//! // let service = ContentServiceServer::with_interceptor(ContentService, interceptor);
//! # Ok(())
//! # }
//!
//! async fn delete_post(request: Request<()>) -> Result<Response<()>, Status> {
//!     let claims = request.require_role("admin")?;
//!     tracing::info!(user_id = %claims.user_id, "Deleting post");
//!     Ok(Response::new(()))
//! }
//! ```
//!
//! ### Client Side (Gateway)
//!
//! ```rust,no_run
//! use grpc_jwt_propagation::JwtClientInterceptor;
//!
//! # fn example(incoming: &tonic::metadata::MetadataMap) -> Result<(), tonic::Status> {
//! // Pass the caller's credential through to a backend service
//! let interceptor = JwtClientInterceptor::forward_from(incoming)?;
//! // let mut client = UserServiceClient::with_interceptor(channel, interceptor);
//! # Ok(())
//! # }
//! ```
//!
//! ## Status Codes
//!
//! - No credential = `Status::unauthenticated`
//! - Credential without `Bearer ` prefix = `Status::invalid_argument`
//! - Invalid, forged or expired token = `Status::unauthenticated`
//! - Missing permission = `Status::permission_denied`

mod client;
mod extensions;
mod server;
mod status;

pub use client::JwtClientInterceptor;
pub use extensions::JwtClaimsExt;
pub use server::JwtServerInterceptor;
pub use status::status_for;

// Re-export for convenience
pub use token_manager::{PrincipalClaims, UserId};
pub use tonic::Status;
