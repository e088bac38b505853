//! Server-side JWT Interceptor
//!
//! Extracts and validates bearer tokens from incoming gRPC requests,
//! storing the validated claims in request extensions.

use std::sync::Arc;

use token_manager::{PrincipalClaims, TokenManager};
use tonic::metadata::MetadataMap;
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::{debug, warn};

use crate::status::status_for;

/// Server-side interceptor that validates tokens and extracts claims
///
/// This interceptor:
/// 1. Reads the `authorization` header from gRPC metadata
/// 2. Verifies the `Bearer` token with the injected `TokenManager`
/// 3. Stores `PrincipalClaims` in request extensions for handler access
///
/// ## Design
///
/// - **Fail-fast**: Any failure returns a status before the handler runs
/// - **Distinct statuses**: Missing credential is `Unauthenticated`, a header
///   without the `Bearer ` prefix is `InvalidArgument`
/// - **Structured logging**: Failures logged at WARN with the error kind only;
///   tokens are never logged
/// - **No globals**: The manager is passed in, so tests and services can run
///   several independently keyed interceptors side by side
///
/// ## Usage
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use grpc_jwt_propagation::JwtServerInterceptor;
/// use token_manager::AuthConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = Arc::new(AuthConfig::load()?.build_manager()?);
/// let interceptor = JwtServerInterceptor::new(manager);
///
/// // let service = MyServiceServer::with_interceptor(MyService, interceptor);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct JwtServerInterceptor {
    manager: Arc<TokenManager>,
}

impl JwtServerInterceptor {
    pub fn new(manager: Arc<TokenManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &TokenManager {
        &self.manager
    }

    /// Extract and validate the token carried in `metadata`
    ///
    /// ## Errors
    ///
    /// Returns the status chosen by [`crate::status_for`] for the failure.
    pub fn extract_and_validate(&self, metadata: &MetadataMap) -> Result<PrincipalClaims, Status> {
        let claims = self
            .manager
            .extract_from_metadata(Some(metadata))
            .map_err(|e| {
                warn!(kind = e.kind(), "JWT validation failed: {}", e);
                status_for(&e)
            })?;

        debug!(
            user_id = %claims.user_id,
            user_role = %claims.user_role,
            "JWT validated successfully"
        );

        Ok(claims)
    }
}

impl Interceptor for JwtServerInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let claims = self.extract_and_validate(request.metadata())?;

        request.extensions_mut().insert(claims);

        Ok(request)
    }
}
