//! Request Extension Trait for Claims Access
//!
//! Provides ergonomic helpers for accessing verified claims from gRPC request
//! handlers.

use token_manager::{PrincipalClaims, UserId};
use tonic::{Request, Status};

/// Extension trait for accessing verified claims from gRPC requests
///
/// Implemented for all `Request<T>`. Claims are only present if
/// `JwtServerInterceptor` ran and accepted the request.
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_propagation::JwtClaimsExt;
/// use token_manager::UserId;
/// use tonic::{Request, Response, Status};
///
/// async fn delete_post(request: Request<()>) -> Result<Response<()>, Status> {
///     let post_owner = UserId::from(42); // From database
///     request.require_ownership(&post_owner)?;
///
///     Ok(Response::new(()))
/// }
/// ```
pub trait JwtClaimsExt {
    /// Claims stored by `JwtServerInterceptor`
    ///
    /// ## Errors
    ///
    /// `Status::unauthenticated` if the interceptor was not attached or did not
    /// store claims.
    fn jwt_claims(&self) -> Result<&PrincipalClaims, Status>;

    /// Require that the authenticated user owns a specific resource
    ///
    /// ## Errors
    ///
    /// - `Status::unauthenticated` if no claims found
    /// - `Status::permission_denied` if user is not the owner
    fn require_ownership(&self, resource_owner_id: &UserId) -> Result<&PrincipalClaims, Status>;

    /// Require an exact role tag
    ///
    /// ## Errors
    ///
    /// - `Status::unauthenticated` if no claims found
    /// - `Status::permission_denied` if the role differs
    fn require_role(&self, role: &str) -> Result<&PrincipalClaims, Status>;
}

impl<T> JwtClaimsExt for Request<T> {
    fn jwt_claims(&self) -> Result<&PrincipalClaims, Status> {
        self.extensions().get::<PrincipalClaims>().ok_or_else(|| {
            Status::unauthenticated("No JWT claims found. Ensure JwtServerInterceptor is attached.")
        })
    }

    fn require_ownership(&self, resource_owner_id: &UserId) -> Result<&PrincipalClaims, Status> {
        let claims = self.jwt_claims()?;

        if !claims.is_owner(resource_owner_id) {
            return Err(Status::permission_denied(
                "You do not have permission to access this resource",
            ));
        }

        Ok(claims)
    }

    fn require_role(&self, role: &str) -> Result<&PrincipalClaims, Status> {
        let claims = self.jwt_claims()?;

        if !claims.has_role(role) {
            return Err(Status::permission_denied(format!("Role '{role}' required")));
        }

        Ok(claims)
    }
}
