//! Client-side JWT Interceptor
//!
//! Injects bearer tokens into outgoing gRPC requests via metadata.

use token_manager::{TokenError, AUTHORIZATION_KEY, BEARER_PREFIX};
use tonic::metadata::{AsciiMetadataValue, MetadataMap};
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::status::status_for;

/// Client-side interceptor that injects a token into gRPC metadata
///
/// Adds `authorization: Bearer {token}` to every outgoing request.
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_propagation::JwtClientInterceptor;
/// use tonic::transport::Channel;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let token = "eyJhbGc..."; // From TokenManager::issue
/// let interceptor = JwtClientInterceptor::new(token)?;
///
/// let channel = Channel::from_static("http://[::1]:50051")
///     .connect()
///     .await?;
///
/// // let mut client = SomeServiceClient::with_interceptor(channel, interceptor);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct JwtClientInterceptor {
    /// Pre-formatted `Bearer {token}`, parsed once at construction
    auth_header: AsciiMetadataValue,
}

impl JwtClientInterceptor {
    /// Create an interceptor for a compact token (without the `Bearer ` prefix)
    ///
    /// ## Errors
    ///
    /// Returns `Status::invalid_argument` if the token is not visible ASCII.
    /// Tokens from `TokenManager::issue` are base64url and always pass.
    pub fn new(token: impl AsRef<str>) -> Result<Self, Status> {
        let mut auth_header =
            AsciiMetadataValue::try_from(format!("{BEARER_PREFIX}{}", token.as_ref()))
                .map_err(|_| Status::invalid_argument("token contains invalid characters"))?;
        auth_header.set_sensitive(true);

        Ok(Self { auth_header })
    }

    /// Wrap an already formatted `authorization` value
    pub fn from_header(auth_header: AsciiMetadataValue) -> Self {
        Self { auth_header }
    }

    /// Forward the caller's credential from an incoming request
    ///
    /// Gateway scenario: the incoming `authorization` header is passed through
    /// unchanged to downstream services. The prefix is checked here so a bad
    /// header fails at the edge rather than one hop later.
    pub fn forward_from(metadata: &MetadataMap) -> Result<Self, Status> {
        let auth_header = metadata
            .get(AUTHORIZATION_KEY)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| status_for(&TokenError::MissingCredential))?;

        let has_prefix = auth_header
            .to_str()
            .map(|value| value.starts_with(BEARER_PREFIX))
            .unwrap_or(false);
        if !has_prefix {
            return Err(status_for(&TokenError::MalformedCredential));
        }

        Ok(Self::from_header(auth_header.clone()))
    }
}

impl Interceptor for JwtClientInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert(AUTHORIZATION_KEY, self.auth_header.clone());

        Ok(request)
    }
}
