//! Mapping from token failures to gRPC status codes
//!
//! | Failure                                   | Code               |
//! |-------------------------------------------|--------------------|
//! | no metadata / no `authorization` header   | `Unauthenticated`  |
//! | header present but not `Bearer <token>`   | `InvalidArgument`  |
//! | malformed, forged, expired or bad claims  | `Unauthenticated`  |
//! | manager misconfigured                     | `Internal`         |
//!
//! The error kind is echoed in the message so clients can tell "log in again"
//! (`token_expired`) apart from "fix your client" (`malformed_credential`).

use token_manager::TokenError;
use tonic::Status;

/// Convert a token failure into the status returned to the caller
pub fn status_for(err: &TokenError) -> Status {
    match err {
        TokenError::MalformedCredential => Status::invalid_argument(format!(
            "{}: {}",
            err.kind(),
            err
        )),
        TokenError::Configuration(_) | TokenError::Encoding(_) => {
            // Never leak server-side detail to the caller.
            Status::internal("authentication is unavailable")
        }
        _ => Status::unauthenticated(format!("{}: {}", err.kind(), err)),
    }
}
