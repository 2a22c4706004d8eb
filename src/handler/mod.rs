pub mod booking_handler;
pub mod garage_handler;
pub mod quote_handler;

use bson::oid::ObjectId;

use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::Claims;

/// Resolve the authenticated account id from the request-scoped claims.
pub(crate) fn user_id_from_claims(claims: &Claims) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::new(HandlerErrorKind::Unauthorized, "Invalid token subject"))
}

/// Parse a path id that must be a valid ObjectId.
pub(crate) fn parse_object_id(id: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(id).map_err(|_| HandlerError::bad_request(format!("Invalid {} id", what)))
}
