use crate::orm::ItemKind;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;

/// Failures of a vote submission. Every variant aborts the unit of work
/// before anything is committed.
#[derive(Debug)]
pub enum VoteError {
    /// No authenticated voter
    AuthRequired,
    /// Malformed item type or vote value
    Validation(&'static str),
    /// Item does not exist, including items purged by moderation mid-flight
    NotFound { kind: ItemKind, id: i32 },
    /// Storage failure
    Database(DbErr),
}

impl std::fmt::Display for VoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteError::AuthRequired => write!(f, "login required"),
            VoteError::Validation(msg) => write!(f, "{}", msg),
            VoteError::NotFound { .. } => write!(f, "item not found"),
            VoteError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for VoteError {}

impl From<DbErr> for VoteError {
    fn from(e: DbErr) -> Self {
        VoteError::Database(e)
    }
}

impl ResponseError for VoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            VoteError::AuthRequired => StatusCode::FORBIDDEN,
            VoteError::Validation(_) => StatusCode::BAD_REQUEST,
            VoteError::NotFound { .. } => StatusCode::NOT_FOUND,
            VoteError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            VoteError::Database(e) => {
                log::error!("Vote request failed: {}", e);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

/// Whether a driver error is a unique-key violation.
/// sea-orm only carries the driver message, so this matches on its text.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    let message = match err {
        DbErr::Exec(msg) | DbErr::Query(msg) => msg,
        _ => return false,
    };

    message.contains("23505")
        || message.contains("duplicate key value")
        || message.contains("UNIQUE constraint failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(VoteError::AuthRequired.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            VoteError::Validation("invalid vote").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VoteError::NotFound {
                kind: ItemKind::Event,
                id: 1
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VoteError::Database(DbErr::Conn("down".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(VoteError::AuthRequired.to_string(), "login required");
        assert_eq!(
            VoteError::Validation("invalid item type").to_string(),
            "invalid item type"
        );
        assert_eq!(
            VoteError::NotFound {
                kind: ItemKind::Resource,
                id: 9
            }
            .to_string(),
            "item not found"
        );
    }

    #[test]
    fn test_unique_violation_detection() {
        assert!(is_unique_violation(&DbErr::Query(
            "error returned from database: duplicate key value violates unique constraint \"votes_user_item_key\"".to_string()
        )));
        assert!(is_unique_violation(&DbErr::Exec(
            "error returned from database: UNIQUE constraint failed: votes.user_id, votes.item_type, votes.item_id".to_string()
        )));
        assert!(!is_unique_violation(&DbErr::Query(
            "error returned from database: relation \"votes\" does not exist".to_string()
        )));
        assert!(!is_unique_violation(&DbErr::Conn(
            "duplicate key value".to_string()
        )));
    }
}
