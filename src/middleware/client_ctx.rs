use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

/// Session key holding the authenticated user's id, written at login.
pub const SESSION_USER_ID: &str = "user_id";

/// Client context passed to routes.
/// Carries the identity of the caller, if any. Guests have no id.
#[derive(Clone, Debug, Default)]
pub struct ClientCtx {
    user_id: Option<i32>,
}

impl ClientCtx {
    pub fn from_session(session: &Session) -> Self {
        let user_id = match session.get::<i32>(SESSION_USER_ID) {
            Ok(user_id) => user_id,
            Err(err) => {
                log::warn!("Unreadable session, treating client as guest: {}", err);
                None
            }
        };

        Self { user_id }
    }

    /// Returns either the user's id or None.
    pub fn get_id(&self) -> Option<i32> {
        self.user_id
    }
}

/// This implementation is what actually provides the `client: ClientCtx` in the parameters of route functions.
impl FromRequest for ClientCtx {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(ClientCtx::from_session(&req.get_session())))
    }
}
