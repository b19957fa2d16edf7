//! Session-cookie helpers keeping handlers free of framework specifics.
//!
//! The cookie only ever stores the opaque server-side session id; the
//! session record itself, including expiry, lives behind the session store
//! port. A tampered or unparseable cookie value resolves to "no session".

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionId};

pub(crate) const SESSION_ID_KEY: &str = "session_id";

/// Newtype wrapper exposing higher-level session-cookie operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the opaque session id in the cookie.
    pub fn persist(&self, id: &SessionId) -> Result<(), Error> {
        self.0
            .insert(SESSION_ID_KEY, id.to_string())
            .map_err(|err| Error::internal(format!("failed to persist session cookie: {err}")))
    }

    /// Fetch the session id from the cookie, if present and well formed.
    pub fn session_id(&self) -> Result<Option<SessionId>, Error> {
        let raw = self
            .0
            .get::<String>(SESSION_ID_KEY)
            .map_err(|err| Error::internal(format!("failed to read session cookie: {err}")))?;
        match raw {
            Some(value) => match value.parse::<SessionId>() {
                Ok(id) => Ok(Some(id)),
                Err(err) => {
                    tracing::warn!(error = %err, "invalid session id in cookie");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Drop the cookie-side session state entirely.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
