//! `/ping`: liveness probe.

use crate::envelope::Data;
use crate::session::RequestIdentity;

/// `GET /ping`: `"pong"`, or `"pong, <userName>"` for a logged-in caller.
pub async fn ping(identity: RequestIdentity) -> Data<String> {
    match identity.user() {
        Some(user) => Data(format!("pong, {}", user.user_name)),
        None => Data("pong".to_string()),
    }
}
