use crate::{MemberIdentity, Result as WsErrorResult, WsError};

use std::collections::HashMap;
use std::panic::Location;

use error_location::ErrorLocation;

pub const PROJECT_ID_PARAM: &str = "project_id";
pub const USER_ID_PARAM: &str = "user_id";
pub const USERNAME_PARAM: &str = "username";

/// Build the connection identity from the session request's query string.
///
/// All three parameters are required and must not be blank. Identity is
/// taken as-is: the caller in front of `/ws` has already authenticated it.
#[track_caller]
pub fn extract_identity(query_params: &HashMap<String, String>) -> WsErrorResult<MemberIdentity> {
    let value = |key: &str| {
        query_params
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    let project_id = value(PROJECT_ID_PARAM);
    let user_id = value(USER_ID_PARAM);
    let username = value(USERNAME_PARAM);

    match (project_id, user_id, username) {
        (Some(project_id), Some(user_id), Some(username)) => {
            Ok(MemberIdentity::new(project_id, user_id, username))
        }
        _ => {
            let missing: Vec<&str> = [
                (PROJECT_ID_PARAM, project_id),
                (USER_ID_PARAM, user_id),
                (USERNAME_PARAM, username),
            ]
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect();

            Err(WsError::MissingParameters {
                missing: missing.join(", "),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}
