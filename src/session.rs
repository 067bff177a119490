//! Conversation session id: created once, persisted, rotated by the server

use crate::constants::SESSION_KEY;
use crate::db::Database;
use tracing::{error, info};
use uuid::Uuid;

/// Read the persisted session id, creating and storing a fresh one if absent.
pub fn init_session(db: &Database) -> rusqlite::Result<String> {
    if let Some(id) = db.get_value(SESSION_KEY)? {
        if !id.trim().is_empty() {
            return Ok(id);
        }
    }
    let id = Uuid::new_v4().to_string();
    db.set_value(SESSION_KEY, &id)?;
    info!(session_id = %id, "Created new session");
    Ok(id)
}

/// Adopt a session id handed back by the server. Returns true if it changed.
///
/// A failed write is logged; the new id is still used for this run.
pub fn adopt_server_session(db: &Database, current: &mut String, server_id: Option<&str>) -> bool {
    let Some(server_id) = server_id.map(str::trim).filter(|s| !s.is_empty()) else {
        return false;
    };
    if server_id == current.as_str() {
        return false;
    }
    if let Err(e) = db.set_value(SESSION_KEY, server_id) {
        error!(error = %e, "Failed to persist rotated session id");
    }
    info!(old = %current, new = %server_id, "Session id rotated by server");
    *current = server_id.to_string();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_created_once_and_stable() {
        let db = Database::open_in_memory().unwrap();
        let first = init_session(&db).unwrap();
        let second = init_session(&db).unwrap();
        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(db.get_value(SESSION_KEY).unwrap().as_deref(), Some(first.as_str()));
    }

    #[test]
    fn blank_stored_value_is_replaced() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(SESSION_KEY, "  ").unwrap();
        let id = init_session(&db).unwrap();
        assert!(!id.trim().is_empty());
    }

    #[test]
    fn server_rotation_overwrites_stored_id() {
        let db = Database::open_in_memory().unwrap();
        let mut current = init_session(&db).unwrap();
        assert!(adopt_server_session(&db, &mut current, Some("server-42")));
        assert_eq!(current, "server-42");
        assert_eq!(init_session(&db).unwrap(), "server-42");
    }

    #[test]
    fn same_or_missing_server_id_is_ignored() {
        let db = Database::open_in_memory().unwrap();
        let mut current = init_session(&db).unwrap();
        let before = current.clone();
        assert!(!adopt_server_session(&db, &mut current, None));
        assert!(!adopt_server_session(&db, &mut current, Some("")));
        let same = before.clone();
        assert!(!adopt_server_session(&db, &mut current, Some(same.as_str())));
        assert_eq!(current, before);
    }
}
