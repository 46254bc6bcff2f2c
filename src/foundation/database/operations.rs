use crate::foundation::database::StoredIdentity;
use crate::foundation::models::SessionIdentity;
use sled::Db;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

/// The single key under which the logged-in identity is persisted.
pub const IDENTITY_KEY: &str = "userInfo";

/// Opens the session database at the specified path.
///
/// This function creates a new database or opens an existing one at the given path.
/// It's a thin wrapper around `sled::open` that converts the error to a standard
/// IO error for easier error handling.
///
/// # Examples
///
/// ```no_run
/// use vsong::foundation::database::open_database;
///
/// let db = open_database("/path/to/session_db").unwrap();
/// ```
pub fn open_database(path: &str) -> io::Result<Db> {
    sled::open(path).map_err(io::Error::other)
}

/// Persists the logged-in identity, replacing any previous one.
///
/// # Arguments
///
/// * `db` - A reference to the opened database.
/// * `identity` - The identity returned by the backend.
/// * `stored_at` - Unix timestamp in seconds, used by the freshness policy.
///
pub fn store_identity(db: &Db, identity: &SessionIdentity, stored_at: u64) -> io::Result<()> {
    let entry = StoredIdentity {
        identity: identity.clone(),
        stored_at,
    };

    let serialized = bincode::serialize(&entry).map_err(|e| io::Error::other(e.to_string()))?;
    db.insert(IDENTITY_KEY.as_bytes(), serialized)
        .map_err(io::Error::other)?;
    db.flush().map_err(io::Error::other)?;
    Ok(())
}

/// Retrieves the persisted identity, if any.
///
/// # Returns
///
/// `Ok(None)` when nobody is logged in. An `io::Error` is returned if the read fails or
/// the stored bytes cannot be decoded.
pub fn load_identity(db: &Db) -> io::Result<Option<StoredIdentity>> {
    db.get(IDENTITY_KEY.as_bytes())
        .map_err(io::Error::other)?
        .map(|ivec| {
            bincode::deserialize(&ivec).map_err(|e| io::Error::other(e.to_string()))
        })
        .transpose()
}

/// Removes the persisted identity. Clearing an empty store is not an error.
pub fn clear_identity(db: &Db) -> io::Result<()> {
    db.remove(IDENTITY_KEY.as_bytes()).map_err(io::Error::other)?;
    db.flush().map_err(io::Error::other)?;
    Ok(())
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
