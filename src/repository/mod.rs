use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Result};

use crate::db_migrations::migrate_db;

pub mod metadata_repository;

/// creates a new connection and returns it, but panics if the connection could not be created
#[cfg(not(test))]
pub fn open_connection() -> Connection {
    use crate::config::TAG_FS_CONFIG;

    let config = &TAG_FS_CONFIG.database;
    match configure_connection(
        Path::new(config.location.as_str()),
        Duration::from_millis(config.busy_timeout_millis),
    ) {
        Ok(con) => con,
        Err(error) => panic!("Failed to get a connection to the database!: {error}"),
    }
}

#[cfg(test)]
pub fn open_connection() -> Connection {
    let db_name = format!("{}.sqlite", crate::test::current_thread_name());
    match configure_connection(Path::new(db_name.as_str()), Duration::from_millis(5_000)) {
        Ok(con) => con,
        Err(error) => panic!("Failed to get a connection to the database!: {error}"),
    }
}

/// opens the database and registers everything our queries rely on.
///
/// `busy_timeout` makes writers queue behind sqlite's single write lock instead of failing immediately
fn configure_connection(location: &Path, busy_timeout: Duration) -> Result<Connection> {
    let con = Connection::open_with_flags(location, OpenFlags::default())?;
    con.busy_timeout(busy_timeout)?;
    // needed for the `rarray` table-valued function used by id list queries
    rusqlite::vtab::array::load_module(&con)?;
    Ok(con)
}

/// converts a list of ids into a value that can be bound to a `rarray(?)` parameter
pub fn id_array(ids: &[u32]) -> Rc<Vec<Value>> {
    Rc::new(ids.iter().map(|id| Value::from(i64::from(*id))).collect())
}

/// converts a list of strings into a value that can be bound to a `rarray(?)` parameter
pub fn text_array(values: &[String]) -> Rc<Vec<Value>> {
    Rc::new(values.iter().map(|it| Value::from(it.clone())).collect())
}

/// runs init.sql on the database
fn create_db(con: &Connection) -> Result<()> {
    con.execute_batch(include_str!("../assets/init.sql"))
}

/// handles checking if the database exists and is up to the correct version.
/// If not, it either creates or upgrades the database accordingly
pub fn initialize_db() -> Result<()> {
    let con = open_connection();
    let table_version = match metadata_repository::get_version(&con) {
        Ok(value) => value.parse::<u64>().unwrap_or(1),
        Err(_) => {
            // tables haven't been created yet
            create_db(&con)?;
            1
        }
    };
    migrate_db(&con, table_version)?;
    con.close().map_err(|(_, e)| e)
}
