use rusqlite::{Connection, Result};

/// incrementally upgrades the database for each version the database is behind
pub fn migrate_db(con: &Connection, table_version: u64) -> Result<()> {
    if table_version < 2 {
        log_migration_version(2);
        migrate_v2(con)?;
    }
    Ok(())
}

fn log_migration_version(_version: u64) {
    #[cfg(not(test))]
    log::info!("Migrating database to v{_version}...");
}

/// adds tag implications
fn migrate_v2(con: &Connection) -> Result<()> {
    con.execute_batch(include_str!("./assets/migration/v2.sql"))
}

#[cfg(test)]
mod tests {
    use crate::repository::{metadata_repository, open_connection};
    use crate::test::{cleanup, init_db_folder};

    #[test]
    fn initialize_db_migrates_to_latest_version() {
        init_db_folder();
        let con = open_connection();
        let version = metadata_repository::get_version(&con).unwrap();
        let implication_table: u32 = con
            .query_row(
                "select count(*) from sqlite_master where type = 'table' and name = 'implication'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        con.close().unwrap();
        assert_eq!("2", version);
        assert_eq!(1, implication_table);
        cleanup();
    }

    #[test]
    fn initialize_db_is_idempotent() {
        init_db_folder();
        crate::repository::initialize_db().unwrap();
        let con = open_connection();
        let version = metadata_repository::get_version(&con).unwrap();
        con.close().unwrap();
        assert_eq!("2", version);
        cleanup();
    }
}
