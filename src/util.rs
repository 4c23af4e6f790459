use std::backtrace::Backtrace;

/// logs a failed database call along with a backtrace, and returns `context` with the error appended
/// so the caller can surface it in its own error type
pub fn log_db_error(context: String, e: &rusqlite::Error) -> String {
    log::error!("{context}! Error is {e:?}\n{}", Backtrace::force_capture());
    format!("{context}: {e}")
}

/// whether the statement failed because it would have broken a `unique` constraint
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::open_connection;
    use crate::tags::repository::{create_tag, get_tag};
    use crate::test::*;
    use crate::util::is_unique_violation;

    #[test]
    fn duplicate_tag_name_is_unique_violation() {
        init_db_folder();
        let con = open_connection();
        create_tag("taken", &con).unwrap();
        let e = create_tag("taken", &con).unwrap_err();
        let missing = get_tag(99, &con).unwrap_err();
        con.close().unwrap();
        assert!(is_unique_violation(&e));
        assert!(!is_unique_violation(&missing));
        cleanup();
    }
}
