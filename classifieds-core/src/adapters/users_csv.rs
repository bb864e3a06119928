//! Users CSV file format
//!
//! ```text
//! email,name
//! a@x.com,Alice
//! ```

use std::io::{Read, Write};

use tracing::warn;

use crate::domain::result::{Error, Result};
use crate::domain::User;

/// Header row written at the top of every users file
pub const HEADER: [&str; 2] = ["email", "name"];

/// Rows read from a users file
#[derive(Debug, Default)]
pub struct ParsedUsers {
    pub users: Vec<User>,
    /// Rows dropped for a wrong field count or invalid email/name
    pub skipped: usize,
}

/// Read users from CSV. A missing header is fatal; bad rows are skipped.
pub fn read_users<R: Read>(reader: R) -> Result<ParsedUsers> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?;
    if headers.iter().all(str::is_empty) {
        return Err(Error::manager("users file is empty or missing its header"));
    }

    let mut parsed = ParsedUsers::default();

    for (index, result) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable user row");
                parsed.skipped += 1;
                continue;
            }
        };

        if record.len() != 2 {
            warn!(line, fields = record.len(), "skipping user row without exactly 2 fields");
            parsed.skipped += 1;
            continue;
        }

        match User::new(&record[0], &record[1]) {
            Ok(user) => parsed.users.push(user),
            Err(e) => {
                warn!(line, error = %e, "skipping invalid user row");
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Write the header and one row per user
pub fn write_users<W: Write>(writer: W, users: &[User]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;
    for user in users {
        writer.write_record([user.email(), user.name()])?;
    }
    writer
        .flush()
        .map_err(|e| Error::io("flushing users file", e))
}
