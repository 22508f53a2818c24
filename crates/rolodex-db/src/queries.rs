use crate::Database;
use crate::models::{AddressRow, ContactFilter, ContactRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, name: &str, password_hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (username, name, password) VALUES (?1, ?2, ?3)",
                (username, name, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn username_taken(&self, username: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE username = ?1",
                [username],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_token(&self, token: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_token(conn, token))
    }

    /// Overwrites both mutable profile columns; callers pass the current
    /// value for anything that should stay unchanged.
    pub fn update_user(&self, username: &str, name: &str, password_hash: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let rows = conn.execute(
                "UPDATE users SET name = ?2, password = ?3 WHERE username = ?1",
                (username, name, password_hash),
            )?;
            Ok(rows)
        })
    }

    /// `Some` rotates the session token, `None` clears it (logout).
    pub fn set_user_token(&self, username: &str, token: Option<&str>) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let rows = conn.execute(
                "UPDATE users SET token = ?2 WHERE username = ?1",
                (username, token),
            )?;
            Ok(rows)
        })
    }

    // -- Contacts --

    pub fn insert_contact(
        &self,
        username: &str,
        first_name: &str,
        last_name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO contacts (username, first_name, last_name, email, phone)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![username, first_name, last_name, email, phone],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Point lookup carrying the owner predicate: a contact belonging to a
    /// different user is indistinguishable from a missing one.
    pub fn get_contact(&self, id: i64, username: &str) -> Result<Option<ContactRow>> {
        self.with_conn(|conn| query_contact(conn, id, username))
    }

    pub fn update_contact(
        &self,
        id: i64,
        username: &str,
        first_name: &str,
        last_name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let rows = conn.execute(
                "UPDATE contacts SET first_name = ?3, last_name = ?4, email = ?5, phone = ?6
                 WHERE id = ?1 AND username = ?2",
                rusqlite::params![id, username, first_name, last_name, email, phone],
            )?;
            Ok(rows)
        })
    }

    pub fn delete_contact(&self, id: i64, username: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let rows = conn.execute(
                "DELETE FROM contacts WHERE id = ?1 AND username = ?2",
                rusqlite::params![id, username],
            )?;
            Ok(rows)
        })
    }

    /// One page of contacts matching the filter, ordered by ascending id so
    /// pagination walks a stable total order.
    pub fn search_contacts(
        &self,
        username: &str,
        filter: &ContactFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactRow>> {
        self.with_conn(|conn| {
            let (where_sql, binds) = filter_clauses(username, filter);
            let sql = format!(
                "SELECT id, username, first_name, last_name, email, phone, created_at
                 FROM contacts WHERE {} ORDER BY id ASC LIMIT ?{} OFFSET ?{}",
                where_sql,
                binds.len() + 1,
                binds.len() + 2,
            );

            let mut stmt = conn.prepare(&sql)?;
            let mut params: Vec<&dyn rusqlite::types::ToSql> = binds
                .iter()
                .map(|b| b as &dyn rusqlite::types::ToSql)
                .collect();
            params.push(&limit);
            params.push(&offset);

            let rows = stmt
                .query_map(params.as_slice(), map_contact_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Count over the same predicate as `search_contacts`.
    pub fn count_contacts(&self, username: &str, filter: &ContactFilter) -> Result<i64> {
        self.with_conn(|conn| {
            let (where_sql, binds) = filter_clauses(username, filter);
            let sql = format!("SELECT COUNT(*) FROM contacts WHERE {}", where_sql);

            let params: Vec<&dyn rusqlite::types::ToSql> = binds
                .iter()
                .map(|b| b as &dyn rusqlite::types::ToSql)
                .collect();

            let count = conn.query_row(&sql, params.as_slice(), |row| row.get(0))?;
            Ok(count)
        })
    }

    // -- Addresses --

    pub fn insert_address(
        &self,
        contact_id: i64,
        street: &str,
        city: &str,
        province: &str,
        country: &str,
        postal_code: Option<&str>,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO addresses (contact_id, street, city, province, country, postal_code)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![contact_id, street, city, province, country, postal_code],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Point lookup requiring the exact (id, contact_id) pair.
    pub fn get_address(&self, id: i64, contact_id: i64) -> Result<Option<AddressRow>> {
        self.with_conn(|conn| query_address(conn, id, contact_id))
    }

    pub fn update_address(
        &self,
        id: i64,
        contact_id: i64,
        street: &str,
        city: &str,
        province: &str,
        country: &str,
        postal_code: Option<&str>,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let rows = conn.execute(
                "UPDATE addresses SET street = ?3, city = ?4, province = ?5, country = ?6, postal_code = ?7
                 WHERE id = ?1 AND contact_id = ?2",
                rusqlite::params![id, contact_id, street, city, province, country, postal_code],
            )?;
            Ok(rows)
        })
    }

    pub fn delete_address(&self, id: i64, contact_id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let rows = conn.execute(
                "DELETE FROM addresses WHERE id = ?1 AND contact_id = ?2",
                rusqlite::params![id, contact_id],
            )?;
            Ok(rows)
        })
    }

    pub fn list_addresses(&self, contact_id: i64) -> Result<Vec<AddressRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, contact_id, street, city, province, country, postal_code, created_at
                 FROM addresses WHERE contact_id = ?1 ORDER BY id ASC",
            )?;

            let rows = stmt
                .query_map([contact_id], map_address_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, name, password, token, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt.query_row([username], map_user_row).optional()?;

    Ok(row)
}

fn query_user_by_token(conn: &Connection, token: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, name, password, token, created_at FROM users WHERE token = ?1",
    )?;

    let row = stmt.query_row([token], map_user_row).optional()?;

    Ok(row)
}

fn query_contact(conn: &Connection, id: i64, username: &str) -> Result<Option<ContactRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, first_name, last_name, email, phone, created_at
         FROM contacts WHERE id = ?1 AND username = ?2",
    )?;

    let row = stmt
        .query_row(rusqlite::params![id, username], map_contact_row)
        .optional()?;

    Ok(row)
}

fn query_address(conn: &Connection, id: i64, contact_id: i64) -> Result<Option<AddressRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, contact_id, street, city, province, country, postal_code, created_at
         FROM addresses WHERE id = ?1 AND contact_id = ?2",
    )?;

    let row = stmt
        .query_row(rusqlite::params![id, contact_id], map_address_row)
        .optional()?;

    Ok(row)
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        username: row.get(0)?,
        name: row.get(1)?,
        password: row.get(2)?,
        token: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn map_contact_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContactRow> {
    Ok(ContactRow {
        id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_address_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AddressRow> {
    Ok(AddressRow {
        id: row.get(0)?,
        contact_id: row.get(1)?,
        street: row.get(2)?,
        city: row.get(3)?,
        province: row.get(4)?,
        country: row.get(5)?,
        postal_code: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// WHERE clauses and owned bind values shared by the search and count
/// queries. Clause placeholders are numbered to line up with `binds`.
fn filter_clauses(username: &str, filter: &ContactFilter) -> (String, Vec<String>) {
    let mut clauses = vec!["username = ?1".to_string()];
    let mut binds = vec![username.to_string()];

    if let Some(name) = &filter.name {
        binds.push(like_pattern(name));
        let i = binds.len();
        clauses.push(format!(
            "(first_name LIKE ?{i} ESCAPE '\\' OR last_name LIKE ?{i} ESCAPE '\\')"
        ));
    }
    if let Some(email) = &filter.email {
        binds.push(like_pattern(email));
        clauses.push(format!("email LIKE ?{} ESCAPE '\\'", binds.len()));
    }
    if let Some(phone) = &filter.phone {
        binds.push(like_pattern(phone));
        clauses.push(format!("phone LIKE ?{} ESCAPE '\\'", binds.len()));
    }

    (clauses.join(" AND "), binds)
}

/// Substring match pattern shared by the name, email and phone filters.
/// SQLite LIKE is case-insensitive for ASCII, so a phone value carrying
/// letters matches in either case just like the name filter does; wildcards
/// in user input are escaped so they match literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
