use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            username    TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            password    TEXT NOT NULL,
            token       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- At most one user per live token; NULL (logged out) never collides
        CREATE UNIQUE INDEX IF NOT EXISTS idx_users_token
            ON users(token);

        CREATE TABLE IF NOT EXISTS contacts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
            first_name  TEXT NOT NULL,
            last_name   TEXT,
            email       TEXT,
            phone       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_contacts_username
            ON contacts(username);

        CREATE TABLE IF NOT EXISTS addresses (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            contact_id  INTEGER NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
            street      TEXT NOT NULL,
            city        TEXT NOT NULL,
            province    TEXT NOT NULL,
            country     TEXT NOT NULL,
            postal_code TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_addresses_contact
            ON addresses(contact_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
