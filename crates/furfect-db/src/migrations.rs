use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id                  TEXT PRIMARY KEY,
            email               TEXT NOT NULL UNIQUE,
            first_name          TEXT NOT NULL DEFAULT '',
            last_name           TEXT NOT NULL DEFAULT '',
            password            TEXT NOT NULL,
            profile_image       BLOB,
            profile_image_type  TEXT,
            pet_state           TEXT,
            created_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pets (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            kind        TEXT NOT NULL,
            breed       TEXT NOT NULL,
            description TEXT NOT NULL,
            image       BLOB NOT NULL,
            image_type  TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_pets_name_breed
            ON pets(name, breed);

        -- pet_id is a weak reference: no FOREIGN KEY, the pet may be gone
        CREATE TABLE IF NOT EXISTS adoptions (
            id                  TEXT PRIMARY KEY,
            pet_id              TEXT,
            pet_name            TEXT NOT NULL,
            pet_breed           TEXT NOT NULL,
            pet_image           TEXT,
            requester_name      TEXT NOT NULL,
            requester_dob       TEXT NOT NULL,
            requester_contact   TEXT NOT NULL,
            requester_email     TEXT NOT NULL,
            requester_address   TEXT NOT NULL,
            experience          TEXT NOT NULL,
            time_with_pet       TEXT NOT NULL,
            living_space        TEXT NOT NULL,
            budget              TEXT NOT NULL,
            reason              TEXT NOT NULL,
            qualification_score INTEGER NOT NULL DEFAULT 0,
            recommendation      TEXT NOT NULL,
            status              TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'declined')),
            created_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_adoptions_requester
            ON adoptions(requester_email, created_at);

        CREATE TABLE IF NOT EXISTS chat_messages (
            id          TEXT PRIMARY KEY,
            sender      TEXT NOT NULL,
            name        TEXT NOT NULL,
            profile     TEXT NOT NULL,
            message     TEXT NOT NULL,
            image       BLOB,
            image_type  TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chat_messages_created
            ON chat_messages(created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
