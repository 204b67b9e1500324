use crate::Database;
use crate::models::{AdoptionRow, ChatMessageRow, PetRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, Row};

const USER_COLUMNS: &str = "id, email, first_name, last_name, password, profile_image, \
     profile_image_type, pet_state, created_at";

const PET_COLUMNS: &str = "id, name, kind, breed, description, image, image_type, created_at";

const ADOPTION_COLUMNS: &str = "id, pet_id, pet_name, pet_breed, pet_image, requester_name, \
     requester_dob, requester_contact, requester_email, requester_address, experience, \
     time_with_pet, living_space, budget, reason, qualification_score, recommendation, \
     status, created_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &UserRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, first_name, last_name, password, profile_image,
                     profile_image_type, pet_state, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    user.id,
                    user.email,
                    user.first_name,
                    user.last_name,
                    user.password,
                    user.profile_image,
                    user.profile_image_type,
                    user.pet_state,
                    user.created_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
            conn.query_row(&sql, [email], map_user).optional()
        })
    }

    pub fn count_users(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }

    /// Returns false when no user has this email.
    pub fn set_profile_image(&self, email: &str, data: &[u8], content_type: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET profile_image = ?1, profile_image_type = ?2 WHERE email = ?3",
                rusqlite::params![data, content_type, email],
            )?;
            Ok(changed > 0)
        })
    }

    /// Overwrite the stored pet-state blob. Returns false when no user has
    /// this email.
    pub fn save_pet_state(&self, email: &str, state_json: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET pet_state = ?1 WHERE email = ?2",
                rusqlite::params![state_json, email],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Pets --

    pub fn insert_pet(&self, pet: &PetRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pets (id, name, kind, breed, description, image, image_type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    pet.id,
                    pet.name,
                    pet.kind,
                    pet.breed,
                    pet.description,
                    pet.image,
                    pet.image_type,
                    pet.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// All catalog entries, either in insertion order or newest first.
    pub fn list_pets(&self, newest_first: bool) -> Result<Vec<PetRow>> {
        self.with_conn(|conn| {
            let order = if newest_first {
                "created_at DESC, rowid DESC"
            } else {
                "rowid ASC"
            };
            let sql = format!("SELECT {} FROM pets ORDER BY {}", PET_COLUMNS, order);
            collect_rows(conn, &sql, [], map_pet)
        })
    }

    pub fn get_pet(&self, id: &str) -> Result<Option<PetRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM pets WHERE id = ?1", PET_COLUMNS);
            conn.query_row(&sql, [id], map_pet).optional()
        })
    }

    /// First catalog entry with exactly this name and breed.
    pub fn find_pet(&self, name: &str, breed: &str) -> Result<Option<PetRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM pets WHERE name = ?1 AND breed = ?2 ORDER BY rowid ASC LIMIT 1",
                PET_COLUMNS
            );
            conn.query_row(&sql, [name, breed], map_pet).optional()
        })
    }

    pub fn delete_pet(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM pets WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Adoptions --

    pub fn insert_adoption(&self, adoption: &AdoptionRow) -> Result<()> {
        self.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO adoptions ({}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                ADOPTION_COLUMNS
            );
            conn.execute(
                &sql,
                rusqlite::params![
                    adoption.id,
                    adoption.pet_id,
                    adoption.pet_name,
                    adoption.pet_breed,
                    adoption.pet_image,
                    adoption.requester_name,
                    adoption.requester_dob,
                    adoption.requester_contact,
                    adoption.requester_email,
                    adoption.requester_address,
                    adoption.experience,
                    adoption.time_with_pet,
                    adoption.living_space,
                    adoption.budget,
                    adoption.reason,
                    adoption.qualification_score,
                    adoption.recommendation,
                    adoption.status,
                    adoption.created_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_adoption(&self, id: &str) -> Result<Option<AdoptionRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM adoptions WHERE id = ?1", ADOPTION_COLUMNS);
            conn.query_row(&sql, [id], map_adoption).optional()
        })
    }

    /// Every request, newest first.
    pub fn list_adoptions(&self) -> Result<Vec<AdoptionRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM adoptions ORDER BY created_at DESC, rowid DESC",
                ADOPTION_COLUMNS
            );
            collect_rows(conn, &sql, [], map_adoption)
        })
    }

    /// Requests filed under `email`, newest first, optionally restricted to
    /// one status.
    pub fn list_adoptions_by_email(
        &self,
        email: &str,
        status: Option<&str>,
    ) -> Result<Vec<AdoptionRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM adoptions
                 WHERE requester_email = ?1 AND (?2 IS NULL OR status = ?2)
                 ORDER BY created_at DESC, rowid DESC",
                ADOPTION_COLUMNS
            );
            collect_rows(conn, &sql, rusqlite::params![email, status], map_adoption)
        })
    }

    /// Overwrite a request's status unconditionally. Returns false when the
    /// id is unknown.
    pub fn set_adoption_status(&self, id: &str, status: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE adoptions SET status = ?1 WHERE id = ?2",
                [status, id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn count_adoptions_with_status(&self, status: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM adoptions WHERE status = ?1",
                [status],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
    }

    pub fn delete_adoption(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM adoptions WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Chat --

    pub fn insert_chat_message(&self, msg: &ChatMessageRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_messages (id, sender, name, profile, message, image, image_type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    msg.id,
                    msg.sender,
                    msg.name,
                    msg.profile,
                    msg.message,
                    msg.image,
                    msg.image_type,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Full room history, oldest first.
    pub fn list_chat_messages(&self) -> Result<Vec<ChatMessageRow>> {
        self.with_conn(|conn| {
            collect_rows(
                conn,
                "SELECT id, sender, name, profile, message, image, image_type, created_at
                 FROM chat_messages
                 ORDER BY created_at ASC, rowid ASC",
                [],
                |row| {
                    Ok(ChatMessageRow {
                        id: row.get(0)?,
                        sender: row.get(1)?,
                        name: row.get(2)?,
                        profile: row.get(3)?,
                        message: row.get(4)?,
                        image: row.get(5)?,
                        image_type: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                },
            )
        })
    }
}

fn collect_rows<P, T, F>(conn: &Connection, sql: &str, params: P, map: F) -> Result<Vec<T>>
where
    P: rusqlite::Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        password: row.get(4)?,
        profile_image: row.get(5)?,
        profile_image_type: row.get(6)?,
        pet_state: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn map_pet(row: &Row<'_>) -> rusqlite::Result<PetRow> {
    Ok(PetRow {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        breed: row.get(3)?,
        description: row.get(4)?,
        image: row.get(5)?,
        image_type: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_adoption(row: &Row<'_>) -> rusqlite::Result<AdoptionRow> {
    Ok(AdoptionRow {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        pet_name: row.get(2)?,
        pet_breed: row.get(3)?,
        pet_image: row.get(4)?,
        requester_name: row.get(5)?,
        requester_dob: row.get(6)?,
        requester_contact: row.get(7)?,
        requester_email: row.get(8)?,
        requester_address: row.get(9)?,
        experience: row.get(10)?,
        time_with_pet: row.get(11)?,
        living_space: row.get(12)?,
        budget: row.get(13)?,
        reason: row.get(14)?,
        qualification_score: row.get(15)?,
        recommendation: row.get(16)?,
        status: row.get(17)?,
        created_at: row.get(18)?,
    })
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
