//! SQLite-backed persistence for users, rooms, memberships and labels.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tabletop_domain::{
    InviteCode, Label, LabelCategory, LabelId, LabelName, LabelSelection, Location, LocationId,
    PlayerRoom, PlayerRoomId, Role, Room, RoomId, RoomName, User, UserId, UserName,
    UserOptions,
};
use uuid::Uuid;

use crate::infrastructure::ports::{LabelRepo, MembershipRepo, RepoError, RoomRepo, UserRepo};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        name_key TEXT NOT NULL UNIQUE,
        credential_hash TEXT,
        default_options TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rooms (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        creator_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        invite_code TEXT UNIQUE,
        UNIQUE (creator_id, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS locations (
        id TEXT PRIMARY KEY,
        room_id TEXT NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS player_rooms (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        room_id TEXT NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
        role TEXT NOT NULL,
        active_location TEXT NOT NULL REFERENCES locations(id),
        UNIQUE (user_id, room_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS labels (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        category TEXT,
        name TEXT NOT NULL,
        visible INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS label_selections (
        label_id TEXT NOT NULL REFERENCES labels(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        room_id TEXT NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
        PRIMARY KEY (label_id, user_id, room_id)
    )
    "#,
];

/// One pool, every repository port.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self, RepoError> {
        let pool = SqlitePoolOptions::new()
            .connect(database_url)
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        Self::with_pool(pool).await
    }

    /// Private in-memory database. A single connection that never expires,
    /// since every new connection would open an empty database.
    pub async fn in_memory() -> Result<Self, RepoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, RepoError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("schema", e))?;
        }
        Ok(Self { pool })
    }
}

/// Unique-key violations become `ConstraintViolation`, everything else is a
/// database error tagged with the operation.
fn map_write_err(operation: &'static str, err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepoError::constraint(format!("{operation}: {}", db.message()));
        }
    }
    RepoError::database(operation, err)
}

fn parse_uuid(row: &SqliteRow, column: &str) -> Result<Uuid, RepoError> {
    let raw: String = row.get(column);
    Uuid::parse_str(&raw).map_err(|e| RepoError::serialization(format!("{column}: {e}")))
}

fn row_to_user(row: &SqliteRow) -> Result<User, RepoError> {
    let name = UserName::new(row.get::<String, _>("name")).map_err(RepoError::serialization)?;
    let mut user = User::new(name).with_id(UserId::from_uuid(parse_uuid(row, "id")?));
    if let Some(hash) = row.get::<Option<String>, _>("credential_hash") {
        user = user.with_credential_hash(hash);
    }
    if let Some(json) = row.get::<Option<String>, _>("default_options") {
        let options: UserOptions =
            serde_json::from_str(&json).map_err(RepoError::serialization)?;
        user = user.with_default_options(options);
    }
    Ok(user)
}

const ROOM_COLUMNS: &str = "r.id, r.name, r.creator_id, r.invite_code, u.name AS creator_name";

fn row_to_room(row: &SqliteRow) -> Result<Room, RepoError> {
    let invite_code = row
        .get::<Option<String>, _>("invite_code")
        .map(InviteCode::new)
        .transpose()
        .map_err(RepoError::serialization)?;
    Ok(Room::from_parts(
        RoomId::from_uuid(parse_uuid(row, "id")?),
        RoomName::new(row.get::<String, _>("name")).map_err(RepoError::serialization)?,
        UserId::from_uuid(parse_uuid(row, "creator_id")?),
        UserName::new(row.get::<String, _>("creator_name")).map_err(RepoError::serialization)?,
        invite_code,
    ))
}

fn row_to_membership(row: &SqliteRow) -> Result<PlayerRoom, RepoError> {
    let role = Role::from_str(&row.get::<String, _>("role")).map_err(RepoError::serialization)?;
    Ok(PlayerRoom::new(
        UserId::from_uuid(parse_uuid(row, "user_id")?),
        RoomId::from_uuid(parse_uuid(row, "room_id")?),
        role,
        LocationId::from_uuid(parse_uuid(row, "active_location")?),
    )
    .with_id(PlayerRoomId::from_uuid(parse_uuid(row, "id")?)))
}

fn row_to_label(row: &SqliteRow) -> Result<Label, RepoError> {
    let category = row
        .get::<Option<String>, _>("category")
        .map(LabelCategory::new)
        .transpose()
        .map_err(RepoError::serialization)?;
    Ok(Label::new(
        LabelId::from_uuid(parse_uuid(row, "id")?),
        UserId::from_uuid(parse_uuid(row, "user_id")?),
        UserName::new(row.get::<String, _>("owner_name")).map_err(RepoError::serialization)?,
        category,
        LabelName::new(row.get::<String, _>("name")).map_err(RepoError::serialization)?,
        row.get::<bool, _>("visible"),
    ))
}

fn insert_membership(
    membership: &PlayerRoom,
) -> sqlx::query::Query<'static, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'static>> {
    sqlx::query(
        "INSERT INTO player_rooms (id, user_id, room_id, role, active_location) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(membership.id().to_string())
    .bind(membership.user_id().to_string())
    .bind(membership.room_id().to_string())
    .bind(membership.role().as_str())
    .bind(membership.active_location().to_string())
}

#[async_trait]
impl UserRepo for SqliteStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query(
            "SELECT id, name, credential_hash, default_options FROM users WHERE name_key = ?",
        )
        .bind(name.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("users.find_by_name", e))?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), RepoError> {
        let options =
            serde_json::to_string(user.default_options()).map_err(RepoError::serialization)?;
        sqlx::query(
            "INSERT INTO users (id, name, name_key, credential_hash, default_options) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user.id().to_string())
        .bind(user.name().as_str())
        .bind(user.name().lookup_key())
        .bind(user.credential_hash())
        .bind(options)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err("users.create", e))?;
        Ok(())
    }

    async fn set_default_options(
        &self,
        id: UserId,
        options: &UserOptions,
    ) -> Result<(), RepoError> {
        let json = serde_json::to_string(options).map_err(RepoError::serialization)?;
        let result = sqlx::query("UPDATE users SET default_options = ? WHERE id = ?")
            .bind(json)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.set_default_options", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("User", id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RoomRepo for SqliteStore {
    async fn find_by_invite_code(&self, code: &InviteCode) -> Result<Option<Room>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r JOIN users u ON u.id = r.creator_id \
             WHERE r.invite_code = ?"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("rooms.find_by_invite_code", e))?;
        row.as_ref().map(row_to_room).transpose()
    }

    async fn find_by_creator_and_name(
        &self,
        creator_name: &str,
        room_name: &str,
    ) -> Result<Option<Room>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r JOIN users u ON u.id = r.creator_id \
             WHERE u.name_key = ? AND r.name = ?"
        ))
        .bind(creator_name.trim().to_lowercase())
        .bind(room_name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("rooms.find_by_creator_and_name", e))?;
        row.as_ref().map(row_to_room).transpose()
    }

    async fn create_with_owner(
        &self,
        room: &Room,
        location: &Location,
        owner: &PlayerRoom,
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("rooms.create", e))?;
        sqlx::query("INSERT INTO rooms (id, name, creator_id, invite_code) VALUES (?, ?, ?, ?)")
            .bind(room.id().to_string())
            .bind(room.name().as_str())
            .bind(room.creator().to_string())
            .bind(room.invite_code().map(InviteCode::as_str))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_err("rooms.create", e))?;
        sqlx::query("INSERT INTO locations (id, room_id, name) VALUES (?, ?, ?)")
            .bind(location.id().to_string())
            .bind(location.room_id().to_string())
            .bind(location.name().as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_err("locations.create", e))?;
        insert_membership(owner)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_err("player_rooms.create", e))?;
        // Dropping the transaction on any error above rolls it back.
        tx.commit()
            .await
            .map_err(|e| RepoError::database("rooms.create", e))?;
        Ok(())
    }

    async fn set_invite_code(
        &self,
        room_id: RoomId,
        code: Option<InviteCode>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE rooms SET invite_code = ? WHERE id = ?")
            .bind(code.as_ref().map(InviteCode::as_str))
            .bind(room_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_err("rooms.set_invite_code", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Room", room_id));
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipRepo for SqliteStore {
    async fn find(
        &self,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<Option<PlayerRoom>, RepoError> {
        let row = sqlx::query(
            "SELECT id, user_id, room_id, role, active_location FROM player_rooms \
             WHERE user_id = ? AND room_id = ?",
        )
        .bind(user_id.to_string())
        .bind(room_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("player_rooms.find", e))?;
        row.as_ref().map(row_to_membership).transpose()
    }

    async fn create(&self, membership: &PlayerRoom) -> Result<(), RepoError> {
        insert_membership(membership)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_err("player_rooms.create", e))?;
        Ok(())
    }

    async fn first_location_with_role(
        &self,
        room_id: RoomId,
        role: Role,
    ) -> Result<Option<LocationId>, RepoError> {
        // rowid preserves insertion order, so this is the earliest member with the role.
        let row = sqlx::query(
            "SELECT active_location FROM player_rooms WHERE room_id = ? AND role = ? \
             ORDER BY rowid LIMIT 1",
        )
        .bind(room_id.to_string())
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("player_rooms.first_location_with_role", e))?;
        row.as_ref()
            .map(|row| parse_uuid(row, "active_location").map(LocationId::from_uuid))
            .transpose()
    }
}

#[async_trait]
impl LabelRepo for SqliteStore {
    async fn get(&self, id: LabelId) -> Result<Option<Label>, RepoError> {
        let row = sqlx::query(
            "SELECT l.id, l.user_id, l.category, l.name, l.visible, u.name AS owner_name \
             FROM labels l JOIN users u ON u.id = l.user_id WHERE l.id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("labels.get", e))?;
        row.as_ref().map(row_to_label).transpose()
    }

    async fn create(&self, label: &Label) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO labels (id, user_id, category, name, visible) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(label.id().to_string())
        .bind(label.owner().to_string())
        .bind(label.category().map(LabelCategory::as_str))
        .bind(label.name().as_str())
        .bind(label.visible())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err("labels.create", e))?;
        Ok(())
    }

    async fn delete(&self, id: LabelId) -> Result<Option<bool>, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("labels.delete", e))?;
        sqlx::query("DELETE FROM label_selections WHERE label_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("labels.delete", e))?;
        let visible = sqlx::query_scalar::<_, bool>(
            "DELETE FROM labels WHERE id = ? RETURNING visible",
        )
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepoError::database("labels.delete", e))?;
        tx.commit()
            .await
            .map_err(|e| RepoError::database("labels.delete", e))?;
        Ok(visible)
    }

    async fn set_visibility(&self, id: LabelId, visible: bool) -> Result<bool, RepoError> {
        let result = sqlx::query("UPDATE labels SET visible = ? WHERE id = ? AND visible <> ?")
            .bind(visible)
            .bind(id.to_string())
            .bind(visible)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("labels.set_visibility", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_selection(&self, selection: &LabelSelection) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT OR IGNORE INTO label_selections (label_id, user_id, room_id) VALUES (?, ?, ?)",
        )
        .bind(selection.label_id.to_string())
        .bind(selection.user_id.to_string())
        .bind(selection.room_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err("label_selections.add", e))?;
        Ok(())
    }

    async fn remove_selection(&self, selection: &LabelSelection) -> Result<bool, RepoError> {
        let result = sqlx::query(
            "DELETE FROM label_selections WHERE label_id = ? AND user_id = ? AND room_id = ?",
        )
        .bind(selection.label_id.to_string())
        .bind(selection.user_id.to_string())
        .bind(selection.room_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("label_selections.remove", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_selections(
        &self,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<Vec<LabelId>, RepoError> {
        let rows = sqlx::query(
            "SELECT label_id FROM label_selections WHERE user_id = ? AND room_id = ? \
             ORDER BY rowid",
        )
        .bind(user_id.to_string())
        .bind(room_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("label_selections.list", e))?;
        rows.iter()
            .map(|row| parse_uuid(row, "label_id").map(LabelId::from_uuid))
            .collect()
    }
}
