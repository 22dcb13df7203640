//! Local key-value store for session, device and per-case state.
//!
//! Everything the client remembers between runs lives in one SQLite table
//! keyed by `(scope, key)`. Scopes keep unrelated state apart: logging out
//! clears [`Scope::Session`] only, and each case's autosave lives in its own
//! [`Scope::Case`].

use std::{fmt, path::Path};

use jiff::Timestamp;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::{DatabaseResultExt, DocketError, Result},
    models::{ChatMessage, Jurisdiction, UserSession},
    workspace::WorkspaceSnapshot,
};

const SELECT_VALUE_SQL: &str = "SELECT value FROM kv WHERE scope = ?1 AND key = ?2";
const UPSERT_VALUE_SQL: &str = "INSERT INTO kv (scope, key, value, updated_at) VALUES (?1, ?2, ?3, ?4) \
     ON CONFLICT(scope, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";
const DELETE_VALUE_SQL: &str = "DELETE FROM kv WHERE scope = ?1 AND key = ?2";
const DELETE_SCOPE_SQL: &str = "DELETE FROM kv WHERE scope = ?1";

const TOKEN_KEY: &str = "token";
const USER_NAME_KEY: &str = "user_name";
const USER_EMAIL_KEY: &str = "user_email";
const JURISDICTION_KEY: &str = "jurisdiction";
const GENERAL_CHAT_KEY: &str = "dashboard_chat_history";
const AUTOSAVE_KEY: &str = "autosave";

/// Namespace of a stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Login state; cleared on logout or when the backend rejects the token
    Session,
    /// Preferences that outlive a session
    Device,
    /// State belonging to one case
    Case(String),
}

impl Scope {
    pub fn case(id: impl Into<String>) -> Self {
        Scope::Case(id.into())
    }

    pub fn as_key(&self) -> String {
        match self {
            Scope::Session => "session".to_string(),
            Scope::Device => "device".to_string(),
            Scope::Case(id) => format!("case:{id}"),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// SQLite-backed scoped key-value store.
pub struct LocalStore {
    connection: Connection,
}

impl LocalStore {
    /// Opens (or creates) the store and initializes the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open local store")?;
        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory store")?;
        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize store schema")
    }

    /// Reads and decodes a value.
    pub fn get<T: DeserializeOwned>(&self, scope: &Scope, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .connection
            .query_row(SELECT_VALUE_SQL, params![scope.as_key(), key], |row| {
                row.get(0)
            })
            .optional()
            .db_context("Failed to read stored value")?;

        raw.map(|text| serde_json::from_str(&text).map_err(DocketError::from))
            .transpose()
    }

    /// Encodes and writes a value, replacing any previous one.
    pub fn put<T: Serialize + ?Sized>(&self, scope: &Scope, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.connection
            .execute(
                UPSERT_VALUE_SQL,
                params![scope.as_key(), key, text, Timestamp::now().to_string()],
            )
            .db_context("Failed to write stored value")?;
        debug!("Stored {scope}/{key}");
        Ok(())
    }

    /// Removes a value. Returns whether anything was removed.
    pub fn remove(&self, scope: &Scope, key: &str) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_VALUE_SQL, params![scope.as_key(), key])
            .db_context("Failed to remove stored value")?;
        Ok(removed > 0)
    }

    /// Removes every value in a scope. Returns the number removed.
    pub fn clear_scope(&self, scope: &Scope) -> Result<usize> {
        self.connection
            .execute(DELETE_SCOPE_SQL, params![scope.as_key()])
            .db_context("Failed to clear scope")
    }

    /// The stored login, if a token is present.
    pub fn session(&self) -> Result<Option<UserSession>> {
        let Some(token) = self.get::<String>(&Scope::Session, TOKEN_KEY)? else {
            return Ok(None);
        };
        Ok(Some(UserSession {
            token,
            user_name: self
                .get(&Scope::Session, USER_NAME_KEY)?
                .unwrap_or_default(),
            email: self
                .get(&Scope::Session, USER_EMAIL_KEY)?
                .unwrap_or_default(),
        }))
    }

    pub fn save_session(&self, session: &UserSession) -> Result<()> {
        self.put(&Scope::Session, TOKEN_KEY, &session.token)?;
        self.put(&Scope::Session, USER_NAME_KEY, &session.user_name)?;
        self.put(&Scope::Session, USER_EMAIL_KEY, &session.email)
    }

    /// Drops only the bearer token, keeping the remembered name and email.
    pub fn clear_token(&self) -> Result<bool> {
        self.remove(&Scope::Session, TOKEN_KEY)
    }

    pub fn clear_session(&self) -> Result<usize> {
        self.clear_scope(&Scope::Session)
    }

    pub fn jurisdiction(&self) -> Result<Jurisdiction> {
        Ok(self
            .get(&Scope::Device, JURISDICTION_KEY)?
            .unwrap_or_default())
    }

    pub fn save_jurisdiction(&self, jurisdiction: &Jurisdiction) -> Result<()> {
        self.put(&Scope::Device, JURISDICTION_KEY, jurisdiction)
    }

    /// Transcript of the general assistant, if one was saved.
    pub fn general_chat(&self) -> Result<Option<Vec<ChatMessage>>> {
        self.get(&Scope::Device, GENERAL_CHAT_KEY)
    }

    pub fn save_general_chat(&self, messages: &[ChatMessage]) -> Result<()> {
        self.put(&Scope::Device, GENERAL_CHAT_KEY, messages)
    }

    pub fn clear_general_chat(&self) -> Result<bool> {
        self.remove(&Scope::Device, GENERAL_CHAT_KEY)
    }

    /// The autosaved workspace of a case.
    ///
    /// A snapshot that no longer decodes is discarded and reported as absent.
    pub fn autosave(&self, case_id: &str) -> Result<Option<WorkspaceSnapshot>> {
        let scope = Scope::case(case_id);
        match self.get::<WorkspaceSnapshot>(&scope, AUTOSAVE_KEY) {
            Ok(snapshot) => Ok(snapshot),
            Err(DocketError::Serialization { source }) => {
                warn!("Discarding unreadable autosave for case {case_id}: {source}");
                self.remove(&scope, AUTOSAVE_KEY)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn save_autosave(&self, snapshot: &WorkspaceSnapshot) -> Result<()> {
        self.put(&Scope::case(&snapshot.case_id), AUTOSAVE_KEY, snapshot)
    }

    /// Forgets everything stored for a case.
    pub fn discard_case(&self, case_id: &str) -> Result<usize> {
        self.clear_scope(&Scope::case(case_id))
    }
}
