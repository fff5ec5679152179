//! Catalog CRUD for every registered kind.

use std::collections::BTreeMap;

use basegrid_assets::{AssetStore, ResolveMode, UploadedFile, is_asset_reference, resolve_image};
use basegrid_model::{CatalogKind, CatalogRecord, FieldType, FieldValue, KindSchema, project};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{OptionalExtension, Row, params, params_from_iter};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};
use crate::{SharedConnection, lock, now_millis};

/// Form values (and optional file) submitted for a create or update.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub fields: BTreeMap<String, String>,
    pub upload: Option<UploadedFile>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a form field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Attaches an uploaded file.
    pub fn with_upload(mut self, upload: UploadedFile) -> Self {
        self.upload = Some(upload);
        self
    }

    /// The literal `image` value, if one was submitted.
    pub fn image_literal(&self) -> Option<&str> {
        self.fields.get("image").map(String::as_str)
    }
}

/// Result of a successful add or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub id: i64,
    pub message: String,
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    pub id: i64,
    /// Success message, with the verification note appended.
    pub message: String,
    pub verification: Verification,
}

/// Read-back comparison of an updated row against what was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Verification {
    pub checks: Vec<FieldCheck>,
    /// Set when the row could not be read back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCheck {
    pub field: String,
    pub submitted: Value,
    pub stored: Value,
    pub matches: bool,
}

impl Verification {
    /// True when the row was read back and every written field matched.
    pub fn is_consistent(&self) -> bool {
        self.error.is_none() && self.checks.iter().all(|c| c.matches)
    }

    /// Diagnostic suffix for the update message. The color check is always
    /// reported; other fields only when they differ.
    pub fn note(&self) -> String {
        if let Some(error) = &self.error {
            return format!(" | WARNING: could not verify update ({error})");
        }
        let mut note = String::new();
        for check in &self.checks {
            if check.field == "color" {
                let mark = if check.matches { "✓" } else { "✗" };
                note.push_str(&format!(
                    " | Submitted: {} | In DB: {} {mark}",
                    display_value(&check.submitted),
                    display_value(&check.stored)
                ));
            } else if !check.matches {
                note.push_str(&format!(
                    " | WARNING: {} stored as {} (submitted {})",
                    check.field,
                    display_value(&check.stored),
                    display_value(&check.submitted)
                ));
            }
        }
        note
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

/// Catalog store over the shared connection.
///
/// Every SQL statement takes its table name from the schema registry, never
/// from caller input.
#[derive(Clone)]
pub struct EntityStore {
    conn: SharedConnection,
    assets: AssetStore,
}

impl EntityStore {
    pub fn new(conn: SharedConnection, assets: AssetStore) -> Self {
        Self { conn, assets }
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Inserts a new record and returns its server-assigned id.
    ///
    /// Fields are validated before any upload is written. If the insert
    /// itself fails after an upload was stored, the file stays behind.
    pub fn add(&self, kind: CatalogKind, submission: &Submission) -> StorageResult<WriteOutcome> {
        let schema = kind.schema();
        let validated = schema.validate(&submission.fields)?;
        let image = self.resolve(schema, ResolveMode::Create, submission)?;
        let columns = assemble(schema, validated, image);

        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        let placeholders: Vec<String> = (1..=columns.len() + 1).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}, created_at) VALUES ({})",
            schema.collection,
            names.join(", "),
            placeholders.join(", ")
        );
        let mut values: Vec<SqlValue> = columns.iter().map(|(_, v)| to_sql(v)).collect();
        values.push(SqlValue::Integer(now_millis()));

        let id = {
            let conn = lock(&self.conn)?;
            conn.execute(&sql, params_from_iter(values))
                .inspect_err(|e| warn_orphan(kind, &columns, e))?;
            conn.last_insert_rowid()
        };

        info!("Added {} #{}", kind, id);
        Ok(WriteOutcome {
            id,
            message: format!("{} added successfully!", kind.label()),
        })
    }

    /// Overwrites a record's declared fields in place.
    ///
    /// Without a new file or literal the image column is left out of the
    /// write entirely. The existence check and the write are separate
    /// statements: a concurrent update in between is last-writer-wins.
    pub fn update(
        &self,
        kind: CatalogKind,
        id: i64,
        submission: &Submission,
    ) -> StorageResult<UpdateOutcome> {
        let schema = kind.schema();
        let validated = schema.validate(&submission.fields)?;
        if !self.exists(kind, id)? {
            return Err(not_found(kind, id));
        }
        let image = self.resolve(schema, ResolveMode::Update, submission)?;
        let columns = assemble(schema, validated, image);

        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, (name, _))| format!("{name} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            schema.collection,
            assignments.join(", "),
            columns.len() + 1
        );
        let mut values: Vec<SqlValue> = columns.iter().map(|(_, v)| to_sql(v)).collect();
        values.push(SqlValue::Integer(id));

        let affected = {
            let conn = lock(&self.conn)?;
            conn.execute(&sql, params_from_iter(values))
                .inspect_err(|e| warn_orphan(kind, &columns, e))?
        };
        if affected == 0 {
            return Err(not_found(kind, id));
        }
        debug!("Updated {} #{} ({} columns)", kind, id, columns.len());

        let verification = self.verify(kind, id, &columns);
        if !verification.is_consistent() {
            warn!("Verification of {} #{} after update: {}", kind, id, verification.note());
        }
        Ok(UpdateOutcome {
            id,
            message: format!("{} updated successfully!{}", kind.label(), verification.note()),
            verification,
        })
    }

    /// Removes one record. Fails with `NotFound` when no row matched.
    /// Uploaded files referenced by the record are left on disk.
    pub fn delete(&self, kind: CatalogKind, id: i64) -> StorageResult<WriteOutcome> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.schema().collection);
        let affected = {
            let conn = lock(&self.conn)?;
            conn.execute(&sql, params![id])?
        };
        if affected == 0 {
            return Err(not_found(kind, id));
        }

        info!("Deleted {} #{}", kind, id);
        Ok(WriteOutcome {
            id,
            message: format!("{} deleted successfully!", kind.label()),
        })
    }

    /// Fetches a single projected record.
    pub fn get(&self, kind: CatalogKind, id: i64) -> StorageResult<CatalogRecord> {
        let schema = kind.schema();
        let sql = format!("SELECT * FROM {} WHERE id = ?1", schema.collection);
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&sql)?;
        let names = column_names(&stmt);
        let raw = stmt
            .query_row(params![id], |row| row_to_map(row, &names))
            .optional()?;
        match raw {
            Some(raw) => Ok(to_record(schema, &raw)),
            None => Err(not_found(kind, id)),
        }
    }

    /// All records of a kind, newest first (ties broken by id, descending),
    /// projected to the kind's declared columns.
    pub fn list(&self, kind: CatalogKind) -> StorageResult<Vec<CatalogRecord>> {
        let schema = kind.schema();
        let sql = format!(
            "SELECT * FROM {} ORDER BY created_at DESC, id DESC",
            schema.collection
        );
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&sql)?;
        let names = column_names(&stmt);
        let rows = stmt.query_map([], |row| row_to_map(row, &names))?;

        let mut records = Vec::new();
        for raw in rows {
            records.push(to_record(schema, &raw?));
        }
        Ok(records)
    }

    /// Number of records of a kind.
    pub fn count(&self, kind: CatalogKind) -> StorageResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.schema().collection);
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn exists(&self, kind: CatalogKind, id: i64) -> StorageResult<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", kind.schema().collection);
        let conn = lock(&self.conn)?;
        let found: Option<i64> = conn
            .query_row(&sql, params![id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    fn resolve(
        &self,
        schema: &KindSchema,
        mode: ResolveMode,
        submission: &Submission,
    ) -> StorageResult<Option<String>> {
        if schema.image_field().is_none() {
            return Ok(None);
        }
        let resolution = resolve_image(
            &self.assets,
            mode,
            submission.upload.as_ref(),
            submission.image_literal(),
            schema.default_image(),
        )?;
        Ok(resolution.value().map(str::to_string))
    }

    /// Reads the row back and compares it with the written columns.
    /// Never fails; problems end up in the returned diagnostic.
    fn verify(
        &self,
        kind: CatalogKind,
        id: i64,
        written: &[(&'static str, FieldValue)],
    ) -> Verification {
        let stored = match self.get(kind, id) {
            Ok(record) => record,
            Err(StorageError::NotFound { .. }) => {
                return Verification {
                    checks: Vec::new(),
                    error: Some(format!("record not found after update (ID: {id})")),
                };
            }
            Err(e) => {
                return Verification {
                    checks: Vec::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        let checks = written
            .iter()
            .map(|(field, value)| {
                let submitted = value.to_json();
                let stored_value = stored.data.get(*field).cloned().unwrap_or(Value::Null);
                let matches = if *field == "color" {
                    match (submitted.as_str(), stored_value.as_str()) {
                        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                        _ => false,
                    }
                } else {
                    submitted == stored_value
                };
                FieldCheck {
                    field: field.to_string(),
                    submitted,
                    stored: stored_value,
                    matches,
                }
            })
            .collect();

        Verification {
            checks,
            error: None,
        }
    }
}

/// Merges validated scalars and the resolved image into canonical column order.
fn assemble(
    schema: &KindSchema,
    validated: Vec<(&'static str, FieldValue)>,
    mut image: Option<String>,
) -> Vec<(&'static str, FieldValue)> {
    let mut columns = Vec::with_capacity(schema.fields.len());
    for field in schema.fields {
        if field.field_type == FieldType::Image {
            if let Some(value) = image.take() {
                columns.push((field.name, FieldValue::Text(value)));
            }
        } else if let Some((_, value)) = validated.iter().find(|(name, _)| *name == field.name) {
            columns.push((field.name, value.clone()));
        }
    }
    columns
}

fn to_sql(value: &FieldValue) -> SqlValue {
    match value {
        FieldValue::Int(n) => SqlValue::Integer(*n),
        FieldValue::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn not_found(kind: CatalogKind, id: i64) -> StorageError {
    StorageError::NotFound {
        kind: kind.tag().to_string(),
        id,
    }
}

fn warn_orphan(kind: CatalogKind, columns: &[(&'static str, FieldValue)], err: &rusqlite::Error) {
    let upload = columns.iter().find_map(|(name, value)| match value {
        FieldValue::Text(s) if *name == "image" && is_asset_reference(s) => Some(s),
        _ => None,
    });
    if let Some(reference) = upload {
        warn!("Write to {} failed ({}); upload {} is orphaned", kind, err, reference);
    }
}

fn column_names(stmt: &rusqlite::Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn row_to_map(row: &Row<'_>, names: &[String]) -> rusqlite::Result<Map<String, Value>> {
    let mut map = Map::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let value = match row.get_ref(i)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::from(n),
            ValueRef::Real(f) => Value::from(f),
            ValueRef::Text(t) => Value::from(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::from(b.to_vec()),
        };
        map.insert(name.clone(), value);
    }
    Ok(map)
}

fn to_record(schema: &KindSchema, raw: &Map<String, Value>) -> CatalogRecord {
    CatalogRecord {
        id: raw.get("id").and_then(Value::as_i64).unwrap_or_default(),
        kind: schema.kind,
        data: project(schema, raw),
        created_at: raw.get("created_at").and_then(Value::as_i64).unwrap_or_default(),
    }
}
