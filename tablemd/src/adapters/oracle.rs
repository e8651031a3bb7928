//! Oracle catalog adapter.
//!
//! This module provides the Oracle adapter with:
//! - One ODPI-C connection per run, used from tokio's blocking pool
//! - Table, column, primary key and foreign key lookup in `ALL_*` views
//! - Owner and table names upper-cased before binding
//!
//! # Note
//!
//! The `oracle` crate loads Oracle Instant Client at runtime. When the
//! library cannot be found the connection attempt fails with `DPI-1047`,
//! which is reported as a missing backend rather than a login failure.

use super::CatalogAdapter;
use async_trait::async_trait;
use oracle::Connection;
use std::sync::{Arc, Mutex};
use tablemd_core::{
    BackendKind, ColumnDescriptor, Result, TableMdError, TableMetadata, TablePattern,
    config::OracleSettings,
};

/// ODPI-C error raised when the Oracle client library cannot be loaded
const CLIENT_LIBRARY_MISSING: &str = "DPI-1047";

const TABLES_LIKE_SQL: &str = "SELECT table_name
       FROM all_tables
      WHERE owner = :owner
        AND UPPER(table_name) LIKE UPPER(:pat)
      ORDER BY table_name";

const TABLES_EXACT_SQL: &str = "SELECT table_name
       FROM all_tables
      WHERE owner = :owner
        AND UPPER(table_name) = UPPER(:pat)
      ORDER BY table_name";

const COLUMNS_SQL: &str = "SELECT c.column_name,
            c.data_type,
            c.data_length,
            c.data_precision,
            c.data_scale,
            c.nullable,
            c.data_default,
            com.comments
       FROM all_tab_columns c
       LEFT JOIN all_col_comments com
         ON com.owner = c.owner
        AND com.table_name = c.table_name
        AND com.column_name = c.column_name
      WHERE c.owner = :owner AND c.table_name = :tab
      ORDER BY c.column_id";

const PRIMARY_KEY_SQL: &str = "SELECT cc.column_name
       FROM all_constraints a
       JOIN all_cons_columns cc
         ON a.owner = cc.owner AND a.constraint_name = cc.constraint_name
      WHERE a.owner = :owner AND a.table_name = :tab AND a.constraint_type = 'P'";

const FOREIGN_KEYS_SQL: &str = "SELECT acc.column_name,
            r.table_name,
            rcc.column_name
       FROM all_constraints a
       JOIN all_cons_columns acc
         ON a.owner = acc.owner AND a.constraint_name = acc.constraint_name
       JOIN all_constraints r
         ON r.owner = a.r_owner AND r.constraint_name = a.r_constraint_name
       JOIN all_cons_columns rcc
         ON r.owner = rcc.owner
        AND r.constraint_name = rcc.constraint_name
        AND rcc.position = acc.position
      WHERE a.owner = :owner AND a.table_name = :tab AND a.constraint_type = 'R'
      ORDER BY a.constraint_name, acc.position";

/// Oracle adapter holding one live connection.
pub struct OracleAdapter {
    connection: Option<Arc<Mutex<Connection>>>,
    owner: String,
    identifier: String,
    description: String,
}

impl OracleAdapter {
    /// Connects using the given settings.
    ///
    /// # Security
    ///
    /// - Only [`OracleSettings::safe_description`] is logged
    /// - Driver errors are wrapped with the credential-free description
    ///
    /// # Errors
    ///
    /// Returns [`TableMdError::BackendUnavailable`] if Oracle Instant Client
    /// cannot be loaded and [`TableMdError::Connection`] for any other
    /// connection failure.
    pub async fn connect(settings: OracleSettings, identifier: String) -> Result<Self> {
        let description = settings.safe_description();
        tracing::info!("Connecting to {}", description);

        let connect_string = settings.connect_string();
        let credentials = settings.credentials.clone();
        let connection = tokio::task::spawn_blocking(move || {
            Connection::connect(
                credentials.username(),
                credentials.password(),
                connect_string,
            )
        })
        .await
        .map_err(|e| TableMdError::connection_failed(description.clone(), e))?
        .map_err(|e| classify_connect_error(&description, e))?;

        tracing::debug!("Connected to {}", description);

        Ok(Self {
            connection: Some(Arc::new(Mutex::new(connection))),
            owner: catalog_name(&settings.schema),
            identifier,
            description,
        })
    }

    /// Runs `query` against the connection on the blocking pool.
    async fn run_blocking<T, F>(&self, context: String, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> oracle::Result<T> + Send + 'static,
    {
        let connection = self.connection.clone().ok_or_else(|| {
            TableMdError::query_failed(context.clone(), "Oracle connection is closed")
        })?;

        let task_context = context.clone();
        tokio::task::spawn_blocking(move || {
            let guard = connection.lock().map_err(|_| {
                TableMdError::query_failed(task_context.clone(), "Oracle connection lock poisoned")
            })?;
            query(&guard).map_err(|e| TableMdError::query_failed(task_context, e))
        })
        .await
        .map_err(|e| TableMdError::query_failed(context, e))?
    }
}

/// Catalog key for a table: the data dictionary stores unquoted names upper-cased.
fn catalog_name(table: &str) -> String {
    table.to_uppercase()
}

/// Enumeration query for `pattern`: `LIKE` for wildcards, equality otherwise.
fn tables_sql(pattern: &TablePattern) -> &'static str {
    if pattern.is_like() {
        TABLES_LIKE_SQL
    } else {
        TABLES_EXACT_SQL
    }
}

/// Builds a column from one `ALL_TAB_COLUMNS` row.
///
/// `DATA_LENGTH` is always present in the Oracle catalog, so the length is
/// always set; `NULLABLE` is `'Y'` or `'N'`.
#[allow(clippy::too_many_arguments)]
fn column_from_catalog(
    name: String,
    data_type: String,
    data_length: i64,
    precision: Option<i64>,
    scale: Option<i64>,
    nullable: &str,
    default_value: Option<String>,
    comment: Option<String>,
) -> ColumnDescriptor {
    let mut column = ColumnDescriptor::new(name, data_type)
        .with_length(data_length)
        .with_nullable(nullable == "Y");
    column.precision = precision;
    column.scale = scale;
    column.default_value = default_value;
    column.comment = comment;
    column
}

/// Maps a connect failure to a missing client library or a plain connection error.
fn classify_connect_error(description: &str, error: oracle::Error) -> TableMdError {
    if error.to_string().contains(CLIENT_LIBRARY_MISSING) {
        TableMdError::backend_unavailable(
            "Oracle",
            "the Oracle client library (Instant Client) could not be loaded",
            "Install Oracle Instant Client and add its directory to LD_LIBRARY_PATH \
             (PATH on Windows, DYLD_LIBRARY_PATH on macOS)",
        )
    } else {
        TableMdError::connection_failed(description.to_string(), error)
    }
}

#[async_trait]
impl CatalogAdapter for OracleAdapter {
    fn backend(&self) -> BackendKind {
        BackendKind::Oracle
    }

    fn backend_identifier(&self) -> &str {
        &self.identifier
    }

    fn scope_description(&self) -> String {
        format!("schema={}", self.owner)
    }

    fn safe_description(&self) -> String {
        self.description.clone()
    }

    async fn enumerate_tables(&mut self, pattern: &TablePattern) -> Result<Vec<String>> {
        let sql = tables_sql(pattern);
        let owner = self.owner.clone();
        let pat = pattern.as_str().to_string();
        tracing::debug!("Enumerating tables in {} matching {}", owner, pat);

        self.run_blocking(format!("listing tables in {owner}"), move |conn| {
            let rows = conn.query_named(sql, &[("owner", &owner), ("pat", &pat)])?;
            rows.map(|row| row?.get::<_, String>(0))
                .collect::<oracle::Result<Vec<String>>>()
        })
        .await
    }

    async fn collect_metadata(&mut self, table: &str) -> Result<TableMetadata> {
        let owner = self.owner.clone();
        let table = table.to_string();
        let name = catalog_name(&table);
        tracing::debug!("Collecting metadata for {}.{}", owner, name);

        self.run_blocking(format!("reading catalog for {owner}.{name}"), move |conn| {
            let mut metadata = TableMetadata::new(table);
            let binds: [(&str, &dyn oracle::sql_type::ToSql); 2] =
                [("owner", &owner), ("tab", &name)];

            for row in conn.query_named(COLUMNS_SQL, &binds)? {
                let row = row?;
                metadata.columns.push(column_from_catalog(
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    &row.get::<_, String>(5)?,
                    row.get(6)?,
                    row.get(7)?,
                ));
            }

            for row in conn.query_named(PRIMARY_KEY_SQL, &binds)? {
                metadata.primary_key.insert(row?.get::<_, String>(0)?);
            }

            for row in conn.query_named(FOREIGN_KEYS_SQL, &binds)? {
                let row = row?;
                metadata.foreign_keys.insert(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                );
            }

            Ok(metadata)
        })
        .await
    }

    async fn close(&mut self) -> Result<()> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };
        let description = self.description.clone();
        tracing::debug!("Closing connection to {}", description);

        tokio::task::spawn_blocking(move || {
            let guard = connection
                .lock()
                .map_err(|_| "Oracle connection lock poisoned".to_string())?;
            guard.close().map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| TableMdError::connection_failed(description.clone(), e))?
        .map_err(|e| TableMdError::connection_failed(format!("closing {description}"), e))
    }
}
