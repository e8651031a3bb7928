//! SQL Server catalog adapter.
//!
//! This module provides the SQL Server adapter with:
//! - A single tiberius (TDS) connection over a tokio `TcpStream`
//! - Table, column, primary key and foreign key lookup in `sys.*` views
//! - Column descriptions from the `MS_Description` extended property

use super::CatalogAdapter;
use async_trait::async_trait;
use tablemd_core::{
    BackendKind, ColumnDescriptor, Result, TableMdError, TableMetadata, TablePattern,
    config::{SqlServerAuth, SqlServerSettings},
};
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

const TABLES_SQL: &str = "SELECT t.name
       FROM sys.tables t
      WHERE t.is_ms_shipped = 0
        AND ((@P1 = 1 AND UPPER(t.name) LIKE UPPER(@P2))
          OR (@P1 = 0 AND UPPER(t.name) = UPPER(@P2)))
      ORDER BY t.name";

const COLUMNS_SQL: &str = "SELECT c.name,
            ty.name,
            c.max_length,
            c.precision,
            c.scale,
            c.is_nullable,
            dc.definition,
            CAST(ep.value AS NVARCHAR(MAX))
       FROM sys.tables t
       JOIN sys.columns c ON t.object_id = c.object_id
       JOIN sys.types ty ON c.user_type_id = ty.user_type_id
       LEFT JOIN sys.default_constraints dc ON c.default_object_id = dc.object_id
       LEFT JOIN sys.extended_properties ep
         ON ep.major_id = t.object_id
        AND ep.minor_id = c.column_id
        AND ep.name = 'MS_Description'
      WHERE t.name = @P1
      ORDER BY c.column_id";

const PRIMARY_KEY_SQL: &str = "SELECT c.name
       FROM sys.key_constraints k
       JOIN sys.tables t ON t.object_id = k.parent_object_id
       JOIN sys.index_columns ic ON ic.object_id = t.object_id AND ic.index_id = k.unique_index_id
       JOIN sys.columns c ON c.object_id = t.object_id AND c.column_id = ic.column_id
      WHERE k.type = 'PK' AND t.name = @P1";

const FOREIGN_KEYS_SQL: &str = "SELECT pc.name, rt.name, rc.name
       FROM sys.foreign_keys f
       JOIN sys.foreign_key_columns fkc ON f.object_id = fkc.constraint_object_id
       JOIN sys.tables pt ON pt.object_id = f.parent_object_id
       JOIN sys.columns pc ON pc.object_id = pt.object_id AND pc.column_id = fkc.parent_column_id
       JOIN sys.tables rt ON rt.object_id = f.referenced_object_id
       JOIN sys.columns rc ON rc.object_id = rt.object_id AND rc.column_id = fkc.referenced_column_id
      WHERE pt.name = @P1
      ORDER BY f.object_id, fkc.constraint_column_id";

/// SQL Server adapter holding one live connection.
pub struct SqlServerAdapter {
    client: Option<Client<Compat<TcpStream>>>,
    database: Option<String>,
    identifier: String,
    description: String,
}

impl SqlServerAdapter {
    /// Connects using the given settings.
    ///
    /// # Security
    ///
    /// - Only [`SqlServerSettings::safe_description`] is logged
    /// - The login password is handed to tiberius and not kept here
    ///
    /// # Errors
    ///
    /// Returns [`TableMdError::BackendUnavailable`] when integrated
    /// authentication is requested on a platform without it, and
    /// [`TableMdError::Connection`] if the TCP connection or login fails.
    pub async fn connect(settings: SqlServerSettings, identifier: String) -> Result<Self> {
        let description = settings.safe_description();
        tracing::info!("Connecting to {}", description);

        let config = build_config(&settings)?;

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| TableMdError::connection_failed(description.clone(), e))?;
        tcp.set_nodelay(true)
            .map_err(|e| TableMdError::connection_failed(description.clone(), e))?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| TableMdError::connection_failed(description.clone(), e))?;

        tracing::debug!("Connected to {}", description);

        Ok(Self {
            client: Some(client),
            database: settings.database,
            identifier,
            description,
        })
    }

    fn client(&mut self, context: &str) -> Result<&mut Client<Compat<TcpStream>>> {
        self.client
            .as_mut()
            .ok_or_else(|| TableMdError::query_failed(context, "SQL Server connection is closed"))
    }

    /// Runs a query and returns the rows of its first result set.
    async fn fetch(
        &mut self,
        context: &str,
        sql: &str,
        params: &[&dyn tiberius::ToSql],
    ) -> Result<Vec<Row>> {
        let client = self.client(context)?;
        let stream = client
            .query(sql, params)
            .await
            .map_err(|e| TableMdError::query_failed(context, e))?;
        stream
            .into_first_result()
            .await
            .map_err(|e| TableMdError::query_failed(context, e))
    }
}

/// Translates settings into a tiberius [`Config`].
fn build_config(settings: &SqlServerSettings) -> Result<Config> {
    let mut config = Config::new();
    config.host(&settings.server);
    config.port(settings.port);
    if let Some(database) = &settings.database {
        config.database(database);
    }

    config.authentication(auth_method(&settings.auth)?);

    config.encryption(if settings.encrypt {
        EncryptionLevel::Required
    } else {
        EncryptionLevel::Off
    });
    if settings.trust_server_certificate {
        config.trust_cert();
    }

    Ok(config)
}

fn auth_method(auth: &SqlServerAuth) -> Result<AuthMethod> {
    match auth {
        SqlServerAuth::SqlLogin(credentials) => Ok(AuthMethod::sql_server(
            credentials.username(),
            credentials.password(),
        )),
        #[cfg(windows)]
        SqlServerAuth::Integrated => Ok(AuthMethod::Integrated),
        #[cfg(not(windows))]
        SqlServerAuth::Integrated => Err(TableMdError::backend_unavailable(
            "SQL Server",
            "integrated authentication is only available on Windows",
            "Set MSSQL_TRUSTED_CONNECTION=no and provide MSSQL_USER / MSSQL_PWD",
        )),
    }
}

/// Builds a column from raw `sys.columns` values.
///
/// SQL Server reports `precision = 0` for types without a precision
/// (character, binary, date); scale only means something next to a
/// precision.
#[allow(clippy::too_many_arguments)]
fn column_from_catalog(
    name: &str,
    data_type: &str,
    max_length: i16,
    precision: u8,
    scale: u8,
    is_nullable: bool,
    default_value: Option<&str>,
    comment: Option<&str>,
) -> ColumnDescriptor {
    let mut column = ColumnDescriptor::new(name, data_type)
        .with_length(i64::from(max_length))
        .with_nullable(is_nullable);
    if precision > 0 {
        column = column.with_precision(i64::from(precision), Some(i64::from(scale)));
    }
    column.default_value = default_value.map(str::to_string);
    column.comment = comment.map(str::to_string);
    column
}

/// `@P1` of the enumeration query: 1 selects the `LIKE` branch, 0 equality.
fn like_flag(pattern: &TablePattern) -> i32 {
    i32::from(pattern.is_like())
}

fn required_str<'a>(row: &'a Row, index: usize, context: &str) -> Result<&'a str> {
    row.try_get::<&str, _>(index)
        .map_err(|e| TableMdError::query_failed(context, e))?
        .ok_or_else(|| {
            TableMdError::query_failed(context, format!("unexpected NULL in column {index}"))
        })
}

fn column_from_row(row: &Row, context: &str) -> Result<ColumnDescriptor> {
    let query_error = |e: tiberius::error::Error| TableMdError::query_failed(context, e);

    let max_length = row.try_get::<i16, _>(2).map_err(query_error)?.unwrap_or(0);
    let precision = row.try_get::<u8, _>(3).map_err(query_error)?.unwrap_or(0);
    let scale = row.try_get::<u8, _>(4).map_err(query_error)?.unwrap_or(0);
    let is_nullable = row
        .try_get::<bool, _>(5)
        .map_err(query_error)?
        .unwrap_or(true);
    let default_value = row.try_get::<&str, _>(6).map_err(query_error)?;
    let comment = row.try_get::<&str, _>(7).map_err(query_error)?;

    Ok(column_from_catalog(
        required_str(row, 0, context)?,
        required_str(row, 1, context)?,
        max_length,
        precision,
        scale,
        is_nullable,
        default_value,
        comment,
    ))
}

#[async_trait]
impl CatalogAdapter for SqlServerAdapter {
    fn backend(&self) -> BackendKind {
        BackendKind::SqlServer
    }

    fn backend_identifier(&self) -> &str {
        &self.identifier
    }

    fn scope_description(&self) -> String {
        format!(
            "database={}",
            self.database.as_deref().unwrap_or("<default>")
        )
    }

    fn safe_description(&self) -> String {
        self.description.clone()
    }

    async fn enumerate_tables(&mut self, pattern: &TablePattern) -> Result<Vec<String>> {
        let context = "listing tables";
        let like_flag = like_flag(pattern);
        let pat = pattern.as_str();
        tracing::debug!("Enumerating tables matching {}", pat);

        let rows = self.fetch(context, TABLES_SQL, &[&like_flag, &pat]).await?;
        rows.iter()
            .map(|row| required_str(row, 0, context).map(str::to_string))
            .collect()
    }

    async fn collect_metadata(&mut self, table: &str) -> Result<TableMetadata> {
        let context = format!("reading catalog for {table}");
        tracing::debug!("Collecting metadata for {}", table);

        let mut metadata = TableMetadata::new(table);

        for row in self.fetch(&context, COLUMNS_SQL, &[&table]).await? {
            metadata.columns.push(column_from_row(&row, &context)?);
        }

        for row in self.fetch(&context, PRIMARY_KEY_SQL, &[&table]).await? {
            metadata
                .primary_key
                .insert(required_str(&row, 0, &context)?.to_string());
        }

        for row in self.fetch(&context, FOREIGN_KEYS_SQL, &[&table]).await? {
            metadata.foreign_keys.insert(
                required_str(&row, 0, &context)?,
                required_str(&row, 1, &context)?,
                required_str(&row, 2, &context)?,
            );
        }

        Ok(metadata)
    }

    async fn close(&mut self) -> Result<()> {
        let Some(client) = self.client.take() else {
            return Ok(());
        };
        tracing::debug!("Closing connection to {}", self.description);

        client
            .close()
            .await
            .map_err(|e| TableMdError::connection_failed(format!("closing {}", self.description), e))
    }
}
