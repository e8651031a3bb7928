//! Typed connection settings for the two supported catalogs.
//!
//! These are built from [`Properties`] only when the corresponding backend
//! is selected, so a SQL Server configuration never has to carry Oracle keys
//! and vice versa.

use super::Properties;
use crate::{Result, error::TableMdError, security::Credentials};

/// Default Oracle listener port
pub const DEFAULT_ORACLE_PORT: u16 = 1521;
/// Default SQL Server TCP port
pub const DEFAULT_SQLSERVER_PORT: u16 = 1433;
/// Driver name reported when `MSSQL_DRIVER` is not set
pub const DEFAULT_SQLSERVER_DRIVER: &str = "ODBC Driver 18 for SQL Server";

/// How an Oracle database is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleTarget {
    /// Connect by service name (EZConnect)
    ServiceName(String),
    /// Connect by instance SID
    Sid(String),
}

/// Connection settings for Oracle.
#[derive(Debug, Clone)]
pub struct OracleSettings {
    /// Listener host
    pub host: String,
    /// Listener port
    pub port: u16,
    /// Login user and password
    pub credentials: Credentials,
    /// Service name or SID
    pub target: OracleTarget,
    /// Catalog owner whose tables are documented (upper-cased at query time)
    pub schema: String,
}

impl OracleSettings {
    /// Builds Oracle settings from `ORA_*` keys.
    ///
    /// `ORA_SERVICE` wins over `ORA_SID` when both are set. `ORA_SCHEMA`
    /// defaults to `ORA_USER`.
    ///
    /// # Errors
    /// Returns a configuration error when `ORA_HOST` or `ORA_USER` is
    /// missing, the port is invalid, or neither service name nor SID is set.
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let host = required(props, "ORA_HOST")?;
        let port = parse_port(props, "ORA_PORT", DEFAULT_ORACLE_PORT)?;
        let user = required(props, "ORA_USER")?;
        let password = props.get("ORA_PWD").map(str::to_string);

        let target = if let Some(service) = props.get_non_empty("ORA_SERVICE") {
            OracleTarget::ServiceName(service.to_string())
        } else if let Some(sid) = props.get_non_empty("ORA_SID") {
            OracleTarget::Sid(sid.to_string())
        } else {
            return Err(TableMdError::configuration(
                "either ORA_SERVICE or ORA_SID must be set",
            ));
        };

        let schema = props
            .get_non_empty("ORA_SCHEMA")
            .unwrap_or(user.as_str())
            .to_string();

        Ok(Self {
            host,
            port,
            credentials: Credentials::new(user, password),
            target,
            schema,
        })
    }

    /// Connect string understood by the Oracle client.
    ///
    /// ```rust
    /// use tablemd_core::config::{OracleSettings, Properties};
    ///
    /// let props = Properties::parse("ORA_HOST=db\nORA_USER=scott\nORA_SERVICE=ORCLPDB1");
    /// let settings = OracleSettings::from_properties(&props).unwrap();
    /// assert_eq!(settings.connect_string(), "//db:1521/ORCLPDB1");
    /// ```
    pub fn connect_string(&self) -> String {
        match &self.target {
            OracleTarget::ServiceName(service) => {
                format!("//{}:{}/{}", self.host, self.port, service)
            }
            OracleTarget::Sid(sid) => format!(
                "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST={})(PORT={}))(CONNECT_DATA=(SID={})))",
                self.host, self.port, sid
            ),
        }
    }

    /// Credential-free description for logs and error context.
    pub fn safe_description(&self) -> String {
        let target = match &self.target {
            OracleTarget::ServiceName(service) => format!("service {service}"),
            OracleTarget::Sid(sid) => format!("SID {sid}"),
        };
        format!(
            "Oracle {}:{} ({}) as {}",
            self.host,
            self.port,
            target,
            self.credentials.username()
        )
    }
}

/// How to authenticate against SQL Server.
#[derive(Debug, Clone)]
pub enum SqlServerAuth {
    /// Integrated (trusted) Windows authentication
    Integrated,
    /// SQL Server login
    SqlLogin(Credentials),
}

/// Connection settings for SQL Server.
#[derive(Debug, Clone)]
pub struct SqlServerSettings {
    /// Client driver name (reported only; the TDS client is built in)
    pub driver: String,
    /// Server host
    pub server: String,
    /// TCP port
    pub port: u16,
    /// Database to document
    pub database: Option<String>,
    /// Authentication mode
    pub auth: SqlServerAuth,
    /// Require an encrypted connection
    pub encrypt: bool,
    /// Accept the server certificate without validation
    pub trust_server_certificate: bool,
}

impl SqlServerSettings {
    /// Builds SQL Server settings from `MSSQL_*` keys.
    ///
    /// # Errors
    /// Returns a configuration error when `MSSQL_SERVER` is missing or the
    /// port is invalid.
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let driver = props
            .get_or("MSSQL_DRIVER", DEFAULT_SQLSERVER_DRIVER)
            .to_string();
        let server = required(props, "MSSQL_SERVER")?;
        let port = parse_port(props, "MSSQL_PORT", DEFAULT_SQLSERVER_PORT)?;
        let database = props.get_non_empty("MSSQL_DBNAME").map(str::to_string);

        let auth = if parse_flag(props.get("MSSQL_TRUSTED_CONNECTION"), false) {
            SqlServerAuth::Integrated
        } else {
            SqlServerAuth::SqlLogin(Credentials::new(
                props.get_or("MSSQL_USER", "").to_string(),
                props.get("MSSQL_PWD").map(str::to_string),
            ))
        };

        Ok(Self {
            driver,
            server,
            port,
            database,
            auth,
            encrypt: parse_flag(props.get("MSSQL_ENCRYPT"), true),
            trust_server_certificate: parse_flag(
                props.get("MSSQL_TRUST_SERVER_CERTIFICATE"),
                true,
            ),
        })
    }

    /// Credential-free description for logs and error context.
    pub fn safe_description(&self) -> String {
        let auth = match &self.auth {
            SqlServerAuth::Integrated => "integrated auth".to_string(),
            SqlServerAuth::SqlLogin(creds) => format!("login {}", creds.username()),
        };
        format!(
            "SQL Server {}:{}/{} ({}, driver {}, encrypt={}, trust_cert={})",
            self.server,
            self.port,
            self.database.as_deref().unwrap_or("<default>"),
            auth,
            self.driver,
            self.encrypt,
            self.trust_server_certificate
        )
    }
}

/// Interprets a yes/no style flag; absent values fall back to `default`.
///
/// `1`, `y`, `yes` and `true` (any case) are true; any other value is false.
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        None => default,
        Some(v) => matches!(v.as_str(), "1" | "y" | "yes" | "true"),
    }
}

fn required(props: &Properties, key: &str) -> Result<String> {
    props
        .get_non_empty(key)
        .map(str::to_string)
        .ok_or_else(|| TableMdError::configuration(format!("{key} must be set")))
}

fn parse_port(props: &Properties, key: &str, default: u16) -> Result<u16> {
    match props.get_non_empty(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<u16>().ok().filter(|port| *port > 0).ok_or_else(|| {
            TableMdError::configuration(format!("{key} must be a port number, got '{raw}'"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle_props(extra: &str) -> Properties {
        Properties::parse(&format!(
            "ORA_HOST=ora.example.com\nORA_USER=scott\nORA_PWD=tiger\n{extra}"
        ))
    }

    #[test]
    fn test_oracle_service_name() {
        let settings = OracleSettings::from_properties(&oracle_props("ORA_SERVICE=ORCLPDB1")).unwrap();
        assert_eq!(settings.port, DEFAULT_ORACLE_PORT);
        assert_eq!(
            settings.target,
            OracleTarget::ServiceName("ORCLPDB1".to_string())
        );
        assert_eq!(settings.connect_string(), "//ora.example.com:1521/ORCLPDB1");
    }

    #[test]
    fn test_oracle_sid_descriptor() {
        let settings =
            OracleSettings::from_properties(&oracle_props("ORA_SID=ORCL\nORA_PORT=1600")).unwrap();
        assert_eq!(settings.target, OracleTarget::Sid("ORCL".to_string()));
        assert_eq!(
            settings.connect_string(),
            "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=ora.example.com)(PORT=1600))(CONNECT_DATA=(SID=ORCL)))"
        );
    }

    #[test]
    fn test_oracle_service_name_wins_over_sid() {
        let settings =
            OracleSettings::from_properties(&oracle_props("ORA_SID=ORCL\nORA_SERVICE=PDB1")).unwrap();
        assert_eq!(settings.target, OracleTarget::ServiceName("PDB1".to_string()));
    }

    #[test]
    fn test_oracle_empty_service_falls_back_to_sid() {
        let settings =
            OracleSettings::from_properties(&oracle_props("ORA_SERVICE=\nORA_SID=ORCL")).unwrap();
        assert_eq!(settings.target, OracleTarget::Sid("ORCL".to_string()));
    }

    #[test]
    fn test_oracle_requires_service_or_sid() {
        let result = OracleSettings::from_properties(&oracle_props(""));
        let error = result.unwrap_err();
        assert_eq!(error.exit_code(), 4);
        assert!(error.to_string().contains("ORA_SERVICE"));
    }

    #[test]
    fn test_oracle_schema_defaults_to_user() {
        let settings = OracleSettings::from_properties(&oracle_props("ORA_SID=ORCL")).unwrap();
        assert_eq!(settings.schema, "scott");

        let settings =
            OracleSettings::from_properties(&oracle_props("ORA_SID=ORCL\nORA_SCHEMA=HR")).unwrap();
        assert_eq!(settings.schema, "HR");
    }

    #[test]
    fn test_oracle_invalid_port() {
        let result = OracleSettings::from_properties(&oracle_props("ORA_SID=ORCL\nORA_PORT=abc"));
        assert!(matches!(result, Err(TableMdError::Configuration { .. })));
    }

    #[test]
    fn test_oracle_missing_host() {
        let props = Properties::parse("ORA_USER=scott\nORA_SID=ORCL");
        let error = OracleSettings::from_properties(&props).unwrap_err();
        assert!(error.to_string().contains("ORA_HOST"));
    }

    #[test]
    fn test_oracle_safe_description_has_no_password() {
        let settings = OracleSettings::from_properties(&oracle_props("ORA_SID=ORCL")).unwrap();
        let description = settings.safe_description();
        assert!(description.contains("ora.example.com"));
        assert!(description.contains("scott"));
        assert!(!description.contains("tiger"));
    }

    #[test]
    fn test_sqlserver_defaults() {
        let props = Properties::parse("MSSQL_SERVER=sql01\nMSSQL_DBNAME=Sales\nMSSQL_USER=sa\nMSSQL_PWD=pw");
        let settings = SqlServerSettings::from_properties(&props).unwrap();

        assert_eq!(settings.driver, DEFAULT_SQLSERVER_DRIVER);
        assert_eq!(settings.port, DEFAULT_SQLSERVER_PORT);
        assert_eq!(settings.database.as_deref(), Some("Sales"));
        assert!(settings.encrypt);
        assert!(settings.trust_server_certificate);
        match settings.auth {
            SqlServerAuth::SqlLogin(creds) => {
                assert_eq!(creds.username(), "sa");
                assert_eq!(creds.password(), "pw");
            }
            SqlServerAuth::Integrated => panic!("expected SQL login"),
        }
    }

    #[test]
    fn test_sqlserver_trusted_connection() {
        let props = Properties::parse("MSSQL_SERVER=sql01\nMSSQL_TRUSTED_CONNECTION=Yes");
        let settings = SqlServerSettings::from_properties(&props).unwrap();
        assert!(matches!(settings.auth, SqlServerAuth::Integrated));
    }

    #[test]
    fn test_sqlserver_transport_toggles() {
        let props = Properties::parse(
            "MSSQL_SERVER=sql01\nMSSQL_ENCRYPT=no\nMSSQL_TRUST_SERVER_CERTIFICATE=false\nMSSQL_PORT=14330",
        );
        let settings = SqlServerSettings::from_properties(&props).unwrap();
        assert!(!settings.encrypt);
        assert!(!settings.trust_server_certificate);
        assert_eq!(settings.port, 14330);
    }

    #[test]
    fn test_sqlserver_requires_server() {
        let props = Properties::parse("MSSQL_DBNAME=Sales");
        let error = SqlServerSettings::from_properties(&props).unwrap_err();
        assert!(error.to_string().contains("MSSQL_SERVER"));
    }

    #[test]
    fn test_sqlserver_safe_description_has_no_password() {
        let props = Properties::parse("MSSQL_SERVER=sql01\nMSSQL_USER=sa\nMSSQL_PWD=hunter2");
        let settings = SqlServerSettings::from_properties(&props).unwrap();
        let description = settings.safe_description();
        assert!(description.contains("sql01:1433"));
        assert!(!description.contains("hunter2"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(None, true));
        assert!(!parse_flag(None, false));
        for truthy in ["1", "y", "Y", "yes", "YES", "true", " True "] {
            assert!(parse_flag(Some(truthy), false), "{truthy} should be true");
        }
        for falsy in ["0", "n", "no", "false", "off", ""] {
            assert!(!parse_flag(Some(falsy), true), "{falsy} should be false");
        }
    }

    #[test]
    fn test_parse_port_rejects_zero() {
        let props = Properties::parse("MSSQL_SERVER=sql01\nMSSQL_PORT=0");
        assert!(SqlServerSettings::from_properties(&props).is_err());
    }
}
