use crate::error::ConnectionError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::{Client, Config, NoTls, config::SslMode};
use tracing::{error, warn};

/// Connects to Postgres, honouring the `sslmode` of the connection string.
/// `database` overrides the database named in the URL when given.
pub async fn connect_client(url: &str, database: Option<&str>) -> Result<Client, ConnectionError> {
    let mut config = url
        .parse::<Config>()
        .map_err(|e| ConnectionError::InvalidUrl(e.to_string()))?;
    if let Some(database) = database {
        config.dbname(database);
    }

    match config.get_ssl_mode() {
        SslMode::Disable => connect_without_tls(config).await,
        SslMode::Prefer => match connect_with_tls(config.clone()).await {
            Ok(client) => Ok(client),
            Err(error) => {
                warn!(%error, "Postgres TLS handshake failed, retrying without TLS");
                connect_without_tls(config).await
            }
        },
        _ => connect_with_tls(config).await,
    }
}

async fn connect_with_tls(config: Config) -> Result<Client, ConnectionError> {
    let connector = TlsConnector::builder().build()?;
    let tls = MakeTlsConnector::new(connector);
    let (client, connection) = config.connect(tls).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    Ok(client)
}

async fn connect_without_tls(config: Config) -> Result<Client, ConnectionError> {
    let (client, connection) = config.connect(NoTls).await?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    Ok(client)
}

/// Quotes a single SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a possibly schema-qualified name such as `public.orders`.
pub fn quote_qualified(name: &str) -> Option<String> {
    let parts = name.split('.').collect::<Vec<_>>();
    if parts.len() > 2 || parts.iter().any(|p| p.trim().is_empty()) {
        return None;
    }
    Some(
        parts
            .iter()
            .map(|p| quote_ident(p.trim()))
            .collect::<Vec<_>>()
            .join("."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("CHECKPOINT_TBL"), "\"CHECKPOINT_TBL\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn quotes_schema_qualified_names() {
        assert_eq!(
            quote_qualified("public.target_tbl").as_deref(),
            Some("\"public\".\"target_tbl\"")
        );
        assert_eq!(quote_qualified("target_tbl").as_deref(), Some("\"target_tbl\""));
        assert_eq!(quote_qualified("a.b.c"), None);
        assert_eq!(quote_qualified("public."), None);
    }
}
