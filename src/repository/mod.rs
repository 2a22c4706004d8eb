pub mod booking_repo;
pub mod garage_repo;
pub mod quote_repo;
pub mod quote_request_repo;
pub mod repository_error;

use mongodb::{
    options::{ClientOptions, Credential, ResolverConfig},
    Client, Collection,
};

use crate::config::mongo_conf::MongoConfig;

/// Open a typed collection handle using the shared connection settings.
/// The driver connects lazily; constructing a repository performs no I/O.
pub(crate) async fn collection<T>(
    config: &MongoConfig,
    name: &str,
) -> Result<Collection<T>, mongodb::error::Error> {
    let mut client_options =
        ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
    client_options.app_name = Some("PitstopBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(std::time::Duration::from_secs(
        config.connection_timeout_secs,
    ));

    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }

    let client = Client::with_options(client_options)?;
    let db = client.database(&config.database);
    Ok(db.collection::<T>(name))
}
