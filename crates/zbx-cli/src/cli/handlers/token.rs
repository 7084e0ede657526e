//! Token generation handler

use crate::cli::TokenArgs;
use crate::error::Result;
use tracing::debug;
use zbx_common::config::api_endpoint;
use zbx_sdk::ClientBuilder;

/// Log in with the given credentials and return the session token
pub async fn handle_token(args: &TokenArgs) -> Result<String> {
    let endpoint = api_endpoint(&args.server, Some(args.port), args.tls)?;
    debug!("Logging in to {} as {}", endpoint, args.user);

    let client = ClientBuilder::new().endpoint(endpoint).build()?;
    let token = client.login(&args.user, &args.password).await?;

    Ok(token)
}
