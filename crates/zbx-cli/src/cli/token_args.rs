use crate::cli::handlers;
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

/// Generate a Zabbix server authorization token
#[derive(Parser, Debug)]
#[command(
    name = "zbx-token",
    version,
    about = "Generate a Zabbix server authorization token"
)]
pub struct TokenArgs {
    /// The Zabbix server's address
    #[arg(short, long)]
    pub server: String,

    /// The Zabbix server's listening port
    #[arg(short = 'P', long, default_value_t = 80)]
    pub port: u16,

    /// The admin's username
    #[arg(short, long)]
    pub user: String,

    /// The admin's password
    #[arg(short, long)]
    pub password: String,

    /// Connect over HTTPS
    #[arg(short, long)]
    pub tls: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

impl TokenArgs {
    /// Log in and return the session token
    pub async fn run(self) -> Result<String> {
        handlers::token::handle_token(&self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_default_args() {
        let args = TokenArgs::try_parse_from([
            "zbx-token", "-s", "10.0.0.5", "-u", "Admin", "-p", "zabbix",
        ])
        .unwrap();

        assert_eq!(args.server, "10.0.0.5");
        assert_eq!(args.port, 80);
        assert!(!args.tls);
    }

    #[test]
    fn test_port_and_tls() {
        let args = TokenArgs::try_parse_from([
            "zbx-token", "--server", "zbx.local", "-P", "8443", "--user", "Admin",
            "--password", "zabbix", "-t",
        ])
        .unwrap();

        assert_eq!(args.port, 8443);
        assert!(args.tls);
    }

    #[test]
    fn test_missing_password_is_rejected() {
        assert!(TokenArgs::try_parse_from(["zbx-token", "-s", "h", "-u", "Admin"]).is_err());
    }
}
