use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lazyadmin", version, about = "Terminal console for the admin REST API")]
pub struct Args {
    /// Resource to open on start (e.g. "careers", "schedules")
    #[arg(short, long)]
    pub resource: Option<String>,

    /// API base URL, overrides `api.base_url` from the config file
    #[arg(short, long, env = "LAZYADMIN_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token, overrides `api.token` from the config file
    #[arg(long, env = "LAZYADMIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Apply command line overrides to the loaded API settings.
    pub fn apply(&self, api: &mut crate::config::ApiConfig) {
        if let Some(base_url) = &self.base_url {
            api.base_url.clone_from(base_url);
        }
        if let Some(token) = &self.token {
            api.token = Some(token.clone());
        }
    }
}
