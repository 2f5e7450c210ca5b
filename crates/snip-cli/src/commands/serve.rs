use anyhow::Result;
use snip_config::Config;

pub async fn handle(host: Option<String>, port: Option<u16>, mut config: Config) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    snip_server::serve(config).await
}
