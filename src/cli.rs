use crate::adapters::fs::loader::JsonMappingSource;
use crate::client::rest::given;
use crate::config::ServerConfig;
use crate::domain::mapping::HttpMethod;
use crate::domain::ports::MappingSource;
use crate::domain::registry::StubRegistry;
use crate::server::MockServer;
use anyhow::{Context as _, Result, anyhow};
use std::path::Path;

/// Run the stub server until Ctrl-C.
pub async fn serve_stubs(config: ServerConfig) -> Result<()> {
    let server = MockServer::start(config).await?;
    let health = server.engine().health();

    println!("Stub server listening on {}", server.base_url());
    println!("  Mappings loaded: {}", health.mappings);
    println!("  Admin API:       {}/__admin", server.base_url());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    println!("\nShutting down...");
    server.stop().await
}

/// Parse and compile every mapping under `path` without serving anything.
pub fn check_mappings(path: &Path) -> Result<()> {
    let source = JsonMappingSource::new(path);
    let mappings = source.load()?;

    println!("Checking {} mapping(s) from {}", mappings.len(), source.describe());
    println!("{}", "=".repeat(80));

    let mut registry = StubRegistry::new();
    let mut failures = 0usize;
    for (i, mapping) in mappings.into_iter().enumerate() {
        let label = mapping.request.describe();
        let status = mapping.response.status;
        match registry.register(mapping) {
            Ok(_) => println!("{:>3}. OK    {} -> {}", i + 1, label, status),
            Err(e) => {
                failures += 1;
                println!("{:>3}. ERROR {} ({})", i + 1, label, e);
            }
        }
    }

    println!("{}", "=".repeat(80));
    if failures > 0 {
        return Err(anyhow!("{failures} invalid mapping(s)"));
    }
    println!("All mappings valid.");
    Ok(())
}

/// Issue one request and print the status plus the selected JSON fields
/// (or the whole pretty-printed body when no field is given).
pub async fn call_endpoint(
    method: &str,
    url: &str,
    body: Option<&str>,
    fields: &[String],
) -> Result<()> {
    let method = HttpMethod::parse(method).ok_or_else(|| anyhow!("Unknown method: {method}"))?;

    let mut request = given().content_type_json();
    if let Some(body) = body {
        request = request.body(body);
    }
    let res = request.send(method, url).await?;

    println!("{} {} -> {}", method, url, res.status_code());
    if fields.is_empty() {
        println!("{}", res.pretty_print());
        return Ok(());
    }

    let json = res.json_path()?;
    for field in fields {
        let value = json
            .value(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|e| format!("<{e}>"));
        println!("  {field} = {value}");
    }
    Ok(())
}
