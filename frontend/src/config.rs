use buildersolve_chat::config::DEFAULT_SERVER;
use buildersolve_chat::{ClientConfig, TransportKind};
use web_sys::UrlSearchParams;

/// Resolves the client configuration from the page query string and the
/// build environment.
pub fn load() -> ClientConfig {
    let query = page_query();
    let param = |name: &str| query.as_ref().and_then(|q| q.get(name));

    let server = param("server")
        .or_else(|| option_env!("BUILDERSOLVE_SERVER").map(str::to_string))
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    let config = match ClientConfig::for_server(&server) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid server {server:?}: {e}; using {DEFAULT_SERVER}");
            ClientConfig::default()
        }
    };

    let transport = match param("transport") {
        Some(value) => TransportKind::parse(&value).unwrap_or_else(|| {
            log::warn!("Unknown transport {value:?}, using streaming");
            TransportKind::Streaming
        }),
        None => TransportKind::Streaming,
    };

    log::info!("Backend {} ({transport:?})", config.server());
    config.with_transport(transport)
}

fn page_query() -> Option<UrlSearchParams> {
    let search = web_sys::window()?.location().search().ok()?;
    UrlSearchParams::new_with_str(&search).ok()
}
