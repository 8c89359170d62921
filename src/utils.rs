use url::Url;

/// Ensures a host has an http:// prefix
pub fn parse_server_url(server: &str) -> String {
    let lower = server.to_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        format!("http://{}", server)
    } else {
        server.to_string()
    }
}

/// Base URL of a server listening on `port` of `host`.
pub fn server_base(host: &str, port: u16) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&parse_server_url(host))?;
    url.set_port(Some(port))
        .map_err(|_| url::ParseError::EmptyHost)?;
    Ok(url)
}

/// True when a server output line announces a completed start.
pub fn is_started_line(line: &str) -> bool {
    line.trim_end().ends_with("started")
}
