/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "DNS_PULSE_CONFIG_PATH";

/// Prefix for environment overrides, e.g. `DNS_PULSE__LOG__LEVEL=debug`
pub const ENV_PREFIX: &str = "DNS_PULSE";

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "text".to_string()
}

pub fn default_listen() -> String {
    "0.0.0.0:9100".to_string()
}

pub fn default_metrics_path() -> String {
    "/metrics".to_string()
}

pub fn default_max_in_flight() -> usize {
    256
}

pub fn default_dns_port() -> u16 {
    53
}

/// Example configuration
pub const DEFAULT_CONFIG: &str = r#"
# Logging configuration
[log]
# Level can be "error", "warn", "info", "debug", or "trace"
level = "info"
# "text" or "json"
format = "text"
# Optional: append logs to a file instead of stdout
# path = "/var/log/dns-pulse.log"

# Metrics endpoint
[server]
listen = "0.0.0.0:9100"
metrics_path = "/metrics"

# Probing
[probe]
# Maximum number of DNS queries running at the same time during one scrape
max_in_flight = 256

# Mutual TLS for the metrics endpoint (optional)
[mtls]
enabled = false
# cert = "/etc/dns-pulse/server.pem"
# key = "/etc/dns-pulse/server-key.pem"
# Defaults to `cert` when not set
# client_ca = "/etc/dns-pulse/ca.pem"
# Empty list allows every verified client
allowed_cn = []

# Groups of DNS servers to watch
[[groups]]
name = "resolvers"

[[groups.targets]]
id = "local-1"
address = "127.0.0.1"
port = 53
record = "example.com"
description = "Local resolver"

[[groups.targets]]
id = "local-2"
address = "127.0.0.1"
port = 5353
record = "example.com"
# Maintenance targets are counted but never queried
maintenance = true
description = "Secondary resolver, under maintenance"
"#;
