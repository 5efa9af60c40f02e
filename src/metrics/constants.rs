/// Label carrying the group name on every series
pub const GROUP_LABEL: &str = "group";

pub const ALL_SERVERS: &str = "all_servers";
pub const AVAILABLE_SERVERS: &str = "available_servers";
pub const UNAVAILABLE_SERVERS: &str = "unavailable_servers";
pub const MAINTENANCE_SERVERS: &str = "maintenance_servers";

/// Exported series, in emission order, with their help text.
pub const SERIES: [(&str, &str); 4] = [
    (ALL_SERVERS, "Total number of DNS servers in the group"),
    (AVAILABLE_SERVERS, "Number of available DNS servers in the group"),
    (UNAVAILABLE_SERVERS, "Number of unavailable DNS servers in the group"),
    (
        MAINTENANCE_SERVERS,
        "Number of DNS servers in the group under maintenance",
    ),
];
