/// Directives keeping chatty dependencies at error level
pub const NOISE_DIRECTIVES: [&str; 4] = [
    "hyper=error",
    "hyper_util=error",
    "rustls=error",
    "hickory_proto=error",
];
