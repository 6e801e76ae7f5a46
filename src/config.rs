/// Configuration constants for the dashboard API
pub mod api {
    /// Organizations endpoint
    pub const ORGANIZATIONS: &str = "/api/public/organizations";

    /// Projects endpoint
    pub const PROJECTS: &str = "/api/public/provider/projects";

    /// Request timeout in seconds
    pub const TIMEOUT_SECS: u64 = 30;

    /// Connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// go-plugin handshake constants shared with Terraform core
pub mod plugin {
    /// Environment variable carrying the magic cookie
    pub const MAGIC_COOKIE_KEY: &str = "TF_PLUGIN_MAGIC_COOKIE";

    /// Magic cookie value Terraform sets for provider plugins
    pub const MAGIC_COOKIE_VALUE: &str =
        "d602bf8f470bc67ca7faa0386276bbdd4330efaf76d1a219cb4d6991ca9872b2";

    /// go-plugin core protocol version
    pub const CORE_PROTOCOL_VERSION: u32 = 1;

    /// Terraform plugin protocol version served
    pub const PROTOCOL_VERSION: u32 = 6;

    /// Protocol versions offered by the host (comma separated)
    pub const PROTOCOL_VERSIONS_ENV: &str = "PLUGIN_PROTOCOL_VERSIONS";

    /// PEM client certificate when the host negotiates AutoMTLS
    pub const CLIENT_CERT_ENV: &str = "PLUGIN_CLIENT_CERT";

    /// Service name reported by the health service
    pub const HEALTH_SERVICE: &str = "plugin";

    /// Printed when the binary is executed by hand
    pub const NOT_A_PLUGIN_MESSAGE: &str = "This binary is a plugin. These are not meant to be \
executed directly. Please execute the program that consumes these plugins, which will load \
any plugins automatically";
}

/// Terraform-facing names
pub mod provider {
    /// Prefix of every resource type name
    pub const TYPE_PREFIX: &str = "goliatdashboard";

    /// Organization resource type
    pub const ORGANIZATION_TYPE: &str = "goliatdashboard_organization";

    /// Project resource type
    pub const PROJECT_TYPE: &str = "goliatdashboard_project";
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Environment variable for the log level
    pub const LOG_LEVEL_ENV: &str = "GOLIATDASHBOARD_LOG";

    /// Registry address used in debug (reattach) mode
    pub const PROVIDER_ADDRESS: &str = "registry.terraform.io/goliat/goliatdashboard";
}
