use ::envconfig::Envconfig;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Mode {
    ServeAPI,
    BackfillIds,
}

impl ::std::str::FromStr for Mode {
    type Err = ::anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SERVE_API" => Ok(Mode::ServeAPI),
            "BACKFILL_IDS" => Ok(Mode::BackfillIds),
            _ => Err(::anyhow::anyhow!("unknown mode: {}", s)),
        }
    }
}

#[derive(::envconfig::Envconfig)]
pub struct Config {
    #[envconfig(from = "HTTP_PORT_API", default = "8081")]
    pub http_port_api: u16,

    #[envconfig(from = "HTTP_BIND_ADDRESS", default = "0.0.0.0")]
    pub http_bind_address: ::std::net::IpAddr,

    #[envconfig(from = "MODE", default = "SERVE_API")]
    pub mode: Mode,

    #[envconfig(from = "STORE_INTERFACE", default = "file")]
    pub store_interface: String,

    #[envconfig(from = "ITEMS_FILE", default = "items.json")]
    pub items_file: String,

    #[envconfig(from = "STATIC_ROOT", default = "static")]
    pub static_root: String,

    #[envconfig(from = "UPLOADS_SUBDIR", default = "uploads")]
    pub uploads_subdir: String,

    #[envconfig(from = "MAX_UPLOAD_BYTES", default = "16777216")]
    pub max_upload_bytes: u64,

    #[envconfig(from = "NOTIFIER_INTERFACE", default = "noop")]
    pub notifier_interface: String,

    #[envconfig(from = "ADMIN_EMAIL", default = "admin@localhost")]
    pub admin_email: String,

    #[envconfig(from = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    #[envconfig(from = "SMTP_PORT", default = "587")]
    pub smtp_port: u16,

    #[envconfig(from = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    #[envconfig(from = "SMTP_PASSWORD")]
    pub smtp_password: Option<String>,

    #[envconfig(from = "SMTP_FROM")]
    pub smtp_from: Option<String>,

    #[envconfig(from = "SMTP_STARTTLS", default = "true")]
    pub smtp_starttls: bool,

    #[envconfig(from = "NOTIFY_WEBHOOK_URL")]
    pub notify_webhook_url: Option<String>,

    #[envconfig(from = "STATSD_ADDRESS")]
    pub statsd_address: Option<String>,

    #[envconfig(from = "STATSD_PORT", default = "8125")]
    pub statsd_port: u16,
}
