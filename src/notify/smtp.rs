use crate::notify::interface;
use ::anyhow::{Context, Result};
use ::lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

pub(crate) struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub starttls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub to: String,
}

pub(crate) struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Result<Self> {
        let builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(
                &settings.host,
            )?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        };
        let builder = builder.port(settings.port);

        let builder = match (settings.username, settings.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username, password))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from: settings
                .from
                .parse()
                .with_context(|| format!("invalid sender {}", settings.from))?,
            to: settings
                .to
                .parse()
                .with_context(|| format!("invalid recipient {}", settings.to))?,
        })
    }
}

#[async_trait::async_trait]
impl interface::Notifier for SmtpNotifier {
    async fn notify(
        &self,
        notification: &interface::Notification,
    ) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())?;

        self.transport
            .send(message)
            .await
            .context("sending claim email")?;

        Ok(())
    }
}
