pub mod interface;
pub(crate) mod logging;
pub(crate) mod noop;
pub(crate) mod smtp;
pub(crate) mod webhook;

use crate::config::Config;
use ::anyhow::Result;

pub fn make_provider(config: &Config) -> Result<Box<dyn interface::Notifier>> {
    match config.notifier_interface.as_str() {
        "noop" => {
            ::log::info!("No notifier selected, claims will not be reported");
            Ok(Box::new(noop::NoopNotifier))
        }
        "log" => Ok(Box::new(logging::LoggingNotifier::new(
            config.admin_email.clone(),
        ))),
        "smtp" => {
            let host = config.smtp_host.clone().ok_or_else(|| {
                anyhow::anyhow!("Missing SMTP host configuration")
            })?;
            let from = config.smtp_from.clone().ok_or_else(|| {
                anyhow::anyhow!("Missing SMTP sender configuration")
            })?;

            Ok(Box::new(smtp::SmtpNotifier::new(smtp::SmtpSettings {
                host,
                port: config.smtp_port,
                starttls: config.smtp_starttls,
                username: config.smtp_username.clone(),
                password: config.smtp_password.clone(),
                from,
                to: config.admin_email.clone(),
            })?))
        }
        "webhook" => {
            if let Some(url) = config.notify_webhook_url.clone() {
                Ok(Box::new(webhook::WebhookNotifier::new(
                    url,
                    config.admin_email.clone(),
                )?))
            } else {
                Err(anyhow::anyhow!("Missing webhook URL configuration"))
            }
        }
        _ => Err(anyhow::anyhow!(
            "Unknown notifier interface: {}",
            config.notifier_interface
        )),
    }
}
