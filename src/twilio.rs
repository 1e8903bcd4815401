use reqwest::Client;

use crate::{config::Config, error::AppError};

const WHATSAPP_PREFIX: &str = "whatsapp:";

#[derive(Clone, Debug)]
pub struct TwilioClient {
    client: Client,
    address: String,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioClient {
    pub fn new(client: Client, address: String, config: &Config) -> Self {
        TwilioClient {
            client,
            address,
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from: config.twilio_number.clone(),
        }
    }

    /// Twilio destination for a normalized number, on the same channel as the sender.
    pub fn destination(&self, number: &str) -> String {
        if self.from.starts_with(WHATSAPP_PREFIX) {
            format!("{}{}", WHATSAPP_PREFIX, number)
        } else {
            number.to_string()
        }
    }

    pub async fn send_message(&self, number: &str, body: &str) -> Result<(), AppError> {
        let to = self.destination(number);

        log::info!("Sending message to {}", to);

        self.client
            .post(format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                self.address, self.account_sid
            ))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Body", body), ("To", to.as_str()), ("From", self.from.as_str())])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(AppError::Messaging)?;

        Ok(())
    }
}
