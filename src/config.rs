// Adapted from https://dev.to/bdhobare/managing-application-config-in-rust-23ai
use crate::google::ServiceAccountKey;

use std::collections::HashMap;
use url::Url;

const DEFAULT_TWILIO_NUMBER: &str = "whatsapp:+14155238886";
const DEFAULT_SHEET_RANGE: &str = "Sheet1";
const DEFAULT_PORT: u16 = 1312;

#[derive(Clone, Debug)]
pub struct Config {
    pub auth: String,
    pub database_url: Url,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_number: String,
    pub google_credentials: ServiceAccountKey,
    pub spreadsheet_id: String,
    pub sheet_range: String,
    pub port: u16,
}

pub trait ConfigProvider {
    fn get_config(&self) -> &Config;
}

pub struct EnvVarProvider(Config);

impl EnvVarProvider {
    pub fn new(args: HashMap<String, String>) -> Self {
        let config = Config {
            auth: args.get("AUTH").expect("Missing AUTH").to_string(),
            database_url: Url::parse(args.get("DATABASE_URL").expect("Missing DATABASE_URL"))
                .expect("Unable to parse DATABASE_URL as a URL"),
            twilio_account_sid: args
                .get("TWILIO_ACCOUNT_SID")
                .expect("Missing TWILIO_ACCOUNT_SID")
                .to_string(),
            twilio_auth_token: args
                .get("TWILIO_AUTH_TOKEN")
                .expect("Missing TWILIO_AUTH_TOKEN")
                .to_string(),
            twilio_number: args
                .get("TWILIO_NUMBER")
                .map(String::as_str)
                .unwrap_or(DEFAULT_TWILIO_NUMBER)
                .to_string(),
            google_credentials: ServiceAccountKey::from_json(
                args.get("GOOGLE_CREDENTIALS")
                    .expect("Missing GOOGLE_CREDENTIALS"),
            )
            .expect("Unable to parse GOOGLE_CREDENTIALS as a service account key"),
            spreadsheet_id: args
                .get("SPREADSHEET_ID")
                .expect("Missing SPREADSHEET_ID")
                .to_string(),
            sheet_range: args
                .get("SHEET_RANGE")
                .map(String::as_str)
                .unwrap_or(DEFAULT_SHEET_RANGE)
                .to_string(),
            port: args
                .get("PORT")
                .map(|port| port.parse().expect("Unable to parse PORT as a number"))
                .unwrap_or(DEFAULT_PORT),
        };

        EnvVarProvider(config)
    }
}

impl ConfigProvider for EnvVarProvider {
    fn get_config(&self) -> &Config {
        &self.0
    }
}
