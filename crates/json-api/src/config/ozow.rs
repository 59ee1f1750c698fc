//! Ozow Config

use beacon_app::domain::payments::ozow::{OZOW_POST_URL, OzowConfig};
use clap::Args;
use zeroize::Zeroizing;

/// Ozow merchant settings.
#[derive(Debug, Args)]
pub struct OzowSettings {
    /// Ozow site code
    #[arg(long, env = "OZOW_SITE_CODE")]
    pub ozow_site_code: String,

    /// Ozow private key used to sign requests and verify notifications
    #[arg(long, env = "OZOW_PRIVATE_KEY", hide_env_values = true)]
    pub ozow_private_key: String,

    /// Ozow country code
    #[arg(long, env = "OZOW_COUNTRY_CODE", default_value = "ZA")]
    pub ozow_country_code: String,

    /// Ozow currency code
    #[arg(long, env = "OZOW_CURRENCY_CODE", default_value = "ZAR")]
    pub ozow_currency_code: String,

    /// Mark payments as test transactions
    #[arg(long, env = "OZOW_IS_TEST", default_value_t = true, action = clap::ArgAction::Set)]
    pub ozow_is_test: bool,

    /// Ozow hosted payment page
    #[arg(long, env = "OZOW_POST_URL", default_value = OZOW_POST_URL)]
    pub ozow_post_url: String,

    /// Public base URL of this service, used for Ozow redirect and notify URLs
    #[arg(long, env = "PUBLIC_BASE_URL")]
    pub public_base_url: String,
}

impl OzowSettings {
    #[must_use]
    pub fn into_ozow_config(self) -> OzowConfig {
        let base = self.public_base_url.trim_end_matches('/');

        OzowConfig {
            cancel_url: format!("{base}/payments/cancel"),
            error_url: format!("{base}/payments/error"),
            success_url: format!("{base}/payments/success"),
            notify_url: format!("{base}/payments/notify"),
            site_code: self.ozow_site_code,
            country_code: self.ozow_country_code,
            currency_code: self.ozow_currency_code,
            private_key: Zeroizing::new(self.ozow_private_key),
            is_test: self.ozow_is_test,
            post_url: self.ozow_post_url,
        }
    }
}
