use dialoguer::Input;

use crate::errors::AppResult;

/// Credential-provider seam for the interactive half of the PIN flow.
/// The console implementation blocks indefinitely; headless callers
/// substitute their own strategy.
pub trait PinPrompt: Send + Sync {
    /// Obtains the PIN the user received after visiting the authorization
    /// URL.
    fn obtain_pin(&self, authorization_url: &str) -> AppResult<String>;
}

pub struct ConsolePinPrompt;

impl PinPrompt for ConsolePinPrompt {
    fn obtain_pin(&self, authorization_url: &str) -> AppResult<String> {
        if let Err(e) = open::that(authorization_url) {
            log::warn!("Failed to open the authorization URL: {}", e);
            println!("Open this URL to authorize the application:");
            println!("{}", authorization_url);
        }

        let pin: String = Input::new().with_prompt("Pin code").interact_text()?;
        Ok(pin.trim().to_string())
    }
}
