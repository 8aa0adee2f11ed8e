//! Terminal prompts backed by dialoguer.

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use shutter_core::interactive::Prompter;
use shutter_core::{Result, ShutterError};

#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

fn prompt_err(e: dialoguer::Error) -> ShutterError {
    ShutterError::Prompt(e.to_string())
}

impl Prompter for DialoguerPrompter {
    fn input(
        &mut self,
        message: &str,
        validate: &dyn Fn(&str) -> std::result::Result<(), String>,
    ) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true)
            .validate_with(|input: &String| validate(input))
            .interact_text()
            .map_err(prompt_err)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(prompt_err)
    }
}
