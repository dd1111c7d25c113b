use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

/// Input source for the terminal wizard.
pub trait Prompter {
    fn text(&mut self, prompt: &str, initial: &str) -> Result<String, dialoguer::Error>;
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, dialoguer::Error>;
    fn choose(&mut self, prompt: &str, items: &[&str]) -> Result<usize, dialoguer::Error>;
    /// Indices of the checked items.
    fn check(
        &mut self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, dialoguer::Error>;
}

pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, prompt: &str, initial: &str) -> Result<String, dialoguer::Error> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, dialoguer::Error> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
    }

    fn choose(&mut self, prompt: &str, items: &[&str]) -> Result<usize, dialoguer::Error> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
    }

    fn check(
        &mut self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>, dialoguer::Error> {
        MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .defaults(defaults)
            .interact()
    }
}
