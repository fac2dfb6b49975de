//! Thin wrappers over dialoguer prompts

use crate::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

/// Prompt helper sharing one theme
pub struct Prompter {
    theme: ColorfulTheme,
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Non-empty, trimmed text; re-asks until something is entered
    pub fn required(&self, prompt: &str) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
                if input.trim().is_empty() {
                    Err("This field is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        Ok(value.trim().to_string())
    }

    /// Trimmed text, `None` when left blank
    pub fn optional(&self, prompt: &str) -> Result<Option<String>> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    pub fn with_default(&self, prompt: &str, default: &str) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()?;
        Ok(value.trim().to_string())
    }

    /// Index of the chosen item
    pub fn select<T: ToString>(&self, prompt: &str, items: &[T], default: usize) -> Result<usize> {
        let labels: Vec<String> = items.iter().map(ToString::to_string).collect();
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(default)
            .interact()?)
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    /// Lines until the first blank one, joined with newlines
    pub fn multiline(&self, prompt: &str) -> Result<String> {
        println!("{} (finish with an empty line)", prompt);
        let mut lines = Vec::new();
        loop {
            let line: String = Input::with_theme(&self.theme)
                .with_prompt(">")
                .allow_empty(true)
                .interact_text()?;
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    pub fn pause(&self) -> Result<()> {
        let _: String = Input::with_theme(&self.theme)
            .with_prompt("Press Enter to continue")
            .allow_empty(true)
            .interact_text()?;
        Ok(())
    }
}
