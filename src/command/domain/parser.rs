//! Free-text command parser.

use serde::{Deserialize, Serialize};

use super::TextParseError;

/// A chat message split into its command word and argument tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInvocation {
    command: String,
    tokens: Vec<String>,
}

impl TextInvocation {
    /// Parses `<activator><command> token "quoted token" 'another one'`.
    ///
    /// The command word is the leading run of alphanumerics, `-` and `_`
    /// after the activator, lowercased. Quoted spans form a single token; an
    /// unterminated quote runs to the end of the input.
    ///
    /// # Errors
    ///
    /// Returns [`TextParseError`] when the input is empty, lacks the
    /// activator, or has no command word.
    pub fn parse(raw_input: &str, activator: char) -> Result<Self, TextParseError> {
        let trimmed = raw_input.trim_start();
        if trimmed.is_empty() {
            return Err(TextParseError::EmptyInput);
        }

        let body = trimmed
            .strip_prefix(activator)
            .ok_or(TextParseError::MissingActivator(activator))?;
        let split_at = body
            .char_indices()
            .find(|(_, character)| !is_command_character(*character))
            .map_or(body.len(), |(index, _)| index);
        let (command, remainder) = body.split_at(split_at);
        if command.is_empty() {
            return Err(TextParseError::MissingCommandName);
        }

        Ok(Self {
            command: command.to_ascii_lowercase(),
            tokens: tokenize(remainder),
        })
    }

    /// Returns the lowercased command word.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the argument tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Consumes the invocation, returning the command word and tokens.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.command, self.tokens)
    }
}

const fn is_command_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | '_')
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes: Option<char> = None;
    let mut quoted = false;

    for character in input.chars() {
        if let Some(quote_char) = in_quotes {
            if character == quote_char {
                in_quotes = None;
            } else {
                current.push(character);
            }
            continue;
        }

        match character {
            '"' | '\'' if current.is_empty() => {
                in_quotes = Some(character);
                quoted = true;
            }
            _ if character.is_whitespace() => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            _ => current.push(character),
        }
    }

    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    tokens
}
