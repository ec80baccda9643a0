//! Option descriptor registry.

use std::collections::HashMap;

use super::{RegistrationError, RegistrationResult};
use crate::command::domain::{HandlerKey, OptionDescriptor};

/// Ordered option descriptors per handler.
///
/// Declaration order is preserved because free-text tokens map onto
/// descriptors by position.
#[derive(Debug, Clone, Default)]
pub struct OptionDescriptorRegistry {
    descriptors: HashMap<HandlerKey, Vec<OptionDescriptor>>,
}

impl OptionDescriptorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor to the handler's list.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateOption`] when the handler already
    /// declares an option with the same name.
    pub fn declare_option(
        &mut self,
        handler: &HandlerKey,
        descriptor: OptionDescriptor,
    ) -> RegistrationResult<()> {
        let list = self.descriptors.entry(handler.clone()).or_default();
        if list.iter().any(|existing| existing.name == descriptor.name) {
            return Err(RegistrationError::DuplicateOption {
                handler: handler.clone(),
                option: descriptor.name,
            });
        }
        list.push(descriptor);
        Ok(())
    }

    /// Returns the handler's descriptors in declaration order.
    #[must_use]
    pub fn descriptors(&self, handler: &HandlerKey) -> &[OptionDescriptor] {
        self.descriptors
            .get(handler)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the descriptor named `option` on the handler.
    #[must_use]
    pub fn find(&self, handler: &HandlerKey, option: &str) -> Option<&OptionDescriptor> {
        self.descriptors(handler)
            .iter()
            .find(|descriptor| descriptor.name == option)
    }
}

#[cfg(test)]
mod tests {
    use super::OptionDescriptorRegistry;
    use crate::command::domain::{HandlerKey, OptionDescriptor, OptionType};
    use crate::command::registry::RegistrationError;
    use rstest::rstest;

    #[rstest]
    fn descriptors_keep_declaration_order() {
        let key = HandlerKey::command("kick");
        let mut registry = OptionDescriptorRegistry::new();
        registry
            .declare_option(&key, OptionDescriptor::new("user", OptionType::User))
            .expect("first option should be accepted");
        registry
            .declare_option(&key, OptionDescriptor::new("reason", OptionType::String))
            .expect("second option should be accepted");

        let names: Vec<_> = registry
            .descriptors(&key)
            .iter()
            .map(|descriptor| descriptor.name.as_str())
            .collect();

        assert_eq!(names, ["user", "reason"]);
    }

    #[rstest]
    fn duplicate_option_is_rejected() {
        let key = HandlerKey::sub_command("config", "set");
        let mut registry = OptionDescriptorRegistry::new();
        registry
            .declare_option(&key, OptionDescriptor::new("value", OptionType::String))
            .expect("first option should be accepted");

        let error = registry
            .declare_option(&key, OptionDescriptor::new("Value", OptionType::Integer))
            .expect_err("duplicate option should be rejected");

        assert_eq!(
            error,
            RegistrationError::DuplicateOption {
                handler: key,
                option: "value".to_owned(),
            }
        );
    }

    #[rstest]
    fn unknown_handler_has_no_descriptors() {
        let registry = OptionDescriptorRegistry::new();

        assert!(registry.descriptors(&HandlerKey::command("ping")).is_empty());
    }
}
