//! Command domain model.
//!
//! Definitions, option descriptors, platform entities, raw and converted
//! argument values, and the free-text parser. Nothing here performs I/O.

mod arguments;
mod definition;
mod entity;
mod error;
mod handler;
mod ids;
mod invocation;
mod option;
mod parser;
mod permission;
mod value;

pub use arguments::{ArgumentBag, Arguments};
pub use definition::{
    CommandContext, CommandDefinition, CommandSettings, DefaultPermission, HandlerKey,
    IntegrationType, ResolvedHandler, SubCommandDefinition,
};
pub use entity::{Attachment, Channel, Member, Mentionable, Role, User};
pub use error::{HandlerError, ResolutionError, TextParseError};
pub use handler::{CommandHandler, HandlerResult, InvocationValidator};
pub use ids::{SNOWFLAKE_MAX_DIGITS, SNOWFLAKE_MIN_DIGITS, Snowflake};
pub use invocation::{
    InvocationContext, InvocationSource, PlatformEvent, SlashInteraction, TextMessage,
};
pub use option::{OptionDescriptor, OptionSettings, OptionType};
pub use parser::TextInvocation;
pub use permission::{GuildCommandPermissions, OverrideKind, PermissionOverride, Permissions};
pub use value::{ArgumentValue, FromArgument, RawValue, UNSET_SENTINELS};
