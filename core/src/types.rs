//! Parameter and kind definitions shared by every stage of the engine.
//!
//! These are the leaf types of the node model: what a command accepts
//! ([`Parameter`], [`ParameterType`]), what shape a command has
//! ([`CommandKind`]), and the external kind vocabulary used by the exported
//! schema and the remote records ([`SchemaKind`], [`ChannelType`]). All of
//! them round-trip through [`serde`] so descriptors can be loaded from JSON or
//! YAML manifests.

use serde::{Deserialize, Serialize};

/// Primitive value types a parameter can carry.
///
/// The exporter collapses these into the platform's small option vocabulary:
/// every integer width becomes [`SchemaKind::Integer`], floats and decimals
/// become [`SchemaKind::Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    String,
    Bool,
}

impl Primitive {
    /// Returns the external option kind this primitive exports as.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::{Primitive, SchemaKind};
    ///
    /// assert_eq!(Primitive::U16.schema_kind(), SchemaKind::Integer);
    /// assert_eq!(Primitive::Decimal.schema_kind(), SchemaKind::Number);
    /// assert_eq!(Primitive::Bool.schema_kind(), SchemaKind::Boolean);
    /// ```
    pub fn schema_kind(self) -> SchemaKind {
        match self {
            Self::I8
            | Self::U8
            | Self::I16
            | Self::U16
            | Self::I32
            | Self::U32
            | Self::I64
            | Self::U64 => SchemaKind::Integer,
            Self::F32 | Self::F64 | Self::Decimal => SchemaKind::Number,
            Self::String => SchemaKind::String,
            Self::Bool => SchemaKind::Boolean,
        }
    }
}

/// Platform entities a parameter can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    /// A user in the context of a guild; exported as a plain user reference.
    Member,
    Role,
    /// Either a user or a role.
    Mentionable,
}

impl EntityKind {
    /// Returns the external option kind this entity exports as.
    pub fn schema_kind(self) -> SchemaKind {
        match self {
            Self::User | Self::Member => SchemaKind::User,
            Self::Role => SchemaKind::Role,
            Self::Mentionable => SchemaKind::Mentionable,
        }
    }
}

/// One member of an enumeration parameter.
///
/// The member's `name` is both the literal value sent back by the platform
/// and, unless `display_name` overrides it, the label shown to users.
///
/// # Examples
///
/// ```
/// use command_tree_core::EnumMember;
///
/// let plain = EnumMember::new("Fast");
/// assert_eq!(plain.label(), "Fast");
///
/// let described = EnumMember::new("A").with_display_name("A longer description");
/// assert_eq!(described.label(), "A longer description");
/// assert_eq!(described.name, "A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    /// Member name; exported as the choice value.
    pub name: String,
    /// Optional label override for the exported choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl EnumMember {
    /// Creates a member with no label override.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: None,
        }
    }

    /// Overrides the label shown for this member.
    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    /// Returns the label to export: the override if present, else the name.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// The value type accepted by a [`Parameter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// A primitive value.
    Primitive(Primitive),
    /// One of a fixed, ordered set of members.
    Enum(Vec<EnumMember>),
    /// A reference to a platform entity.
    Entity(EntityKind),
    /// A reference to a channel, optionally filtered by
    /// [`Parameter::channel_types`].
    Channel,
}

impl ParameterType {
    /// Returns the external option kind inferred from this type.
    pub fn schema_kind(&self) -> SchemaKind {
        match self {
            Self::Primitive(primitive) => primitive.schema_kind(),
            Self::Enum(_) => SchemaKind::String,
            Self::Entity(entity) => entity.schema_kind(),
            Self::Channel => SchemaKind::Channel,
        }
    }

    /// Returns `true` for channel references.
    pub fn is_channel(&self) -> bool {
        matches!(self, Self::Channel)
    }
}

/// Channel categories usable in a channel-type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildNews,
    GuildStore,
    GuildNewsThread,
    GuildPublicThread,
    GuildPrivateThread,
    GuildStageVoice,
}

impl ChannelType {
    /// Returns the platform's numeric value for this channel type.
    pub fn value(self) -> u8 {
        match self {
            Self::GuildText => 0,
            Self::Dm => 1,
            Self::GuildVoice => 2,
            Self::GroupDm => 3,
            Self::GuildCategory => 4,
            Self::GuildNews => 5,
            Self::GuildStore => 6,
            Self::GuildNewsThread => 10,
            Self::GuildPublicThread => 11,
            Self::GuildPrivateThread => 12,
            Self::GuildStageVoice => 13,
        }
    }
}

/// Shape of a command node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// A regular text/slash command (the default).
    #[default]
    ChatInput,
    /// A context-menu entry shown on users.
    User,
    /// A context-menu entry shown on messages.
    Message,
}

impl CommandKind {
    /// Returns `true` for the two context-menu shapes.
    pub fn is_context_menu(self) -> bool {
        !matches!(self, Self::ChatInput)
    }

    /// Returns the top-level schema kind for this command shape.
    pub fn schema_kind(self) -> SchemaKind {
        match self {
            Self::ChatInput => SchemaKind::ChatInput,
            Self::User => SchemaKind::UserContext,
            Self::Message => SchemaKind::MessageContext,
        }
    }
}

/// Kind vocabulary of the exported schema and of remote records.
///
/// The first three variants classify top-level records; the rest classify
/// nested options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    #[default]
    ChatInput,
    UserContext,
    MessageContext,
    SubCommand,
    SubCommandGroup,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
}

/// A single parameter of a command.
///
/// Use [`required`](Parameter::required) or [`optional`](Parameter::optional)
/// to create one, then chain builder methods.
///
/// # Examples
///
/// ```
/// use command_tree_core::{ChannelType, Parameter, ParameterType, Primitive};
///
/// let count = Parameter::required("count", ParameterType::Primitive(Primitive::I32))
///     .with_description("How many");
/// assert!(count.required);
///
/// let target = Parameter::optional("target", ParameterType::Channel)
///     .with_channel_types(vec![ChannelType::GuildText]);
/// assert_eq!(target.channel_types.as_deref(), Some(&[ChannelType::GuildText][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name; also the switch name for named matching.
    pub name: String,
    /// Accepted value type.
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Channel-type filter; only meaningful for [`ParameterType::Channel`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_types: Option<Vec<ChannelType>>,
    /// Accepts one or more values.
    #[serde(default)]
    pub is_collection: bool,
    /// A value-less named flag.
    #[serde(default)]
    pub is_switch: bool,
    /// Overrides the exported option kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind_hint: Option<SchemaKind>,
}

impl Parameter {
    /// Creates a required parameter.
    pub fn required(name: &str, parameter_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            parameter_type,
            required: true,
            description: None,
            channel_types: None,
            is_collection: false,
            is_switch: false,
            kind_hint: None,
        }
    }

    /// Creates an optional parameter.
    pub fn optional(name: &str, parameter_type: ParameterType) -> Self {
        Self {
            required: false,
            ..Self::required(name, parameter_type)
        }
    }

    /// Creates an optional boolean switch (`--name`).
    pub fn switch(name: &str) -> Self {
        Self {
            is_switch: true,
            ..Self::optional(name, ParameterType::Primitive(Primitive::Bool))
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the channel-type filter.
    pub fn with_channel_types(mut self, channel_types: Vec<ChannelType>) -> Self {
        self.channel_types = Some(channel_types);
        self
    }

    /// Overrides the exported option kind.
    pub fn with_kind_hint(mut self, kind: SchemaKind) -> Self {
        self.kind_hint = Some(kind);
        self
    }

    /// Marks as accepting multiple values.
    pub fn allow_multiple(mut self) -> Self {
        self.is_collection = true;
        self
    }

    /// Returns the option kind this parameter exports as.
    pub fn schema_kind(&self) -> SchemaKind {
        self.kind_hint
            .unwrap_or_else(|| self.parameter_type.schema_kind())
    }
}
