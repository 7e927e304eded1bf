//! The parameter table derived from a target structure.
//!
//! A [`Schema`] is built once per target type, either by `#[derive(Args)]`
//! or by hand through [`Schema::builder`]. Every parameter is bound to its
//! field through an accessor fixed at build time; after [`SchemaBuilder::build`]
//! the schema is read-only and may be shared between concurrent parses.

use std::collections::{HashMap, VecDeque};

use crate::coerce::{coerce, CoerceError, Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("there can only be one binary path field")]
    DuplicateBinaryPath,
    #[error("switch `{0}` may only be applied to boolean or integer fields")]
    SwitchType(String),
    #[error("switch `{0}` is declared more than once")]
    DuplicateSwitch(String),
    #[error("remainder argument `{0}` cannot specify properties to assign")]
    RemainderWithProperties(String),
    #[error("remainder argument `{0}` cannot be floating")]
    RemainderFloating(String),
    #[error("remainder argument `{0}` may only be applied to string fields")]
    RemainderType(String),
    #[error("argument `{0}` specifies delimiters but is not of list type")]
    DelimitersOnScalar(String),
    #[error("argument `{0}` may not combine delimiters and properties")]
    DelimitersWithProperties(String),
    #[error("floating argument `{0}` of list type must specify delimiter characters")]
    FloatingListWithoutDelimiters(String),
    #[error("floating argument `{0}` of list type may not specify properties to fill")]
    FloatingListWithProperties(String),
    #[error("cannot specify a switch for floating argument `{0}`")]
    FloatingWithSwitch(String),
    #[error("optional floating argument `{optional}` may not precede required floating argument `{required}`")]
    RequiredAfterOptional { optional: String, required: String },
    #[error("argument `{0}` specifies properties but its field is not a group")]
    PropertiesOnValue(String),
    #[error("argument `{0}` is bound to a group but specifies no properties")]
    GroupWithoutProperties(String),
    #[error("argument `{argument}` names unknown property `{property}`")]
    UnknownProperty { argument: String, property: String },
}

/// A structured value filled from consecutive tokens, one per property.
pub trait Group: Default {
    fn has_property(property: &str) -> bool;

    fn assign(&mut self, property: &str, token: &str) -> Result<(), CoerceError>;

    /// Member names of the property's type, for enumerations.
    fn variants(_property: &str) -> &'static [&'static str] {
        &[]
    }
}

/// `None` until the first property is assigned.
impl<G: Group> Group for Option<G> {
    fn has_property(property: &str) -> bool {
        G::has_property(property)
    }

    fn assign(&mut self, property: &str, token: &str) -> Result<(), CoerceError> {
        self.get_or_insert_with(G::default).assign(property, token)
    }

    fn variants(property: &str) -> &'static [&'static str] {
        G::variants(property)
    }
}

/// An ordered container that repeated occurrences append to.
pub trait List {
    type Item;

    fn append(&mut self, item: Self::Item);
}

impl<E> List for Vec<E> {
    type Item = E;

    fn append(&mut self, item: E) {
        self.push(item)
    }
}

impl<E> List for VecDeque<E> {
    type Item = E;

    fn append(&mut self, item: E) {
        self.push_back(item)
    }
}

/// The container is created on first use.
impl<L: List + Default> List for Option<L> {
    type Item = L::Item;

    fn append(&mut self, item: L::Item) {
        self.get_or_insert_with(L::default).append(item)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Switch,
    Argument,
    /// Triggers shell completion; parsed like any other argument.
    Completer,
    /// Requests shell registration; parsed like any other argument.
    RegisterCompleter,
}

/// The declared shape of one parameter.
#[derive(Debug, Clone)]
pub struct Descriptor {
    kind: DescriptorKind,
    field: &'static str,
    switch: Option<String>,
    description: Option<String>,
    case_sensitive: bool,
    required: bool,
    list: bool,
    counter: bool,
    short_name: Option<String>,
    floating: bool,
    remainder: bool,
    properties: Vec<String>,
    delimiters: Vec<char>,
    complete_files: bool,
    complete_directories: bool,
    complete_with: Option<Vec<String>>,
    command_name: Option<String>,
    variants: Vec<&'static [&'static str]>,
}

impl Descriptor {
    fn new(kind: DescriptorKind, field: &'static str) -> Self {
        Self {
            kind,
            field,
            switch: None,
            description: None,
            case_sensitive: false,
            required: false,
            list: false,
            counter: false,
            short_name: None,
            floating: false,
            remainder: false,
            properties: Vec::new(),
            delimiters: Vec::new(),
            complete_files: false,
            complete_directories: false,
            complete_with: None,
            command_name: None,
            variants: Vec::new(),
        }
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }
    /// Name of the field this parameter populates.
    pub fn field(&self) -> &'static str {
        self.field
    }
    /// The switch name as declared; `None` for floating arguments.
    pub fn switch(&self) -> Option<&str> {
        self.switch.as_deref()
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
    pub fn is_required(&self) -> bool {
        self.required
    }
    pub fn is_list(&self) -> bool {
        self.list
    }
    pub fn is_counter(&self) -> bool {
        self.counter
    }
    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }
    pub fn is_floating(&self) -> bool {
        self.floating
    }
    pub fn is_remainder(&self) -> bool {
        self.remainder
    }
    pub fn properties(&self) -> &[String] {
        &self.properties
    }
    pub fn delimiters(&self) -> &[char] {
        &self.delimiters
    }
    pub fn completes_files(&self) -> bool {
        self.complete_files
    }
    pub fn completes_directories(&self) -> bool {
        self.complete_directories
    }
    pub fn complete_with(&self) -> Option<&[String]> {
        self.complete_with.as_deref()
    }
    /// The command a register-completion argument registers for.
    pub fn command_name(&self) -> Option<&str> {
        self.command_name.as_deref()
    }

    /// Enumeration members accepted at `property` (0 when there are no properties).
    pub(crate) fn variants(&self, property: usize) -> &'static [&'static str] {
        self.variants.get(property).copied().unwrap_or(&[])
    }

    /// Number of tokens one occurrence consumes after the switch.
    pub(crate) fn arity(&self) -> usize {
        self.properties.len().max(1)
    }

    /// The name used in messages: the switch, or the short name of a floating argument.
    pub(crate) fn display_name(&self) -> &str {
        self.switch.as_deref().or(self.short_name.as_deref()).unwrap_or(self.field)
    }

    fn effective_switch(&self) -> Option<String> {
        let switch = self.switch.as_deref()?;
        Some(if self.case_sensitive { switch.to_string() } else { switch.to_lowercase() })
    }
}

/// Declares a boolean or counter switch.
#[derive(Debug, Clone)]
pub struct Switch(Descriptor);

impl Switch {
    /// A switch for `field`, named `/<field>` unless renamed.
    pub fn new(field: &'static str) -> Self {
        Switch(Descriptor::new(DescriptorKind::Switch, field))
    }
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.switch = Some(name.into());
        self
    }
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }
    pub fn case_sensitive(mut self) -> Self {
        self.0.case_sensitive = true;
        self
    }
}

/// Declares a keyed or floating argument.
#[derive(Debug, Clone)]
pub struct Argument(Descriptor);

impl Argument {
    /// An argument for `field`, named `/<field>` unless renamed or floating.
    pub fn new(field: &'static str) -> Self {
        Argument(Descriptor::new(DescriptorKind::Argument, field))
    }
    /// An argument whose presence asks for shell completion.
    pub fn completer(field: &'static str) -> Self {
        Argument(Descriptor::new(DescriptorKind::Completer, field))
    }
    /// An argument whose presence asks for shell registration.
    pub fn register_completer(field: &'static str) -> Self {
        Argument(Descriptor::new(DescriptorKind::RegisterCompleter, field))
    }
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.switch = Some(name.into());
        self
    }
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }
    pub fn case_sensitive(mut self) -> Self {
        self.0.case_sensitive = true;
        self
    }
    pub fn required(mut self) -> Self {
        self.0.required = true;
        self
    }
    pub fn floating(mut self) -> Self {
        self.0.floating = true;
        self
    }
    pub fn short_name(mut self, short_name: impl Into<String>) -> Self {
        self.0.short_name = Some(short_name.into());
        self
    }
    /// Captures every token left on the line.
    pub fn remainder(mut self) -> Self {
        self.0.remainder = true;
        self
    }
    pub fn properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.properties = properties.into_iter().map(Into::into).collect();
        self
    }
    /// Splits one token into several list items on any of these characters.
    pub fn delimiters(mut self, delimiters: &str) -> Self {
        self.0.delimiters = delimiters.chars().collect();
        self
    }
    pub fn complete_files(mut self) -> Self {
        self.0.complete_files = true;
        self
    }
    pub fn complete_directories(mut self) -> Self {
        self.0.complete_directories = true;
        self
    }
    pub fn complete_with<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.complete_with = Some(candidates.into_iter().map(Into::into).collect());
        self
    }
    pub fn command_name(mut self, command_name: impl Into<String>) -> Self {
        self.0.command_name = Some(command_name.into());
        self
    }
}

pub(crate) type Assign<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CoerceError> + Send + Sync>;
pub(crate) type Fill<T> = Box<dyn Fn(&mut T, &[String]) -> Result<(), CoerceError> + Send + Sync>;

/// How a parameter writes into the target.
pub(crate) enum Binding<T> {
    Switch(Box<dyn Fn(&mut T) + Send + Sync>),
    /// One token into the field.
    Scalar(Assign<T>),
    /// One token appended to the field's list.
    Append(Assign<T>),
    /// One token per property into the field's structure, reusing it if present.
    Group(Fill<T>),
    /// One token per property into a fresh structure appended to the field's list.
    AppendGroup(Fill<T>),
}

pub(crate) struct Parameter<T> {
    pub(crate) descriptor: Descriptor,
    pub(crate) binding: Binding<T>,
}

pub(crate) struct BinaryPath<T> {
    /// Names the field in coercion errors.
    pub(crate) field: &'static str,
    pub(crate) assign: Assign<T>,
}

/// What the field type contributes to validation.
struct Shape {
    kind: ValueKind,
    list: bool,
    group: Option<fn(&str) -> bool>,
}

pub struct Schema<T> {
    pub(crate) binary_path: Option<BinaryPath<T>>,
    pub(crate) switches: HashMap<String, usize>,
    pub(crate) arguments: HashMap<String, usize>,
    pub(crate) floating: Vec<usize>,
    pub(crate) parameters: Vec<Parameter<T>>,
}

impl<T> Schema<T> {
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder {
            schema: Schema {
                binary_path: None,
                switches: HashMap::new(),
                arguments: HashMap::new(),
                floating: Vec::new(),
                parameters: Vec::new(),
            },
            error: None,
        }
    }

    pub fn has_binary_path(&self) -> bool {
        self.binary_path.is_some()
    }

    /// Every parameter in declaration order.
    pub fn all_parameters(&self) -> impl Iterator<Item = &Descriptor> + '_ {
        self.parameters.iter().map(|it| &it.descriptor)
    }

    /// Floating arguments in the order they are matched.
    pub fn floating_arguments(&self) -> impl Iterator<Item = &Descriptor> + '_ {
        self.floating.iter().map(move |&idx| &self.parameters[idx].descriptor)
    }

    pub fn completer(&self) -> Option<&Descriptor> {
        self.all_parameters().find(|it| it.kind == DescriptorKind::Completer)
    }

    pub fn register_completer(&self) -> Option<&Descriptor> {
        self.all_parameters().find(|it| it.kind == DescriptorKind::RegisterCompleter)
    }

    pub(crate) fn descriptor(&self, idx: usize) -> &Descriptor {
        &self.parameters[idx].descriptor
    }

    pub(crate) fn lookup_switch(&self, arg: &str) -> Option<usize> {
        lookup(&self.switches, &self.parameters, arg)
    }

    pub(crate) fn lookup_argument(&self, arg: &str) -> Option<usize> {
        lookup(&self.arguments, &self.parameters, arg)
    }
}

/// Exact match first, then a lower-cased match unless the parameter is case sensitive.
fn lookup<T>(table: &HashMap<String, usize>, parameters: &[Parameter<T>], arg: &str) -> Option<usize> {
    if let Some(&idx) = table.get(arg) {
        return Some(idx);
    }
    let &idx = table.get(&arg.to_lowercase())?;
    if parameters[idx].descriptor.case_sensitive {
        return None;
    }
    Some(idx)
}

/// Collects parameter declarations; the first violation fails [`build`](Self::build).
pub struct SchemaBuilder<T> {
    schema: Schema<T>,
    error: Option<SchemaError>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Binds the field receiving the program's own path.
    pub fn binary_path<V: Value + 'static>(
        mut self,
        field: &'static str,
        access: fn(&mut T) -> &mut V,
    ) -> Self {
        if self.error.is_none() {
            if self.schema.binary_path.is_some() {
                self.error = Some(SchemaError::DuplicateBinaryPath);
            } else {
                self.schema.binary_path = Some(BinaryPath { field, assign: scalar(access) });
            }
        }
        self
    }

    /// A presence switch on a `bool` field or a counter on an integer field.
    pub fn switch<V: Value + 'static>(mut self, switch: Switch, access: fn(&mut T) -> &mut V) -> Self {
        let Switch(mut descriptor) = switch;
        descriptor.counter = V::KIND == ValueKind::Count;
        let shape = Shape { kind: V::KIND, list: false, group: None };
        let binding = Binding::Switch(Box::new(move |target: &mut T| {
            access(target).switch_on();
        }));
        self.push(descriptor, shape, binding)
    }

    /// A single-valued argument.
    pub fn argument<V: Value + 'static>(self, argument: Argument, access: fn(&mut T) -> &mut V) -> Self {
        let Argument(mut descriptor) = argument;
        descriptor.variants = vec![V::variants()];
        let shape = Shape { kind: V::KIND, list: false, group: None };
        self.push(descriptor, shape, Binding::Scalar(scalar(access)))
    }

    /// An argument whose occurrences accumulate into a list.
    pub fn list<L>(self, argument: Argument, access: fn(&mut T) -> &mut L) -> Self
    where
        L: List + 'static,
        L::Item: Value,
    {
        let Argument(mut descriptor) = argument;
        descriptor.variants = vec![<L::Item as Value>::variants()];
        let shape = Shape { kind: <L::Item as Value>::KIND, list: true, group: None };
        let binding = Binding::Append(Box::new(move |target: &mut T, token: &str| {
            let item = coerce::<L::Item>(Some(token))?;
            access(target).append(item);
            Ok(())
        }));
        self.push(descriptor, shape, binding)
    }

    /// An argument filling the properties of a structure from consecutive tokens.
    pub fn group<G: Group + 'static>(self, argument: Argument, access: fn(&mut T) -> &mut G) -> Self {
        let Argument(mut descriptor) = argument;
        descriptor.variants = descriptor.properties.iter().map(|it| G::variants(it)).collect();
        let properties = descriptor.properties.clone();
        let shape = Shape { kind: ValueKind::Other, list: false, group: Some(G::has_property) };
        let binding = Binding::Group(Box::new(move |target: &mut T, tokens: &[String]| {
            let group = access(target);
            for (property, token) in properties.iter().zip(tokens) {
                group.assign(property, token)?;
            }
            Ok(())
        }));
        self.push(descriptor, shape, binding)
    }

    /// Like [`group`](Self::group), but each occurrence appends a new structure.
    pub fn group_list<L>(self, argument: Argument, access: fn(&mut T) -> &mut L) -> Self
    where
        L: List + 'static,
        L::Item: Group,
    {
        let Argument(mut descriptor) = argument;
        descriptor.variants =
            descriptor.properties.iter().map(|it| <L::Item as Group>::variants(it)).collect();
        let properties = descriptor.properties.clone();
        let shape =
            Shape { kind: ValueKind::Other, list: true, group: Some(<L::Item as Group>::has_property) };
        let binding = Binding::AppendGroup(Box::new(move |target: &mut T, tokens: &[String]| {
            let mut item = <L::Item as Default>::default();
            for (property, token) in properties.iter().zip(tokens) {
                item.assign(property, token)?;
            }
            access(target).append(item);
            Ok(())
        }));
        self.push(descriptor, shape, binding)
    }

    pub fn build(self) -> Result<Schema<T>, SchemaError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let schema = self.schema;
        for pair in schema.floating.windows(2) {
            let (prev, next) = (schema.descriptor(pair[0]), schema.descriptor(pair[1]));
            if next.required && !prev.required {
                return Err(SchemaError::RequiredAfterOptional {
                    optional: prev.display_name().to_string(),
                    required: next.display_name().to_string(),
                });
            }
        }
        tracing::debug!(
            switches = schema.switches.len(),
            arguments = schema.arguments.len(),
            floating = schema.floating.len(),
            binary_path = schema.binary_path.is_some(),
            "built schema"
        );
        Ok(schema)
    }

    fn push(mut self, descriptor: Descriptor, shape: Shape, binding: Binding<T>) -> Self {
        if self.error.is_none() {
            if let Err(err) = self.try_push(descriptor, shape, binding) {
                self.error = Some(err);
            }
        }
        self
    }

    fn try_push(
        &mut self,
        mut descriptor: Descriptor,
        shape: Shape,
        binding: Binding<T>,
    ) -> Result<(), SchemaError> {
        descriptor.list = shape.list;
        let explicit_switch = descriptor.switch.is_some();
        if descriptor.switch.is_none() && !descriptor.floating {
            descriptor.switch = Some(format!("/{}", descriptor.field));
        }
        let name = descriptor.display_name().to_string();

        if descriptor.kind == DescriptorKind::Switch {
            if !matches!(shape.kind, ValueKind::Flag | ValueKind::Count) {
                return Err(SchemaError::SwitchType(name));
            }
            let idx = self.schema.parameters.len();
            self.register(&descriptor, idx)?;
            self.schema.parameters.push(Parameter { descriptor, binding });
            return Ok(());
        }

        match shape.group {
            Some(has_property) => {
                if descriptor.properties.is_empty() && !descriptor.remainder {
                    return Err(SchemaError::GroupWithoutProperties(name));
                }
                if let Some(property) = descriptor.properties.iter().find(|it| !has_property(it)) {
                    return Err(SchemaError::UnknownProperty {
                        argument: name,
                        property: property.clone(),
                    });
                }
            }
            None if !descriptor.properties.is_empty() && !descriptor.remainder => {
                return Err(SchemaError::PropertiesOnValue(name));
            }
            None => (),
        }

        if descriptor.remainder {
            if !descriptor.properties.is_empty() {
                return Err(SchemaError::RemainderWithProperties(name));
            }
            if descriptor.floating {
                return Err(SchemaError::RemainderFloating(name));
            }
            if shape.kind != ValueKind::Text || shape.list || shape.group.is_some() {
                return Err(SchemaError::RemainderType(name));
            }
        }

        if !descriptor.delimiters.is_empty() {
            if !shape.list {
                return Err(SchemaError::DelimitersOnScalar(name));
            }
            if !descriptor.properties.is_empty() {
                return Err(SchemaError::DelimitersWithProperties(name));
            }
        }

        let idx = self.schema.parameters.len();
        if descriptor.floating {
            if shape.list {
                if !descriptor.properties.is_empty() {
                    return Err(SchemaError::FloatingListWithProperties(name));
                }
                if descriptor.delimiters.is_empty() {
                    return Err(SchemaError::FloatingListWithoutDelimiters(name));
                }
            }
            if explicit_switch {
                return Err(SchemaError::FloatingWithSwitch(name));
            }
            if descriptor.short_name.is_none() {
                descriptor.short_name = Some(descriptor.field.to_string());
            }
            self.schema.floating.push(idx);
        } else {
            self.register(&descriptor, idx)?;
        }
        self.schema.parameters.push(Parameter { descriptor, binding });
        Ok(())
    }

    fn register(&mut self, descriptor: &Descriptor, idx: usize) -> Result<(), SchemaError> {
        let Some(key) = descriptor.effective_switch() else {
            return Ok(());
        };
        if self.schema.switches.contains_key(&key) || self.schema.arguments.contains_key(&key) {
            return Err(SchemaError::DuplicateSwitch(descriptor.display_name().to_string()));
        }
        let table = match descriptor.kind {
            DescriptorKind::Switch => &mut self.schema.switches,
            _ => &mut self.schema.arguments,
        };
        table.insert(key, idx);
        Ok(())
    }
}

fn scalar<T: 'static, V: Value + 'static>(access: fn(&mut T) -> &mut V) -> Assign<T> {
    Box::new(move |target: &mut T, token: &str| {
        *access(target) = coerce(Some(token))?;
        Ok(())
    })
}
