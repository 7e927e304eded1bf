#[derive(Debug)]
pub(crate) enum Item {
    Args(Args),
    Value(ValueEnum),
    Group(GroupStruct),
}

/// A struct deriving `Args`.
#[derive(Debug)]
pub(crate) struct Args {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
}

#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) name: String,
    pub(crate) ty: String,
    pub(crate) list: bool,
    pub(crate) doc: Option<String>,
    /// One entry per parameter attribute, in source order; empty for fields
    /// the schema doesn't know about.
    pub(crate) params: Vec<Param>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    BinaryPath,
    Switch,
    Argument,
    Completer,
    RegisterCompleter,
}

#[derive(Debug)]
pub(crate) struct Param {
    pub(crate) kind: Kind,
    pub(crate) switch: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) case_sensitive: bool,
    pub(crate) required: bool,
    pub(crate) floating: bool,
    pub(crate) remainder: bool,
    pub(crate) short_name: Option<String>,
    pub(crate) properties: Vec<String>,
    pub(crate) delimiters: Option<String>,
    pub(crate) complete_files: bool,
    pub(crate) complete_directories: bool,
    pub(crate) complete_with: Option<Vec<String>>,
    pub(crate) command_name: Option<String>,
}

impl Param {
    pub(crate) fn new(kind: Kind) -> Param {
        Param {
            kind,
            switch: None,
            description: None,
            case_sensitive: false,
            required: false,
            floating: false,
            remainder: false,
            short_name: None,
            properties: Vec::new(),
            delimiters: None,
            complete_files: false,
            complete_directories: false,
            complete_with: None,
            command_name: None,
        }
    }
}

/// A fieldless enum deriving `Value`.
#[derive(Debug)]
pub(crate) struct ValueEnum {
    pub(crate) name: String,
    pub(crate) variants: Vec<String>,
}

/// A struct deriving `Group`.
#[derive(Debug)]
pub(crate) struct GroupStruct {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
}
