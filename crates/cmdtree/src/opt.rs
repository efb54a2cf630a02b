//! Typed option declarations.
//!
//! The set of option types is closed: [`Opt`] has exactly one variant per
//! supported value type, and [`OptionValue`] is sealed so no other type can
//! stand in for one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Origin, Result, ValueError};

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// Value type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Bool,
    Int,
    Float,
}

impl OptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
        }
    }

    /// Description used when an option declares none.
    pub fn fallback_description(self) -> &'static str {
        match self {
            Self::String => "string value",
            Self::Bool => "bool value",
            Self::Int => "int value",
            Self::Float => "float value",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved or default option value, type-erased for rendering and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Value types an option may carry: `String`, `bool`, `i64` and `f64`.
pub trait OptionValue: sealed::Sealed + Clone + fmt::Debug + Into<Value> + Sized {
    const KIND: OptionKind;

    fn parse_raw(raw: &str) -> std::result::Result<Self, ValueError>;

    #[doc(hidden)]
    fn typed(opt: &Opt) -> Option<&TypedOpt<Self>>;
}

impl OptionValue for String {
    const KIND: OptionKind = OptionKind::String;

    fn parse_raw(raw: &str) -> std::result::Result<Self, ValueError> {
        Ok(raw.to_string())
    }

    fn typed(opt: &Opt) -> Option<&TypedOpt<Self>> {
        match opt {
            Opt::String(o) => Some(o),
            _ => None,
        }
    }
}

impl OptionValue for bool {
    const KIND: OptionKind = OptionKind::Bool;

    fn parse_raw(raw: &str) -> std::result::Result<Self, ValueError> {
        Ok(raw.parse()?)
    }

    fn typed(opt: &Opt) -> Option<&TypedOpt<Self>> {
        match opt {
            Opt::Bool(o) => Some(o),
            _ => None,
        }
    }
}

impl OptionValue for i64 {
    const KIND: OptionKind = OptionKind::Int;

    fn parse_raw(raw: &str) -> std::result::Result<Self, ValueError> {
        Ok(raw.parse()?)
    }

    fn typed(opt: &Opt) -> Option<&TypedOpt<Self>> {
        match opt {
            Opt::Int(o) => Some(o),
            _ => None,
        }
    }
}

impl OptionValue for f64 {
    const KIND: OptionKind = OptionKind::Float;

    fn parse_raw(raw: &str) -> std::result::Result<Self, ValueError> {
        Ok(raw.parse()?)
    }

    fn typed(opt: &Opt) -> Option<&TypedOpt<Self>> {
        match opt {
            Opt::Float(o) => Some(o),
            _ => None,
        }
    }
}

/// An option declaration of a concrete value type.
///
/// Built with the constructors on [`Opt`], e.g. `Opt::int("port").short("p")`.
#[derive(Debug, Clone)]
pub struct TypedOpt<T> {
    name: String,
    short: String,
    environment: String,
    description: String,
    default: Option<T>,
    value: Option<T>,
}

impl<T: OptionValue> TypedOpt<T> {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: String::new(),
            environment: String::new(),
            description: String::new(),
            default: None,
            value: None,
        }
    }

    /// Single-token alias, written without the leading `-`.
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    /// Environment variable that may supply the value.
    pub fn env(mut self, key: impl Into<String>) -> Self {
        self.environment = key.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default(mut self, value: impl Into<T>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn get_default(&self) -> Option<&T> {
        self.default.as_ref()
    }
}

/// One option declared on a command.
#[derive(Debug, Clone)]
pub enum Opt {
    String(TypedOpt<String>),
    Bool(TypedOpt<bool>),
    Int(TypedOpt<i64>),
    Float(TypedOpt<f64>),
}

macro_rules! each {
    ($opt:expr, $o:ident => $body:expr) => {
        match $opt {
            Opt::String($o) => $body,
            Opt::Bool($o) => $body,
            Opt::Int($o) => $body,
            Opt::Float($o) => $body,
        }
    };
}

impl From<TypedOpt<String>> for Opt {
    fn from(o: TypedOpt<String>) -> Self {
        Self::String(o)
    }
}

impl From<TypedOpt<bool>> for Opt {
    fn from(o: TypedOpt<bool>) -> Self {
        Self::Bool(o)
    }
}

impl From<TypedOpt<i64>> for Opt {
    fn from(o: TypedOpt<i64>) -> Self {
        Self::Int(o)
    }
}

impl From<TypedOpt<f64>> for Opt {
    fn from(o: TypedOpt<f64>) -> Self {
        Self::Float(o)
    }
}

impl Opt {
    pub fn string(name: impl Into<String>) -> TypedOpt<String> {
        TypedOpt::new(name)
    }

    pub fn bool(name: impl Into<String>) -> TypedOpt<bool> {
        TypedOpt::new(name)
    }

    pub fn int(name: impl Into<String>) -> TypedOpt<i64> {
        TypedOpt::new(name)
    }

    pub fn float(name: impl Into<String>) -> TypedOpt<f64> {
        TypedOpt::new(name)
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            Self::String(_) => OptionKind::String,
            Self::Bool(_) => OptionKind::Bool,
            Self::Int(_) => OptionKind::Int,
            Self::Float(_) => OptionKind::Float,
        }
    }

    pub fn name(&self) -> &str {
        each!(self, o => &o.name)
    }

    pub fn short(&self) -> &str {
        each!(self, o => &o.short)
    }

    pub fn environment(&self) -> &str {
        each!(self, o => &o.environment)
    }

    /// Declared description, or a type-derived fallback such as `"int value"`.
    pub fn description(&self) -> &str {
        let declared = each!(self, o => &o.description);
        if declared.is_empty() {
            self.kind().fallback_description()
        } else {
            declared
        }
    }

    pub fn has_default(&self) -> bool {
        each!(self, o => o.default.is_some())
    }

    pub fn has_value(&self) -> bool {
        each!(self, o => o.value.is_some())
    }

    pub fn value(&self) -> Option<Value> {
        each!(self, o => o.value.clone().map(Into::into))
    }

    pub fn try_default(&self) -> Option<Value> {
        each!(self, o => o.default.clone().map(Into::into))
    }

    /// The declared default.
    ///
    /// # Panics
    ///
    /// Panics when the option declares no default; check [`Opt::has_default`] first.
    pub fn default_value(&self) -> Value {
        match self.try_default() {
            Some(value) => value,
            None => panic!("option {} has no default", self.flag()),
        }
    }

    /// Whether this option reads the next token as its value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::Bool(_))
    }

    /// Display form used in messages: `--name`, or `-short` for unnamed options.
    pub fn flag(&self) -> String {
        if !self.name().is_empty() {
            format!("--{}", self.name())
        } else if !self.short().is_empty() {
            format!("-{}", self.short())
        } else {
            String::new()
        }
    }

    /// Whether `key` equals the name, short or environment key.
    pub fn matches_key(&self, key: &str) -> bool {
        !key.is_empty() && (self.name() == key || self.short() == key || self.environment() == key)
    }

    pub fn typed<T: OptionValue>(&self) -> Result<&TypedOpt<T>> {
        T::typed(self).ok_or_else(|| Error::InvalidOptionType {
            name: self.name().to_string(),
            expected: T::KIND,
            actual: self.kind(),
        })
    }

    pub(crate) fn clear_value(&mut self) {
        each!(self, o => o.value = None)
    }

    pub(crate) fn load_default(&mut self) -> bool {
        each!(self, o => match &o.default {
            Some(d) => {
                o.value = Some(d.clone());
                true
            }
            None => false,
        })
    }

    pub(crate) fn set_raw(&mut self, raw: &str, origin: Origin) -> Result<()> {
        fn store<T: OptionValue>(o: &mut TypedOpt<T>, raw: &str, origin: Origin) -> Result<()> {
            let parsed = T::parse_raw(raw).map_err(|source| Error::InvalidValue {
                origin,
                value: raw.to_string(),
                source,
            })?;
            o.value = Some(parsed);
            Ok(())
        }
        each!(self, o => store(o, raw, origin))
    }
}
