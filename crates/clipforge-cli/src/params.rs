//! Typed command parameters.
//!
//! Every command declares an ordered list of [`ParamSpec`]s. Positional string
//! tokens are bound to that list in order; omitted trailing parameters take
//! their declared default.

use clipforge_core::{ClipforgeError, Result};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// How a token is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Signed 32-bit integer.
    Int,
    /// Non-negative 32-bit integer.
    UInt,
    /// 64-bit float.
    Float,
    /// Raw string, used as-is.
    Text,
}

impl ParamKind {
    /// Description used in conversion errors.
    pub fn expected(self) -> &'static str {
        match self {
            Self::Int => "an integer",
            Self::UInt => "a non-negative integer",
            Self::Float => "a number",
            Self::Text => "text",
        }
    }
}

/// Value used when a parameter is omitted.
///
/// Serializes as the bare default, or `null` for a required parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamDefault {
    /// The parameter must be supplied.
    Required,
    Int(i32),
    UInt(u32),
    Float(f64),
    Text(&'static str),
}

/// One declared parameter of a command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: ParamDefault,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            default: ParamDefault::Required,
        }
    }

    pub const fn int(name: &'static str, default: i32) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            default: ParamDefault::Int(default),
        }
    }

    pub const fn uint(name: &'static str, default: u32) -> Self {
        Self {
            name,
            kind: ParamKind::UInt,
            default: ParamDefault::UInt(default),
        }
    }

    pub const fn float(name: &'static str, default: f64) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            default: ParamDefault::Float(default),
        }
    }

    pub const fn text(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
            default: ParamDefault::Text(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default == ParamDefault::Required
    }

    /// Convert `token` according to this parameter's kind.
    pub fn parse(&self, token: &str) -> Result<ParamValue> {
        let bad = || ClipforgeError::ArgumentConversion {
            name: self.name.to_string(),
            token: token.to_string(),
            expected: self.kind.expected(),
        };
        Ok(match self.kind {
            ParamKind::Int => ParamValue::Int(token.parse().map_err(|_| bad())?),
            ParamKind::UInt => ParamValue::UInt(token.parse().map_err(|_| bad())?),
            ParamKind::Float => ParamValue::Float(token.parse().map_err(|_| bad())?),
            ParamKind::Text => ParamValue::Text(token.to_string()),
        })
    }

    fn default_value(&self) -> Option<ParamValue> {
        match self.default {
            ParamDefault::Required => None,
            ParamDefault::Int(v) => Some(ParamValue::Int(v)),
            ParamDefault::UInt(v) => Some(ParamValue::UInt(v)),
            ParamDefault::Float(v) => Some(ParamValue::Float(v)),
            ParamDefault::Text(v) => Some(ParamValue::Text(v.to_string())),
        }
    }
}

/// Usage form: `name` when required, `name=default` otherwise.
impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.default {
            ParamDefault::Required => write!(f, "<{}>", self.name),
            ParamDefault::Int(v) => write!(f, "[{}={}]", self.name, v),
            ParamDefault::UInt(v) => write!(f, "[{}={}]", self.name, v),
            ParamDefault::Float(v) => write!(f, "[{}={:?}]", self.name, v),
            ParamDefault::Text(v) => write!(f, "[{}={:?}]", self.name, v),
        }
    }
}

/// A converted argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i32),
    UInt(u32),
    Float(f64),
    Text(String),
}

/// Arguments of one command, converted and defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    command: String,
    values: Vec<(&'static str, ParamValue)>,
    /// How many leading values came from tokens rather than defaults.
    supplied: usize,
}

impl Bindings {
    /// Bind `tokens` positionally to `params`.
    ///
    /// Tokens beyond the declared parameters are ignored.
    pub fn bind(command: &str, params: &[ParamSpec], tokens: &[String]) -> Result<Self> {
        if tokens.len() > params.len() {
            debug!(
                "{}: ignoring {} surplus argument(s)",
                command,
                tokens.len() - params.len()
            );
        }
        let values = params
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let value = match tokens.get(i) {
                    Some(token) => spec.parse(token)?,
                    None => spec
                        .default_value()
                        .ok_or_else(|| ClipforgeError::MissingArgument {
                            command: command.to_string(),
                            name: spec.name.to_string(),
                        })?,
                };
                Ok((spec.name, value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            command: command.to_string(),
            supplied: tokens.len().min(values.len()),
            values,
        })
    }

    /// Whether `name` was given on the command line instead of defaulted.
    pub fn is_supplied(&self, name: &str) -> bool {
        self.values[..self.supplied].iter().any(|(n, _)| *n == name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn get(&self, name: &str) -> Result<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| {
                ClipforgeError::invalid(format!("{} has no parameter '{}'", self.command, name))
            })
    }

    fn mismatch(&self, name: &str, wanted: ParamKind) -> ClipforgeError {
        ClipforgeError::invalid(format!(
            "{}: parameter '{}' is not {}",
            self.command,
            name,
            wanted.expected()
        ))
    }

    pub fn int(&self, name: &str) -> Result<i32> {
        match self.get(name)? {
            ParamValue::Int(v) => Ok(*v),
            _ => Err(self.mismatch(name, ParamKind::Int)),
        }
    }

    pub fn uint(&self, name: &str) -> Result<u32> {
        match self.get(name)? {
            ParamValue::UInt(v) => Ok(*v),
            _ => Err(self.mismatch(name, ParamKind::UInt)),
        }
    }

    /// Unsigned value as a count or index.
    pub fn count(&self, name: &str) -> Result<usize> {
        self.uint(name).map(|v| v as usize)
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            ParamValue::Float(v) => Ok(*v),
            _ => Err(self.mismatch(name, ParamKind::Float)),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            ParamValue::Text(v) => Ok(v),
            _ => Err(self.mismatch(name, ParamKind::Text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &[ParamSpec] = &[
        ParamSpec::required("other", ParamKind::Text),
        ParamSpec::int("x", 0),
        ParamSpec::float("scale", 1.5),
    ];

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bind_with_defaults() {
        let bound = Bindings::bind("overlay", PARAMS, &tokens(&["b.mp4"])).unwrap();
        assert_eq!(bound.text("other").unwrap(), "b.mp4");
        assert_eq!(bound.int("x").unwrap(), 0);
        assert_eq!(bound.float("scale").unwrap(), 1.5);
        assert!(bound.is_supplied("other"));
        assert!(!bound.is_supplied("x"));
        assert!(!bound.is_supplied("nope"));
    }

    #[test]
    fn test_bind_overrides_and_surplus() {
        let bound =
            Bindings::bind("overlay", PARAMS, &tokens(&["b.mp4", "-7", "2", "extra"])).unwrap();
        assert_eq!(bound.int("x").unwrap(), -7);
        assert_eq!(bound.float("scale").unwrap(), 2.0);
        assert_eq!(bound.len(), 3);
        assert!(bound.is_supplied("scale"));
    }

    #[test]
    fn test_missing_required() {
        let err = Bindings::bind("overlay", PARAMS, &[]).unwrap_err();
        assert!(matches!(
            err,
            ClipforgeError::MissingArgument { ref name, .. } if name == "other"
        ));
    }

    #[test]
    fn test_strict_conversion() {
        for bad in ["12abc", "1.5", "", " 3"] {
            let err = Bindings::bind("overlay", PARAMS, &tokens(&["b.mp4", bad])).unwrap_err();
            assert!(
                matches!(err, ClipforgeError::ArgumentConversion { .. }),
                "{bad:?} should not convert"
            );
        }
        let uint = ParamSpec::uint("kernel", 15);
        assert!(uint.parse("-1").is_err());
        assert_eq!(uint.parse("7").unwrap(), ParamValue::UInt(7));
        assert!(ParamSpec::float("f", 1.0).parse("abc").is_err());
    }

    #[test]
    fn test_wrong_accessor() {
        let bound = Bindings::bind("overlay", PARAMS, &tokens(&["b.mp4"])).unwrap();
        assert!(bound.uint("x").is_err());
        assert!(bound.text("nope").is_err());
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(PARAMS[0].to_string(), "<other>");
        assert_eq!(PARAMS[1].to_string(), "[x=0]");
        assert_eq!(PARAMS[2].to_string(), "[scale=1.5]");
        assert_eq!(ParamSpec::text("text", "Text").to_string(), "[text=\"Text\"]");
    }
}
