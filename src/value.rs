use crate::error::BridgeError;
use std::collections::HashMap;

/// A dynamically-typed argument value as delivered by the host transport.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    /// Short type name used in argument error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Named call arguments with typed, required accessors.
///
/// Every accessor fails with [`BridgeError::MissingArgument`] when the key is absent (or
/// explicitly null) and with [`BridgeError::InvalidArgument`] when the value has the wrong
/// shape. Integral accessors accept finite floats and round them half-to-even.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments(HashMap<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn require(&self, name: &'static str) -> Result<&Value, BridgeError> {
        match self.0.get(name) {
            None | Some(Value::Null) => Err(BridgeError::MissingArgument(name)),
            Some(value) => Ok(value),
        }
    }

    pub fn int(&self, name: &'static str) -> Result<i32, BridgeError> {
        to_i32(name, self.require(name)?)
    }

    pub fn float(&self, name: &'static str) -> Result<f64, BridgeError> {
        match self.require(name)? {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            other => Err(invalid(name, "number", other)),
        }
    }

    pub fn bool(&self, name: &'static str) -> Result<bool, BridgeError> {
        match self.require(name)? {
            Value::Bool(v) => Ok(*v),
            other => Err(invalid(name, "bool", other)),
        }
    }

    pub fn str(&self, name: &'static str) -> Result<&str, BridgeError> {
        match self.require(name)? {
            Value::Str(v) => Ok(v),
            other => Err(invalid(name, "string", other)),
        }
    }

    pub fn bytes(&self, name: &'static str) -> Result<&[u8], BridgeError> {
        match self.require(name)? {
            Value::Bytes(v) => Ok(v),
            other => Err(invalid(name, "bytes", other)),
        }
    }

    /// Reads a two-element numeric list as `(first, second)`.
    pub fn int_pair(&self, name: &'static str) -> Result<(i32, i32), BridgeError> {
        match self.require(name)? {
            Value::List(items) if items.len() == 2 => {
                Ok((to_i32(name, &items[0])?, to_i32(name, &items[1])?))
            }
            Value::List(items) => Err(BridgeError::InvalidArgument {
                name,
                expected: "list of 2 numbers",
                found: format!("list of {}", items.len()),
            }),
            other => Err(invalid(name, "list of 2 numbers", other)),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// An inbound remote call: the wire method name plus its arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: String,
    pub arguments: Arguments,
}

impl Request {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Arguments::new(),
        }
    }

    /// Builder-style argument insertion.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name, value);
        self
    }
}

fn invalid(name: &'static str, expected: &'static str, found: &Value) -> BridgeError {
    BridgeError::InvalidArgument {
        name,
        expected,
        found: found.type_name().to_string(),
    }
}

fn to_i32(name: &'static str, value: &Value) -> Result<i32, BridgeError> {
    let out_of_range = |found: String| BridgeError::InvalidArgument {
        name,
        expected: "32-bit integer",
        found,
    };
    match value {
        Value::Int(v) => i32::try_from(*v).map_err(|_| out_of_range(v.to_string())),
        Value::Float(v) if v.is_finite() => {
            let rounded = v.round_ties_even();
            if rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
                Err(out_of_range(v.to_string()))
            } else {
                Ok(rounded as i32)
            }
        }
        Value::Float(v) => Err(out_of_range(v.to_string())),
        other => Err(invalid(name, "integer", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_round_half_to_even() {
        let args: Arguments = [("a", 2.5), ("b", 3.5), ("c", -0.5)].into_iter().collect();
        assert_eq!(args.int("a").unwrap(), 2);
        assert_eq!(args.int("b").unwrap(), 4);
        assert_eq!(args.int("c").unwrap(), 0);
    }

    #[test]
    fn pairs_are_positional() {
        let mut args = Arguments::new();
        args.insert("kernelSize", [5.0, 3.0]);
        assert_eq!(args.int_pair("kernelSize").unwrap(), (5, 3));
    }

    #[test]
    fn pair_arity_is_enforced() {
        let mut args = Arguments::new();
        args.insert("anchorPoint", [1, 2, 3]);
        let err = args.int_pair("anchorPoint").unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InvalidArgument { name: "anchorPoint", .. }
        ));
    }

    #[test]
    fn null_counts_as_missing() {
        let mut args = Arguments::new();
        args.insert("data", Value::Null);
        assert!(matches!(
            args.bytes("data"),
            Err(BridgeError::MissingArgument("data"))
        ));
    }

    #[test]
    fn type_mismatch_names_the_field() {
        let mut args = Arguments::new();
        args.insert("normalize", 1);
        let err = args.bool("normalize").unwrap_err();
        assert_eq!(
            err.to_string(),
            "argument `normalize` expected bool, found int"
        );
    }

    #[test]
    fn non_finite_and_out_of_range_integers_fail() {
        let mut args = Arguments::new();
        args.insert("nan", f64::NAN);
        args.insert("huge", i64::MAX);
        assert!(args.int("nan").is_err());
        assert!(args.int("huge").is_err());
    }

    #[test]
    fn floats_accept_integers() {
        let mut args = Arguments::new();
        args.insert("sigmaX", 2);
        assert_eq!(args.float("sigmaX").unwrap(), 2.0);
    }
}
