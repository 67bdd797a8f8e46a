// Copyright 2025 the VizJoin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field access for series data.
//!
//! Series address data fields by name. Any type can be plotted by implementing [`Record`];
//! [`Row`] is a ready-made dynamic record.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use hashbrown::HashMap;

/// Named-field access to a data record.
pub trait Record {
    /// The numeric value of `field`, or `None` if it is missing or not numeric.
    fn number(&self, field: &str) -> Option<f64>;

    /// The display text of `field`.
    ///
    /// The default formats [`Record::number`].
    fn text(&self, field: &str) -> Option<String> {
        self.number(field).map(|v| format!("{v}"))
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn number(&self, field: &str) -> Option<f64> {
        (**self).number(field)
    }

    fn text(&self, field: &str) -> Option<String> {
        (**self).text(field)
    }
}

/// A dynamically typed field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A number.
    Number(f64),
    /// A string. Never coerced to a number.
    Text(String),
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A record backed by a field-name map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Returns a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl Record for Row {
    fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            Value::Number(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::Number(v) => Some(format!("{v}")),
            Value::Text(s) => Some(s.clone()),
        }
    }
}
