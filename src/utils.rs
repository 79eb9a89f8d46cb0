// This file is part of the terraform-provider-redash project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::Display;

use anyhow::{anyhow, Context};
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description, Schema};
use tf_provider::value::{Value, ValueNumber, ValueSet, ValueString};
use tf_provider::{AttributePath, Diagnostics};
use tracing::warn;

/// Schemas of a state struct shared by a resource and its data source
pub(crate) trait WithSchema {
    /// Schema of the managed resource
    fn resource_schema() -> Schema;
    /// Schema of the read-only lookup
    fn data_source_schema() -> Schema;
}

/// Turn a client error into an error diagnostic
pub(crate) trait ReportError<T> {
    fn report(self, diags: &mut Diagnostics, summary: &'static str) -> Option<T>;
}

impl<T, E: Display> ReportError<T> for Result<T, E> {
    fn report(self, diags: &mut Diagnostics, summary: &'static str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "{}", summary);
                diags.root_error(summary, err.to_string());
                None
            }
        }
    }
}

/// `Some(())` if no error has been recorded so far
pub(crate) fn no_errors(diags: &Diagnostics) -> Option<()> {
    if diags.errors.is_empty() {
        Some(())
    } else {
        None
    }
}

pub(crate) fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

pub(crate) fn sensitive(attr: Attribute) -> Attribute {
    Attribute {
        sensitive: true,
        ..attr
    }
}

/// Owned string value
pub(crate) fn string_value<'a, S: Into<String>>(value: S) -> ValueString<'a> {
    Value::Value(Cow::Owned(value.into()))
}

/// Owned string value, where empty strings are null
pub(crate) fn optional_string_value<'a>(value: Option<String>) -> ValueString<'a> {
    match value {
        Some(value) if !value.is_empty() => string_value(value),
        _ => Value::Null,
    }
}

pub(crate) fn to_string(value: &ValueString<'_>) -> String {
    value
        .as_ref_option()
        .map(|value| value.to_string())
        .unwrap_or_default()
}

pub(crate) fn to_optional_string(value: &ValueString<'_>) -> Option<String> {
    value.as_ref_option().map(|value| value.to_string())
}

/// Mark a null value unknown so the provider can fill it on apply
pub(crate) fn unknown_if_null<T>(value: &mut Value<T>) {
    if value.is_null() {
        *value = Value::Unknown;
    }
}

/// Default a null value; unknown values stay unknown
pub(crate) fn default_if_null<T>(value: &mut Value<T>, default: T) {
    if value.is_null() {
        *value = Value::Value(default);
    }
}

/// Parse the decimal Redash id stored in a string attribute
pub(crate) fn parse_id(
    diags: &mut Diagnostics,
    value: &ValueString<'_>,
    attr: &'static str,
) -> Option<i64> {
    match value {
        Value::Value(id) => match id.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                diags.error(
                    "Invalid Redash id",
                    format!("`{id}` is not an integer id"),
                    AttributePath::new(attr),
                );
                None
            }
        },
        Value::Null => {
            diags.error_short(format!("`{attr}` is null"), AttributePath::new(attr));
            None
        }
        Value::Unknown => {
            diags.error_short(format!("`{attr}` is unknown"), AttributePath::new(attr));
            None
        }
    }
}

/// Get a number attribute that must be known
pub(crate) fn known_number(
    diags: &mut Diagnostics,
    value: &ValueNumber,
    attr: &'static str,
) -> Option<i64> {
    match value {
        Value::Value(number) => Some(*number),
        Value::Null => {
            diags.error_short(format!("`{attr}` is null"), AttributePath::new(attr));
            None
        }
        Value::Unknown => {
            diags.error_short(format!("`{attr}` is unknown"), AttributePath::new(attr));
            None
        }
    }
}

fn split_pair(id: &str) -> anyhow::Result<(i64, i64)> {
    let (first, second) = id
        .split_once(':')
        .ok_or_else(|| anyhow!("missing `:` separator"))?;
    let first = first
        .trim()
        .parse()
        .with_context(|| format!("`{first}` is not an integer id"))?;
    let second = second
        .trim()
        .parse()
        .with_context(|| format!("`{second}` is not an integer id"))?;
    Ok((first, second))
}

/// Parse an id made of two Redash ids, eg: `<group_id>:<data_source_id>`
pub(crate) fn parse_pair(
    diags: &mut Diagnostics,
    id: &str,
    expected: &'static str,
) -> Option<(i64, i64)> {
    match split_pair(id) {
        Ok(pair) => Some(pair),
        Err(err) => {
            diags.root_error(
                format!("Invalid id `{id}`"),
                format!("Expected `{expected}`: {err:#}"),
            );
            None
        }
    }
}

pub(crate) fn pair_id<'a>(first: i64, second: i64) -> ValueString<'a> {
    string_value(format!("{first}:{second}"))
}

/// Known, non-empty string attributes
pub(crate) fn check_not_empty(diags: &mut Diagnostics, value: &ValueString<'_>, attr: &'static str) {
    if let Value::Value(value) = value {
        if value.trim().is_empty() {
            diags.error_short(format!("`{attr}` should not be empty"), AttributePath::new(attr));
        }
    }
}

/// Known string attributes must hold valid JSON
pub(crate) fn check_json(diags: &mut Diagnostics, value: &ValueString<'_>, attr: &'static str) {
    if let Value::Value(text) = value {
        if let Err(err) = serde_json::from_str::<serde_json::Value>(text) {
            diags.error(
                format!("`{attr}` is not valid JSON"),
                err.to_string(),
                AttributePath::new(attr),
            );
        }
    }
}

/// Decode a JSON attribute, null being an empty object
pub(crate) fn parse_json(
    diags: &mut Diagnostics,
    value: &ValueString<'_>,
    attr: &'static str,
) -> Option<serde_json::Value> {
    match value.as_ref_option() {
        None => Some(serde_json::json!({})),
        Some(text) => match serde_json::from_str(text) {
            Ok(json) => Some(json),
            Err(err) => {
                diags.error(
                    format!("`{attr}` is not valid JSON"),
                    err.to_string(),
                    AttributePath::new(attr),
                );
                None
            }
        },
    }
}

/// Encode a remote JSON value, keeping the prior text if it means the same thing
pub(crate) fn json_value<'a>(prior: &ValueString<'_>, remote: &serde_json::Value) -> ValueString<'a> {
    let empty = serde_json::json!({});
    let remote = if remote.is_null() { &empty } else { remote };
    if let Some(text) = prior.as_ref_option() {
        if serde_json::from_str::<serde_json::Value>(text).ok().as_ref() == Some(remote) {
            return string_value(text.to_string());
        }
    }
    string_value(remote.to_string())
}

pub(crate) fn tags_to_vec(tags: &ValueSet<ValueString<'_>>) -> Vec<String> {
    tags.iter()
        .flatten()
        .filter_map(to_optional_string)
        .collect()
}

/// Remote tags, null when there are none and none were configured
pub(crate) fn tags_value<'a>(
    tags: Vec<String>,
    prior: &ValueSet<ValueString<'_>>,
) -> ValueSet<ValueString<'a>> {
    if tags.is_empty() && prior.is_null() {
        Value::Null
    } else {
        Value::Value(tags.into_iter().map(string_value).collect())
    }
}

pub(crate) fn numbers_to_set(numbers: &ValueSet<ValueNumber>) -> BTreeSet<i64> {
    numbers
        .iter()
        .flatten()
        .filter_map(|number| number.as_ref_option().copied())
        .collect()
}

pub(crate) fn numbers_value<I: IntoIterator<Item = i64>>(numbers: I) -> ValueSet<ValueNumber> {
    Value::Value(numbers.into_iter().map(Value::Value).collect())
}

/// Add `attr` to the replacement paths if its value changed
pub(crate) fn replace_if_changed<T: PartialEq>(
    trigger_replace: &mut Vec<AttributePath>,
    attr: &'static str,
    prior: &T,
    proposed: &T,
) {
    if prior != proposed {
        trigger_replace.push(AttributePath::new(attr));
    }
}
