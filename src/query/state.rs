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

use redash_client::{Query, QueryRequest, Schedule};
use serde::{Deserialize, Serialize};
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::{self, Value, ValueBool, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::utils::{
    attribute, optional_string_value, string_value, tags_to_vec, tags_value, to_optional_string,
    to_string, WithSchema,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QueryState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub data_source_id: ValueNumber,
    pub query: ValueString<'a>,
    pub description: ValueString<'a>,
    pub tags: ValueSet<ValueString<'a>>,
    pub is_draft: ValueBool,
    pub is_archived: ValueBool,
    #[serde(with = "value::serde_as_vec")]
    pub schedule: Value<ScheduleState<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScheduleState<'a> {
    #[serde(borrow = "'a")]
    pub time: ValueString<'a>,
    pub day_of_week: ValueString<'a>,
    pub until: ValueString<'a>,
    pub interval: ValueNumber,
}

impl<'a> ScheduleState<'a> {
    fn to_schedule(&self) -> Schedule {
        Schedule {
            interval: self.interval.as_ref_option().copied(),
            time: to_optional_string(&self.time),
            day_of_week: to_optional_string(&self.day_of_week),
            until: to_optional_string(&self.until),
        }
    }

    pub(super) fn validate(&self, diags: &mut Diagnostics) {
        let path = || AttributePath::new("schedule").index(0);
        if matches!(self.interval, Value::Value(interval) if interval <= 0) {
            diags.error_short(
                "Schedule interval must be a positive number of seconds",
                path().attribute("interval"),
            );
        }
        if let Value::Value(time) = &self.time {
            if !is_time_of_day(time) {
                diags.error(
                    "Invalid schedule time",
                    format!("`{time}` is not formatted as HH:MM"),
                    path().attribute("time"),
                );
            }
        }
        if let Value::Value(until) = &self.until {
            if !is_date(until) {
                diags.error(
                    "Invalid schedule end",
                    format!("`{until}` is not formatted as YYYY-MM-DD"),
                    path().attribute("until"),
                );
            }
        }
    }
}

fn is_time_of_day(time: &str) -> bool {
    match time.split_once(':') {
        Some((hours, minutes)) if hours.len() == 2 && minutes.len() == 2 => {
            matches!(hours.parse::<u8>(), Ok(0..=23)) && matches!(minutes.parse::<u8>(), Ok(0..=59))
        }
        _ => false,
    }
}

fn is_date(date: &str) -> bool {
    let parts: Vec<&str> = date.split('-').collect();
    matches!(parts.as_slice(), [year, month, day]
        if year.len() == 4
            && year.parse::<u16>().is_ok()
            && matches!(month.parse::<u8>(), Ok(1..=12))
            && matches!(day.parse::<u8>(), Ok(1..=31)))
}

impl<'a> From<Schedule> for ScheduleState<'a> {
    fn from(schedule: Schedule) -> Self {
        Self {
            interval: schedule.interval.map_or(Value::Null, Value::Value),
            time: optional_string_value(schedule.time),
            day_of_week: optional_string_value(schedule.day_of_week),
            until: optional_string_value(schedule.until),
        }
    }
}

impl<'a> QueryState<'a> {
    pub fn request(&self, is_draft: Option<bool>) -> QueryRequest {
        QueryRequest {
            name: to_string(&self.name),
            data_source_id: self.data_source_id.as_ref_option().copied().unwrap_or_default(),
            query: to_string(&self.query),
            description: to_optional_string(&self.description),
            schedule: self.schedule.as_ref_option().map(ScheduleState::to_schedule),
            tags: tags_to_vec(&self.tags),
            is_draft,
        }
    }

    pub fn from_remote(query: Query, prior: &QueryState<'_>) -> Self {
        Self {
            id: string_value(query.id.to_string()),
            name: string_value(query.name),
            data_source_id: Value::Value(query.data_source_id),
            query: string_value(query.query),
            description: optional_string_value(query.description),
            tags: tags_value(query.tags, &prior.tags),
            is_draft: Value::Value(query.is_draft),
            is_archived: Value::Value(query.is_archived),
            schedule: match query.schedule {
                Some(schedule) if schedule.interval.is_some() => Value::Value(schedule.into()),
                _ => Value::Null,
            },
        }
    }
}

fn schedule_attributes(constraint: AttributeConstraint) -> [(&'static str, Attribute); 4] {
    let optional = if constraint == AttributeConstraint::Computed {
        AttributeConstraint::Computed
    } else {
        AttributeConstraint::Optional
    };
    [
        (
            "interval",
            attribute(AttributeType::Number, constraint, "Seconds between two executions"),
        ),
        (
            "time",
            attribute(AttributeType::String, optional.clone(), "Time of day of the executions (HH:MM)"),
        ),
        (
            "day_of_week",
            attribute(AttributeType::String, optional.clone(), "Day of week of weekly executions"),
        ),
        (
            "until",
            attribute(AttributeType::String, optional, "Last day of executions (YYYY-MM-DD)"),
        ),
    ]
}

impl<'a> WithSchema for QueryState<'a> {
    fn resource_schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Id of the query"),
                    "name" => attribute(AttributeType::String, AttributeConstraint::Required, "Name of the query"),
                    "data_source_id" => attribute(AttributeType::Number, AttributeConstraint::Required, "Id of the data source the query runs on"),
                    "query" => attribute(AttributeType::String, AttributeConstraint::Required, "Text of the query"),
                    "description" => attribute(AttributeType::String, AttributeConstraint::Optional, "Description of the query"),
                    "tags" => attribute(AttributeType::Set(AttributeType::String.into()), AttributeConstraint::Optional, "Tags of the query"),
                    "is_draft" => attribute(AttributeType::Bool, AttributeConstraint::OptionalComputed, "The query is not published yet"),
                    "is_archived" => attribute(AttributeType::Bool, AttributeConstraint::Computed, "The query has been archived"),
                },
                blocks: map! {
                    "schedule" => NestedBlock::Optional(Block {
                        attributes: schedule_attributes(AttributeConstraint::Required)
                            .into_iter()
                            .map(|(name, attr)| (name.to_owned(), attr))
                            .collect(),
                        description: Description::plain("Refresh schedule of the query results"),
                        ..Default::default()
                    }),
                },
                description: Description::plain("Redash query"),
                ..Default::default()
            },
        }
    }

    fn data_source_schema() -> Schema {
        let computed = |attr_type, description| {
            attribute(attr_type, AttributeConstraint::Computed, description)
        };
        let schedule = AttributeType::Object(
            schedule_attributes(AttributeConstraint::Computed)
                .into_iter()
                .map(|(name, attr)| (name.to_owned(), attr.attr_type))
                .collect(),
        );
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Required, "Id of the query"),
                    "name" => computed(AttributeType::String, "Name of the query"),
                    "data_source_id" => computed(AttributeType::Number, "Id of the data source the query runs on"),
                    "query" => computed(AttributeType::String, "Text of the query"),
                    "description" => computed(AttributeType::String, "Description of the query"),
                    "tags" => computed(AttributeType::Set(AttributeType::String.into()), "Tags of the query"),
                    "is_draft" => computed(AttributeType::Bool, "The query is not published yet"),
                    "is_archived" => computed(AttributeType::Bool, "The query has been archived"),
                    "schedule" => computed(AttributeType::List(schedule.into()), "Refresh schedule of the query results"),
                },
                description: Description::plain("Lookup of a Redash query"),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_and_date_formats() {
        assert!(is_time_of_day("03:30"));
        assert!(!is_time_of_day("3:30"));
        assert!(!is_time_of_day("24:00"));
        assert!(is_date("2025-12-31"));
        assert!(!is_date("2025-13-01"));
        assert!(!is_date("31/12/2025"));
    }

    #[test]
    fn schedule_validation() {
        let mut diags = Diagnostics::default();
        ScheduleState {
            interval: Value::Value(0),
            time: string_value("25:00"),
            ..Default::default()
        }
        .validate(&mut diags);
        assert_eq!(diags.errors.len(), 2);
    }

    #[test]
    fn remote_without_interval_has_no_schedule() {
        let query = Query {
            id: 1,
            schedule: Some(Schedule::default()),
            ..Default::default()
        };
        let state = QueryState::from_remote(query, &QueryState::default());
        assert!(state.schedule.is_null());
        assert!(state.tags.is_null());
        assert!(state.description.is_null());
    }

    #[test]
    fn data_source_schema_is_computed() {
        let schema = QueryState::data_source_schema();
        assert_eq!(
            schema.block.attributes["id"].constraint,
            AttributeConstraint::Required
        );
        assert!(schema
            .block
            .attributes
            .iter()
            .filter(|(name, _)| name.as_str() != "id")
            .all(|(_, attr)| attr.constraint == AttributeConstraint::Computed));
        assert!(schema.block.blocks.is_empty());
    }
}
