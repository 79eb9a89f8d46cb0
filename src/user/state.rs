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

use redash_client::{User, UserRequest};
use serde::{Deserialize, Serialize};
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueBool, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::utils::{attribute, numbers_value, string_value, to_string, WithSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub email: ValueString<'a>,
    pub groups: ValueSet<ValueNumber>,
    pub is_disabled: ValueBool,
    pub is_invitation_pending: ValueBool,
}

impl<'a> UserState<'a> {
    pub fn request(&self) -> UserRequest {
        UserRequest {
            name: to_string(&self.name),
            email: to_string(&self.email),
        }
    }
}

impl<'a> From<User> for UserState<'a> {
    fn from(user: User) -> Self {
        Self {
            id: string_value(user.id.to_string()),
            name: string_value(user.name),
            email: string_value(user.email),
            groups: numbers_value(user.groups),
            is_disabled: Value::Value(user.is_disabled),
            is_invitation_pending: Value::Value(user.is_invitation_pending),
        }
    }
}

/// Emails are only checked for an `@`, Redash does the rest
pub(super) fn check_email(diags: &mut Diagnostics, email: &ValueString<'_>) {
    if let Value::Value(email) = email {
        if !email.contains('@') {
            diags.error(
                "Invalid email",
                format!("`{email}` is not an email address"),
                AttributePath::new("email"),
            );
        }
    }
}

fn status_attributes() -> [(&'static str, Attribute); 2] {
    [
        (
            "is_disabled",
            attribute(
                AttributeType::Bool,
                AttributeConstraint::Computed,
                "The user has been disabled",
            ),
        ),
        (
            "is_invitation_pending",
            attribute(
                AttributeType::Bool,
                AttributeConstraint::Computed,
                "The user has not accepted the invitation yet",
            ),
        ),
    ]
}

impl<'a> WithSchema for UserState<'a> {
    fn resource_schema() -> Schema {
        let mut attributes = map! {
            "id" => attribute(AttributeType::String, AttributeConstraint::Computed, "Id of the user"),
            "name" => attribute(AttributeType::String, AttributeConstraint::Required, "Full name of the user"),
            "email" => attribute(AttributeType::String, AttributeConstraint::Required, "Email of the user, used to log in"),
            "groups" => attribute(
                AttributeType::Set(AttributeType::Number.into()),
                AttributeConstraint::OptionalComputed,
                "Ids of the groups the user belongs to",
            ),
        };
        attributes.extend(status_attributes().map(|(name, attr)| (name.to_owned(), attr)));
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes,
                description: Description::plain("Redash user"),
                ..Default::default()
            },
        }
    }

    fn data_source_schema() -> Schema {
        let mut attributes = map! {
            "id" => attribute(
                AttributeType::String,
                AttributeConstraint::OptionalComputed,
                "Id of the user (exclusive with `email`)",
            ),
            "email" => attribute(
                AttributeType::String,
                AttributeConstraint::OptionalComputed,
                "Email of the user (exclusive with `id`)",
            ),
            "name" => attribute(AttributeType::String, AttributeConstraint::Computed, "Full name of the user"),
            "groups" => attribute(
                AttributeType::Set(AttributeType::Number.into()),
                AttributeConstraint::Computed,
                "Ids of the groups the user belongs to",
            ),
        };
        attributes.extend(status_attributes().map(|(name, attr)| (name.to_owned(), attr)));
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes,
                description: Description::plain("Lookup of a Redash user by id or email"),
                ..Default::default()
            },
        }
    }
}
