//! Canned responses mirroring three ReqRes endpoints: a single resource
//! lookup, a successful registration and a user creation.

use crate::domain::mapping::StubMapping;
use crate::domain::ports::{Clock, MappingSource};
use crate::dsl::{a_response, get, post, url_equal_to};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

pub const RESOURCE_PATH: &str = "/api/unknown/2";
pub const REGISTER_PATH: &str = "/api/register";
pub const USERS_PATH: &str = "/api/users";

pub const SUPPORT_URL: &str = "https://reqres.in/#support-heading";
pub const REGISTER_TOKEN: &str = "QpwL5tke4Pnpja7X4";

/// `yyyy-MM-ddTHH:mm:ss.SSSZ` in UTC.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub fn single_resource() -> StubMapping {
    get(url_equal_to(RESOURCE_PATH))
        .with_name("reqres single resource")
        .will_return(a_response().with_status(200).with_json_body(json!({
            "data": {
                "id": 2,
                "name": "fuchsia rose",
                "year": 2001,
                "color": "#C74375",
                "pantone_value": "17-2031"
            },
            "support": {
                "url": SUPPORT_URL,
                "text": "To keep ReqRes free, contributions towards server costs are appreciated!"
            }
        })))
}

pub fn register_successful() -> StubMapping {
    post(url_equal_to(REGISTER_PATH))
        .with_name("reqres register")
        .will_return(a_response().with_status(200).with_json_body(json!({
            "id": 4,
            "token": REGISTER_TOKEN
        })))
}

/// The echoed `createdAt` is fixed when the stub is built, not per request.
pub fn create_user(created_at: DateTime<Utc>) -> StubMapping {
    post(url_equal_to(USERS_PATH))
        .with_name("reqres create user")
        .will_return(a_response().with_status(201).with_json_body(json!({
            "name": "morpheus",
            "job": "leader",
            "id": "78",
            "createdAt": format_timestamp(created_at)
        })))
}

pub fn register_request_body() -> Value {
    json!({ "email": "eve.holt@reqres.in", "password": "pistol" })
}

pub fn create_user_request_body() -> Value {
    json!({ "name": "morpheus", "job": "leader" })
}

/// All three ReqRes stubs as a [`MappingSource`].
pub struct ReqResFixtures {
    clock: Arc<dyn Clock>,
}

impl ReqResFixtures {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl MappingSource for ReqResFixtures {
    fn load(&self) -> Result<Vec<StubMapping>> {
        Ok(vec![
            single_resource(),
            register_successful(),
            create_user(self.clock.now()),
        ])
    }

    fn describe(&self) -> String {
        "built-in reqres fixtures".to_string()
    }
}
