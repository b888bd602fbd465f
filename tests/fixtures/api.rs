use apigen::runtime::Context;
use apigen_macros::ApiParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ApiFailure {
    #[error("user {0} exists")]
    Conflict(String),
    #[error("bad user")]
    BadUser,
}

#[derive(Debug, Serialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub full_name: String,
    pub status: u32,
    pub served_from: String,
}

#[derive(Debug, Serialize)]
pub struct NewUser {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub struct OtherUser {
    pub id: u64,
    pub login: String,
    pub class: String,
    pub level: i32,
}

#[derive(Debug, Default)]
pub struct MyApi {
    next_id: u64,
}

impl MyApi {
    pub fn new() -> Self {
        Self { next_id: 42 }
    }

    /// apigen:api {"url": "/user/profile", "auth": false, "method": "GET"}
    pub fn profile(&self, ctx: &Context, params: ProfileParams) -> Result<User, ApiFailure> {
        if params.login == "bad_user" {
            return Err(ApiFailure::BadUser);
        }
        Ok(User {
            id: self.next_id,
            login: params.login,
            full_name: "Vasily Romanov".to_string(),
            status: 20,
            served_from: ctx.path().to_string(),
        })
    }

    /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
    ///
    /// Registers a new user account.
    pub fn create(&self, _ctx: &Context, params: CreateParams) -> Result<NewUser, ApiFailure> {
        if params.login == "mr.moderator" {
            return Err(ApiFailure::Conflict(params.login));
        }
        Ok(NewUser { id: self.next_id })
    }
}

#[derive(Debug, Default)]
pub struct OtherApi;

impl OtherApi {
    /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
    pub fn create(&self, _ctx: Context, params: OtherCreateParams) -> Result<OtherUser, ApiFailure> {
        Ok(OtherUser {
            id: 12,
            login: params.username,
            class: params.class,
            level: params.level,
        })
    }
}

#[derive(Debug, Default, Deserialize, ApiParams)]
#[serde(default)]
pub struct ProfileParams {
    #[apivalidator("required")]
    pub login: String,
}

#[derive(Debug, Default, Deserialize, ApiParams)]
#[serde(default)]
pub struct CreateParams {
    #[apivalidator("required,min=10")]
    pub login: String,
    #[apivalidator("paramname=full_name")]
    #[serde(rename = "full_name")]
    pub name: String,
    #[apivalidator("enum=user|moderator|admin,default=user")]
    pub status: String,
    #[apivalidator("min=0,max=128")]
    pub age: i32,
}

#[derive(Debug, Default, Deserialize, ApiParams)]
#[serde(default)]
pub struct OtherCreateParams {
    #[apivalidator("required,min=3")]
    pub username: String,
    #[apivalidator("paramname=account_name")]
    #[serde(rename = "account_name")]
    pub name: String,
    #[apivalidator("enum=warrior|sorcerer|rouge,default=warrior")]
    pub class: String,
    #[apivalidator("min=1,max=50")]
    pub level: i32,
}
