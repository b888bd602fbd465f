//! # apigen
//!
//! **apigen** is an ahead-of-time generator that turns annotated Rust methods
//! and validated parameter structs into complete HTTP request handlers and
//! per-type routers.
//!
//! ## Overview
//!
//! Business code declares *what* an endpoint is; apigen writes *how* it is
//! served:
//!
//! ```rust,ignore
//! use apigen::runtime::Context;
//! use apigen_macros::ApiParams;
//!
//! impl MyApi {
//!     /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
//!     pub fn create(&self, ctx: &Context, params: CreateParams) -> Result<NewUser, ApiFailure> {
//!         // ...
//!     }
//! }
//!
//! #[derive(Deserialize, ApiParams)]
//! pub struct CreateParams {
//!     #[apivalidator("required,min=10")]
//!     pub login: String,
//!     #[apivalidator("min=0,max=128")]
//!     pub age: i32,
//! }
//! ```
//!
//! From this, `apigen api.rs api_handlers.rs` emits `MyApi::handle_create`,
//! which runs:
//!
//! 1. the credential check (`401 unauthorized`)
//! 2. JSON body decoding (`400 invalid request body`)
//! 3. every field check in declaration order (`400` with the exact message)
//! 4. the business call (`500` with the error's message on failure)
//! 5. JSON encoding of the result
//!
//! and an `impl ApiService for MyApi` that dispatches on the exact verb and
//! path, answering `404 unknown method <verb> on <path>` otherwise.
//!
//! ## Architecture
//!
//! - **[`decl`]** - Declaration tree and the `syn`-based Rust front end
//! - **[`spec`]** - Annotation extraction into [`spec::ApiSpec`]s
//! - **[`constraints`]** - Constraint tags compiled into type-aware checks
//! - **[`generator`]** - Handler/router planning, emission and atomic writing
//! - **[`runtime`]** - Support library the generated code calls into
//! - **[`config`]** - `apigen.toml` loading
//! - **[`cli`]** - The `apigen` command line
//!
//! ## Using the Output
//!
//! The artifact has no module-level imports and refers to the runtime by
//! absolute path, so it is included right next to the declarations:
//!
//! ```rust,ignore
//! mod api {
//!     include!("api.rs");
//!     include!("api_handlers.rs");
//! }
//!
//! use apigen::runtime::ApiService;
//! let response = api::MyApi::new().serve_http(&request);
//! ```
//!
//! Generation can also run from a `build.rs` through [`generator::generate_file`].

pub mod cli;
pub mod config;
pub mod constraints;
pub mod decl;
pub mod error;
pub mod generator;
pub mod runtime;
pub mod spec;

pub use config::GeneratorConfig;
pub use error::{GenerateError, Result};
pub use generator::{check_file, generate_file, generate_source, GenerationReport, WriteOptions};
