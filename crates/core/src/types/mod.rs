//! Core types for Minha API.
//!
//! This module provides type-safe wrappers for the routing and documentation
//! concepts shared by the server and the CLI.

pub mod info;
pub mod route;
pub mod ui;

pub use info::ApiInfo;
pub use route::{
    EndpointDoc, HttpMethod, RouteEntry, RouteError, RouteIndex, RouteKind, RouteName,
    RouteNameError,
};
pub use ui::{CacheTimeout, UiKind, UiKindError};
