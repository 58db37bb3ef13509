//! Route records as printed by `rails routes`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One row of the routing table.
///
/// Records are never mutated after parsing; a refresh builds a new set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    /// HTTP method (`GET`, `POST`, `GET|POST`), empty for non-HTTP mappings
    pub verb: String,

    /// URI template, e.g. `/users/:id(.:format)`
    pub uri_pattern: String,

    /// Handling controller, possibly namespaced (`admin/users`)
    pub controller: String,

    /// Handling method; empty when the row had no `#`
    pub action: String,

    /// Helper-name prefix (`users` for `users_path`), may be empty
    pub prefix: String,
}

impl RouteRecord {
    pub fn new(
        verb: impl Into<String>,
        uri_pattern: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            verb: verb.into(),
            uri_pattern: uri_pattern.into(),
            controller: controller.into(),
            action: action.into(),
            prefix: prefix.into(),
        }
    }

    /// The `Controller#Action` column as it appears in the table.
    pub fn handler(&self) -> String {
        if self.action.is_empty() {
            self.controller.clone()
        } else {
            format!("{}#{}", self.controller, self.action)
        }
    }

    /// Conventional source file of the controller, relative to the project root.
    ///
    /// Returns `None` for rows whose handler is not a controller path
    /// (mounted engines, redirects, Rack apps).
    pub fn controller_file(&self) -> Option<PathBuf> {
        if !is_controller_path(&self.controller) {
            return None;
        }

        let mut path = PathBuf::from("app/controllers");
        path.push(format!("{}_controller.rb", self.controller));
        Some(path)
    }
}

/// `users`, `admin/users`, `api/v1/line_items`
fn is_controller_path(controller: &str) -> bool {
    !controller.is_empty()
        && controller.split('/').all(|seg| {
            !seg.is_empty()
                && seg
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        })
}
