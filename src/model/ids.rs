//! Type-safe identifiers.
//!
//! Each id is a `String` newtype so a `UserId` can never be passed where an
//! `OrderId` is expected. `define_id!(Order)` expands to `OrderId`.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

macro_rules! define_id {
    ($($name:ident),+ $(,)?) => {
        paste::paste! {
            $(
                #[doc = "Type-safe identifier for " $name " documents."]
                #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
                #[serde(transparent)]
                pub struct [<$name Id>](pub String);

                impl [<$name Id>] {
                    pub fn new(id: impl Into<String>) -> Self {
                        Self(id.into())
                    }

                    pub fn as_str(&self) -> &str {
                        &self.0
                    }
                }

                impl Display for [<$name Id>] {
                    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        f.write_str(&self.0)
                    }
                }

                impl From<&str> for [<$name Id>] {
                    fn from(id: &str) -> Self {
                        Self(id.to_string())
                    }
                }

                impl From<String> for [<$name Id>] {
                    fn from(id: String) -> Self {
                        Self(id)
                    }
                }
            )+
        }
    };
}

define_id!(User, Order, Agent, Line, Product);

impl OrderId {
    /// A fresh random order id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
