//! Row structs that map 1-to-1 onto database tables.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `world` benchmark table.
///
/// `id` is store-assigned identity; `random_number` is the client-mutable
/// payload.  Serialized on the wire as `{"id": …, "randomNumber": …}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct World {
    pub id: i32,
    #[serde(rename = "randomNumber")]
    #[sqlx(rename = "randomnumber")]
    pub random_number: i32,
}
