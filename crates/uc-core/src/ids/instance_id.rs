use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Stable identifier assigned to one installed application instance.
///
/// This is the primary key for peer identity: trust records and sync runtime
/// records are both keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppInstanceId(String);

impl_id!(AppInstanceId);
