// Response types for the managed-devices endpoint.
//
// The server returns a much richer record per device; only the fields the
// inventory needs are modelled and everything else is ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of `GET manageddevices/aps`.
///
/// ```json
/// { "managedDevices": [ { "name": "...", "ipAddress": "..." } ], "totalCount": 250 }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDevicesPage {
    #[serde(default)]
    pub managed_devices: Vec<AccessPoint>,
    /// Total number of records across all pages.
    pub total_count: u64,
}

/// A managed access point, reduced to name and IP address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPoint {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Empty when the AP has not reported an address (e.g. never came online).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ip_address: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
