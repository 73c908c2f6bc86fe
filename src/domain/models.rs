//! Session domain models
//!
//! Opaque structured values stored in the configuration document. Field
//! names on disk use the PascalCase keys older CLI releases wrote.

use serde::{Deserialize, Serialize};

/// A deployment region selected by the user
///
/// The region id is a three-segment identifier
/// `customer:deployment:locationcode`, e.g. `ibm:yp:us-south`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region id (`customer:deployment:locationcode`)
    #[serde(rename = "ID", default)]
    pub id: String,

    /// Display name
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Region type (`public`, `dedicated`, `local`, ...)
    #[serde(rename = "Type", default)]
    pub region_type: String,
}

impl Region {
    /// Creates a region from its three parts
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        region_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            region_type: region_type.into(),
        }
    }

    /// Cloud name derived from the region id
    ///
    /// See [`cloud_name`].
    pub fn cloud_name(&self) -> &str {
        cloud_name(&self.id)
    }
}

/// Classifies a region id into a cloud name
///
/// - empty id or anything but three segments: `""`
/// - `ibm:yp:*`: `"bluemix"`
/// - `ibm:ys*:*`: `"staging"`
/// - any other `ibm` deployment: `""`
/// - non-`ibm` customer: the customer segment
///
/// # Examples
///
/// ```
/// use bxconfig::domain::models::cloud_name;
///
/// assert_eq!(cloud_name("ibm:yp:us-south"), "bluemix");
/// assert_eq!(cloud_name("softlayer:yp:dal"), "softlayer");
/// assert_eq!(cloud_name("a:b"), "");
/// ```
pub fn cloud_name(region_id: &str) -> &str {
    if region_id.is_empty() {
        return "";
    }

    let mut segments = region_id.split(':');
    let (Some(customer), Some(deployment), Some(_location), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return "";
    };

    if customer != "ibm" {
        return customer;
    }

    match deployment {
        "yp" => "bluemix",
        d if d.starts_with("ys") => "staging",
        _ => "",
    }
}

/// The account the session is targeting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "GUID", default)]
    pub guid: String,

    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Owner", default)]
    pub owner: String,
}

/// The resource group the session is targeting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    #[serde(rename = "GUID", default)]
    pub guid: String,

    #[serde(rename = "Name", default)]
    pub name: String,

    /// Whether this is the account's default group
    #[serde(rename = "Default", default)]
    pub default: bool,

    #[serde(rename = "QuotaID", default)]
    pub quota_id: String,
}

/// A registered plugin repository
///
/// Names compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRepo {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "URL", default)]
    pub url: String,
}

impl PluginRepo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Case-insensitive name comparison
    pub fn matches(&self, name: &str) -> bool {
        self.name
            .chars()
            .flat_map(char::to_lowercase)
            .eq(name.chars().flat_map(char::to_lowercase))
    }
}
