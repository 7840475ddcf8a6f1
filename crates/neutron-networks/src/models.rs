//! Network data models.
//!
//! Every optional field is a [`Nullable`] so that a payload can leave a field
//! out, send it as `null`, or send a value. Absent fields are never written.

use neutron_core::{Error, Nullable, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Operational status reported for a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkStatus {
    /// Network is usable.
    Active,
    /// Network is administratively or operationally down.
    Down,
    /// Network is being built.
    Build,
    /// Network is in an error state.
    Error,
    /// Status value this client does not know about.
    Unrecognized,
}

impl NetworkStatus {
    /// Wire token for the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Down => "DOWN",
            Self::Build => "BUILD",
            Self::Error => "ERROR",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Map an optional wire value to a status.
    ///
    /// `None` stays `None`; known values match case-insensitively; anything
    /// else is [`NetworkStatus::Unrecognized`].
    #[must_use]
    pub fn from_wire(value: Option<&str>) -> Option<Self> {
        value.map(Self::parse)
    }

    fn parse(value: &str) -> Self {
        [Self::Active, Self::Down, Self::Build, Self::Error]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(Self::Unrecognized)
    }
}

impl FromStr for NetworkStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NetworkStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NetworkStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Provider network type (`provider:network_type`).
///
/// Known tokens map to named variants; any other token is kept verbatim in
/// [`NetworkType::Other`] so it survives a round trip.
///
/// Matching is exact and case-sensitive: `"LOCAL"` is
/// `NetworkType::Other("LOCAL")`, not [`NetworkType::Local`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetworkType {
    /// Host-local network.
    Local,
    /// Untagged physical network.
    Flat,
    /// 802.1Q VLAN.
    Vlan,
    /// GRE tunnel.
    Gre,
    /// VXLAN overlay.
    Vxlan,
    /// Geneve overlay.
    Geneve,
    /// Any other provider type.
    Other(String),
}

impl NetworkType {
    /// Wire token for the type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Flat => "flat",
            Self::Vlan => "vlan",
            Self::Gre => "gre",
            Self::Vxlan => "vxlan",
            Self::Geneve => "geneve",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for NetworkType {
    fn from(value: &str) -> Self {
        match value {
            "local" => Self::Local,
            "flat" => Self::Flat,
            "vlan" => Self::Vlan,
            "gre" => Self::Gre,
            "vxlan" => Self::Vxlan,
            "geneve" => Self::Geneve,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for NetworkType {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl FromStr for NetworkType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NetworkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NetworkType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// A Neutron network as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    status: Nullable<NetworkStatus>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    subnets: Nullable<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    admin_state_up: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    shared: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    tenant_id: Nullable<String>,
    #[serde(
        rename = "provider:network_type",
        default,
        skip_serializing_if = "Nullable::is_absent"
    )]
    network_type: Nullable<NetworkType>,
}

impl Network {
    /// Start building a network value.
    #[must_use]
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    /// Server-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> &Nullable<String> {
        &self.id
    }

    /// Operational status.
    #[must_use]
    pub const fn status(&self) -> &Nullable<NetworkStatus> {
        &self.status
    }

    /// Subnet identifiers attached to the network.
    #[must_use]
    pub const fn subnets(&self) -> &Nullable<BTreeSet<String>> {
        &self.subnets
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(&self) -> &Nullable<String> {
        &self.name
    }

    /// Administrative state.
    #[must_use]
    pub const fn admin_state_up(&self) -> &Nullable<bool> {
        &self.admin_state_up
    }

    /// Whether the network is visible to other tenants.
    #[must_use]
    pub const fn shared(&self) -> &Nullable<bool> {
        &self.shared
    }

    /// Owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> &Nullable<String> {
        &self.tenant_id
    }

    /// Provider network type.
    #[must_use]
    pub const fn network_type(&self) -> &Nullable<NetworkType> {
        &self.network_type
    }
}

struct SubnetList<'a>(&'a Nullable<BTreeSet<String>>);

impl fmt::Display for SubnetList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Nullable::Absent => f.write_str("<absent>"),
            Nullable::Null => f.write_str("null"),
            Nullable::Value(subnets) => {
                f.write_str("[")?;
                for (i, subnet) in subnets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(subnet)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Network{{id={}, status={}, subnets={}, name={}, admin_state_up={}, shared={}, tenant_id={}, network_type={}}}",
            self.id,
            self.status,
            SubnetList(&self.subnets),
            self.name,
            self.admin_state_up,
            self.shared,
            self.tenant_id,
            self.network_type,
        )
    }
}

// Setters shared by all three builders.
macro_rules! nullable_setters {
    ($($field:ident / $clear:ident: $ty:ty, $doc:literal;)*) => {
        $(
            #[doc = concat!("Set ", $doc, ".")]
            #[must_use]
            pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                self.$field = Nullable::Value(value.into());
                self
            }

            #[doc = concat!("Send ", $doc, " as an explicit `null`.")]
            #[must_use]
            pub fn $clear(mut self) -> Self {
                self.$field = Nullable::Null;
                self
            }
        )*

        /// Set the subnet identifiers.
        #[must_use]
        pub fn subnets<I, S>(mut self, subnets: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.subnets = Nullable::Value(subnets.into_iter().map(Into::into).collect());
            self
        }

        /// Send the subnets as an explicit `null`.
        #[must_use]
        pub fn clear_subnets(mut self) -> Self {
            self.subnets = Nullable::Null;
            self
        }
    };
}

/// Builder for [`Network`].
#[derive(Debug, Clone, Default)]
pub struct NetworkBuilder {
    id: Nullable<String>,
    status: Nullable<NetworkStatus>,
    subnets: Nullable<BTreeSet<String>>,
    name: Nullable<String>,
    admin_state_up: Nullable<bool>,
    shared: Nullable<bool>,
    tenant_id: Nullable<String>,
    network_type: Nullable<NetworkType>,
}

impl NetworkBuilder {
    nullable_setters! {
        id / clear_id: String, "the identifier";
        status / clear_status: NetworkStatus, "the status";
        name / clear_name: String, "the name";
        admin_state_up / clear_admin_state_up: bool, "the administrative state";
        shared / clear_shared: bool, "the shared flag";
        tenant_id / clear_tenant_id: String, "the owning tenant";
        network_type / clear_network_type: NetworkType, "the provider network type";
    }

    /// Build the network value.
    #[must_use]
    pub fn build(self) -> Network {
        Network {
            id: self.id,
            status: self.status,
            subnets: self.subnets,
            name: self.name,
            admin_state_up: self.admin_state_up,
            shared: self.shared,
            tenant_id: self.tenant_id,
            network_type: self.network_type,
        }
    }
}

fn non_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Payload for creating a network. `name` is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Validate)]
pub struct CreateNetwork {
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    subnets: Nullable<BTreeSet<String>>,
    #[validate(custom(function = "non_blank"))]
    name: String,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    admin_state_up: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    shared: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    tenant_id: Nullable<String>,
    #[serde(
        rename = "provider:network_type",
        skip_serializing_if = "Nullable::is_absent"
    )]
    network_type: Nullable<NetworkType>,
}

impl CreateNetwork {
    /// Start building a create payload.
    #[must_use]
    pub fn builder() -> CreateNetworkBuilder {
        CreateNetworkBuilder::default()
    }

    /// Check the payload before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the name is blank.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|err| Error::ValidationError(format!("invalid network: {err}")))
    }

    /// Subnet identifiers.
    #[must_use]
    pub const fn subnets(&self) -> &Nullable<BTreeSet<String>> {
        &self.subnets
    }

    /// Network name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Administrative state.
    #[must_use]
    pub const fn admin_state_up(&self) -> &Nullable<bool> {
        &self.admin_state_up
    }

    /// Shared flag.
    #[must_use]
    pub const fn shared(&self) -> &Nullable<bool> {
        &self.shared
    }

    /// Owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> &Nullable<String> {
        &self.tenant_id
    }

    /// Provider network type.
    #[must_use]
    pub const fn network_type(&self) -> &Nullable<NetworkType> {
        &self.network_type
    }
}

impl fmt::Display for CreateNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CreateNetwork{{subnets={}, name={}, admin_state_up={}, shared={}, tenant_id={}, network_type={}}}",
            SubnetList(&self.subnets),
            self.name,
            self.admin_state_up,
            self.shared,
            self.tenant_id,
            self.network_type,
        )
    }
}

/// Builder for [`CreateNetwork`].
#[derive(Debug, Clone, Default)]
pub struct CreateNetworkBuilder {
    subnets: Nullable<BTreeSet<String>>,
    name: Option<String>,
    admin_state_up: Nullable<bool>,
    shared: Nullable<bool>,
    tenant_id: Nullable<String>,
    network_type: Nullable<NetworkType>,
}

impl CreateNetworkBuilder {
    nullable_setters! {
        admin_state_up / clear_admin_state_up: bool, "the administrative state";
        shared / clear_shared: bool, "the shared flag";
        tenant_id / clear_tenant_id: String, "the owning tenant";
        network_type / clear_network_type: NetworkType, "the provider network type";
    }

    /// Set the network name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the name is missing or blank.
    pub fn build(self) -> Result<CreateNetwork> {
        let name = self
            .name
            .ok_or_else(|| Error::ValidationError("network name is required".to_string()))?;
        let network = CreateNetwork {
            subnets: self.subnets,
            name,
            admin_state_up: self.admin_state_up,
            shared: self.shared,
            tenant_id: self.tenant_id,
            network_type: self.network_type,
        };
        network.check()?;
        Ok(network)
    }
}

/// Payload for updating a network. Only fields that were set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct UpdateNetwork {
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    subnets: Nullable<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    name: Nullable<String>,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    admin_state_up: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    shared: Nullable<bool>,
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    tenant_id: Nullable<String>,
    #[serde(
        rename = "provider:network_type",
        skip_serializing_if = "Nullable::is_absent"
    )]
    network_type: Nullable<NetworkType>,
}

impl UpdateNetwork {
    /// Start building an update payload.
    #[must_use]
    pub fn builder() -> UpdateNetworkBuilder {
        UpdateNetworkBuilder::default()
    }

    /// Subnet identifiers.
    #[must_use]
    pub const fn subnets(&self) -> &Nullable<BTreeSet<String>> {
        &self.subnets
    }

    /// Network name.
    #[must_use]
    pub const fn name(&self) -> &Nullable<String> {
        &self.name
    }

    /// Administrative state.
    #[must_use]
    pub const fn admin_state_up(&self) -> &Nullable<bool> {
        &self.admin_state_up
    }

    /// Shared flag.
    #[must_use]
    pub const fn shared(&self) -> &Nullable<bool> {
        &self.shared
    }

    /// Owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> &Nullable<String> {
        &self.tenant_id
    }

    /// Provider network type.
    #[must_use]
    pub const fn network_type(&self) -> &Nullable<NetworkType> {
        &self.network_type
    }
}

impl fmt::Display for UpdateNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UpdateNetwork{{subnets={}, name={}, admin_state_up={}, shared={}, tenant_id={}, network_type={}}}",
            SubnetList(&self.subnets),
            self.name,
            self.admin_state_up,
            self.shared,
            self.tenant_id,
            self.network_type,
        )
    }
}

/// Builder for [`UpdateNetwork`].
#[derive(Debug, Clone, Default)]
pub struct UpdateNetworkBuilder {
    subnets: Nullable<BTreeSet<String>>,
    name: Nullable<String>,
    admin_state_up: Nullable<bool>,
    shared: Nullable<bool>,
    tenant_id: Nullable<String>,
    network_type: Nullable<NetworkType>,
}

impl UpdateNetworkBuilder {
    nullable_setters! {
        name / clear_name: String, "the name";
        admin_state_up / clear_admin_state_up: bool, "the administrative state";
        shared / clear_shared: bool, "the shared flag";
        tenant_id / clear_tenant_id: String, "the owning tenant";
        network_type / clear_network_type: NetworkType, "the provider network type";
    }

    /// Build the payload.
    #[must_use]
    pub fn build(self) -> UpdateNetwork {
        UpdateNetwork {
            subnets: self.subnets,
            name: self.name,
            admin_state_up: self.admin_state_up,
            shared: self.shared,
            tenant_id: self.tenant_id,
            network_type: self.network_type,
        }
    }
}

/// `{"network": ...}` request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct NetworkRequest<'a, T> {
    pub network: &'a T,
}

/// `{"networks": [...]}` request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct NetworksRequest<'a, T> {
    pub networks: &'a [T],
}

/// `{"network": ...}` response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct NetworkResponse {
    pub network: Network,
}

/// `{"networks": [...]}` response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct NetworksResponse {
    pub networks: Vec<Network>,
}
