//! Diagram node model.
//!
//! A diagram is a flat list of [`DiagramNode`]s. Nesting is expressed with
//! `parent_id`, a lookup key into the same list rather than an ownership
//! edge, so the list can be stored, diffed and cloned as plain data.
//!
//! The JSON shape follows the canvas the diagrams are edited in:
//!
//! ```json
//! {
//!   "id": "web-1",
//!   "kind": { "type": "service", "service": "ec2" },
//!   "position": { "x": 0.0, "y": 0.0 },
//!   "size": { "width": 100.0, "height": 80.0 },
//!   "parentId": "public-a"
//! }
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{self, ServiceMetadata},
    error::ParseError,
    geometry::{Point, Size},
};

/// Whether a subnet routes to an internet gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetPolarity {
    Public,
    Private,
}

impl FromStr for SubnetPolarity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(ParseError::UnknownPolarity(s.to_string())),
        }
    }
}

impl From<SubnetPolarity> for &'static str {
    fn from(val: SubnetPolarity) -> Self {
        match val {
            SubnetPolarity::Public => "public",
            SubnetPolarity::Private => "private",
        }
    }
}

impl fmt::Display for SubnetPolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// The kind of a diagram node.
///
/// Every kind except [`NodeKind::Service`] is a container that may own
/// children. [`NodeKind::Canvas`] is the virtual root; it never appears as a
/// stored node but can be named as a placement target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Canvas,
    Vpc,
    Subnet {
        /// `None` for a generic subnet whose polarity is not yet chosen.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        polarity: Option<SubnetPolarity>,
    },
    SecurityGroup,
    AutoScalingGroup,
    Service {
        /// Catalog identifier; unknown identifiers are allowed.
        service: String,
    },
}

impl NodeKind {
    /// Shorthand for a polarized subnet.
    pub fn subnet(polarity: SubnetPolarity) -> Self {
        Self::Subnet {
            polarity: Some(polarity),
        }
    }

    /// Shorthand for a service leaf.
    pub fn service(service: impl Into<String>) -> Self {
        Self::Service {
            service: service.into(),
        }
    }

    /// Returns true for kinds that may own children.
    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Service { .. })
    }

    /// Returns the service identifier of a service node.
    pub fn service_id(&self) -> Option<&str> {
        match self {
            Self::Service { service } => Some(service),
            _ => None,
        }
    }

    /// Returns the catalog metadata of a service node, if the service is known.
    pub fn service_metadata(&self) -> Option<&'static ServiceMetadata> {
        self.service_id().and_then(catalog::lookup)
    }

    /// Returns the polarity of a subnet node.
    pub fn polarity(&self) -> Option<SubnetPolarity> {
        match self {
            Self::Subnet { polarity } => *polarity,
            _ => None,
        }
    }
}

impl FromStr for NodeKind {
    type Err = ParseError;

    /// Parses the textual form used on the command line: `canvas`, `vpc`,
    /// `subnet`, `public-subnet`, `private-subnet`, `security-group`,
    /// `auto-scaling-group` or `service:<id>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(service) = trimmed.strip_prefix("service:") {
            return Ok(Self::service(service.trim()));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "canvas" | "root" => Ok(Self::Canvas),
            "vpc" => Ok(Self::Vpc),
            "subnet" => Ok(Self::Subnet { polarity: None }),
            "public-subnet" => Ok(Self::subnet(SubnetPolarity::Public)),
            "private-subnet" => Ok(Self::subnet(SubnetPolarity::Private)),
            "security-group" => Ok(Self::SecurityGroup),
            "auto-scaling-group" | "asg" => Ok(Self::AutoScalingGroup),
            _ => Err(ParseError::UnknownNodeKind(s.to_string())),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canvas => write!(f, "canvas"),
            Self::Vpc => write!(f, "vpc"),
            Self::Subnet { polarity: None } => write!(f, "subnet"),
            Self::Subnet {
                polarity: Some(polarity),
            } => write!(f, "{polarity}-subnet"),
            Self::SecurityGroup => write!(f, "security-group"),
            Self::AutoScalingGroup => write!(f, "auto-scaling-group"),
            Self::Service { service } => write!(f, "service:{service}"),
        }
    }
}

/// A node in a cloud architecture diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramNode {
    id: String,
    kind: NodeKind,
    #[serde(default)]
    position: Point,
    #[serde(default)]
    size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
}

impl DiagramNode {
    /// Creates an unparented node at the origin with zero size.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Point::default(),
            size: Size::default(),
            parent_id: None,
        }
    }

    /// Sets the parent identifier (builder style).
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the position (builder style).
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Sets the size (builder style).
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Top-left corner, relative to the parent when the node has one.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}
