//! Static service catalog.
//!
//! The catalog maps every service the diagram palette offers to its
//! [`ServiceMetadata`]: category, whether it is global or regional, whether it
//! lives inside a VPC, the points a correct placement is worth and the tier
//! that decides its row inside a subnet.
//!
//! The table is a plain `static` array, so it is built at compile time and
//! never mutated.
//!
//! # Examples
//!
//! ```
//! use stratus_core::catalog::{self, ServiceId};
//!
//! let ec2 = catalog::lookup("ec2").unwrap();
//! assert_eq!(ec2.id(), ServiceId::Ec2);
//! assert!(ec2.is_vpc_resource());
//!
//! // Unknown services have no metadata; callers fall back to defaults.
//! assert!(catalog::lookup("mainframe").is_none());
//! ```

use std::{fmt, str::FromStr};

use log::trace;
use serde::Serialize;

use crate::error::ParseError;

/// Tier for gateways and edge services, drawn on the top row of a subnet.
pub const GATEWAY_TIER: u8 = 0;
/// Tier for load balancers.
pub const LOAD_BALANCER_TIER: u8 = 1;
/// Tier for compute; also the fallback for services missing from the catalog.
pub const COMPUTE_TIER: u8 = 2;
/// Tier for in-memory caches.
pub const CACHE_TIER: u8 = 3;
/// Tier for databases.
pub const DATABASE_TIER: u8 = 4;
/// Tier for file and object storage.
pub const STORAGE_TIER: u8 = 5;

/// Every service known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceId {
    // Global
    Route53,
    Cloudfront,
    Iam,
    Waf,
    // Regional, outside any VPC
    S3,
    Dynamodb,
    Sqs,
    Sns,
    ApiGateway,
    Cloudwatch,
    Cognito,
    Kinesis,
    Lambda,
    // VPC resources
    Ec2,
    Ecs,
    Eks,
    Fargate,
    Rds,
    Aurora,
    Elasticache,
    Efs,
    Alb,
    Nlb,
    NatGateway,
    InternetGateway,
    BastionHost,
    VpcEndpoint,
}

impl ServiceId {
    /// Returns the canonical kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Route53 => "route53",
            Self::Cloudfront => "cloudfront",
            Self::Iam => "iam",
            Self::Waf => "waf",
            Self::S3 => "s3",
            Self::Dynamodb => "dynamodb",
            Self::Sqs => "sqs",
            Self::Sns => "sns",
            Self::ApiGateway => "api-gateway",
            Self::Cloudwatch => "cloudwatch",
            Self::Cognito => "cognito",
            Self::Kinesis => "kinesis",
            Self::Lambda => "lambda",
            Self::Ec2 => "ec2",
            Self::Ecs => "ecs",
            Self::Eks => "eks",
            Self::Fargate => "fargate",
            Self::Rds => "rds",
            Self::Aurora => "aurora",
            Self::Elasticache => "elasticache",
            Self::Efs => "efs",
            Self::Alb => "alb",
            Self::Nlb => "nlb",
            Self::NatGateway => "nat-gateway",
            Self::InternetGateway => "internet-gateway",
            Self::BastionHost => "bastion-host",
            Self::VpcEndpoint => "vpc-endpoint",
        }
    }

    /// Returns the catalog entry for this service.
    pub fn metadata(self) -> &'static ServiceMetadata {
        CATALOG
            .iter()
            .find(|entry| entry.id == self)
            .unwrap_or_else(|| unreachable!("catalog covers every ServiceId"))
    }

    /// Returns true for services that sit at the edge of a VPC in front of
    /// its subnets.
    pub fn is_load_balancer(self) -> bool {
        matches!(self, Self::Alb | Self::Nlb)
    }
}

impl FromStr for ServiceId {
    type Err = ParseError;

    /// Parses a service identifier. Matching ignores ASCII case and accepts
    /// `_` in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        CATALOG
            .iter()
            .map(|entry| entry.id)
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ParseError::UnknownService(s.to_string()))
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad service family, used for palette grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Compute,
    Containers,
    Database,
    Storage,
    Networking,
    Security,
    Integration,
    Management,
    Analytics,
}

/// Immutable metadata for one catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    id: ServiceId,
    name: &'static str,
    category: ServiceCategory,
    is_global: bool,
    is_vpc_resource: bool,
    base_score: u32,
    tier: u8,
}

impl ServiceMetadata {
    const fn new(
        id: ServiceId,
        name: &'static str,
        category: ServiceCategory,
        is_global: bool,
        is_vpc_resource: bool,
        base_score: u32,
        tier: u8,
    ) -> Self {
        Self {
            id,
            name,
            category,
            is_global,
            is_vpc_resource,
            base_score,
            tier,
        }
    }

    pub fn id(&self) -> ServiceId {
        self.id
    }

    /// Human-readable service name, e.g. `"NAT Gateway"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> ServiceCategory {
        self.category
    }

    /// True for services that are not bound to a region (DNS, CDN, identity).
    pub fn is_global(&self) -> bool {
        self.is_global
    }

    /// True for services deployed into a VPC's address space.
    pub fn is_vpc_resource(&self) -> bool {
        self.is_vpc_resource
    }

    /// Points awarded for a correct placement of this service.
    pub fn base_score(&self) -> u32 {
        self.base_score
    }

    /// Row bucket inside a subnet; lower tiers are drawn nearer the top.
    pub fn tier(&self) -> u8 {
        self.tier
    }

    /// Returns `"Global"` or `"Regional"`.
    pub fn scope_label(&self) -> &'static str {
        if self.is_global { "Global" } else { "Regional" }
    }
}

use ServiceCategory as C;
use ServiceId as S;

static CATALOG: &[ServiceMetadata] = &[
    ServiceMetadata::new(S::Route53, "Route 53", C::Networking, true, false, 10, GATEWAY_TIER),
    ServiceMetadata::new(S::Cloudfront, "CloudFront", C::Networking, true, false, 10, GATEWAY_TIER),
    ServiceMetadata::new(S::Iam, "IAM", C::Security, true, false, 5, COMPUTE_TIER),
    ServiceMetadata::new(S::Waf, "WAF", C::Security, true, false, 10, GATEWAY_TIER),
    ServiceMetadata::new(S::S3, "S3", C::Storage, false, false, 10, STORAGE_TIER),
    ServiceMetadata::new(S::Dynamodb, "DynamoDB", C::Database, false, false, 10, DATABASE_TIER),
    ServiceMetadata::new(S::Sqs, "SQS", C::Integration, false, false, 10, COMPUTE_TIER),
    ServiceMetadata::new(S::Sns, "SNS", C::Integration, false, false, 10, COMPUTE_TIER),
    ServiceMetadata::new(
        S::ApiGateway,
        "API Gateway",
        C::Networking,
        false,
        false,
        10,
        GATEWAY_TIER,
    ),
    ServiceMetadata::new(S::Cloudwatch, "CloudWatch", C::Management, false, false, 5, COMPUTE_TIER),
    ServiceMetadata::new(S::Cognito, "Cognito", C::Security, false, false, 10, COMPUTE_TIER),
    ServiceMetadata::new(S::Kinesis, "Kinesis", C::Analytics, false, false, 10, COMPUTE_TIER),
    ServiceMetadata::new(S::Lambda, "Lambda", C::Compute, false, false, 10, COMPUTE_TIER),
    ServiceMetadata::new(S::Ec2, "EC2", C::Compute, false, true, 10, COMPUTE_TIER),
    ServiceMetadata::new(S::Ecs, "ECS", C::Containers, false, true, 10, COMPUTE_TIER),
    ServiceMetadata::new(S::Eks, "EKS", C::Containers, false, true, 15, COMPUTE_TIER),
    ServiceMetadata::new(S::Fargate, "Fargate", C::Containers, false, true, 10, COMPUTE_TIER),
    ServiceMetadata::new(S::Rds, "RDS", C::Database, false, true, 15, DATABASE_TIER),
    ServiceMetadata::new(S::Aurora, "Aurora", C::Database, false, true, 20, DATABASE_TIER),
    ServiceMetadata::new(S::Elasticache, "ElastiCache", C::Database, false, true, 15, CACHE_TIER),
    ServiceMetadata::new(S::Efs, "EFS", C::Storage, false, true, 10, STORAGE_TIER),
    ServiceMetadata::new(
        S::Alb,
        "Application Load Balancer",
        C::Networking,
        false,
        true,
        10,
        LOAD_BALANCER_TIER,
    ),
    ServiceMetadata::new(
        S::Nlb,
        "Network Load Balancer",
        C::Networking,
        false,
        true,
        10,
        LOAD_BALANCER_TIER,
    ),
    ServiceMetadata::new(
        S::NatGateway,
        "NAT Gateway",
        C::Networking,
        false,
        true,
        15,
        GATEWAY_TIER,
    ),
    ServiceMetadata::new(
        S::InternetGateway,
        "Internet Gateway",
        C::Networking,
        false,
        true,
        10,
        GATEWAY_TIER,
    ),
    ServiceMetadata::new(
        S::BastionHost,
        "Bastion Host",
        C::Security,
        false,
        true,
        15,
        COMPUTE_TIER,
    ),
    ServiceMetadata::new(
        S::VpcEndpoint,
        "VPC Endpoint",
        C::Networking,
        false,
        true,
        20,
        GATEWAY_TIER,
    ),
];

/// Returns every catalog entry in declaration order.
pub fn entries() -> &'static [ServiceMetadata] {
    CATALOG
}

/// Resolves a service identifier string to its metadata.
///
/// Returns `None` for services that are not in the catalog.
pub fn lookup(service_id: &str) -> Option<&'static ServiceMetadata> {
    match service_id.parse::<ServiceId>() {
        Ok(id) => Some(id.metadata()),
        Err(err) => {
            trace!(service_id, err:%; "Service not in catalog");
            None
        }
    }
}

/// Returns the tier of a service, or [`COMPUTE_TIER`] for unknown services.
pub fn tier_of(service_id: &str) -> u8 {
    lookup(service_id).map_or(COMPUTE_TIER, ServiceMetadata::tier)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_id_has_exactly_one_entry() {
        let ids: HashSet<_> = entries().iter().map(ServiceMetadata::id).collect();
        assert_eq!(ids.len(), entries().len());
        for entry in entries() {
            assert_eq!(entry.id().metadata(), entry);
        }
    }

    #[test]
    fn test_round_trip_identifier() {
        for entry in entries() {
            let parsed: ServiceId = entry.id().as_str().parse().unwrap();
            assert_eq!(parsed, entry.id());
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_underscores() {
        assert_eq!("NAT_Gateway".parse::<ServiceId>(), Ok(ServiceId::NatGateway));
        assert_eq!(" s3 ".parse::<ServiceId>(), Ok(ServiceId::S3));
    }

    #[test]
    fn test_parse_unknown_service() {
        assert_eq!(
            "mainframe".parse::<ServiceId>(),
            Err(ParseError::UnknownService("mainframe".to_string()))
        );
    }

    #[test]
    fn test_global_services_are_never_vpc_resources() {
        for entry in entries().iter().filter(|entry| entry.is_global()) {
            assert!(!entry.is_vpc_resource(), "{} is global", entry.name());
        }
    }

    #[test]
    fn test_tier_ordering_matches_network_convention() {
        assert!(tier_of("nat-gateway") < tier_of("alb"));
        assert!(tier_of("alb") < tier_of("ec2"));
        assert!(tier_of("ec2") < tier_of("elasticache"));
        assert!(tier_of("elasticache") < tier_of("rds"));
    }

    #[test]
    fn test_unknown_service_defaults_to_compute_tier() {
        assert_eq!(tier_of("quantum-ledger"), COMPUTE_TIER);
    }

    #[test]
    fn test_scope_label() {
        assert_eq!(ServiceId::Route53.metadata().scope_label(), "Global");
        assert_eq!(ServiceId::S3.metadata().scope_label(), "Regional");
    }

    #[test]
    fn test_load_balancers() {
        assert!(ServiceId::Alb.is_load_balancer());
        assert!(ServiceId::Nlb.is_load_balancer());
        assert!(!ServiceId::NatGateway.is_load_balancer());
    }
}
