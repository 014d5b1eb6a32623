//! Containment rule table.
//!
//! Every container a service can be dropped into has a [`ContainerRule`]: the
//! children it explicitly allows and an explicit rejection table mapping
//! services to the explanation shown to the learner. The table is built once
//! on first use and is read-only afterwards; its iteration order is the
//! declaration order below, which [`crate::validate::get_suggested_placements`]
//! relies on.
//!
//! A service never appears both in the allowed set and in the rejection table
//! of the same container.

use std::{fmt, sync::OnceLock};

use indexmap::{IndexMap, IndexSet};

use stratus_core::{
    catalog::ServiceId,
    node::{NodeKind, SubnetPolarity},
};

/// Key of a rule set: a container kind with any subnet polarity resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerKey {
    Canvas,
    Vpc,
    PublicSubnet,
    PrivateSubnet,
    SecurityGroup,
    AutoScalingGroup,
}

impl ContainerKey {
    /// Returns the key for a polarized subnet.
    pub fn subnet(polarity: SubnetPolarity) -> Self {
        match polarity {
            SubnetPolarity::Public => Self::PublicSubnet,
            SubnetPolarity::Private => Self::PrivateSubnet,
        }
    }

    /// Maps a node kind to its rule key.
    ///
    /// Returns `None` for kinds without a rule set of their own: generic
    /// subnets and services.
    pub fn from_node_kind(kind: &NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Canvas => Some(Self::Canvas),
            NodeKind::Vpc => Some(Self::Vpc),
            NodeKind::Subnet {
                polarity: Some(polarity),
            } => Some(Self::subnet(*polarity)),
            NodeKind::Subnet { polarity: None } => None,
            NodeKind::SecurityGroup => Some(Self::SecurityGroup),
            NodeKind::AutoScalingGroup => Some(Self::AutoScalingGroup),
            NodeKind::Service { .. } => None,
        }
    }

    /// Human-readable container name used in suggestions.
    pub fn label(self) -> &'static str {
        match self {
            Self::Canvas => "Canvas",
            Self::Vpc => "VPC",
            Self::PublicSubnet => "Public Subnet",
            Self::PrivateSubnet => "Private Subnet",
            Self::SecurityGroup => "Security Group",
            Self::AutoScalingGroup => "Auto Scaling Group",
        }
    }
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A child a container may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Service(ServiceId),
    Container(ContainerKey),
}

/// Allowed children and explicit rejections for one container.
#[derive(Debug, Clone, Default)]
pub struct ContainerRule {
    allowed: IndexSet<ChildKind>,
    rejections: IndexMap<ServiceId, &'static str>,
}

impl ContainerRule {
    fn new() -> Self {
        Self::default()
    }

    fn allow_services(mut self, services: &[ServiceId]) -> Self {
        self.allowed
            .extend(services.iter().copied().map(ChildKind::Service));
        self
    }

    fn allow_containers(mut self, containers: &[ContainerKey]) -> Self {
        self.allowed
            .extend(containers.iter().copied().map(ChildKind::Container));
        self
    }

    fn reject(mut self, service: ServiceId, explanation: &'static str) -> Self {
        self.rejections.insert(service, explanation);
        self
    }

    /// Returns true if the service is explicitly allowed.
    pub fn allows_service(&self, service: ServiceId) -> bool {
        self.allowed.contains(&ChildKind::Service(service))
    }

    /// Returns true if the container kind is explicitly allowed.
    pub fn allows_container(&self, container: ContainerKey) -> bool {
        self.allowed.contains(&ChildKind::Container(container))
    }

    /// Returns the explanation if the service is explicitly rejected.
    pub fn rejection(&self, service: ServiceId) -> Option<&'static str> {
        self.rejections.get(&service).copied()
    }

    /// Allowed children in declaration order.
    pub fn allowed(&self) -> impl Iterator<Item = ChildKind> + '_ {
        self.allowed.iter().copied()
    }

    /// Rejections in declaration order.
    pub fn rejections(&self) -> impl Iterator<Item = (ServiceId, &'static str)> + '_ {
        self.rejections
            .iter()
            .map(|(service, explanation)| (*service, *explanation))
    }
}

static RULES: OnceLock<IndexMap<ContainerKey, ContainerRule>> = OnceLock::new();

/// Returns the full rule table in declaration order.
pub fn table() -> &'static IndexMap<ContainerKey, ContainerRule> {
    RULES.get_or_init(build_table)
}

/// Returns the rule set for a container, if it has one.
pub fn rule_for(key: ContainerKey) -> Option<&'static ContainerRule> {
    table().get(&key)
}

/// Returns the canvas rule set, the fallback for containers without rules.
pub fn canvas_rule() -> &'static ContainerRule {
    rule_for(ContainerKey::Canvas).unwrap_or_else(|| unreachable!("canvas rule is always declared"))
}

fn build_table() -> IndexMap<ContainerKey, ContainerRule> {
    use ContainerKey as K;
    use ServiceId as S;

    const GATEWAY_IN_SUBNET: &str =

        "An Internet Gateway attaches to the VPC, not to a subnet. Drop it onto the VPC itself.";
    const PUBLIC_DATABASE: &str =
        "Placing a database in a public subnet is a security risk. Databases belong in private subnets with no route to the internet.";

    let mut table = IndexMap::new();

    table.insert(
        K::Canvas,
        ContainerRule::new()
            .allow_services(&[
                S::Route53,
                S::Cloudfront,
                S::Iam,
                S::Waf,
                S::S3,
                S::Dynamodb,
                S::Sqs,
                S::Sns,
                S::ApiGateway,
                S::Cloudwatch,
                S::Cognito,
                S::Kinesis,
                S::Lambda,
            ])
            .allow_containers(&[K::Vpc])
            .reject(
                S::Ec2,
                "EC2 instances run inside a VPC. Place them in a subnet so they get an IP address and a route table.",
            )
            .reject(
                S::Ecs,
                "ECS tasks and container instances run inside a VPC. Place them in a subnet.",
            )
            .reject(S::Eks, "EKS worker nodes run inside a VPC. Place them in a private subnet.")
            .reject(
                S::Fargate,
                "Fargate tasks get an elastic network interface in a subnet. Place them inside a VPC.",
            )
            .reject(
                S::Rds,
                "RDS instances need a DB subnet group. Place them in a private subnet inside a VPC.",
            )
            .reject(
                S::Aurora,
                "Aurora clusters need a DB subnet group. Place them in a private subnet inside a VPC.",
            )
            .reject(S::Elasticache, "ElastiCache clusters live in private subnets inside a VPC.")
            .reject(S::Efs, "EFS mount targets are created in the subnets of a VPC.")
            .reject(S::Alb, "Load balancers are deployed into a VPC and span its subnets.")
            .reject(S::Nlb, "Load balancers are deployed into a VPC and span its subnets.")
            .reject(S::NatGateway, "A NAT Gateway belongs in a public subnet of a VPC.")
            .reject(
                S::InternetGateway,
                "An Internet Gateway attaches to a VPC. Drop it onto the VPC itself.",
            )
            .reject(
                S::BastionHost,
                "A bastion host is an EC2 instance in a public subnet of a VPC.",
            )
            .reject(S::VpcEndpoint, "A VPC endpoint only exists inside a VPC."),
    );

    table.insert(
        K::Vpc,
        ContainerRule::new()
            .allow_services(&[S::InternetGateway, S::VpcEndpoint, S::Alb, S::Nlb])
            .allow_containers(&[K::PublicSubnet, K::PrivateSubnet, K::SecurityGroup])
            .reject(
                S::Ec2,
                "EC2 instances must be launched into a subnet, not directly into the VPC.",
            )
            .reject(S::Rds, "RDS needs a DB subnet group. Place it in a private subnet.")
            .reject(S::Aurora, "Aurora needs a DB subnet group. Place it in a private subnet.")
            .reject(
                S::Elasticache,
                "ElastiCache clusters are placed in private subnets, not directly in the VPC.",
            )
            .reject(
                S::NatGateway,
                "A NAT Gateway lives in a public subnet so it can reach the Internet Gateway.",
            )
            .reject(
                S::BastionHost,
                "A bastion host is an EC2 instance and must sit in a public subnet.",
            ),
    );

    table.insert(
        K::PublicSubnet,
        ContainerRule::new()
            .allow_services(&[
                S::Alb,
                S::Nlb,
                S::NatGateway,
                S::BastionHost,
                S::Ec2,
                S::Ecs,
                S::Fargate,
            ])
            .allow_containers(&[K::SecurityGroup, K::AutoScalingGroup])
            .reject(S::Rds, PUBLIC_DATABASE)
            .reject(S::Aurora, PUBLIC_DATABASE)
            .reject(
                S::Elasticache,
                "Exposing a cache in a public subnet is a security risk. Keep ElastiCache in a private subnet.",
            )
            .reject(
                S::Efs,
                "File systems should only be reachable from inside the VPC. Create EFS mount targets in private subnets.",
            )
            .reject(S::InternetGateway, GATEWAY_IN_SUBNET),
    );

    table.insert(
        K::PrivateSubnet,
        ContainerRule::new()
            .allow_services(&[
                S::Ec2,
                S::Ecs,
                S::Eks,
                S::Fargate,
                S::Lambda,
                S::Rds,
                S::Aurora,
                S::Elasticache,
                S::Efs,
                S::VpcEndpoint,
            ])
            .allow_containers(&[K::SecurityGroup, K::AutoScalingGroup])
            .reject(
                S::NatGateway,
                "A NAT Gateway in a private subnet has no route to the Internet Gateway. Place it in a public subnet.",
            )
            .reject(S::InternetGateway, GATEWAY_IN_SUBNET)
            .reject(
                S::BastionHost,
                "A bastion host must be reachable from the internet. Place it in a public subnet.",
            ),
    );

    table.insert(
        K::SecurityGroup,
        ContainerRule::new()
            .allow_services(&[
                S::Ec2,
                S::Ecs,
                S::Eks,
                S::Fargate,
                S::Lambda,
                S::Rds,
                S::Aurora,
                S::Elasticache,
                S::Efs,
                S::Alb,
                S::Nlb,
                S::BastionHost,
                S::VpcEndpoint,
            ])
            .allow_containers(&[K::AutoScalingGroup])
            .reject(
                S::NatGateway,
                "NAT Gateways do not use security groups. Control their traffic with network ACLs.",
            )
            .reject(S::InternetGateway, "Internet Gateways are not attached to security groups.")
            .reject(
                S::S3,
                "S3 is not a VPC resource and cannot sit in a security group. Restrict access with bucket policies or a VPC endpoint.",
            )
            .reject(
                S::Iam,
                "IAM is a global identity service, not a network resource. Security groups only filter network traffic.",
            ),
    );

    table.insert(
        K::AutoScalingGroup,
        ContainerRule::new()
            .allow_services(&[S::Ec2, S::Ecs, S::Eks])
            .reject(
                S::Rds,
                "RDS does not run in an Auto Scaling group. Scale databases with read replicas.",
            )
            .reject(
                S::Aurora,
                "Aurora scales with replicas managed by Aurora Auto Scaling, not EC2 Auto Scaling groups.",
            )
            .reject(S::Lambda, "Lambda scales automatically. It never needs an Auto Scaling group.")
            .reject(
                S::Fargate,
                "Fargate tasks are scaled by ECS service auto scaling, not by an EC2 Auto Scaling group.",
            )
            .reject(
                S::Elasticache,
                "ElastiCache scales by adding shards or replicas, not through an Auto Scaling group.",
            ),
    );

    table
}
