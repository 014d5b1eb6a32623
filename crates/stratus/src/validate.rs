//! Placement validation.
//!
//! [`PlacementValidator`] decides whether a service may be dropped into a
//! container and how many points the attempt is worth. Decisions are made in
//! a fixed order:
//!
//! 1. An explicit rejection in the container's rule set always wins.
//! 2. An explicit allow awards the service's base score.
//! 3. A global or regional service dropped into any container other than the
//!    canvas is rejected with a generated explanation.
//! 4. Anything else is accepted.
//!
//! The last step is deliberately permissive: combinations the rule table does
//! not cover, including services missing from the catalog, never block the
//! learner.
//!
//! # Examples
//!
//! ```
//! use stratus::node::{NodeKind, SubnetPolarity};
//! use stratus::validate::validate_placement;
//!
//! let verdict = validate_placement("ec2", Some(&NodeKind::subnet(SubnetPolarity::Private)), None);
//! assert!(verdict.is_valid());
//! assert_eq!(verdict.points_awarded(), 10);
//!
//! // A generic subnet takes the polarity argument.
//! let verdict = validate_placement(
//!     "rds",
//!     Some(&NodeKind::Subnet { polarity: None }),
//!     Some(SubnetPolarity::Public),
//! );
//! assert!(!verdict.is_valid());
//! assert_eq!(verdict.points_awarded(), -5);
//! ```

use log::{debug, trace};
use serde::Serialize;

use stratus_core::{
    catalog::{self, ServiceId, ServiceMetadata},
    node::{NodeKind, SubnetPolarity},
};

use crate::{
    config::ScoringConfig,
    rules::{self, ContainerKey, ContainerRule},
};

/// Outcome of a placement attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    points_awarded: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'static ServiceMetadata>,
}

impl ValidationVerdict {
    /// Creates an accepting verdict.
    pub fn accepted(points_awarded: i32, metadata: Option<&'static ServiceMetadata>) -> Self {
        Self {
            valid: true,
            explanation: None,
            points_awarded,
            metadata,
        }
    }

    /// Creates a rejecting verdict with the explanation shown to the learner.
    pub fn rejected(
        explanation: impl Into<String>,
        points_awarded: i32,
        metadata: Option<&'static ServiceMetadata>,
    ) -> Self {
        Self {
            valid: false,
            explanation: Some(explanation.into()),
            points_awarded,
            metadata,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Explanation for rejected placements.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Point delta of this attempt; negative for penalties.
    pub fn points_awarded(&self) -> i32 {
        self.points_awarded
    }

    /// Catalog metadata of the placed service, if it is known.
    pub fn metadata(&self) -> Option<&'static ServiceMetadata> {
        self.metadata
    }
}

/// Resolves the rule key used for a placement target.
///
/// No target means the canvas. A generic subnet takes the polarity argument;
/// a subnet that already has a polarity keeps it. Returns `None` when the
/// target has no rule set of its own.
pub fn effective_target(
    target: Option<&NodeKind>,
    polarity: Option<SubnetPolarity>,
) -> Option<ContainerKey> {
    match target {
        None => Some(ContainerKey::Canvas),
        Some(NodeKind::Subnet { polarity: None }) => polarity.map(ContainerKey::subnet),
        Some(kind) => ContainerKey::from_node_kind(kind),
    }
}

/// Resolves the target and returns the rule set that applies to it, falling
/// back to the canvas rules for targets without one.
fn resolve_rule(
    target: Option<&NodeKind>,
    polarity: Option<SubnetPolarity>,
) -> (ContainerKey, &'static ContainerRule) {
    effective_target(target, polarity)
        .and_then(|key| rules::rule_for(key).map(|rule| (key, rule)))
        .unwrap_or_else(|| (ContainerKey::Canvas, rules::canvas_rule()))
}

/// Validates placements against the rule table using configurable point values.
#[derive(Debug, Clone, Default)]
pub struct PlacementValidator {
    scoring: ScoringConfig,
}

impl PlacementValidator {
    /// Creates a validator with the given point values.
    pub fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    /// Returns the point values in use.
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Decides whether `service_id` may be placed into `target`.
    ///
    /// # Arguments
    ///
    /// * `service_id` - Catalog identifier; unknown identifiers are accepted
    ///   by default.
    /// * `target` - Container the service is dropped into; `None` is the canvas.
    /// * `polarity` - Polarity to apply when `target` is a generic subnet.
    pub fn validate_placement(
        &self,
        service_id: &str,
        target: Option<&NodeKind>,
        polarity: Option<SubnetPolarity>,
    ) -> ValidationVerdict {
        let metadata = catalog::lookup(service_id);
        let (key, rule) = resolve_rule(target, polarity);

        trace!(service_id, container:% = key; "Validating placement");

        if let Some(meta) = metadata {
            if let Some(explanation) = rule.rejection(meta.id()) {
                debug!(service_id, container:% = key; "Placement explicitly rejected");
                return ValidationVerdict::rejected(
                    explanation,
                    self.scoring.incorrect_attempt,
                    metadata,
                );
            }

            if rule.allows_service(meta.id()) {
                return ValidationVerdict::accepted(self.correct_points(metadata), metadata);
            }

            if !meta.is_vpc_resource() && key != ContainerKey::Canvas {
                debug!(service_id, container:% = key; "Non-VPC service placed inside a container");
                return ValidationVerdict::rejected(
                    format!(
                        "{} is a {} service — place it on the canvas, not inside containers",
                        meta.name(),
                        meta.scope_label()
                    ),
                    self.scoring.incorrect_attempt,
                    metadata,
                );
            }
        }

        debug!(service_id, container:% = key; "Placement not covered by rules, accepting");
        ValidationVerdict::accepted(self.correct_points(metadata), metadata)
    }

    /// Decides whether a node of kind `child` may be nested inside `target`.
    ///
    /// Services are judged by [`validate_placement`](Self::validate_placement).
    /// Containers must be explicitly allowed by the target's rule set; a
    /// generic subnet is allowed where either polarity is. The canvas itself
    /// can never be nested.
    pub fn validate_nesting(
        &self,
        child: &NodeKind,
        target: Option<&NodeKind>,
        polarity: Option<SubnetPolarity>,
    ) -> bool {
        if let NodeKind::Service { service } = child {
            return self.validate_placement(service, target, polarity).is_valid();
        }

        let (_, rule) = resolve_rule(target, polarity);
        match child {
            NodeKind::Subnet { polarity: None } => {
                rule.allows_container(ContainerKey::PublicSubnet)
                    || rule.allows_container(ContainerKey::PrivateSubnet)
            }
            NodeKind::Canvas => false,
            other => {
                ContainerKey::from_node_kind(other).is_some_and(|key| rule.allows_container(key))
            }
        }
    }

    fn correct_points(&self, metadata: Option<&'static ServiceMetadata>) -> i32 {
        metadata.map_or(self.scoring.correct_placement, |meta| {
            i32::try_from(meta.base_score()).unwrap_or(i32::MAX)
        })
    }
}

/// Validates a placement with the default point values.
///
/// See [`PlacementValidator::validate_placement`].
pub fn validate_placement(
    service_id: &str,
    target: Option<&NodeKind>,
    polarity: Option<SubnetPolarity>,
) -> ValidationVerdict {
    PlacementValidator::default().validate_placement(service_id, target, polarity)
}

/// Checks whether a node kind may be nested inside a target with the default
/// point values.
///
/// See [`PlacementValidator::validate_nesting`].
pub fn validate_nesting(
    child: &NodeKind,
    target: Option<&NodeKind>,
    polarity: Option<SubnetPolarity>,
) -> bool {
    PlacementValidator::default().validate_nesting(child, target, polarity)
}

/// Lists where a service may be placed.
///
/// Global and regional services get a single canvas suggestion. VPC resources
/// get one label per container that explicitly allows them, in rule-table
/// order. Unknown services get no suggestions.
pub fn get_suggested_placements(service_id: &str) -> Vec<String> {
    let Ok(service) = service_id.parse::<ServiceId>() else {
        return Vec::new();
    };

    if !service.metadata().is_vpc_resource() {
        return vec![format!(
            "{} (global and regional services)",
            ContainerKey::Canvas.label()
        )];
    }

    rules::table()
        .iter()
        .filter(|(_, rule)| rule.allows_service(service))
        .map(|(key, _)| key.label().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_subnet() -> NodeKind {
        NodeKind::subnet(SubnetPolarity::Public)
    }

    fn private_subnet() -> NodeKind {
        NodeKind::subnet(SubnetPolarity::Private)
    }

    #[test]
    fn test_database_in_public_subnet_is_security_risk() {
        let verdict = validate_placement("rds", Some(&public_subnet()), None);

        assert!(!verdict.is_valid());
        assert!(verdict.explanation().unwrap().contains("security risk"));
        assert_eq!(verdict.points_awarded(), -5);
        assert_eq!(verdict.metadata().map(|m| m.id()), Some(ServiceId::Rds));
    }

    #[test]
    fn test_ec2_in_private_subnet() {
        let verdict = validate_placement("ec2", Some(&private_subnet()), None);

        assert!(verdict.is_valid());
        assert!(verdict.explanation().is_none());
        assert_eq!(verdict.points_awarded(), 10);
    }

    #[test]
    fn test_s3_in_vpc_uses_heuristic() {
        let verdict = validate_placement("s3", Some(&NodeKind::Vpc), None);

        assert!(!verdict.is_valid());
        assert_eq!(
            verdict.explanation(),
            Some("S3 is a Regional service — place it on the canvas, not inside containers")
        );
        assert_eq!(verdict.points_awarded(), -5);
    }

    #[test]
    fn test_global_service_heuristic_label() {
        let verdict = validate_placement("route53", Some(&private_subnet()), None);
        assert!(!verdict.is_valid());
        assert!(verdict.explanation().unwrap().starts_with("Route 53 is a Global service"));
    }

    #[test]
    fn test_no_target_means_canvas() {
        assert!(validate_placement("s3", None, None).is_valid());
        assert!(!validate_placement("ec2", None, None).is_valid());
    }

    #[test]
    fn test_generic_subnet_takes_polarity_argument() {
        let generic = NodeKind::Subnet { polarity: None };

        let public =
            validate_placement("nat-gateway", Some(&generic), Some(SubnetPolarity::Public));
        let private =
            validate_placement("nat-gateway", Some(&generic), Some(SubnetPolarity::Private));

        assert!(public.is_valid());
        assert!(!private.is_valid());
    }

    #[test]
    fn test_polarized_subnet_ignores_polarity_argument() {
        let verdict =
            validate_placement("rds", Some(&public_subnet()), Some(SubnetPolarity::Private));
        assert!(!verdict.is_valid());
    }

    #[test]
    fn test_generic_subnet_without_polarity_falls_back_to_canvas_rules() {
        let generic = NodeKind::Subnet { polarity: None };

        // Canvas rules reject EC2 and allow S3.
        assert!(!validate_placement("ec2", Some(&generic), None).is_valid());
        assert!(validate_placement("s3", Some(&generic), None).is_valid());
    }

    #[test]
    fn test_service_target_falls_back_to_canvas_rules() {
        let target = NodeKind::service("ec2");
        let verdict = validate_placement("rds", Some(&target), None);

        assert!(!verdict.is_valid());
        assert_eq!(
            verdict.explanation(),
            rules::canvas_rule().rejection(ServiceId::Rds)
        );
    }

    #[test]
    fn test_explicit_allow_beats_heuristic() {
        // Lambda is not a VPC resource but may be attached to a private subnet.
        let verdict = validate_placement("lambda", Some(&private_subnet()), None);
        assert!(verdict.is_valid());
    }

    #[test]
    fn test_permissive_default_for_uncovered_vpc_resource() {
        // EFS is neither allowed nor rejected directly in a VPC.
        let verdict = validate_placement("efs", Some(&NodeKind::Vpc), None);
        assert!(verdict.is_valid());
        assert_eq!(verdict.points_awarded(), 10);
    }

    #[test]
    fn test_permissive_default_for_unknown_service() {
        for target in [None, Some(NodeKind::Vpc), Some(public_subnet())] {
            let verdict = validate_placement("mainframe", target.as_ref(), None);
            assert!(verdict.is_valid());
            assert_eq!(verdict.points_awarded(), 10);
            assert!(verdict.metadata().is_none());
        }
    }

    #[test]
    fn test_base_score_is_awarded() {
        let verdict = validate_placement("aurora", Some(&private_subnet()), None);
        assert_eq!(verdict.points_awarded(), 20);
    }

    #[test]
    fn test_custom_scoring() {
        let validator = PlacementValidator::new(ScoringConfig {
            correct_placement: 3,
            incorrect_attempt: -11,
            streak_bonus: 0,
        });

        assert_eq!(
            validator
                .validate_placement("rds", Some(&public_subnet()), None)
                .points_awarded(),
            -11
        );
        assert_eq!(
            validator
                .validate_placement("unknown", None, None)
                .points_awarded(),
            3
        );
    }

    #[test]
    fn test_every_rejection_is_enforced() {
        for (key, rule) in rules::table() {
            let target = container_node(*key);
            for (service, explanation) in rule.rejections() {
                let verdict = validate_placement(service.as_str(), target.as_ref(), None);
                assert!(!verdict.is_valid(), "{service} in {key}");
                assert_eq!(verdict.explanation(), Some(explanation));
                assert_eq!(verdict.points_awarded(), -5);
            }
        }
    }

    #[test]
    fn test_every_allowed_service_is_accepted() {
        for (key, rule) in rules::table() {
            let target = container_node(*key);
            for child in rule.allowed() {
                let rules::ChildKind::Service(service) = child else {
                    continue;
                };
                let verdict = validate_placement(service.as_str(), target.as_ref(), None);
                assert!(verdict.is_valid(), "{service} in {key}");
                assert_eq!(
                    verdict.points_awarded(),
                    i32::try_from(service.metadata().base_score()).unwrap()
                );
            }
        }
    }

    fn container_node(key: ContainerKey) -> Option<NodeKind> {
        match key {
            ContainerKey::Canvas => None,
            ContainerKey::Vpc => Some(NodeKind::Vpc),
            ContainerKey::PublicSubnet => Some(NodeKind::subnet(SubnetPolarity::Public)),
            ContainerKey::PrivateSubnet => Some(NodeKind::subnet(SubnetPolarity::Private)),
            ContainerKey::SecurityGroup => Some(NodeKind::SecurityGroup),
            ContainerKey::AutoScalingGroup => Some(NodeKind::AutoScalingGroup),
        }
    }

    #[test]
    fn test_suggestions_for_regional_service() {
        assert_eq!(
            get_suggested_placements("dynamodb"),
            vec!["Canvas (global and regional services)".to_string()]
        );
    }

    #[test]
    fn test_suggestions_follow_rule_order() {
        assert_eq!(
            get_suggested_placements("ec2"),
            vec![
                "Public Subnet",
                "Private Subnet",
                "Security Group",
                "Auto Scaling Group"
            ]
        );
        assert_eq!(
            get_suggested_placements("nat-gateway"),
            vec!["Public Subnet"]
        );
    }

    #[test]
    fn test_suggestions_for_unknown_service() {
        assert!(get_suggested_placements("mainframe").is_empty());
    }

    #[test]
    fn test_nesting_of_containers() {
        assert!(validate_nesting(&NodeKind::Vpc, None, None));
        assert!(!validate_nesting(&NodeKind::Vpc, Some(&NodeKind::Vpc), None));
        assert!(validate_nesting(
            &NodeKind::Subnet { polarity: None },
            Some(&NodeKind::Vpc),
            None
        ));
        assert!(!validate_nesting(&private_subnet(), None, None));
        assert!(validate_nesting(
            &NodeKind::AutoScalingGroup,
            Some(&NodeKind::SecurityGroup),
            None
        ));
        assert!(!validate_nesting(&NodeKind::Canvas, Some(&NodeKind::Vpc), None));
    }

    #[test]
    fn test_nesting_of_services_delegates() {
        assert!(!validate_nesting(
            &NodeKind::service("rds"),
            Some(&public_subnet()),
            None
        ));
        assert!(validate_nesting(
            &NodeKind::service("rds"),
            Some(&private_subnet()),
            None
        ));
    }
}
