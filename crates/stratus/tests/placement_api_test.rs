//! Integration tests for the public placement, scoring and layout API.

use stratus::{
    Stratus, StratusError, apply_verdict,
    config::{AppConfig, LayoutConfig, ScoringConfig},
    get_suggested_placements, layout, new_session,
    node::{DiagramNode, NodeKind, SubnetPolarity},
    validate_nesting, validate_placement,
};

#[test]
fn test_three_tier_session() {
    let public = NodeKind::subnet(SubnetPolarity::Public);
    let private = NodeKind::subnet(SubnetPolarity::Private);

    let attempts = [
        ("alb", Some(&public)),
        ("ec2", Some(&private)),
        ("rds", Some(&private)),
        ("rds", Some(&public)),
        ("s3", None),
    ];

    let mut state = new_session();
    for (service, target) in attempts {
        let verdict = validate_placement(service, target, None);
        state = apply_verdict(&state, &verdict, service, target);
    }

    // 10 + 10 + (15 + 5) - 5 + 10
    assert_eq!(state.total_points(), 45);
    assert_eq!(state.correct_placements(), 4);
    assert_eq!(state.incorrect_attempts(), 1);
    assert_eq!(state.current_streak(), 1);
    assert_eq!(state.longest_streak(), 3);
    assert_eq!(state.history().len(), 5);

    let stats = state.stats();
    assert_eq!(stats.total_attempts, 5);
    assert_eq!(stats.accuracy, 80.0);
}

#[test]
fn test_public_database_explanation() {
    let public = NodeKind::subnet(SubnetPolarity::Public);
    let verdict = validate_placement("aurora", Some(&public), None);

    assert!(!verdict.is_valid());
    assert!(verdict.explanation().unwrap().contains("security risk"));
    assert_eq!(verdict.metadata().map(|meta| meta.name()), Some("Aurora"));
}

#[test]
fn test_regional_service_in_vpc_is_rejected() {
    let verdict = validate_placement("s3", Some(&NodeKind::Vpc), None);

    assert!(!verdict.is_valid());
    assert_eq!(verdict.points_awarded(), -5);
    assert_eq!(
        verdict.explanation(),
        Some("S3 is a Regional service — place it on the canvas, not inside containers")
    );
}

#[test]
fn test_suggestions() {
    assert_eq!(
        get_suggested_placements("nat-gateway"),
        vec!["Public Subnet".to_string()]
    );
    assert_eq!(
        get_suggested_placements("cloudfront"),
        vec!["Canvas (global and regional services)".to_string()]
    );
    assert!(get_suggested_placements("made-up").is_empty());
}

#[test]
fn test_container_nesting() {
    let vpc = NodeKind::Vpc;
    let subnet = NodeKind::Subnet { polarity: None };

    assert!(validate_nesting(&vpc, None, None));
    assert!(validate_nesting(&subnet, Some(&vpc), None));
    assert!(!validate_nesting(&subnet, None, None));
}

#[test]
fn test_configured_point_values() {
    let config: AppConfig = toml::from_str(
        r#"
        [scoring]
        incorrect_attempt = -20
        "#,
    )
    .unwrap();
    let stratus = Stratus::new(&config);

    let (verdict, state) = stratus.place(&new_session(), "igw-typo", Some(&NodeKind::Vpc), None);
    assert!(verdict.is_valid());
    assert_eq!(state.total_points(), 10);

    let (verdict, state) = stratus.place(&state, "rds", Some(&NodeKind::Vpc), None);
    assert!(!verdict.is_valid());
    assert_eq!(verdict.points_awarded(), -20);
    assert_eq!(state.total_points(), 0);

    assert_eq!(
        stratus.validator().scoring(),
        &ScoringConfig {
            incorrect_attempt: -20,
            ..ScoringConfig::default()
        }
    );
}

#[test]
fn test_components_share_configuration() {
    let config: AppConfig = toml::from_str(
        r#"
        [layout]
        vpc_padding = 10.0

        [scoring]
        streak_bonus = 50
        "#,
    )
    .unwrap();
    let stratus = Stratus::new(&config);
    assert_eq!(stratus.engine().config().vpc_padding, 10.0);

    let private = NodeKind::subnet(SubnetPolarity::Private);
    let verdict = stratus
        .validator()
        .validate_placement("rds", Some(&private), None);

    let mut state = new_session();
    for _ in 0..3 {
        state = stratus
            .tracker()
            .apply(&state, &verdict, "rds", Some(&private));
    }

    // Three RDS placements at 15 each, the third earning the configured bonus.
    assert_eq!(state.total_points(), 3 * 15 + 50);
}

#[test]
fn test_layout_json() {
    let json = r#"{
        "nodes": [
            { "id": "vpc", "kind": { "type": "vpc" } },
            { "id": "pub", "kind": { "type": "subnet", "polarity": "public" }, "parentId": "vpc" },
            { "id": "web", "kind": { "type": "service", "service": "ec2" }, "parentId": "pub" },
            { "id": "bucket", "kind": { "type": "service", "service": "s3" } }
        ]
    }"#;

    let diagram = Stratus::default().layout_json(json).unwrap();
    let nodes = diagram.nodes();

    assert_eq!(nodes[0].size().width(), 210.0);
    assert_eq!(nodes[2].position().x(), 35.0);
    assert_eq!(nodes[3].position().x(), 250.0);
}

#[test]
fn test_layout_json_rejects_cycles() {
    let json = r#"[
        { "id": "a", "kind": { "type": "vpc" }, "parentId": "b" },
        { "id": "b", "kind": { "type": "security-group" }, "parentId": "a" }
    ]"#;

    let err = Stratus::default().layout_json(json).unwrap_err();
    assert!(matches!(err, StratusError::Graph(_)));
}

#[test]
fn test_layout_uses_custom_spacing() {
    let nodes = vec![
        DiagramNode::new("vpc", NodeKind::Vpc),
        DiagramNode::new("a", NodeKind::subnet(SubnetPolarity::Public)).with_parent("vpc"),
        DiagramNode::new("b", NodeKind::subnet(SubnetPolarity::Public)).with_parent("vpc"),
    ];
    let config = LayoutConfig {
        subnet_gap_x: 50.0,
        vpc_padding: 10.0,
        ..LayoutConfig::default()
    };

    let out = layout(&nodes, &config);

    assert_eq!(out[1].position().x(), 10.0);
    assert_eq!(out[2].position().x(), 10.0 + 150.0 + 50.0);
    assert_eq!(out[0].size().width(), 10.0 + 150.0 + 50.0 + 150.0 + 10.0);
}
