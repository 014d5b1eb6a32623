//! Configuration types for Stratus placement scoring and layout.
//!
//! All types implement [`serde::Deserialize`] with `#[serde(default)]`, so a
//! partial table only overrides the fields it names and every other field
//! keeps its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and scoring settings.
//! - [`LayoutConfig`] - Node, subnet and VPC spacing used by the layout engine.
//! - [`ScoringConfig`] - Point values used by the validator and score tracker.
//!
//! # Example
//!
//! ```
//! # use stratus::config::LayoutConfig;
//! // Override a single field, keep the rest.
//! let config = LayoutConfig {
//!     node_width: 120.0,
//!     ..LayoutConfig::default()
//! };
//! assert_eq!(config.node_height, 80.0);
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

use stratus_core::geometry::{Insets, Size};

use crate::StratusError;

/// Number of consecutive valid placements after which every valid placement
/// earns the streak bonus.
pub const STREAK_THRESHOLD: u32 = 3;

/// Top-level configuration combining layout and scoring settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Scoring configuration section.
    #[serde(default)]
    scoring: ScoringConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `layout` - Spacing used by the layout engine.
    /// * `scoring` - Point values used by the validator and tracker.
    pub fn new(layout: LayoutConfig, scoring: ScoringConfig) -> Self {
        Self { layout, scoring }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the scoring configuration.
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), StratusError> {
        self.layout.validate()
    }
}

/// Spacing options for the layout engine, all in canvas units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Exclusive padding around every service node.
    pub node_padding: f32,
    pub subnet_padding: f32,
    pub subnet_header_height: f32,
    pub subnet_min_width: f32,
    pub subnet_min_height: f32,
    pub vpc_padding: f32,
    pub vpc_header_height: f32,
    pub subnet_gap_x: f32,
    pub subnet_gap_y: f32,
    /// Height reserved under the VPC header when the VPC fronts a load balancer.
    pub load_balancer_band_height: f32,
    /// Gap between the VPCs and the stacked external services, and between
    /// consecutive external services.
    pub external_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 100.0,
            node_height: 80.0,
            node_padding: 15.0,
            subnet_padding: 20.0,
            subnet_header_height: 28.0,
            subnet_min_width: 150.0,
            subnet_min_height: 120.0,
            vpc_padding: 20.0,
            vpc_header_height: 20.0,
            subnet_gap_x: 25.0,
            subnet_gap_y: 15.0,
            load_balancer_band_height: 100.0,
            external_gap: 40.0,
        }
    }
}

impl LayoutConfig {
    /// Size every service node is drawn at.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Node size plus its exclusive padding on every side.
    pub fn node_bounding_box(&self) -> Size {
        self.node_size()
            .add_padding(Insets::uniform(self.node_padding))
    }

    /// Height of the band under the VPC header that holds load balancers.
    ///
    /// Never shorter than a load balancer placed `node_padding` below the
    /// header, so the subnet rows start beneath it.
    pub fn load_balancer_band(&self) -> f32 {
        self.load_balancer_band_height
            .max(self.node_padding + self.node_height)
    }

    /// Size of a subnet with no services.
    pub fn subnet_min_size(&self) -> Size {
        Size::new(self.subnet_min_width, self.subnet_min_height)
    }

    /// Checks that every value is finite and non-negative and that nodes have
    /// a positive size.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<(), StratusError> {
        let fields = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("node_padding", self.node_padding),
            ("subnet_padding", self.subnet_padding),
            ("subnet_header_height", self.subnet_header_height),
            ("subnet_min_width", self.subnet_min_width),
            ("subnet_min_height", self.subnet_min_height),
            ("vpc_padding", self.vpc_padding),
            ("vpc_header_height", self.vpc_header_height),
            ("subnet_gap_x", self.subnet_gap_x),
            ("subnet_gap_y", self.subnet_gap_y),
            ("load_balancer_band_height", self.load_balancer_band_height),
            ("external_gap", self.external_gap),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(StratusError::Config(format!(
                    "layout.{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if self.node_width == 0.0 || self.node_height == 0.0 {
            return Err(StratusError::Config(
                "layout.node_width and layout.node_height must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Point values for placement scoring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points for a correct placement of a service missing from the catalog.
    pub correct_placement: i32,
    /// Points for an incorrect placement; normally negative.
    pub incorrect_attempt: i32,
    /// Extra points per valid placement once the streak reaches
    /// [`STREAK_THRESHOLD`].
    pub streak_bonus: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            correct_placement: 10,
            incorrect_attempt: -5,
            streak_bonus: 5,
        }
    }
}
