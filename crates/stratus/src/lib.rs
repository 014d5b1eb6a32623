//! Stratus - placement validation, scoring and layout for cloud architecture diagrams
//!
//! This library checks whether a cloud service may be dropped into a container
//! of a VPC diagram, keeps the learner's score across placements, and lays the
//! diagram out so that subnets, VPCs and their services fit together.
//!
//! The three parts are independent pure functions:
//!
//! - [`validate_placement`] turns a placement attempt into a [`ValidationVerdict`].
//! - [`apply_verdict`] folds a verdict into a new [`ScoreState`].
//! - [`layout()`] recomputes positions and sizes of a node list.
//!
//! [`Stratus`] bundles them behind one [`AppConfig`].

pub mod config;
pub mod diagram;
pub mod layout;
pub mod rules;
pub mod score;
pub mod validate;

mod error;

pub use stratus_core::{catalog, geometry, node};

pub use error::StratusError;
pub use layout::{LayoutEngine, layout};
pub use score::{ScoreState, ScoreTracker, SessionStats, apply_verdict, new_session};
pub use validate::{
    PlacementValidator, ValidationVerdict, get_suggested_placements, validate_nesting,
    validate_placement,
};

use log::{debug, info};

use config::AppConfig;
use diagram::Diagram;
use node::{NodeKind, SubnetPolarity};

/// Validator, score tracker and layout engine sharing one configuration.
///
/// # Examples
///
/// ```
/// use stratus::{Stratus, new_session};
/// use stratus::node::{NodeKind, SubnetPolarity};
///
/// let stratus = Stratus::default();
/// let subnet = NodeKind::subnet(SubnetPolarity::Private);
///
/// let (verdict, state) = stratus.place(&new_session(), "rds", Some(&subnet), None);
/// assert!(verdict.is_valid());
/// assert_eq!(state.total_points(), 15);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stratus {
    validator: PlacementValidator,
    tracker: ScoreTracker,
    engine: LayoutEngine,
}

impl Stratus {
    /// Creates a new instance from the application configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            validator: PlacementValidator::new(config.scoring().clone()),
            tracker: ScoreTracker::new(config.scoring().clone()),
            engine: LayoutEngine::new(config.layout().clone()),
        }
    }

    pub fn validator(&self) -> &PlacementValidator {
        &self.validator
    }

    pub fn tracker(&self) -> &ScoreTracker {
        &self.tracker
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Validates a placement and records it in a new score state.
    pub fn place(
        &self,
        state: &ScoreState,
        service_id: &str,
        target: Option<&NodeKind>,
        polarity: Option<SubnetPolarity>,
    ) -> (ValidationVerdict, ScoreState) {
        let verdict = self
            .validator
            .validate_placement(service_id, target, polarity);
        let state = self.tracker.apply(state, &verdict, service_id, target);
        (verdict, state)
    }

    /// Parses a JSON diagram, checks its hierarchy and lays it out.
    ///
    /// # Errors
    ///
    /// Returns [`StratusError::Document`] for malformed input and
    /// [`StratusError::Graph`] for duplicate ids, parent cycles or nodes
    /// nested inside services.
    pub fn layout_json(&self, json: &str) -> Result<Diagram, StratusError> {
        info!("Reading diagram");
        let diagram = Diagram::from_json(json)?;
        diagram::check_hierarchy(diagram.nodes())?;
        debug!(nodes = diagram.nodes().len(); "Hierarchy checked");

        Ok(Diagram::new(self.engine.layout(diagram.nodes())))
    }
}
