//! JSON summary of one adjudicated phase.

use serde::{Deserialize, Serialize};

use crate::board::World;
use crate::resolve::{Phase, ValidationReason};

use super::notation::format_order;

/// Verdict and outcome of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReport {
    pub order: String,
    pub valid: bool,
    pub reason: ValidationReason,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub implicit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dislodged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicationReport {
    pub orders: Vec<OrderReport>,
    /// Seasons created by the phase, as `turn:timeline`.
    pub seasons: Vec<String>,
    pub retreats: usize,
}

impl AdjudicationReport {
    /// Summarizes `phase`, which was played from `before`.
    pub fn new(before: &World, phase: &Phase) -> Self {
        let adjudication = &phase.adjudication;
        let orders = phase
            .validations
            .iter()
            .map(|v| {
                let unit = v.order.unit().filter(|_| v.valid);
                OrderReport {
                    order: format_order(before, &v.order),
                    valid: v.valid,
                    reason: v.reason,
                    implicit: v.implicit,
                    moved: unit.filter(|_| v.order.is_move()).and_then(|u| adjudication.does_move(u)),
                    dislodged: unit.and_then(|u| adjudication.is_dislodged(u)),
                    supported: unit
                        .filter(|_| v.order.is_support())
                        .and_then(|u| adjudication.gives_support(u)),
                }
            })
            .collect();
        let seasons = phase
            .world
            .seasons()
            .iter()
            .skip(before.seasons().len())
            .map(ToString::to_string)
            .collect();
        AdjudicationReport { orders, seasons, retreats: phase.world.retreats().len() }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
