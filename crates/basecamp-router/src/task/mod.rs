//! Task descriptions handed to the router by callers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of work a caller wants done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    LeadQualification,
    EmailCopy,
    ChallengeGeneration,
    TripRecommendation,
    CustomerResponse,
    RefundDecision,
    PointCalculation,
    Chat,
    /// Any tag the router does not know about
    #[serde(other)]
    Other,
}

impl TaskType {
    pub const ALL: [TaskType; 9] = [
        TaskType::LeadQualification,
        TaskType::EmailCopy,
        TaskType::ChallengeGeneration,
        TaskType::TripRecommendation,
        TaskType::CustomerResponse,
        TaskType::RefundDecision,
        TaskType::PointCalculation,
        TaskType::Chat,
        TaskType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::LeadQualification => "lead_qualification",
            TaskType::EmailCopy => "email_copy",
            TaskType::ChallengeGeneration => "challenge_generation",
            TaskType::TripRecommendation => "trip_recommendation",
            TaskType::CustomerResponse => "customer_response",
            TaskType::RefundDecision => "refund_decision",
            TaskType::PointCalculation => "point_calculation",
            TaskType::Chat => "chat",
            TaskType::Other => "other",
        }
    }

    /// Short-form work where raw speed beats breadth
    pub fn is_short_form(&self) -> bool {
        matches!(self, TaskType::EmailCopy | TaskType::PointCalculation)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller wants optimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Speed,
    Quality,
    Cost,
    #[default]
    Balanced,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Speed,
        Priority::Quality,
        Priority::Cost,
        Priority::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Speed => "speed",
            Priority::Quality => "quality",
            Priority::Cost => "cost",
            Priority::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Simple, Complexity::Medium, Complexity::Complex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work to be routed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContext {
    pub task_type: TaskType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub complexity: Complexity,
    /// Token-count hint, only used for the cost estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,
}

impl TaskContext {
    pub fn new(task_type: TaskType, priority: Priority, complexity: Complexity) -> Self {
        Self {
            task_type,
            priority,
            complexity,
            input_length: None,
            caller_id: None,
        }
    }

    pub fn with_input_length(mut self, tokens: u32) -> Self {
        self.input_length = Some(tokens);
        self
    }

    pub fn with_caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }
}
