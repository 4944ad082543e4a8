//! Basecamp Router - deterministic multi-provider LLM task routing
//!
//! Callers describe a task (its type, what to optimize for, how hard it is)
//! and the router picks exactly one model from a fixed catalog, calls it
//! once through an OpenAI-compatible endpoint, and keeps running cost and
//! latency figures per provider.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use basecamp_router::{Complexity, Priority, RouterSettings, TaskContext, TaskRouter, TaskType};
//!
//! # async fn demo() -> Result<(), basecamp_router::RouterError> {
//! let router = TaskRouter::new(RouterSettings::from_env()?)?;
//!
//! let ctx = TaskContext::new(TaskType::EmailCopy, Priority::Speed, Complexity::Simple);
//! let result = router
//!     .execute_task("Write a subject line for our Patagonia trek", &ctx, None)
//!     .await?;
//! println!("{} ({:.5})", result.content, result.cost);
//! # Ok(())
//! # }
//! ```
//!
//! ## Routing without calling
//!
//! ```rust
//! use basecamp_router::{Complexity, Priority, TaskContext, TaskRouter, TaskType, MockTransport};
//! use std::sync::Arc;
//!
//! let router = TaskRouter::builder()
//!     .transport(Arc::new(MockTransport::echo()))
//!     .build()
//!     .unwrap();
//!
//! let ctx = TaskContext::new(TaskType::RefundDecision, Priority::Quality, Complexity::Simple);
//! let decision = router.route_task(&ctx);
//! assert_eq!(decision.model.id, "anthropic/claude-3-opus");
//! ```
//!
//! The router never retries, never falls back to another model and never
//! interprets `content`. Those belong to the caller.

pub mod batch;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod observability;
pub mod policy;
pub mod router;
pub mod task;
pub mod transport;

pub use batch::{BatchOrchestrator, BatchReport, BatchSummary, BatchTask, TaskOutcome};
pub use config::{ConfigError, RouterSettings};
pub use error::RouterError;
pub use executor::{ExecutionResult, Executor, DEFAULT_SYSTEM_PROMPT};
pub use models::{ModelDescriptor, ModelRegistry, ModelRole, Provider};
pub use observability::{LatencyEntry, ModelPerformance, Observability};
pub use policy::{RoutingDecision, RoutingPolicy};
pub use router::{TaskRouter, TaskRouterBuilder};
pub use task::{Complexity, Priority, TaskContext, TaskType};
pub use transport::{
    ChatCompletion, ChatRequest, ChatTransport, HttpTransport, MockTransport, TokenUsage,
    TransportError,
};
