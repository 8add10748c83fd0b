pub mod context;
pub mod dispatcher;
pub mod history;
pub mod loop_;
pub mod registry;
pub mod resolver;

pub use context::ContextBuilder;
pub use dispatcher::ToolDispatcher;
pub use history::{ConversationHistory, ConversationTurn};
pub use loop_::{AgentLoop, DEFAULT_MAX_ITERATIONS, IterationState};
pub use registry::{
    CatalogEntry, DEFAULT_PROVIDER_ID, DEFAULT_SEPARATOR, RegistryMode, ToolRegistry,
};
pub use resolver::{MatchStrategy, Resolution, ToolNameResolver};
