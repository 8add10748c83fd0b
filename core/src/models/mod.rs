pub mod factory;
pub mod openai;
pub mod tagged;

pub use factory::create_model;
pub use openai::OpenAIModel;
pub use tagged::split_tagged_tool_calls;
