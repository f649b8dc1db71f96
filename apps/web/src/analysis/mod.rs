// Resume analysis: prompt templates, the model round trip, and presenters.
// All model calls go through llm_client::CompletionModel.

pub mod pipeline;
pub mod presenter;
pub mod prompts;
