//! Hosted text-generation providers.

pub mod bedrock;

pub use bedrock::BedrockClient;
