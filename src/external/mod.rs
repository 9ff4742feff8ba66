pub mod gemini;
pub mod generative_provider;
