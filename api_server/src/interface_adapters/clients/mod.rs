// The clients defined here are reqwest clients for the external services the API depends on.

pub mod sheets;
pub mod workflow;

pub use sheets::SheetsClient;
pub use workflow::WorkflowClient;
