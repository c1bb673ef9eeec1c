mod orchestrator;
pub use orchestrator::SimpleOrchestrator;
