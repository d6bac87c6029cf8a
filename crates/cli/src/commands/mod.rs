// CLI command implementations

pub mod cameras;
pub mod dashboard;
pub mod facilities;
pub mod violations;
