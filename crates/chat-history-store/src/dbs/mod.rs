#[cfg(feature = "dynamodb")]
pub mod dynamo;
#[cfg(feature = "mongodb")]
pub mod mongo;
