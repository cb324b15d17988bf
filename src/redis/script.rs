use crate::errors::{RateLimitError, Result};
use redis::{AsyncCommands, Script};
use tracing::{debug, info};

/// Load and register the token bucket Lua script with Redis
pub async fn load_script<C: AsyncCommands>(conn: &mut C) -> Result<String> {
    let script_content = include_str!("../../scripts/token_bucket.lua");

    debug!("Loading Lua script into Redis...");

    let script = Script::new(script_content);
    let sha = script
        .prepare_invoke()
        .load_async(conn)
        .await
        .map_err(|e| {
            RateLimitError::ScriptExecutionError(format!("Failed to load Lua script: {}", e))
        })?;

    info!("Lua script loaded successfully (SHA: {})", sha);
    Ok(sha)
}

/// Get the script object for execution
pub fn get_script() -> Script {
    let script_content = include_str!("../../scripts/token_bucket.lua");
    Script::new(script_content)
}
