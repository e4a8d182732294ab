use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    /// Trials per simulation request when the caller does not specify.
    pub default_simulation_runs: usize,
    /// Ratio grid resolution for the recurring-expense optimizer.
    pub default_optimizer_steps: u32,
    /// Trials per candidate ratio during optimization.
    pub default_runs_per_step: usize,
    /// Hard cap on trials accepted from a single request.
    pub max_simulation_runs: usize,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| EngineError::Config(format!("SERVER_PORT: {e}")))?;

        let default_simulation_runs = env_var_or("DEFAULT_SIMULATION_RUNS", "1000")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_SIMULATION_RUNS: {e}")))?;

        let default_optimizer_steps = env_var_or("DEFAULT_OPTIMIZER_STEPS", "20")
            .parse::<u32>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_OPTIMIZER_STEPS: {e}")))?;

        let default_runs_per_step = env_var_or("DEFAULT_RUNS_PER_STEP", "500")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_RUNS_PER_STEP: {e}")))?;

        let max_simulation_runs = env_var_or("MAX_SIMULATION_RUNS", "200000")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("MAX_SIMULATION_RUNS: {e}")))?;

        if default_optimizer_steps == 0 {
            return Err(EngineError::Config(
                "DEFAULT_OPTIMIZER_STEPS must be at least 1".into(),
            ));
        }

        Ok(Self {
            server_port,
            default_simulation_runs,
            default_optimizer_steps,
            default_runs_per_step,
            max_simulation_runs,
        })
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
