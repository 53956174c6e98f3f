use flexi_logger::{Logger, LoggerHandle};

pub fn log_spec(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Starts logging to stderr. `RUST_LOG` overrides the level chosen here.
/// Keep the returned handle alive for the lifetime of the program.
pub fn init(debug: bool) -> anyhow::Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(log_spec(debug))?
        .log_to_stderr()
        .start()?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_verbosity() {
        assert_eq!(log_spec(true), "debug");
        assert_eq!(log_spec(false), "info");
    }
}
